//! dropsize-core: Core types for multi-scale droplet statistics.
//!
//! This crate provides the data model shared by the detection pipeline:
//! circles and bands, per-image candidate sets with section bookkeeping,
//! batch accumulation, and physical-unit report rows.
//!

pub mod band;
pub mod candidate;
pub mod circle;
pub mod config;
pub mod detector;
pub mod error;
pub mod report;
pub mod section;
pub mod statistics;

pub use band::{Band, Calibration, DetectionParams, DEFAULT_MIN_DIST_FACTOR};
pub use candidate::{CandidateSet, Slot};
pub use circle::Circle;
pub use config::{BatchConfig, BinningStrategy};
pub use detector::CircleDetector;
pub use error::{ConfigError, DetectorError, Error, Result};
pub use image::GrayImage;
pub use report::{build_report, ReportRow, REPORT_HEADER};
pub use section::SectionBoundaries;
pub use statistics::{BatchAccumulator, BatchSummary, BinState};
