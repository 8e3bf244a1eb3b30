//! dropsize-algorithms: per-image droplet detection stages.
//!
//! - **Ordering** - stable descending sort of scale bands
//! - **Aggregation** - one detector call per band into a sectioned candidate set
//! - **Overlap** - removal of nested re-detections across bands
//! - **Binning** - re-partitioning survivors into band bins
//! - **Hough** - default gradient-voting circle detector
//!
#![warn(missing_docs)]

mod aggregate;
mod binning;
pub mod hough;
mod ordering;
mod overlap;
mod processing;

pub use aggregate::CandidateAggregator;
pub use binning::SizeBinner;
pub use hough::{HoughCircleDetector, HoughConfig};
pub use ordering::{is_sorted_desc, sort_bands};
pub use overlap::{OverlapResolver, Resolution, DEFAULT_CONTAINMENT_SLACK};
pub use processing::{ImagePipeline, ImageResult};

// Re-export core detection types
pub use dropsize_core::{Band, BinningStrategy, CandidateSet, Circle, CircleDetector};
