//! dropsize-io: file input and output for dropsize.
//!
//! Reads image directories, writes CSV reports and annotated images, and
//! drives a whole batch through the per-image pipeline.
//!

mod config;
mod error;
mod pipeline;
mod reader;
mod writer;

pub use config::{load_config, save_config};
pub use error::{Error, Result};
pub use pipeline::{run_batch, BatchOutcome, SkippedImage};
pub use reader::{load_gray, ImageDirectory};
pub use writer::{
    annotate, annotated_path, write_annotated, CsvReportWriter, REPORT_FILE, SETTINGS_FILE,
};
