//! Batch runner: directory in, reports out.

use crate::reader::ImageDirectory;
use crate::writer::{write_annotated, CsvReportWriter, REPORT_FILE, SETTINGS_FILE};
use crate::Result;
use dropsize_algorithms::{sort_bands, ImagePipeline};
use dropsize_core::{
    build_report, BatchAccumulator, BatchConfig, BatchSummary, CircleDetector, ReportRow,
};
use log::{info, warn};
use std::fs;
use std::path::PathBuf;

/// An input image that could not be processed.
#[derive(Debug, Clone)]
pub struct SkippedImage {
    /// Image path.
    pub path: PathBuf,
    /// Human-readable reason.
    pub reason: String,
}

/// Results of a completed batch.
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    /// One row per band, largest band first.
    pub rows: Vec<ReportRow>,
    /// Raw batch totals.
    pub summary: BatchSummary,
    /// Images that contributed to the statistics.
    pub processed: Vec<PathBuf>,
    /// Images that were skipped.
    pub skipped: Vec<SkippedImage>,
    /// Written `out.csv`.
    pub report_path: PathBuf,
    /// Written `settings.csv`.
    pub settings_path: PathBuf,
    /// Written annotated images.
    pub annotated: Vec<PathBuf>,
    /// Processed images whose annotated copy could not be written.
    pub annotation_failures: Vec<SkippedImage>,
}

/// Processes every image of `config.input_dir` and writes the reports into
/// `config.output_dir`.
///
/// The configuration is validated before any image is read. Images that
/// cannot be decoded are skipped and listed in the outcome. A failed
/// annotated copy is logged and listed too; the image still counts. No
/// report is written when no image could be processed.
///
/// # Errors
/// Returns an error for an invalid configuration, an unreadable input
/// directory, an empty batch, or a failure writing outputs.
pub fn run_batch<D: CircleDetector>(config: &BatchConfig, detector: D) -> Result<BatchOutcome> {
    config.validate()?;
    let calibration = config.calibration()?;
    let bands = sort_bands(&config.bands);

    info!("Image path: {}", config.input_dir.display());
    info!("Output path: {}", config.output_dir.display());
    let directory = ImageDirectory::open(&config.input_dir)?;
    fs::create_dir_all(&config.output_dir)?;

    let pipeline = ImagePipeline::new(detector)
        .with_min_dist_factor(config.min_dist_factor)
        .with_binning(config.binning);
    let mut accumulator = BatchAccumulator::new(bands.len(), calibration);

    let mut processed = Vec::new();
    let mut skipped = Vec::new();
    let mut annotated = Vec::new();
    let mut annotation_failures = Vec::new();

    for (path, image) in directory.images() {
        let image = match image {
            Ok(image) => image,
            Err(err) => {
                warn!("Skipping {}: {err}", path.display());
                skipped.push(SkippedImage {
                    path: path.to_path_buf(),
                    reason: err.to_string(),
                });
                continue;
            }
        };

        info!("Processing image: {}", path.display());
        let result = pipeline.process(&image, &bands);
        accumulator.fold_image(&result.counts(), image.width(), image.height())?;

        if config.annotate {
            match write_annotated(&config.output_dir, path, &image, &result.circles()) {
                Ok(out) => annotated.push(out),
                Err(err) => {
                    warn!("Could not annotate {}: {err}", path.display());
                    annotation_failures.push(SkippedImage {
                        path: path.to_path_buf(),
                        reason: err.to_string(),
                    });
                }
            }
        }
        processed.push(path.to_path_buf());
    }

    let summary = accumulator.finish()?;
    let rows = build_report(&bands, &summary)?;

    let settings_path = config.output_dir.join(SETTINGS_FILE);
    info!("Outputting settings to {}", settings_path.display());
    CsvReportWriter::create(&settings_path)?.write_settings(calibration, &bands)?;

    let report_path = config.output_dir.join(REPORT_FILE);
    info!("Outputting data to {}", report_path.display());
    CsvReportWriter::create(&report_path)?.write_report(&rows)?;

    Ok(BatchOutcome {
        rows,
        summary,
        processed,
        skipped,
        report_path,
        settings_path,
        annotated,
        annotation_failures,
    })
}
