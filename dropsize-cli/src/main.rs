//! dropsize command-line interface.
//!
//! Measures droplet size distributions from directories of images.
#![allow(clippy::uninlined_format_args)]

use clap::{Parser, Subcommand, ValueEnum};

use dropsize_algorithms::{sort_bands, HoughCircleDetector, ImagePipeline};
use dropsize_core::{Band, BatchConfig, BinningStrategy};
use dropsize_io::{load_config, load_gray, run_batch, save_config, write_annotated};
use log::info;
use std::path::PathBuf;
use std::time::Instant;
use thiserror::Error;

/// Result type for CLI operations.
type Result<T> = std::result::Result<T, CliError>;

/// CLI error types.
#[derive(Error, Debug)]
enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("I/O error: {0}")]
    DropsizeIo(#[from] dropsize_io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] dropsize_core::ConfigError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Binning strategy selection.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum Binning {
    /// Classify every circle by band minimum radius
    RangeClassify,
    /// Cut the radius sequence at the first radius below each band minimum
    BoundaryScan,
}

impl From<Binning> for BinningStrategy {
    fn from(value: Binning) -> Self {
        match value {
            Binning::RangeClassify => BinningStrategy::RangeClassify,
            Binning::BoundaryScan => BinningStrategy::BoundaryScan,
        }
    }
}

/// Parses `MIN:MAX:P1:P2[:MIN_DIST]`.
fn parse_band(s: &str) -> std::result::Result<Band, String> {
    let parts: Vec<&str> = s.split(':').collect();
    if parts.len() != 4 && parts.len() != 5 {
        return Err(format!(
            "expected MIN:MAX:P1:P2[:MIN_DIST], got '{}'",
            s
        ));
    }
    let int = |v: &str| v.trim().parse::<i32>().map_err(|e| format!("'{}': {}", v, e));
    let float = |v: &str| v.trim().parse::<f64>().map_err(|e| format!("'{}': {}", v, e));

    let mut band = Band::new(int(parts[0])?, int(parts[1])?, float(parts[2])?, float(parts[3])?);
    if let Some(min_dist) = parts.get(4) {
        band = band.with_min_dist(float(min_dist)?);
    }
    Ok(band)
}

/// Options shared by every command that runs detection.
#[derive(clap::Args, Debug)]
struct DetectionArgs {
    /// Detection band as MIN:MAX:P1:P2[:MIN_DIST] (pixels, edge threshold,
    /// accumulator threshold). Repeat for several bands; replaces the bands
    /// of --config.
    #[arg(short, long = "band", value_parser = parse_band)]
    bands: Vec<Band>,

    /// Minimum center separation as a multiple of the band minimum radius
    #[arg(long)]
    min_dist_factor: Option<f64>,

    /// Binning strategy
    #[arg(long, value_enum)]
    binning: Option<Binning>,
}

impl DetectionArgs {
    fn apply(&self, mut config: BatchConfig) -> BatchConfig {
        if !self.bands.is_empty() {
            config = config.with_bands(self.bands.clone());
        }
        if let Some(factor) = self.min_dist_factor {
            config = config.with_min_dist_factor(factor);
        }
        if let Some(binning) = self.binning {
            config = config.with_binning(binning.into());
        }
        config
    }
}

/// Droplet size distribution from multi-scale circle detection.
#[derive(Parser)]
#[command(name = "dropsize")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Verbose logging (debug level unless RUST_LOG is set)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process every image in a directory and write out.csv and settings.csv
    Process {
        /// Input image directory (overrides --config)
        input: Option<PathBuf>,

        /// Output directory (overrides --config)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// JSON configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Calibration in microns per pixel (overrides --config)
        #[arg(long)]
        calibration: Option<f64>,

        #[command(flatten)]
        detection: DetectionArgs,

        /// Do not write annotated images
        #[arg(long)]
        no_annotate: bool,

        /// Write the effective configuration to this file before running
        #[arg(long)]
        save_config: Option<PathBuf>,
    },

    /// Run detection and overlap resolution on one image and print the result
    Inspect {
        /// Input image
        image: PathBuf,

        /// JSON configuration file supplying bands
        #[arg(short, long)]
        config: Option<PathBuf>,

        #[command(flatten)]
        detection: DetectionArgs,

        /// Write an annotated copy into this directory
        #[arg(long)]
        annotate: Option<PathBuf>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn base_config(path: Option<&PathBuf>) -> Result<BatchConfig> {
    match path {
        Some(path) => Ok(load_config(path)?),
        None => Ok(BatchConfig::default()),
    }
}

fn log_config(config: &BatchConfig) {
    match config.calibration_um_per_px {
        Some(um) => info!("Calibration: {} microns/pix", um),
        None => info!("Calibration: not set"),
    }
    info!(
        "Min dist factor: {}, binning: {:?}, annotate: {}",
        config.min_dist_factor, config.binning, config.annotate
    );
    for band in &config.bands {
        info!(
            "Band [{}, {}] p1={} p2={}",
            band.min_r, band.max_r, band.p1, band.p2
        );
    }
}

/// Detection settings for `inspect`, which needs no calibration or paths.
fn inspect_config(config: Option<&PathBuf>, detection: &DetectionArgs) -> Result<BatchConfig> {
    let config = detection.apply(base_config(config)?);
    config.validate_detection()?;
    Ok(config)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Process {
            input,
            output,
            config,
            calibration,
            detection,
            no_annotate,
            save_config: save_to,
        } => {
            let mut config = detection.apply(base_config(config.as_ref())?);
            if let Some(input) = input {
                config = config.with_input_dir(input);
            }
            if let Some(output) = output {
                config = config.with_output_dir(output);
            }
            if let Some(calibration) = calibration {
                config = config.with_calibration_um_per_px(calibration);
            }
            if no_annotate {
                config = config.with_annotate(false);
            }
            config.validate()?;
            log_config(&config);

            if let Some(path) = save_to {
                save_config(&config, &path)?;
                info!("Saved configuration to {}", path.display());
            }

            let start = Instant::now();
            let outcome = run_batch(&config, HoughCircleDetector::new())?;
            let elapsed = start.elapsed();

            println!(
                "Processed {} images in {:.2}s",
                outcome.processed.len(),
                elapsed.as_secs_f64()
            );
            if !outcome.skipped.is_empty() {
                println!("Skipped {} images:", outcome.skipped.len());
                for skipped in &outcome.skipped {
                    println!("  {}: {}", skipped.path.display(), skipped.reason);
                }
            }
            if !outcome.annotation_failures.is_empty() {
                println!(
                    "Annotated copies not written for {} images:",
                    outcome.annotation_failures.len()
                );
                for failed in &outcome.annotation_failures {
                    println!("  {}: {}", failed.path.display(), failed.reason);
                }
            }
            println!("Total droplets: {}", outcome.summary.total_count());
            println!(
                "{:>10} | {:>10} | {:>8} | {:>14}",
                "Min r (mm)", "Max r (mm)", "Count", "N(r) (#/mm^3)"
            );
            println!("{:-<51}", "");
            for row in &outcome.rows {
                println!(
                    "{:>10.4} | {:>10.4} | {:>8} | {:>14.4}",
                    row.min_r_mm, row.max_r_mm, row.total_count, row.number_density
                );
            }
            println!("Report: {}", outcome.report_path.display());
            println!("Settings: {}", outcome.settings_path.display());
        }

        Commands::Inspect {
            image,
            config,
            detection,
            annotate,
            json,
        } => {
            let config = inspect_config(config.as_ref(), &detection)?;
            log_config(&config);

            let bands = sort_bands(&config.bands);
            let gray = load_gray(&image)?;
            let pipeline = ImagePipeline::new(HoughCircleDetector::new())
                .with_min_dist_factor(config.min_dist_factor)
                .with_binning(config.binning);
            let result = pipeline.process(&gray, &bands);

            if json {
                let candidates: Vec<_> = result
                    .candidates
                    .slots()
                    .iter()
                    .map(|slot| slot.map(|c| [c.x, c.y, c.r]))
                    .collect();
                let survivors: Vec<_> = result
                    .circles()
                    .iter()
                    .map(|c| [c.x, c.y, c.r])
                    .collect();
                let doc = serde_json::json!({
                    "image": image.display().to_string(),
                    "width": gray.width(),
                    "height": gray.height(),
                    "candidates": candidates,
                    "sections": result.candidates.sections().ends(),
                    "removed": result.resolution.removed,
                    "survivors": survivors,
                    "counts": result.counts(),
                });
                println!("{}", serde_json::to_string_pretty(&doc)?);
            } else {
                println!("Image: {} ({}x{})", image.display(), gray.width(), gray.height());
                for (section, band) in bands.iter().enumerate() {
                    let found: Vec<_> = result.candidates.section_circles(section).collect();
                    println!(
                        "Band {} [{}, {}]: {} candidates",
                        section,
                        band.min_r,
                        band.max_r,
                        found.len()
                    );
                    for c in found {
                        println!("  ({}, {}) r={}", c.x, c.y, c.r);
                    }
                }
                println!("Removed slots: {:?}", result.resolution.removed);
                println!("Bin counts: {:?}", result.counts());
            }

            if let Some(dir) = annotate {
                std::fs::create_dir_all(&dir)?;
                let path = write_annotated(&dir, &image, &gray, &result.circles())?;
                println!("Annotated image: {}", path.display());
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_band() {
        let band = parse_band("30:50:100:40").unwrap();
        assert_eq!(band, Band::new(30, 50, 100.0, 40.0));

        let band = parse_band("10:20:80.5:25:12").unwrap();
        assert_eq!(band, Band::new(10, 20, 80.5, 25.0).with_min_dist(12.0));
    }

    #[test]
    fn test_parse_band_rejects_garbage() {
        assert!(parse_band("30:50:100").is_err());
        assert!(parse_band("a:50:100:40").is_err());
        assert!(parse_band("30:50:100:40:1:2").is_err());
    }

    #[test]
    fn test_flags_override_config() {
        let cli = Cli::try_parse_from([
            "dropsize",
            "process",
            "imgs",
            "--band",
            "30:50:100:40",
            "--band",
            "10:30:80:20",
            "--binning",
            "boundary-scan",
            "--no-annotate",
        ])
        .unwrap();
        let Commands::Process { detection, .. } = cli.command else {
            panic!("expected process");
        };
        let base = BatchConfig::new().with_band(Band::new(1, 2, 1.0, 1.0));
        let config = detection.apply(base);
        assert_eq!(config.bands.len(), 2);
        assert_eq!(config.binning, BinningStrategy::BoundaryScan);
    }

    fn inspect_detection(args: &[&str]) -> DetectionArgs {
        let mut argv = vec!["dropsize", "inspect", "img.png"];
        argv.extend_from_slice(args);
        let cli = Cli::try_parse_from(argv).unwrap();
        let Commands::Inspect { detection, .. } = cli.command else {
            panic!("expected inspect");
        };
        detection
    }

    #[test]
    fn test_inspect_rejects_bad_min_dist_factor() {
        let detection = inspect_detection(&["--band", "10:20:80:20", "--min-dist-factor=-1"]);
        let err = inspect_config(None, &detection).unwrap_err();
        let CliError::Config(dropsize_core::ConfigError::InvalidMinDistFactor(factor)) = err else {
            panic!("unexpected error {err:?}");
        };
        assert!((factor + 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_inspect_needs_bands_not_calibration() {
        let err = inspect_config(None, &inspect_detection(&[])).unwrap_err();
        assert!(matches!(
            err,
            CliError::Config(dropsize_core::ConfigError::NoBands)
        ));

        let config = inspect_config(None, &inspect_detection(&["-b", "10:20:80:20"])).unwrap();
        assert!(config.calibration_um_per_px.is_none());
        assert_eq!(config.bands.len(), 1);
    }
}
