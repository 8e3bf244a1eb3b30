//! Error types for dropsize-core.

use thiserror::Error;

/// Result type alias for dropsize operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for dropsize operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid batch or band configuration.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Detector failure for a single band.
    #[error("detector error: {0}")]
    Detector(#[from] DetectorError),

    /// A per-image structure does not match the configured band count.
    #[error("expected {expected} bins, got {actual}")]
    BinCountMismatch { expected: usize, actual: usize },
}

/// Configuration errors.
///
/// Statically detectable ones are reported by `BatchConfig::validate`
/// before any image is processed.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// No bands were configured.
    #[error("at least one band is required")]
    NoBands,

    /// No calibration was given.
    #[error("calibration (microns per pixel) is required")]
    MissingCalibration,

    /// Calibration must be a positive finite number.
    #[error("calibration must be positive and finite, got {0}")]
    InvalidCalibration(f64),

    /// Band radius bounds are unusable.
    #[error("band {index}: minimum radius must be positive, got {min_r}")]
    NonPositiveRadius { index: usize, min_r: i32 },

    /// Band has zero or negative width.
    #[error("band {index}: maximum radius {max_r} must exceed minimum radius {min_r}")]
    ZeroWidthBand { index: usize, min_r: i32, max_r: i32 },

    /// Band detector thresholds must be positive.
    #[error("band {index}: detector thresholds must be positive (p1={p1}, p2={p2})")]
    InvalidThresholds { index: usize, p1: f64, p2: f64 },

    /// Minimum center separation must be positive.
    #[error("band {index}: minimum center distance must be positive, got {min_dist}")]
    InvalidMinDist { index: usize, min_dist: f64 },

    /// The global minimum-separation factor must be positive.
    #[error("minimum distance factor must be positive and finite, got {0}")]
    InvalidMinDistFactor(f64),

    /// Image dimensions produce a zero area.
    #[error("image has zero area ({width}x{height})")]
    EmptyImage { width: u32, height: u32 },

    /// No image was folded into the batch.
    #[error("image batch is empty")]
    EmptyBatch,
}

/// Detector failure. Recovered locally by the aggregator.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DetectorError {
    /// Image is too small for the detector kernels.
    #[error("image too small for detection: {width}x{height}")]
    ImageTooSmall { width: u32, height: u32 },

    /// Detection parameters were rejected.
    #[error("invalid detection parameters: {0}")]
    InvalidParams(String),

    /// Implementation-specific failure.
    #[error("{0}")]
    Failed(String),
}
