//! Batch configuration.

use crate::band::{Band, Calibration, DEFAULT_MIN_DIST_FACTOR};
use crate::error::ConfigError;
use std::path::PathBuf;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How surviving circles are re-partitioned into band bins.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum BinningStrategy {
    /// Assign each circle to the band with the largest minimum radius not
    /// exceeding its radius. Order independent. Only `min_r` is consulted, so
    /// a radius in a gap between bands falls into the next-lower band and a
    /// radius below every band falls into the last one.
    #[default]
    RangeClassify,
    /// Cut the radius sequence, in concatenation order, at the first radius
    /// below each band's minimum. Only exact when radii are sorted.
    BoundaryScan,
}

/// Configuration for a batch run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BatchConfig {
    /// Directory holding the input images.
    pub input_dir: PathBuf,
    /// Directory receiving reports and annotated images.
    pub output_dir: PathBuf,
    /// Calibration in microns per pixel. Required.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub calibration_um_per_px: Option<f64>,
    /// Detection bands, any order.
    pub bands: Vec<Band>,
    /// Multiplier of `min_r` giving the minimum center separation.
    pub min_dist_factor: f64,
    /// Binning strategy.
    pub binning: BinningStrategy,
    /// Write annotated copies of each image.
    pub annotate: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("."),
            output_dir: PathBuf::from("."),
            calibration_um_per_px: None,
            bands: Vec::new(),
            min_dist_factor: DEFAULT_MIN_DIST_FACTOR,
            binning: BinningStrategy::default(),
            annotate: true,
        }
    }
}

impl BatchConfig {
    /// Creates a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the input directory.
    #[must_use]
    pub fn with_input_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.input_dir = dir.into();
        self
    }

    /// Sets the output directory.
    #[must_use]
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Sets the calibration in microns per pixel.
    #[must_use]
    pub fn with_calibration_um_per_px(mut self, um_per_px: f64) -> Self {
        self.calibration_um_per_px = Some(um_per_px);
        self
    }

    /// Appends a band.
    #[must_use]
    pub fn with_band(mut self, band: Band) -> Self {
        self.bands.push(band);
        self
    }

    /// Replaces all bands.
    #[must_use]
    pub fn with_bands(mut self, bands: Vec<Band>) -> Self {
        self.bands = bands;
        self
    }

    /// Sets the minimum-separation multiplier.
    #[must_use]
    pub fn with_min_dist_factor(mut self, factor: f64) -> Self {
        self.min_dist_factor = factor;
        self
    }

    /// Sets the binning strategy.
    #[must_use]
    pub fn with_binning(mut self, binning: BinningStrategy) -> Self {
        self.binning = binning;
        self
    }

    /// Enables or disables annotated image output.
    #[must_use]
    pub fn with_annotate(mut self, annotate: bool) -> Self {
        self.annotate = annotate;
        self
    }

    /// Validated calibration.
    ///
    /// # Errors
    /// Returns [`ConfigError::MissingCalibration`] if none was set, or
    /// [`ConfigError::InvalidCalibration`] for non-positive or non-finite values.
    pub fn calibration(&self) -> Result<Calibration, ConfigError> {
        let um_per_px = self
            .calibration_um_per_px
            .ok_or(ConfigError::MissingCalibration)?;
        Calibration::from_microns_per_pixel(um_per_px)
    }

    /// Checks everything that can be checked before touching any image.
    ///
    /// # Errors
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.calibration()?;
        self.validate_detection()
    }

    /// Checks the bands and separation factor only, for single-image runs
    /// that produce no physical report.
    ///
    /// # Errors
    /// Returns the first [`ConfigError`] found.
    pub fn validate_detection(&self) -> Result<(), ConfigError> {
        if self.bands.is_empty() {
            return Err(ConfigError::NoBands);
        }
        if !self.min_dist_factor.is_finite() || self.min_dist_factor <= 0.0 {
            return Err(ConfigError::InvalidMinDistFactor(self.min_dist_factor));
        }
        for (index, band) in self.bands.iter().enumerate() {
            band.validate(index)?;
        }
        Ok(())
    }
}
