//! Scale bands and calibration.

use crate::error::ConfigError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default multiplier applied to a band's minimum radius to get the minimum
/// center separation passed to the detector.
pub const DEFAULT_MIN_DIST_FACTOR: f64 = 2.0;

/// One detection pass: a radius range plus detector tuning parameters.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Band {
    /// Minimum radius (pixels).
    pub min_r: i32,
    /// Maximum radius (pixels).
    pub max_r: i32,
    /// Upper edge threshold.
    pub p1: f64,
    /// Accumulator (center vote) threshold.
    pub p2: f64,
    /// Optional override of the minimum center separation (pixels).
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub min_dist: Option<f64>,
}

impl Band {
    /// Creates a band without a separation override.
    #[must_use]
    pub fn new(min_r: i32, max_r: i32, p1: f64, p2: f64) -> Self {
        Self {
            min_r,
            max_r,
            p1,
            p2,
            min_dist: None,
        }
    }

    /// Sets a fixed minimum center separation for this band.
    #[must_use]
    pub fn with_min_dist(mut self, min_dist: f64) -> Self {
        self.min_dist = Some(min_dist);
        self
    }

    /// Minimum center separation for this band.
    #[must_use]
    pub fn effective_min_dist(&self, factor: f64) -> f64 {
        self.min_dist
            .unwrap_or_else(|| factor * f64::from(self.min_r))
    }

    /// Builds the detector parameters for this band.
    #[must_use]
    pub fn detection_params(&self, min_dist_factor: f64) -> DetectionParams {
        DetectionParams {
            min_dist: self.effective_min_dist(min_dist_factor),
            p1: self.p1,
            p2: self.p2,
            min_r: self.min_r,
            max_r: self.max_r,
        }
    }

    /// Validates the band. `index` is used to name it in errors.
    ///
    /// # Errors
    /// Returns a [`ConfigError`] describing the first problem found.
    pub fn validate(&self, index: usize) -> Result<(), ConfigError> {
        if self.min_r <= 0 {
            return Err(ConfigError::NonPositiveRadius {
                index,
                min_r: self.min_r,
            });
        }
        if self.max_r <= self.min_r {
            return Err(ConfigError::ZeroWidthBand {
                index,
                min_r: self.min_r,
                max_r: self.max_r,
            });
        }
        let thresholds_ok = |v: f64| v.is_finite() && v > 0.0;
        if !thresholds_ok(self.p1) || !thresholds_ok(self.p2) {
            return Err(ConfigError::InvalidThresholds {
                index,
                p1: self.p1,
                p2: self.p2,
            });
        }
        if let Some(min_dist) = self.min_dist {
            if !min_dist.is_finite() || min_dist <= 0.0 {
                return Err(ConfigError::InvalidMinDist { index, min_dist });
            }
        }
        Ok(())
    }
}

/// Parameters for a single detector call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectionParams {
    /// Minimum distance between detected centers (pixels).
    pub min_dist: f64,
    /// Upper edge threshold.
    pub p1: f64,
    /// Accumulator threshold.
    pub p2: f64,
    /// Minimum radius (pixels).
    pub min_r: i32,
    /// Maximum radius (pixels).
    pub max_r: i32,
}

/// Physical length of one pixel, stored in millimetres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Calibration {
    mm_per_px: f64,
}

impl Calibration {
    /// Creates a calibration from millimetres per pixel.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidCalibration`] unless the value is positive and finite.
    pub fn from_mm_per_pixel(mm_per_px: f64) -> Result<Self, ConfigError> {
        if mm_per_px.is_finite() && mm_per_px > 0.0 {
            Ok(Self { mm_per_px })
        } else {
            Err(ConfigError::InvalidCalibration(mm_per_px))
        }
    }

    /// Creates a calibration from microns per pixel.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidCalibration`] unless the value is positive and finite.
    pub fn from_microns_per_pixel(um_per_px: f64) -> Result<Self, ConfigError> {
        Self::from_mm_per_pixel(um_per_px / 1000.0)
            .map_err(|_| ConfigError::InvalidCalibration(um_per_px))
    }

    /// Millimetres per pixel.
    #[inline]
    #[must_use]
    pub fn mm_per_pixel(&self) -> f64 {
        self.mm_per_px
    }

    /// Microns per pixel.
    #[inline]
    #[must_use]
    pub fn microns_per_pixel(&self) -> f64 {
        self.mm_per_px * 1000.0
    }

    /// Converts a pixel length to millimetres.
    #[inline]
    #[must_use]
    pub fn to_mm(&self, pixels: f64) -> f64 {
        pixels * self.mm_per_px
    }

    /// Physical area of a `width` x `height` image in mm².
    #[must_use]
    pub fn image_area_mm2(&self, width: u32, height: u32) -> f64 {
        self.mm_per_px * self.mm_per_px * f64::from(height) * f64::from(width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_min_dist() {
        let band = Band::new(15, 30, 250.0, 30.0);
        assert!((band.effective_min_dist(DEFAULT_MIN_DIST_FACTOR) - 30.0).abs() < f64::EPSILON);

        let band = band.with_min_dist(12.5);
        assert!((band.effective_min_dist(DEFAULT_MIN_DIST_FACTOR) - 12.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_band_validation() {
        assert!(Band::new(10, 30, 40.0, 22.0).validate(0).is_ok());
        assert_eq!(
            Band::new(30, 30, 40.0, 22.0).validate(2),
            Err(ConfigError::ZeroWidthBand {
                index: 2,
                min_r: 30,
                max_r: 30
            })
        );
        assert!(matches!(
            Band::new(0, 30, 40.0, 22.0).validate(0),
            Err(ConfigError::NonPositiveRadius { .. })
        ));
        assert!(matches!(
            Band::new(10, 30, 0.0, 22.0).validate(0),
            Err(ConfigError::InvalidThresholds { .. })
        ));
        assert!(matches!(
            Band::new(10, 30, 40.0, 22.0).with_min_dist(-1.0).validate(0),
            Err(ConfigError::InvalidMinDist { .. })
        ));
    }

    #[test]
    fn test_calibration() {
        let calib = Calibration::from_microns_per_pixel(4.2623).unwrap();
        assert!((calib.mm_per_pixel() - 0.004_262_3).abs() < 1e-12);
        assert!((calib.microns_per_pixel() - 4.2623).abs() < 1e-9);

        assert!(Calibration::from_mm_per_pixel(0.0).is_err());
        assert!(Calibration::from_mm_per_pixel(-0.5).is_err());
        assert!(Calibration::from_mm_per_pixel(f64::NAN).is_err());
    }
}
