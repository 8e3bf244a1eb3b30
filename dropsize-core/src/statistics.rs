//! Per-band batch statistics.

use crate::band::Calibration;
use crate::error::{ConfigError, Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Running totals for one band.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BinState {
    /// Number of droplets across all images.
    pub total_count: u64,
    /// Sum of per-image densities (droplets per mm²).
    pub total_density: f64,
}

/// Accumulates per-image bin counts across a batch.
///
/// The number of bins is fixed at construction and every folded image must
/// provide exactly that many counts.
#[derive(Debug, Clone)]
pub struct BatchAccumulator {
    calibration: Calibration,
    bins: Vec<BinState>,
    images: usize,
}

impl BatchAccumulator {
    /// Creates an accumulator for `bands` bins.
    #[must_use]
    pub fn new(bands: usize, calibration: Calibration) -> Self {
        Self {
            calibration,
            bins: vec![BinState::default(); bands],
            images: 0,
        }
    }

    /// Folds one image's bin counts into the totals.
    ///
    /// # Errors
    /// Returns [`Error::BinCountMismatch`] if `counts` has the wrong length, or
    /// [`ConfigError::EmptyImage`] for a zero-area image. Nothing is folded on error.
    #[allow(clippy::cast_precision_loss)]
    pub fn fold_image(&mut self, counts: &[usize], width: u32, height: u32) -> Result<()> {
        if counts.len() != self.bins.len() {
            return Err(Error::BinCountMismatch {
                expected: self.bins.len(),
                actual: counts.len(),
            });
        }
        let area = self.calibration.image_area_mm2(width, height);
        if area <= 0.0 {
            return Err(ConfigError::EmptyImage { width, height }.into());
        }

        for (bin, &count) in self.bins.iter_mut().zip(counts) {
            bin.total_count += count as u64;
            bin.total_density += count as f64 / area;
        }
        self.images += 1;
        Ok(())
    }

    /// Number of images folded so far.
    #[must_use]
    pub fn images(&self) -> usize {
        self.images
    }

    /// Current per-band totals.
    #[must_use]
    pub fn bins(&self) -> &[BinState] {
        &self.bins
    }

    /// Finishes the batch, averaging densities over the folded images.
    ///
    /// # Errors
    /// Returns [`ConfigError::EmptyBatch`] if no image was folded.
    #[allow(clippy::cast_precision_loss)]
    pub fn finish(self) -> Result<BatchSummary> {
        if self.images == 0 {
            return Err(ConfigError::EmptyBatch.into());
        }
        let images = self.images as f64;
        let avg_density = self
            .bins
            .iter()
            .map(|bin| bin.total_density / images)
            .collect();
        Ok(BatchSummary {
            calibration: self.calibration,
            bins: self.bins,
            avg_density,
            images: self.images,
        })
    }
}

/// Final batch totals.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchSummary {
    /// Calibration used for the batch.
    pub calibration: Calibration,
    /// Raw per-band totals.
    pub bins: Vec<BinState>,
    /// Per-band density averaged over images (droplets per mm²).
    pub avg_density: Vec<f64>,
    /// Number of images folded.
    pub images: usize,
}

impl BatchSummary {
    /// Total droplet count across all bands.
    #[must_use]
    pub fn total_count(&self) -> u64 {
        self.bins.iter().map(|bin| bin.total_count).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn calib() -> Calibration {
        Calibration::from_mm_per_pixel(0.01).unwrap()
    }

    #[test]
    fn test_single_image_density() {
        let mut acc = BatchAccumulator::new(2, calib());
        acc.fold_image(&[2, 1], 100, 100).unwrap();
        let summary = acc.finish().unwrap();

        assert_eq!(summary.bins[0].total_count, 2);
        assert_eq!(summary.bins[1].total_count, 1);
        assert_relative_eq!(summary.avg_density[0], 2.0, max_relative = 1e-12);
        assert_relative_eq!(summary.avg_density[1], 1.0, max_relative = 1e-12);
    }

    #[test]
    fn test_counts_sum_and_density_averages() {
        let mut acc = BatchAccumulator::new(2, calib());
        acc.fold_image(&[2, 0], 100, 100).unwrap();
        acc.fold_image(&[4, 3], 100, 200).unwrap();
        let summary = acc.finish().unwrap();

        assert_eq!(summary.images, 2);
        assert_eq!(summary.bins[0].total_count, 6);
        assert_eq!(summary.total_count(), 9);
        // (2/1 + 4/2) / 2
        assert_relative_eq!(summary.avg_density[0], 2.0, max_relative = 1e-12);
        // (0 + 3/2) / 2
        assert_relative_eq!(summary.avg_density[1], 0.75, max_relative = 1e-12);
    }

    #[test]
    fn test_empty_batch_rejected() {
        let acc = BatchAccumulator::new(3, calib());
        assert!(matches!(
            acc.finish(),
            Err(Error::Config(ConfigError::EmptyBatch))
        ));
    }

    #[test]
    fn test_wrong_bin_count_rejected() {
        let mut acc = BatchAccumulator::new(3, calib());
        assert!(matches!(
            acc.fold_image(&[1, 2], 10, 10),
            Err(Error::BinCountMismatch {
                expected: 3,
                actual: 2
            })
        ));
        assert_eq!(acc.images(), 0);
    }

    #[test]
    fn test_zero_area_rejected() {
        let mut acc = BatchAccumulator::new(1, calib());
        assert!(acc.fold_image(&[1], 0, 10).is_err());
        assert_eq!(acc.bins()[0].total_count, 0);
    }
}
