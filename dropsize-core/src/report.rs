//! Physical-unit summary rows.

use crate::band::{Band, Calibration};
use crate::error::{ConfigError, Error, Result};
use crate::statistics::BatchSummary;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Column headers, in output order.
pub const REPORT_HEADER: [&str; 6] = [
    "Min r (mm)",
    "Max r (mm)",
    "Mean r (microns)",
    "Total Count (#)",
    "Count/Area (#/mm^3)",
    "N(r) (#/mm^3)",
];

/// One summary row per band.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ReportRow {
    /// Band minimum radius (mm).
    pub min_r_mm: f64,
    /// Band maximum radius (mm).
    pub max_r_mm: f64,
    /// Band mid radius (microns).
    pub mean_r_micron: f64,
    /// Droplets counted in this band across the batch.
    pub total_count: u64,
    /// Batch-average droplets per mm².
    pub avg_density: f64,
    /// `avg_density` per mm of radius interval.
    pub number_density: f64,
}

impl ReportRow {
    /// Builds the row for `band` (at position `index`).
    ///
    /// # Errors
    /// Returns [`ConfigError::ZeroWidthBand`] if the band has no physical width.
    #[allow(clippy::float_cmp)]
    pub fn build(
        index: usize,
        band: &Band,
        calibration: Calibration,
        total_count: u64,
        avg_density: f64,
    ) -> std::result::Result<Self, ConfigError> {
        let min_r_mm = calibration.to_mm(f64::from(band.min_r));
        let max_r_mm = calibration.to_mm(f64::from(band.max_r));
        let width_mm = max_r_mm - min_r_mm;
        if width_mm == 0.0 {
            return Err(ConfigError::ZeroWidthBand {
                index,
                min_r: band.min_r,
                max_r: band.max_r,
            });
        }
        Ok(Self {
            min_r_mm,
            max_r_mm,
            mean_r_micron: (min_r_mm + max_r_mm) * 500.0,
            total_count,
            avg_density,
            number_density: avg_density / width_mm,
        })
    }

    /// Row values in column order.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn values(&self) -> [f64; 6] {
        [
            self.min_r_mm,
            self.max_r_mm,
            self.mean_r_micron,
            self.total_count as f64,
            self.avg_density,
            self.number_density,
        ]
    }
}

/// Builds one row per band from a finished batch.
///
/// `bands` must be in the same order the summary was accumulated in.
///
/// # Errors
/// Returns [`Error::BinCountMismatch`] if the band and bin counts differ, or
/// a configuration error naming the first zero-width band.
pub fn build_report(bands: &[Band], summary: &BatchSummary) -> Result<Vec<ReportRow>> {
    if bands.len() != summary.bins.len() {
        return Err(Error::BinCountMismatch {
            expected: bands.len(),
            actual: summary.bins.len(),
        });
    }
    bands
        .iter()
        .zip(summary.bins.iter().zip(&summary.avg_density))
        .enumerate()
        .map(|(index, (band, (bin, &avg)))| {
            ReportRow::build(index, band, summary.calibration, bin.total_count, avg)
                .map_err(Error::from)
        })
        .collect()
}
