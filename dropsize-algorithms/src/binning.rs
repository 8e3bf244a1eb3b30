//! Re-partitioning of surviving circles into band bins.

use dropsize_core::{Band, BinningStrategy, Circle};

/// Splits circles into one group per band.
#[derive(Debug, Clone, Copy, Default)]
pub struct SizeBinner {
    strategy: BinningStrategy,
}

impl SizeBinner {
    /// Creates a binner using `strategy`.
    #[must_use]
    pub fn new(strategy: BinningStrategy) -> Self {
        Self { strategy }
    }

    /// Strategy in use.
    #[must_use]
    pub fn strategy(&self) -> BinningStrategy {
        self.strategy
    }

    /// Groups `circles` into exactly `bands.len()` bins.
    ///
    /// `bands` must be sorted by descending minimum radius.
    #[must_use]
    pub fn bin(&self, circles: &[Circle], bands: &[Band]) -> Vec<Vec<Circle>> {
        match self.strategy {
            BinningStrategy::RangeClassify => classify(circles, bands),
            BinningStrategy::BoundaryScan => boundary_scan(circles, bands),
        }
    }

    /// Per-bin counts.
    #[must_use]
    pub fn counts(&self, circles: &[Circle], bands: &[Band]) -> Vec<usize> {
        self.bin(circles, bands).iter().map(Vec::len).collect()
    }
}

/// Index of the first band whose minimum radius does not exceed `r`. A radius
/// in a gap between bands lands in the band below the gap; radii below every
/// band fall into the last one.
fn band_index(r: i32, bands: &[Band]) -> usize {
    bands
        .iter()
        .position(|band| r >= band.min_r)
        .unwrap_or(bands.len().saturating_sub(1))
}

fn classify(circles: &[Circle], bands: &[Band]) -> Vec<Vec<Circle>> {
    let mut bins = vec![Vec::new(); bands.len()];
    if bands.is_empty() {
        return bins;
    }
    for circle in circles {
        bins[band_index(circle.r, bands)].push(*circle);
    }
    bins
}

/// Cuts the sequence at the first radius below each band's minimum (0 when
/// no radius is below it), then slices between consecutive cuts. A reversed
/// pair of cuts yields an empty bin.
fn boundary_scan(circles: &[Circle], bands: &[Band]) -> Vec<Vec<Circle>> {
    if bands.is_empty() {
        return Vec::new();
    }
    let cuts: Vec<usize> = bands[..bands.len() - 1]
        .iter()
        .map(|band| {
            circles
                .iter()
                .position(|circle| circle.r < band.min_r)
                .unwrap_or(0)
        })
        .collect();

    let mut bins = Vec::with_capacity(bands.len());
    let mut start = 0;
    for &end in &cuts {
        bins.push(slice(circles, start, end));
        start = end;
    }
    bins.push(slice(circles, start, circles.len()));
    bins
}

fn slice(circles: &[Circle], start: usize, end: usize) -> Vec<Circle> {
    if start < end {
        circles[start..end].to_vec()
    } else {
        Vec::new()
    }
}
