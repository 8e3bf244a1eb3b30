//! High-level helper that runs one image through aggregation, overlap
//! resolution and binning.

use crate::aggregate::CandidateAggregator;
use crate::binning::SizeBinner;
use crate::overlap::{OverlapResolver, Resolution};
use dropsize_core::{Band, BinningStrategy, CandidateSet, Circle, CircleDetector, GrayImage};

/// Everything produced for a single image.
#[derive(Debug, Clone)]
pub struct ImageResult {
    /// Raw per-band candidates, sentinels included.
    pub candidates: CandidateSet,
    /// Candidates left after nested re-detections were removed.
    pub resolution: Resolution,
    /// Surviving circles grouped per band.
    pub bins: Vec<Vec<Circle>>,
}

impl ImageResult {
    /// Per-bin circle counts.
    #[must_use]
    pub fn counts(&self) -> Vec<usize> {
        self.bins.iter().map(Vec::len).collect()
    }

    /// All surviving circles in concatenation order.
    #[must_use]
    pub fn circles(&self) -> Vec<Circle> {
        self.resolution.circles()
    }
}

/// Per-image pipeline.
pub struct ImagePipeline<D> {
    aggregator: CandidateAggregator<D>,
    resolver: OverlapResolver,
    binner: SizeBinner,
}

impl<D: CircleDetector> ImagePipeline<D> {
    /// Creates a pipeline with default separation factor, slack and binning.
    pub fn new(detector: D) -> Self {
        Self {
            aggregator: CandidateAggregator::new(detector),
            resolver: OverlapResolver::new(),
            binner: SizeBinner::default(),
        }
    }

    /// Sets the minimum-separation factor passed to the aggregator.
    #[must_use]
    pub fn with_min_dist_factor(mut self, factor: f64) -> Self {
        self.aggregator = self.aggregator.with_min_dist_factor(factor);
        self
    }

    /// Sets the binning strategy.
    #[must_use]
    pub fn with_binning(mut self, strategy: BinningStrategy) -> Self {
        self.binner = SizeBinner::new(strategy);
        self
    }

    /// Replaces the overlap resolver.
    #[must_use]
    pub fn with_resolver(mut self, resolver: OverlapResolver) -> Self {
        self.resolver = resolver;
        self
    }

    /// Underlying detector.
    pub fn detector(&self) -> &D {
        self.aggregator.detector()
    }

    /// Processes one image. `bands` must already be sorted by descending
    /// minimum radius.
    pub fn process(&self, image: &GrayImage, bands: &[Band]) -> ImageResult {
        let candidates = self.aggregator.aggregate(image, bands);
        let resolution = self.resolver.resolve(&candidates);
        let bins = self.binner.bin(&resolution.circles(), bands);
        ImageResult {
            candidates,
            resolution,
            bins,
        }
    }
}
