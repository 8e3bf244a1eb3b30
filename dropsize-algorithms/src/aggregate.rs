//! Candidate aggregation across scale bands.

use dropsize_core::{Band, CandidateSet, CircleDetector, GrayImage, DEFAULT_MIN_DIST_FACTOR};
use log::{debug, warn};

/// Runs a detector once per band and concatenates the results.
pub struct CandidateAggregator<D> {
    detector: D,
    min_dist_factor: f64,
}

impl<D: CircleDetector> CandidateAggregator<D> {
    /// Creates an aggregator with the default minimum-separation factor.
    pub fn new(detector: D) -> Self {
        Self {
            detector,
            min_dist_factor: DEFAULT_MIN_DIST_FACTOR,
        }
    }

    /// Sets the multiplier of `min_r` used as minimum center separation.
    #[must_use]
    pub fn with_min_dist_factor(mut self, factor: f64) -> Self {
        self.min_dist_factor = factor;
        self
    }

    /// Returns the wrapped detector.
    pub fn detector(&self) -> &D {
        &self.detector
    }

    /// Detects candidates for every band, in the given order.
    ///
    /// `bands` are expected sorted by descending minimum radius. A band whose
    /// detector call finds nothing, or fails, contributes one empty slot.
    pub fn aggregate(&self, image: &GrayImage, bands: &[Band]) -> CandidateSet {
        let mut candidates = CandidateSet::with_bands(bands.len());

        for (index, band) in bands.iter().enumerate() {
            let params = band.detection_params(self.min_dist_factor);
            match self.detector.detect(image, &params) {
                Ok(circles) => {
                    debug!(
                        "band {index} [{}, {}]: {} candidates",
                        band.min_r,
                        band.max_r,
                        circles.len()
                    );
                    candidates.push_band(circles);
                }
                Err(err) => {
                    warn!(
                        "band {index} [{}, {}]: {} failed, treating as no detections: {err}",
                        band.min_r,
                        band.max_r,
                        self.detector.name()
                    );
                    candidates.push_miss();
                }
            }
        }

        candidates
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dropsize_core::{Circle, DetectionParams, DetectorError};
    use std::cell::RefCell;

    /// Returns canned circles keyed by `min_r` and records every call.
    struct ScriptedDetector {
        calls: RefCell<Vec<DetectionParams>>,
    }

    impl CircleDetector for ScriptedDetector {
        fn detect(
            &self,
            _image: &GrayImage,
            params: &DetectionParams,
        ) -> Result<Vec<Circle>, DetectorError> {
            self.calls.borrow_mut().push(*params);
            match params.min_r {
                30 => Ok(vec![Circle::new(50, 50, 40), Circle::new(10, 10, 35)]),
                20 => Ok(Vec::new()),
                15 => Err(DetectorError::Failed("boom".into())),
                _ => Ok(vec![Circle::new(50, 50, 12)]),
            }
        }

        fn name(&self) -> &'static str {
            "scripted"
        }
    }

    #[test]
    fn test_sections_and_sentinels() {
        let detector = ScriptedDetector {
            calls: RefCell::new(Vec::new()),
        };
        let bands = [
            Band::new(30, 50, 100.0, 50.0),
            Band::new(20, 30, 100.0, 50.0),
            Band::new(15, 20, 100.0, 50.0),
            Band::new(10, 15, 100.0, 50.0).with_min_dist(7.0),
        ];
        let aggregator = CandidateAggregator::new(&detector);
        let image = GrayImage::new(100, 100);
        let set = aggregator.aggregate(&image, &bands);

        assert_eq!(set.sections().ends(), &[2, 3, 4, 5]);
        assert_eq!(set.slots()[2], None);
        assert_eq!(set.slots()[3], None);
        assert_eq!(set.occupied(), 3);

        let calls = detector.calls.borrow();
        let min_dists: Vec<f64> = calls.iter().map(|p| p.min_dist).collect();
        assert_eq!(min_dists, vec![60.0, 40.0, 30.0, 7.0]);
        let order: Vec<i32> = calls.iter().map(|p| p.min_r).collect();
        assert_eq!(order, vec![30, 20, 15, 10]);
    }
}
