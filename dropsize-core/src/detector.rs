//! Circle detector trait.

use crate::band::DetectionParams;
use crate::circle::Circle;
use crate::error::DetectorError;
use image::GrayImage;

/// Trait for circular-feature detectors.
///
/// Implementations are called once per (image, band) pair, in band order.
/// An empty result means "nothing found"; errors are recovered by the
/// caller as a miss for that band.
pub trait CircleDetector {
    /// Detects circles in `image` using one band's parameters.
    ///
    /// # Errors
    /// Returns a [`DetectorError`] if detection could not run.
    fn detect(
        &self,
        image: &GrayImage,
        params: &DetectionParams,
    ) -> Result<Vec<Circle>, DetectorError>;

    /// Returns the name of the detector.
    fn name(&self) -> &'static str;
}

impl<D: CircleDetector + ?Sized> CircleDetector for &D {
    fn detect(
        &self,
        image: &GrayImage,
        params: &DetectionParams,
    ) -> Result<Vec<Circle>, DetectorError> {
        (**self).detect(image, params)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}
