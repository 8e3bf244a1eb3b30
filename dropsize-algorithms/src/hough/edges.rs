//! Canny edges with their Sobel gradients.
//!
//! The edge mask comes from `imageproc::edges::canny` (Gaussian smoothing,
//! non-maximum suppression, hysteresis between `low` and `high`). Each edge
//! pixel carries the unsmoothed Sobel derivatives used for center voting.

use image::GrayImage;
use imageproc::edges::canny;
use imageproc::gradients::{horizontal_sobel, vertical_sobel};

/// An edge pixel with its gradient.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgePoint {
    /// X coordinate (pixels).
    pub x: u32,
    /// Y coordinate (pixels).
    pub y: u32,
    /// Horizontal derivative.
    pub gx: f32,
    /// Vertical derivative.
    pub gy: f32,
}

/// Edge pixels of `image` in raster order.
///
/// Returns nothing for images smaller than 3x3.
#[must_use]
pub fn detect_edges(image: &GrayImage, low: f32, high: f32) -> Vec<EdgePoint> {
    let (w, h) = image.dimensions();
    if w < 3 || h < 3 {
        return Vec::new();
    }

    let mask = canny(image, low.min(high), high);
    let gx = horizontal_sobel(image);
    let gy = vertical_sobel(image);

    mask.enumerate_pixels()
        .filter(|(_, _, p)| p[0] > 0)
        .map(|(x, y, _)| EdgePoint {
            x,
            y,
            gx: f32::from(gx.get_pixel(x, y)[0]),
            gy: f32::from(gy.get_pixel(x, y)[0]),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn test_flat_image_has_no_edges() {
        let image = GrayImage::from_pixel(20, 20, Luma([90]));
        assert!(detect_edges(&image, 50.0, 100.0).is_empty());
    }

    #[test]
    fn test_vertical_step() {
        let image = GrayImage::from_fn(20, 20, |x, _| Luma([if x >= 10 { 200 } else { 0 }]));
        let edges = detect_edges(&image, 50.0, 100.0);
        assert!(!edges.is_empty());
        for edge in &edges {
            assert!((8..=11).contains(&edge.x), "{edge:?}");
            assert!(edge.gx >= 0.0);
            assert!(edge.gy.abs() <= edge.gx.abs(), "{edge:?}");
        }
    }

    #[test]
    fn test_tiny_image() {
        let image = GrayImage::from_pixel(2, 2, Luma([255]));
        assert!(detect_edges(&image, 1.0, 2.0).is_empty());
    }
}
