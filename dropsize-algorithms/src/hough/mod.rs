//! Hough-gradient circle detector.
//!
//! 1. Canny edges (via `imageproc`) with `p1` as the upper and `p1 / 2` as the
//!    lower hysteresis threshold.
//! 2. Every edge pixel votes for centers along its gradient line, in both
//!    directions, at distances `min_r..=max_r`.
//! 3. Local accumulator maxima with at least `p2` votes become center
//!    candidates, strongest first.
//! 4. A candidate closer than `min_dist` to an accepted circle is skipped.
//!    Otherwise its radius is the best-supported distance to the edge pixels.
#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss,
    clippy::cast_possible_wrap
)]

mod edges;

pub use edges::{detect_edges, EdgePoint};

use dropsize_core::{Circle, CircleDetector, DetectionParams, DetectorError};
use image::GrayImage;
use log::trace;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Detector settings not carried by a band.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HoughConfig {
    /// Ratio of the lower to the upper edge threshold, at most 1.
    pub low_threshold_ratio: f32,
    /// Minimum fraction of the circumference that must be backed by edge
    /// pixels for a radius to be accepted.
    pub min_support: f64,
    /// Upper bound on the number of circles returned per call.
    pub max_circles: Option<usize>,
}

impl Default for HoughConfig {
    fn default() -> Self {
        Self {
            low_threshold_ratio: 0.5,
            min_support: 0.2,
            max_circles: None,
        }
    }
}

/// Hough-gradient detector.
#[derive(Clone, Debug, Default)]
pub struct HoughCircleDetector {
    config: HoughConfig,
}

impl HoughCircleDetector {
    /// Create with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with custom configuration.
    #[must_use]
    pub fn with_config(config: HoughConfig) -> Self {
        Self { config }
    }

    /// Current configuration.
    #[must_use]
    pub fn config(&self) -> &HoughConfig {
        &self.config
    }
}

fn check_params(params: &DetectionParams) -> Result<(), DetectorError> {
    if params.min_r <= 0 || params.max_r < params.min_r {
        return Err(DetectorError::InvalidParams(format!(
            "radius range [{}, {}]",
            params.min_r, params.max_r
        )));
    }
    if !(params.p1 > 0.0 && params.p2 > 0.0) {
        return Err(DetectorError::InvalidParams(format!(
            "thresholds p1={} p2={}",
            params.p1, params.p2
        )));
    }
    if !(params.min_dist >= 0.0) {
        return Err(DetectorError::InvalidParams(format!(
            "min_dist={}",
            params.min_dist
        )));
    }
    Ok(())
}

/// Casts center votes along each edge gradient.
fn vote(edges: &[EdgePoint], width: usize, height: usize, min_r: i32, max_r: i32) -> Vec<u32> {
    let mut acc = vec![0u32; width * height];
    for edge in edges {
        let norm = edge.gx.hypot(edge.gy);
        if norm <= f32::EPSILON {
            continue;
        }
        let dx = f64::from(edge.gx / norm);
        let dy = f64::from(edge.gy / norm);
        for sign in [-1.0, 1.0] {
            for r in min_r..=max_r {
                let step = sign * f64::from(r);
                let cx = (f64::from(edge.x) + step * dx).round();
                let cy = (f64::from(edge.y) + step * dy).round();
                if cx < 0.0 || cy < 0.0 || cx >= width as f64 || cy >= height as f64 {
                    // Further steps only move further out.
                    break;
                }
                acc[cy as usize * width + cx as usize] += 1;
            }
        }
    }
    acc
}

/// Local maxima above `threshold`, strongest first. Ties keep raster order.
fn find_centers(acc: &[u32], width: usize, height: usize, threshold: f64) -> Vec<(usize, usize)> {
    let mut centers = Vec::new();
    for y in 1..height.saturating_sub(1) {
        for x in 1..width.saturating_sub(1) {
            let idx = y * width + x;
            let votes = acc[idx];
            if f64::from(votes) >= threshold
                && votes > acc[idx - 1]
                && votes >= acc[idx + 1]
                && votes > acc[idx - width]
                && votes >= acc[idx + width]
            {
                centers.push((idx, votes));
            }
        }
    }
    centers.sort_by(|a, b| b.1.cmp(&a.1));
    centers
        .into_iter()
        .map(|(idx, _)| (idx % width, idx / width))
        .collect()
}

/// Radius with the most edge support around `(cx, cy)`, if any reaches
/// `min_support` of the circumference.
fn estimate_radius(
    edges: &[EdgePoint],
    cx: usize,
    cy: usize,
    min_r: i32,
    max_r: i32,
    min_support: f64,
) -> Option<i32> {
    let bins = (max_r - min_r + 1) as usize;
    let mut hist = vec![0u32; bins];
    for edge in edges {
        let d = (f64::from(edge.x) - cx as f64).hypot(f64::from(edge.y) - cy as f64);
        let r = d.round() as i64;
        if r >= i64::from(min_r) && r <= i64::from(max_r) {
            hist[(r - i64::from(min_r)) as usize] += 1;
        }
    }

    // Edge pixels of a digitized circle spread over neighbouring radii.
    let windowed = |i: usize| -> u32 {
        let lo = i.saturating_sub(1);
        let hi = (i + 1).min(bins - 1);
        hist[lo..=hi].iter().sum()
    };

    // Ranked by windowed count, then by the count at the exact radius.
    let mut best: Option<(usize, (u32, u32))> = None;
    for i in 0..bins {
        let r = min_r + i as i32;
        let score = (windowed(i), hist[i]);
        let support = f64::from(score.0) / (std::f64::consts::TAU * f64::from(r));
        if support >= min_support && best.map_or(true, |(_, s)| score > s) {
            best = Some((i, score));
        }
    }
    best.map(|(i, _)| min_r + i as i32)
}

impl CircleDetector for HoughCircleDetector {
    fn detect(
        &self,
        image: &GrayImage,
        params: &DetectionParams,
    ) -> Result<Vec<Circle>, DetectorError> {
        let (width, height) = image.dimensions();
        if width < 3 || height < 3 {
            return Err(DetectorError::ImageTooSmall { width, height });
        }
        check_params(params)?;
        let (w, h) = (width as usize, height as usize);

        let high = params.p1 as f32;
        let low = high * self.config.low_threshold_ratio.clamp(0.0, 1.0);
        let edges = detect_edges(image, low, high);
        if edges.is_empty() {
            return Ok(Vec::new());
        }

        let acc = vote(&edges, w, h, params.min_r, params.max_r);
        let centers = find_centers(&acc, w, h, params.p2);
        trace!(
            "hough: {} edge pixels, {} center candidates",
            edges.len(),
            centers.len()
        );

        let mut circles: Vec<Circle> = Vec::new();
        for (cx, cy) in centers {
            if let Some(limit) = self.config.max_circles {
                if circles.len() >= limit {
                    break;
                }
            }
            let candidate = Circle::new(cx as i32, cy as i32, 0);
            if circles
                .iter()
                .any(|c| c.center_distance(&candidate) < params.min_dist)
            {
                continue;
            }
            if let Some(r) = estimate_radius(
                &edges,
                cx,
                cy,
                params.min_r,
                params.max_r,
                self.config.min_support,
            ) {
                circles.push(Circle::new(cx as i32, cy as i32, r));
            }
        }
        Ok(circles)
    }

    fn name(&self) -> &'static str {
        "HoughGradient"
    }
}
