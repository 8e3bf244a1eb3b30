//! Circle types for detector output.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A detected circle in integer pixel units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Circle {
    /// Center X coordinate (column).
    pub x: i32,
    /// Center Y coordinate (row).
    pub y: i32,
    /// Radius.
    pub r: i32,
}

impl Circle {
    /// Creates a new circle.
    #[inline]
    #[must_use]
    pub fn new(x: i32, y: i32, r: i32) -> Self {
        Self { x, y, r }
    }

    /// Returns true for the `(0, 0, 0)` value some detectors emit for "nothing found".
    #[inline]
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.x == 0 && self.y == 0 && self.r == 0
    }

    /// Euclidean distance between the two centers.
    #[inline]
    #[must_use]
    pub fn center_distance(&self, other: &Self) -> f64 {
        let dx = f64::from(self.x) - f64::from(other.x);
        let dy = f64::from(self.y) - f64::from(other.y);
        dx.hypot(dy)
    }

    /// Checks whether `inner` lies inside this circle, allowing the outer
    /// radius to be inflated by `slack` (e.g. `1.1` for 10%).
    ///
    /// The comparison is strict: a circle touching the inflated boundary is
    /// not contained.
    #[inline]
    #[must_use]
    pub fn contains(&self, inner: &Self, slack: f64) -> bool {
        self.center_distance(inner) + f64::from(inner.r) < slack * f64::from(self.r)
    }
}

impl From<(i32, i32, i32)> for Circle {
    fn from((x, y, r): (i32, i32, i32)) -> Self {
        Self::new(x, y, r)
    }
}
