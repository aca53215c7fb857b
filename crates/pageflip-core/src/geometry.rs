#![forbid(unsafe_code)]

//! Geometric primitives for pointer input.
//!
//! Coordinates are page-space distance units (CSS pixels on the web), origin
//! at top-left, y growing downwards.

use std::ops::Sub;

/// A pointer position.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Create a new point.
    #[inline]
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// Displacement between two points.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Offset {
    pub dx: f64,
    pub dy: f64,
}

impl Offset {
    /// The zero offset.
    pub const ZERO: Self = Self { dx: 0.0, dy: 0.0 };

    /// Create a new offset.
    #[inline]
    #[must_use]
    pub const fn new(dx: f64, dy: f64) -> Self {
        Self { dx, dy }
    }

    /// Whether either component's magnitude is strictly greater than `threshold`.
    #[inline]
    #[must_use]
    pub fn exceeds(self, threshold: f64) -> bool {
        self.dx.abs() > threshold || self.dy.abs() > threshold
    }
}

impl Sub for Point {
    type Output = Offset;

    fn sub(self, origin: Point) -> Offset {
        Offset::new(self.x - origin.x, self.y - origin.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_difference_is_offset() {
        let off = Point::new(10.0, 4.0) - Point::new(3.0, 9.0);
        assert_eq!(off, Offset::new(7.0, -5.0));
    }

    #[test]
    fn exceeds_is_strict() {
        assert!(!Offset::new(10.0, 0.0).exceeds(10.0));
        assert!(Offset::new(0.0, -10.5).exceeds(10.0));
        assert!(!Offset::ZERO.exceeds(0.0));
    }
}
