//! Planar coordinate type.
//!
//! Episodes live on a local flat frame measured in metres, so plain Euclidean
//! geometry is exact enough; `f64` keeps interpolation along long car routes
//! free of visible rounding.

use std::ops::{Add, Mul, Sub};

/// A position (or displacement) in the episode's planar frame, in metres.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean length of the vector from the origin to `self`.
    #[inline]
    pub fn norm(self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Euclidean distance in metres.
    #[inline]
    pub fn distance(self, other: Point) -> f64 {
        (other - self).norm()
    }

    /// Linear interpolation: `a` at `t = 0`, `b` at `t = 1`.
    ///
    /// `t` is not clamped, so values outside `[0, 1]` extrapolate.
    #[inline]
    pub fn lerp(a: Point, b: Point, t: f64) -> Point {
        a + (b - a) * t
    }

    /// Unit vector in the direction of `self`, or the origin for a zero vector.
    pub fn normalized(self) -> Point {
        let n = self.norm();
        if n > 0.0 { self * (1.0 / n) } else { Point::ORIGIN }
    }

    /// Scale `self` down so its norm does not exceed `max`.
    pub fn clamp_norm(self, max: f64) -> Point {
        let n = self.norm();
        if n > max && n > 0.0 { self * (max / n) } else { self }
    }
}

impl Add for Point {
    type Output = Point;
    #[inline]
    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;
    #[inline]
    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point {
    type Output = Point;
    #[inline]
    fn mul(self, rhs: f64) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.2}, {:.2})", self.x, self.y)
    }
}
