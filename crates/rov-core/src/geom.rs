//! Planar geometry: `Complex` unit-circle headings and cartesian `Point`s.
//!
//! # Heading representation
//!
//! A heading is a direction on the unit circle, stored as radians normalised
//! to the half-open interval (−π, π].  Keeping the normalisation inside the
//! type means angle arithmetic (`+`, `-`, `opposite`) can never leak an
//! out-of-range value, and wrap-around at ±π is handled once, here, instead
//! of at every call site.

use std::f64::consts::{PI, TAU};
use std::fmt;
use std::ops::{Add, Sub};

// ── Complex ───────────────────────────────────────────────────────────────────

/// A direction on the unit circle, normalised to (−π, π].
///
/// The name follows the classical "heading as a point on the complex unit
/// circle" convention; only the argument (angle) is stored.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Complex {
    rad: f64,
}

impl Complex {
    /// The zero heading (facing along +x).
    pub const ZERO: Complex = Complex { rad: 0.0 };

    /// Build from radians; any finite value is accepted and normalised.
    pub fn from_rad(rad: f64) -> Self {
        Complex { rad: normalise(rad) }
    }

    /// Build from degrees.
    pub fn from_deg(deg: f64) -> Self {
        Self::from_rad(deg.to_radians())
    }

    /// Angle in radians, in (−π, π].
    #[inline]
    pub fn rad(self) -> f64 {
        self.rad
    }

    /// Angle in degrees, in (−180, 180].
    #[inline]
    pub fn deg(self) -> f64 {
        self.rad.to_degrees()
    }

    #[inline]
    pub fn cos(self) -> f64 {
        self.rad.cos()
    }

    #[inline]
    pub fn sin(self) -> f64 {
        self.rad.sin()
    }

    /// The heading pointing the other way (rotated by π).
    pub fn opposite(self) -> Complex {
        Complex::from_rad(self.rad + PI)
    }

    /// Absolute circular distance to `other`, in [0, π] radians.
    pub fn distance(self, other: Complex) -> f64 {
        (other - self).rad.abs()
    }

    /// `true` if the circular distance to `other` is within `eps` radians.
    pub fn is_close_to(self, other: Complex, eps: f64) -> bool {
        self.distance(other) <= eps
    }

    /// The heading of the vector from `from` to `to`.
    ///
    /// Coincident points yield `Complex::ZERO`.
    pub fn direction(from: Point, to: Point) -> Complex {
        if from == to {
            return Complex::ZERO;
        }
        Complex::from_rad((to.y - from.y).atan2(to.x - from.x))
    }

    /// Clamp this heading to the closed interval `[min, max]` (both headings
    /// interpreted as plain angles, not circularly).
    pub fn clamp(self, min: Complex, max: Complex) -> Complex {
        Complex { rad: self.rad.clamp(min.rad, max.rad) }
    }
}

/// Normalise an angle to (−π, π].
fn normalise(rad: f64) -> f64 {
    let r = rad.rem_euclid(TAU);
    if r > PI { r - TAU } else { r }
}

impl Add for Complex {
    type Output = Complex;
    #[inline]
    fn add(self, rhs: Complex) -> Complex {
        Complex::from_rad(self.rad + rhs.rad)
    }
}

impl Sub for Complex {
    type Output = Complex;
    #[inline]
    fn sub(self, rhs: Complex) -> Complex {
        Complex::from_rad(self.rad - rhs.rad)
    }
}

impl fmt::Display for Complex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}°", self.deg())
    }
}

// ── Point ─────────────────────────────────────────────────────────────────────

/// A cartesian position in metres, in the global frame.
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
        Point { x, y }
    }

    /// Euclidean distance to `other`, in metres.
    pub fn distance(self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// The point reached by moving `distance` metres along `direction`.
    pub fn translate(self, direction: Complex, distance: f64) -> Point {
        Point {
            x: self.x + direction.cos() * distance,
            y: self.y + direction.sin() * distance,
        }
    }

    /// Shortest distance from `self` to the segment `a`–`b`.
    ///
    /// Degenerate segments (`a == b`) fall back to point distance.
    pub fn distance_to_segment(self, a: Point, b: Point) -> f64 {
        let (dx, dy) = (b.x - a.x, b.y - a.y);
        let len2 = dx * dx + dy * dy;
        if len2 == 0.0 {
            return self.distance(a);
        }
        let t = (((self.x - a.x) * dx + (self.y - a.y) * dy) / len2).clamp(0.0, 1.0);
        self.distance(Point::new(a.x + t * dx, a.y + t * dy))
    }

    /// `true` if both coordinates are finite.
    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.3}, {:.3})", self.x, self.y)
    }
}
