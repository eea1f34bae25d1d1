//! 2D geometry primitives shared across FabKit.
//!
//! Coordinates are `f64` throughout; fabrication targets (laser, CNC,
//! printer) all consume millimeter-scale floating point geometry and the
//! normalization engine never quantizes.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Control-point offset factor for approximating a quarter circle of
/// radius `r` with a single cubic Bézier segment (`4/3 * (sqrt(2) - 1)`).
pub const CIRCLE_KAPPA: f64 = 0.552_284_749_8;

/// Represents a 2D point with X and Y coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Creates a new point with the given X and Y coordinates.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Calculates the distance to another point.
    pub fn distance_to(&self, other: &Point) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// A 2D affine transform stored as the six coefficients of a 2×3 matrix,
/// in SVG `matrix(a b c d e f)` order:
///
/// ```text
/// x' = a·x + c·y + e
/// y' = b·x + d·y + f
/// ```
///
/// The default value is the identity transform.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform2D {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Default for Transform2D {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform2D {
    /// The identity transform.
    pub fn identity() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: 0.0,
            f: 0.0,
        }
    }

    /// A pure translation by `(tx, ty)`.
    pub fn translate(tx: f64, ty: f64) -> Self {
        Self {
            e: tx,
            f: ty,
            ..Self::identity()
        }
    }

    /// A scale about the origin. Pass the same value twice for uniform
    /// scaling.
    pub fn scale(sx: f64, sy: f64) -> Self {
        Self {
            a: sx,
            d: sy,
            ..Self::identity()
        }
    }

    /// A counter-clockwise rotation about the origin, in degrees.
    pub fn rotate_degrees(angle_deg: f64) -> Self {
        let rad = angle_deg.to_radians();
        let (sin, cos) = rad.sin_cos();
        Self {
            a: cos,
            b: sin,
            c: -sin,
            d: cos,
            e: 0.0,
            f: 0.0,
        }
    }

    /// A skew along the X and/or Y axis, in degrees.
    pub fn skew_degrees(ax_deg: f64, ay_deg: f64) -> Self {
        Self {
            b: ay_deg.to_radians().tan(),
            c: ax_deg.to_radians().tan(),
            ..Self::identity()
        }
    }

    /// Builds a transform from raw matrix coefficients without validation.
    pub fn from_matrix(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self { a, b, c, d, e, f }
    }

    /// Builds a transform from raw matrix coefficients, rejecting NaN and
    /// infinite values. Loaders that want to fail fast on corrupt transform
    /// attributes use this; the flattening pass itself substitutes identity
    /// instead.
    pub fn try_from_matrix(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Result<Self> {
        let m = Self { a, b, c, d, e, f };
        for (name, value) in [('a', a), ('b', b), ('c', c), ('d', d), ('e', e), ('f', f)] {
            if !value.is_finite() {
                return Err(Error::NonFiniteTransform {
                    coefficient: name,
                    value,
                });
            }
        }
        Ok(m)
    }

    /// Returns true when all six coefficients are finite. The flattener
    /// treats anything else as a malformed transform and substitutes the
    /// identity for that node only.
    pub fn is_finite(&self) -> bool {
        self.a.is_finite()
            && self.b.is_finite()
            && self.c.is_finite()
            && self.d.is_finite()
            && self.e.is_finite()
            && self.f.is_finite()
    }

    /// Composes transforms: the returned transform applies `self` first and
    /// `next` second. Ancestor accumulation in the flattener is therefore
    /// `own.then(&parent)`, so child coordinates are expressed in parent
    /// space before the parent's own transform takes effect.
    pub fn then(&self, next: &Transform2D) -> Transform2D {
        Transform2D {
            a: next.a * self.a + next.c * self.b,
            b: next.b * self.a + next.d * self.b,
            c: next.a * self.c + next.c * self.d,
            d: next.b * self.c + next.d * self.d,
            e: next.a * self.e + next.c * self.f + next.e,
            f: next.b * self.e + next.d * self.f + next.f,
        }
    }

    /// Applies the transform to a point.
    pub fn apply(&self, p: Point) -> Point {
        Point {
            x: self.a * p.x + self.c * p.y + self.e,
            y: self.b * p.x + self.d * p.y + self.f,
        }
    }
}
