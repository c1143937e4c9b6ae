//! `AreaExpr` — recursive set expressions over the plane.
//!
//! Behaviours describe regions declaratively ("within 0.5 m of the label but
//! outside the robot footprint") and hand the expression to the grid or the
//! planners, which evaluate it as a plain predicate on points.

use crate::geom::Point;

/// A region of the plane built from circles and rectangles with boolean
/// combinators.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AreaExpr {
    /// Closed disc of `radius` around `center`.
    Circle { center: Point, radius: f64 },
    /// Axis-aligned rectangle, both corners inclusive.
    Rect { min: Point, max: Point },
    Not(Box<AreaExpr>),
    And(Vec<AreaExpr>),
    Or(Vec<AreaExpr>),
}

impl AreaExpr {
    pub fn circle(center: Point, radius: f64) -> Self {
        AreaExpr::Circle { center, radius }
    }

    pub fn rect(min: Point, max: Point) -> Self {
        AreaExpr::Rect { min, max }
    }

    pub fn not(inner: AreaExpr) -> Self {
        AreaExpr::Not(Box::new(inner))
    }

    pub fn and(parts: Vec<AreaExpr>) -> Self {
        AreaExpr::And(parts)
    }

    pub fn or(parts: Vec<AreaExpr>) -> Self {
        AreaExpr::Or(parts)
    }

    /// Evaluate the expression as a predicate on `point`.
    ///
    /// Empty `And` is the whole plane, empty `Or` is the empty set (the usual
    /// identities for conjunction and disjunction).
    pub fn contains(&self, point: Point) -> bool {
        match self {
            AreaExpr::Circle { center, radius } => point.distance(*center) <= *radius,
            AreaExpr::Rect { min, max } => {
                point.x >= min.x && point.x <= max.x && point.y >= min.y && point.y <= max.y
            }
            AreaExpr::Not(inner) => !inner.contains(point),
            AreaExpr::And(parts) => parts.iter().all(|p| p.contains(point)),
            AreaExpr::Or(parts) => parts.iter().any(|p| p.contains(point)),
        }
    }
}
