//! Fundamental geometric types for plane truss modelling.

use nalgebra::Vector2;
use serde::Serialize;

use crate::errors::DomainError;

/// One of the two in-plane translation directions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Global X direction.
    X,
    /// Global Y direction.
    Y,
}

impl Axis {
    /// Both axes in DOF order.
    pub const ALL: [Axis; 2] = [Axis::X, Axis::Y];

    /// Offset of this axis within a node's pair of DOFs.
    #[must_use]
    pub const fn offset(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
        }
    }
}

/// Position in the plane.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Point {
    /// Distance along the global X axis.
    pub x: f64,
    /// Distance along the global Y axis.
    pub y: f64,
}

impl Point {
    /// Create a [`Point`] with explicit coordinates.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Convert the point into an algebraic vector.
    #[must_use]
    pub fn to_vector(self) -> Vector2<f64> {
        Vector2::new(self.x, self.y)
    }
}

impl From<Vector2<f64>> for Point {
    fn from(value: Vector2<f64>) -> Self {
        Self::new(value.x, value.y)
    }
}

/// In-plane force vector.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Force {
    /// Force component acting along the global X axis.
    pub x: f64,
    /// Force component acting along the global Y axis.
    pub y: f64,
}

impl Force {
    /// Create a [`Force`] with explicit components.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Component along `axis`.
    #[must_use]
    pub const fn component(self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
        }
    }
}

impl Default for Force {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

/// In-plane nodal translation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Displacement {
    /// Displacement component along the global X axis.
    pub x: f64,
    /// Displacement component along the global Y axis.
    pub y: f64,
}

impl Displacement {
    /// Create a [`Displacement`] with explicit components.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Convert the displacement into an algebraic vector.
    #[must_use]
    pub fn to_vector(self) -> Vector2<f64> {
        Vector2::new(self.x, self.y)
    }
}

impl Default for Displacement {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

/// Convenience helper for creating [`Point`] instances.
///
/// # Examples
/// ```
/// use planetruss::point;
///
/// let origin = point(0.0, 0.0);
/// assert_eq!(origin.x, 0.0);
/// ```
#[must_use]
pub const fn point(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

/// Convenience helper for creating [`Force`] instances.
///
/// # Examples
/// ```
/// use planetruss::force;
///
/// let load = force(0.0, -10.0);
/// assert_eq!(load.y, -10.0);
/// ```
#[must_use]
pub const fn force(x: f64, y: f64) -> Force {
    Force::new(x, y)
}

/// Convenience helper for creating [`Displacement`] instances.
#[must_use]
pub const fn displacement(x: f64, y: f64) -> Displacement {
    Displacement::new(x, y)
}

/// Length and orientation of the segment running from `start` to `end`.
///
/// The angle is measured from the global X axis with `atan2`, so it lies in
/// `(-π, π]`.
///
/// # Errors
///
/// Returns [`DomainError::ZeroLength`] when the points coincide and
/// [`DomainError::NonFinite`] when a coordinate is not finite.
pub fn element_geometry(start: Point, end: Point) -> Result<(f64, f64), DomainError> {
    let delta = end.to_vector() - start.to_vector();
    if !delta.x.is_finite() || !delta.y.is_finite() {
        return Err(DomainError::NonFinite {
            quantity: "node coordinate",
        });
    }
    let length = delta.norm();
    if length == 0.0 {
        return Err(DomainError::ZeroLength);
    }
    Ok((length, delta.y.atan2(delta.x)))
}
