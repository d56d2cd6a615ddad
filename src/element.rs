//! Stiffness of a single two-node axial (truss) element.
//!
//! A truss bar only resists stretching along its own axis, so its local
//! stiffness is the 2×2 spring matrix
//!
//! ```text
//! k_local = (E·A/L) · [ 1  -1]
//!                     [-1   1]
//! ```
//!
//! which is rotated into the global frame with `k_global = Tᵗ · k_local · T`.

use nalgebra::{Matrix2, Matrix4, SMatrix, Vector4};

use crate::errors::DomainError;

/// Transformation from the four global DOFs of an element to its two axial DOFs.
pub type Transformation = SMatrix<f64, 2, 4>;

/// Build the transformation matrix for an element oriented at `angle` radians.
///
/// ```text
/// T = [c  s  0  0]
///     [0  0  c  s]
/// ```
#[must_use]
pub fn transformation_matrix(angle: f64) -> Transformation {
    let (s, c) = angle.sin_cos();
    Transformation::new(c, s, 0.0, 0.0, 0.0, 0.0, c, s)
}

/// Axial stiffness of a bar expressed along its own axis.
#[must_use]
pub fn local_stiffness(elastic_modulus: f64, area: f64, length: f64) -> Matrix2<f64> {
    let k = elastic_modulus * area / length;
    Matrix2::new(k, -k, -k, k)
}

/// Reject non-physical element data before it reaches any division.
fn check_properties(elastic_modulus: f64, area: f64, length: f64) -> Result<(), DomainError> {
    if !elastic_modulus.is_finite() {
        return Err(DomainError::NonFinite {
            quantity: "elastic modulus",
        });
    }
    if !area.is_finite() {
        return Err(DomainError::NonFinite { quantity: "area" });
    }
    if !length.is_finite() {
        return Err(DomainError::NonFinite { quantity: "length" });
    }
    if elastic_modulus <= 0.0 {
        return Err(DomainError::NonPositiveModulus { elastic_modulus });
    }
    if area <= 0.0 {
        return Err(DomainError::NonPositiveArea { area });
    }
    if length <= 0.0 {
        return Err(DomainError::ZeroLength);
    }
    Ok(())
}

/// Global 4×4 stiffness matrix of a plane truss element.
///
/// DOFs are ordered `[u_start, v_start, u_end, v_end]`.
///
/// # Errors
///
/// Returns a [`DomainError`] when the length is zero or when any input is
/// non-positive or not finite.
///
/// # Examples
/// ```
/// use planetruss::build_element_stiffness;
///
/// let k = build_element_stiffness(210_000.0, 1_000.0, 1_000.0, 0.0).unwrap();
/// assert_eq!(k[(0, 0)], 210_000.0);
/// assert_eq!(k[(0, 2)], -210_000.0);
/// ```
pub fn build_element_stiffness(
    elastic_modulus: f64,
    area: f64,
    length: f64,
    angle: f64,
) -> Result<Matrix4<f64>, DomainError> {
    check_properties(elastic_modulus, area, length)?;
    if !angle.is_finite() {
        return Err(DomainError::NonFinite { quantity: "angle" });
    }
    let t = transformation_matrix(angle);
    let k_local = local_stiffness(elastic_modulus, area, length);
    Ok(t.transpose() * k_local * t)
}

/// Axial force in an element from the global displacements of its end nodes.
///
/// Tension is positive. `element_displacements` follows the same DOF order as
/// [`build_element_stiffness`].
#[must_use]
pub fn axial_force(
    elastic_modulus: f64,
    area: f64,
    length: f64,
    angle: f64,
    element_displacements: &Vector4<f64>,
) -> f64 {
    let (s, c) = angle.sin_cos();
    let elongation = Vector4::new(-c, -s, c, s).dot(element_displacements);
    elastic_modulus * area / length * elongation
}
