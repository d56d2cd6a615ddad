//! Nodal force and reaction recovery from a full displacement field.

use nalgebra::{DMatrix, DVector};

use crate::boundary::BoundaryConditions;
use crate::errors::AnalysisError;

/// Compute `F = K · U` for the whole structure.
///
/// At free DOFs this reproduces the applied loads; at supported DOFs it gives
/// the reaction needed to hold the prescribed displacement.
///
/// # Errors
///
/// Returns [`AnalysisError::DimensionMismatch`] when `stiffness` is not square
/// with one row per entry of `displacements`.
pub fn recover_forces(
    stiffness: &DMatrix<f64>,
    displacements: &DVector<f64>,
) -> Result<DVector<f64>, AnalysisError> {
    let n = displacements.len();
    for found in [stiffness.nrows(), stiffness.ncols()] {
        if found != n {
            return Err(AnalysisError::DimensionMismatch { expected: n, found });
        }
    }
    Ok(stiffness * displacements)
}

/// Largest difference between recovered and prescribed forces at free DOFs.
///
/// Returns zero when there are no free DOFs. Entries of `forces` beyond the
/// number of conditions are ignored.
#[must_use]
pub fn load_residual(forces: &DVector<f64>, conditions: &BoundaryConditions) -> f64 {
    conditions
        .iter()
        .zip(forces.iter())
        .filter_map(|(condition, recovered)| {
            condition.force().map(|applied| (recovered - applied).abs())
        })
        .fold(0.0, f64::max)
}
