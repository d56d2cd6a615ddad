//! Dense solve of the reduced stiffness system.

use log::{debug, info};
use nalgebra::{DMatrix, DVector};

use crate::boundary::ReducedSystem;
use crate::errors::AnalysisError;

/// Smallest admissible ratio between the smallest and largest LU pivot.
///
/// Rigid-body modes that survive the boundary conditions leave a pivot at
/// round-off level rather than exactly zero once members are inclined.
pub const SINGULARITY_TOLERANCE: f64 = 1.0e-12;

/// Solve `stiffness · u = load` for the free displacements.
///
/// # Errors
///
/// Returns [`AnalysisError::DimensionMismatch`] when the sizes disagree and
/// [`AnalysisError::SingularMatrix`] when the structure is under-constrained
/// or disconnected.
pub fn solve(
    stiffness: &DMatrix<f64>,
    load: &DVector<f64>,
) -> Result<DVector<f64>, AnalysisError> {
    let n = load.len();
    for found in [stiffness.nrows(), stiffness.ncols()] {
        if found != n {
            return Err(AnalysisError::DimensionMismatch { expected: n, found });
        }
    }
    if n == 0 {
        return Ok(DVector::zeros(0));
    }

    let lu = stiffness.clone().lu();
    let pivots = lu.u().diagonal().abs();
    let largest = pivots.max();
    let smallest = pivots.min();
    debug!("LU pivots range from {smallest:e} to {largest:e}");
    if largest == 0.0 || !smallest.is_finite() || smallest <= SINGULARITY_TOLERANCE * largest {
        return Err(AnalysisError::SingularMatrix);
    }

    let solution = lu.solve(load).ok_or(AnalysisError::SingularMatrix)?;
    if solution.iter().any(|value| !value.is_finite()) {
        return Err(AnalysisError::SingularMatrix);
    }
    info!("solved {n} free degrees of freedom");
    Ok(solution)
}

/// Solve a [`ReducedSystem`] produced by [`reduce`](crate::reduce).
///
/// # Errors
///
/// See [`solve`].
pub fn solve_reduced(system: &ReducedSystem) -> Result<DVector<f64>, AnalysisError> {
    solve(&system.stiffness, &system.load)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn solves_spring_chain() {
        let k = DMatrix::from_row_slice(2, 2, &[2.0, -1.0, -1.0, 1.0]);
        let f = DVector::from_vec(vec![0.0, 1.0]);
        let u = solve(&k, &f).expect("regular system");
        assert_relative_eq!(u, DVector::from_vec(vec![1.0, 2.0]), epsilon = 1.0e-12);
        assert_relative_eq!(&k * &u, f, epsilon = 1.0e-12);
    }

    #[test]
    fn zero_stiffness_is_singular() {
        let k = DMatrix::from_row_slice(2, 2, &[1.0, 0.0, 0.0, 0.0]);
        let f = DVector::from_vec(vec![1.0, 0.0]);
        assert_eq!(solve(&k, &f), Err(AnalysisError::SingularMatrix));
    }

    #[test]
    fn round_off_rigid_mode_is_singular() {
        // An unsupported bar inclined at 30 degrees: rank one with inexact entries.
        let (s, c) = 30.0_f64.to_radians().sin_cos();
        let k = 1.0e5 * DMatrix::from_row_slice(2, 2, &[c * c, c * s, c * s, s * s]);
        let f = DVector::from_vec(vec![1.0, 0.0]);
        assert_eq!(solve(&k, &f), Err(AnalysisError::SingularMatrix));
    }

    #[test]
    fn size_mismatch_is_reported() {
        let k = DMatrix::identity(3, 3);
        let f = DVector::zeros(2);
        assert_eq!(
            solve(&k, &f),
            Err(AnalysisError::DimensionMismatch {
                expected: 2,
                found: 3
            })
        );
    }
}
