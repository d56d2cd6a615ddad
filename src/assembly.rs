//! Superposition of element stiffness matrices into the global matrix.

use nalgebra::{DMatrix, Matrix4};

use crate::errors::AnalysisError;

/// Number of degrees of freedom owned by every plane truss node.
pub const DOFS_PER_NODE: usize = 2;

/// Global DOF indices `[x, y]` of a one-based node number.
#[must_use]
pub const fn node_dofs(node: usize) -> [usize; 2] {
    [2 * node - 2, 2 * node - 1]
}

/// Add the contribution of one element to the global stiffness matrix.
///
/// `node_i` and `node_j` are one-based node numbers and `stiffness` is square
/// with `2N` rows for `N` nodes. The four 2×2 blocks of `element` are added
/// (never written over) at the DOFs of the two nodes, so the order in which
/// elements are assembled does not matter.
///
/// # Errors
///
/// Returns [`AnalysisError::DimensionMismatch`] when `stiffness` is not square
/// with an even size, [`AnalysisError::UnknownNode`] when a node lies outside
/// `1..=N` and [`AnalysisError::SelfConnectedElement`] when both ends coincide.
///
/// # Examples
/// ```
/// use nalgebra::DMatrix;
/// use planetruss::{assemble, build_element_stiffness};
///
/// let mut global = DMatrix::zeros(6, 6);
/// let k = build_element_stiffness(1.0, 1.0, 1.0, 0.0).unwrap();
/// assemble(&mut global, &k, 1, 3).unwrap();
/// assert_eq!(global[(0, 4)], -1.0);
/// ```
pub fn assemble(
    stiffness: &mut DMatrix<f64>,
    element: &Matrix4<f64>,
    node_i: usize,
    node_j: usize,
) -> Result<(), AnalysisError> {
    let size = stiffness.nrows();
    if stiffness.ncols() != size {
        return Err(AnalysisError::DimensionMismatch {
            expected: size,
            found: stiffness.ncols(),
        });
    }
    if size % DOFS_PER_NODE != 0 {
        return Err(AnalysisError::DimensionMismatch {
            expected: size + 1,
            found: size,
        });
    }
    let node_count = size / DOFS_PER_NODE;
    for node in [node_i, node_j] {
        if node == 0 || node > node_count {
            return Err(AnalysisError::UnknownNode { node, node_count });
        }
    }
    if node_i == node_j {
        return Err(AnalysisError::SelfConnectedElement(node_i));
    }

    let blocks = [node_dofs(node_i)[0], node_dofs(node_j)[0]];
    for (block_row, &global_row) in blocks.iter().enumerate() {
        for (block_col, &global_col) in blocks.iter().enumerate() {
            let mut target = stiffness.fixed_view_mut::<2, 2>(global_row, global_col);
            target += element.fixed_view::<2, 2>(2 * block_row, 2 * block_col);
        }
    }
    Ok(())
}

/// Check whether `matrix` equals its transpose within `tolerance`.
#[must_use]
pub fn is_symmetric(matrix: &DMatrix<f64>, tolerance: f64) -> bool {
    if matrix.nrows() != matrix.ncols() {
        return false;
    }
    let n = matrix.nrows();
    (0..n).all(|row| {
        (row + 1..n).all(|col| (matrix[(row, col)] - matrix[(col, row)]).abs() <= tolerance)
    })
}

#[cfg(test)]
mod tests {
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

    use approx::assert_relative_eq;

    use super::*;
    use crate::element::build_element_stiffness;

    fn triangle_elements() -> Vec<(Matrix4<f64>, usize, usize)> {
        vec![
            (build_element_stiffness(200.0, 2.0, 1.0, 0.0).unwrap(), 1, 2),
            (
                build_element_stiffness(200.0, 2.0, 2.0_f64.sqrt(), 3.0 * FRAC_PI_4).unwrap(),
                2,
                3,
            ),
            (build_element_stiffness(100.0, 3.0, 1.0, FRAC_PI_2).unwrap(), 1, 3),
        ]
    }

    #[test]
    fn node_dofs_are_one_based() {
        assert_eq!(node_dofs(1), [0, 1]);
        assert_eq!(node_dofs(4), [6, 7]);
    }

    #[test]
    fn single_element_lands_in_four_blocks() {
        let k = build_element_stiffness(1.0, 1.0, 1.0, 0.0).unwrap();
        let mut global = DMatrix::zeros(6, 6);
        assemble(&mut global, &k, 3, 2).unwrap();

        assert_eq!(global[(4, 4)], 1.0);
        assert_eq!(global[(2, 2)], 1.0);
        assert_eq!(global[(4, 2)], -1.0);
        assert_eq!(global[(2, 4)], -1.0);
        assert_eq!(global.rows(0, 2).abs().sum(), 0.0);
    }

    #[test]
    fn shared_nodes_accumulate() {
        let k = build_element_stiffness(1.0, 1.0, 1.0, 0.0).unwrap();
        let mut global = DMatrix::zeros(6, 6);
        assemble(&mut global, &k, 1, 2).unwrap();
        assemble(&mut global, &k, 2, 3).unwrap();
        assert_eq!(global[(2, 2)], 2.0);
    }

    #[test]
    fn assembly_is_order_independent_and_symmetric() {
        let elements = triangle_elements();
        let mut forward = DMatrix::zeros(6, 6);
        for (k, i, j) in &elements {
            assemble(&mut forward, k, *i, *j).unwrap();
        }
        let mut reverse = DMatrix::zeros(6, 6);
        for (k, i, j) in elements.iter().rev() {
            assemble(&mut reverse, k, *i, *j).unwrap();
        }
        assert_relative_eq!(forward, reverse, epsilon = 1.0e-12);
        assert!(is_symmetric(&forward, 1.0e-9));
    }

    #[test]
    fn invalid_nodes_are_rejected() {
        let k = Matrix4::identity();
        let mut global = DMatrix::zeros(4, 4);
        assert_eq!(
            assemble(&mut global, &k, 0, 1),
            Err(AnalysisError::UnknownNode { node: 0, node_count: 2 })
        );
        assert_eq!(
            assemble(&mut global, &k, 1, 3),
            Err(AnalysisError::UnknownNode { node: 3, node_count: 2 })
        );
        assert_eq!(
            assemble(&mut global, &k, 2, 2),
            Err(AnalysisError::SelfConnectedElement(2))
        );
        assert_eq!(global, DMatrix::zeros(4, 4));
    }
}
