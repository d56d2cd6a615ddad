//! Collinear chains of axial bars with a single DOF per node.
//!
//! Node `i` sits between segment `i - 1` and segment `i`, so a chain of `n`
//! segments has `n + 1` nodes numbered from one. Each segment contributes the
//! 2×2 [`local_stiffness`] directly since every bar lies on the same axis.

use log::debug;
use nalgebra::{DMatrix, DVector};

use crate::boundary::{expand, reduce, BoundaryConditions, DofCondition, ReductionPolicy};
use crate::element::local_stiffness;
use crate::errors::{AnalysisError, DomainError};
use crate::recovery::recover_forces;
use crate::solver::solve_reduced;
use crate::truss::{ElementId, ElementProperties};

/// One bar of a chain.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BarSegment {
    /// Elastic modulus `E`.
    pub elastic_modulus: f64,
    /// Undeformed length.
    pub length: f64,
}

/// A straight chain of bars sharing one cross-sectional area.
#[derive(Clone, Debug, PartialEq)]
pub struct BarChain {
    segments: Vec<BarSegment>,
    area: f64,
}

impl BarChain {
    /// Build a chain from per-segment moduli and lengths.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::DimensionMismatch`] when the tables differ in
    /// length and [`AnalysisError::InvalidElement`] for a non-positive modulus,
    /// area or length.
    ///
    /// # Examples
    /// ```
    /// use planetruss::BarChain;
    ///
    /// let chain = BarChain::new(&[200.0, 100.0], &[1.0, 1.0], 2.0).unwrap();
    /// assert_eq!(chain.node_count(), 3);
    /// assert_eq!(chain.node_positions(), vec![0.0, 1.0, 2.0]);
    /// ```
    pub fn new(moduli: &[f64], lengths: &[f64], area: f64) -> Result<Self, AnalysisError> {
        if moduli.len() != lengths.len() {
            return Err(AnalysisError::DimensionMismatch {
                expected: moduli.len(),
                found: lengths.len(),
            });
        }
        let segments = moduli
            .iter()
            .zip(lengths)
            .map(|(&elastic_modulus, &length)| BarSegment {
                elastic_modulus,
                length,
            })
            .collect::<Vec<_>>();
        for (index, segment) in segments.iter().enumerate() {
            Self::check_segment(segment, area).map_err(|source| AnalysisError::InvalidElement {
                element: ElementId::new(index + 1),
                source,
            })?;
        }
        Ok(Self { segments, area })
    }

    fn check_segment(segment: &BarSegment, area: f64) -> Result<(), DomainError> {
        ElementProperties::new(segment.elastic_modulus, area).validate()?;
        if !segment.length.is_finite() {
            return Err(DomainError::NonFinite { quantity: "length" });
        }
        if segment.length <= 0.0 {
            return Err(DomainError::ZeroLength);
        }
        Ok(())
    }

    /// Segments in order along the chain.
    #[must_use]
    pub fn segments(&self) -> &[BarSegment] {
        &self.segments
    }

    /// Number of nodes, one more than the number of segments.
    #[must_use]
    pub fn node_count(&self) -> usize {
        if self.segments.is_empty() {
            0
        } else {
            self.segments.len() + 1
        }
    }

    /// Position of every node measured from the first one.
    #[must_use]
    pub fn node_positions(&self) -> Vec<f64> {
        let mut positions = Vec::with_capacity(self.node_count());
        if !self.segments.is_empty() {
            positions.push(0.0);
        }
        let mut position = 0.0;
        for segment in &self.segments {
            position += segment.length;
            positions.push(position);
        }
        positions
    }

    /// Conditions for a chain held at both ends with no loads in between.
    ///
    /// The first node is moved by `start` and the last by `end`.
    #[must_use]
    pub fn supported_ends(&self, start: f64, end: f64) -> BoundaryConditions {
        let last = self.node_count().saturating_sub(1);
        let conditions = (0..self.node_count())
            .map(|node| match node {
                0 => DofCondition::Displacement(start),
                _ if node == last => DofCondition::Displacement(end),
                _ => DofCondition::Force(0.0),
            })
            .collect();
        BoundaryConditions::new(conditions)
    }

    /// Assemble the tridiagonal chain stiffness matrix.
    #[must_use]
    pub fn stiffness_matrix(&self) -> DMatrix<f64> {
        let n = self.node_count();
        let mut stiffness = DMatrix::zeros(n, n);
        for (index, segment) in self.segments.iter().enumerate() {
            let k = local_stiffness(segment.elastic_modulus, self.area, segment.length);
            let mut block = stiffness.fixed_view_mut::<2, 2>(index, index);
            block += k;
        }
        stiffness
    }

    /// Solve the chain for the given per-node conditions.
    ///
    /// Prescribed displacements may be non-zero; the load vector is always
    /// reduced with [`ReductionPolicy::Corrected`].
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError`] when the conditions do not cover every node,
    /// leave nothing to solve or leave the chain free to slide.
    pub fn evaluate(&self, conditions: &BoundaryConditions) -> Result<BarSolution, AnalysisError> {
        let stiffness = self.stiffness_matrix();
        let system = reduce(&stiffness, conditions, ReductionPolicy::Corrected)?;
        let free = solve_reduced(&system)?;
        let displacements = expand(&free, conditions)?;
        let forces = recover_forces(&stiffness, &displacements)?;
        let segment_forces = self
            .segments
            .iter()
            .enumerate()
            .map(|(index, segment)| {
                let stretch = displacements[index + 1] - displacements[index];
                segment.elastic_modulus * self.area / segment.length * stretch
            })
            .collect::<Vec<_>>();
        debug!("bar chain segment forces: {segment_forces:?}");
        Ok(BarSolution {
            displacements,
            forces,
            segment_forces,
        })
    }
}

/// Solved state of a [`BarChain`].
#[derive(Clone, Debug, PartialEq)]
pub struct BarSolution {
    /// Displacement of every node.
    pub displacements: DVector<f64>,
    /// `K · U` at every node; reactions at the supported nodes.
    pub forces: DVector<f64>,
    /// Axial force in every segment, tension positive.
    pub segment_forces: Vec<f64>,
}
