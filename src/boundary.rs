//! Boundary conditions and partitioning of the global system.
//!
//! Each degree of freedom carries exactly one known quantity. Supported DOFs
//! have a prescribed displacement and an unknown reaction, free DOFs have a
//! prescribed external force and an unknown displacement. Partitioning keeps
//! the free rows and columns of `K`, the solver finds the free displacements,
//! and [`expand`] scatters them back next to the prescribed ones.

use log::{debug, warn};
use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

use crate::errors::{AnalysisError, IllPosedSystem};

/// The known quantity at a single degree of freedom.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DofCondition {
    /// Prescribed displacement; the reaction force is unknown.
    Displacement(f64),
    /// Prescribed external force; the displacement is unknown.
    Force(f64),
}

impl DofCondition {
    /// Whether the displacement is the unknown at this DOF.
    #[must_use]
    pub const fn is_free(self) -> bool {
        matches!(self, DofCondition::Force(_))
    }

    /// The prescribed displacement, if any.
    #[must_use]
    pub const fn displacement(self) -> Option<f64> {
        match self {
            DofCondition::Displacement(value) => Some(value),
            DofCondition::Force(_) => None,
        }
    }

    /// The prescribed force, if any.
    #[must_use]
    pub const fn force(self) -> Option<f64> {
        match self {
            DofCondition::Force(value) => Some(value),
            DofCondition::Displacement(_) => None,
        }
    }
}

/// How the load vector is reduced onto the free DOFs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReductionPolicy {
    /// `f_r = F[free] - K[free, known] · U_known`.
    ///
    /// Correct for any prescribed displacement, including support settlement.
    #[default]
    Corrected,
    /// `f_r = F[free]`.
    ///
    /// Only valid when every prescribed displacement is zero.
    Direct,
}

/// One condition per global degree of freedom.
#[derive(Clone, Debug, PartialEq)]
pub struct BoundaryConditions {
    conditions: Vec<DofCondition>,
}

impl BoundaryConditions {
    /// Wrap an already tagged list of conditions.
    #[must_use]
    pub fn new(conditions: Vec<DofCondition>) -> Self {
        Self { conditions }
    }

    /// Build conditions from the two parallel nullable tables.
    ///
    /// # Errors
    ///
    /// Returns an [`IllPosedSystem`] when the tables differ in length or when a
    /// DOF has both or neither quantity known.
    ///
    /// # Examples
    /// ```
    /// use planetruss::{BoundaryConditions, DofCondition};
    ///
    /// let bcs = BoundaryConditions::from_options(
    ///     &[Some(0.0), Some(0.0), None, None],
    ///     &[None, None, Some(1_000.0), Some(0.0)],
    /// )
    /// .unwrap();
    /// assert_eq!(bcs.free_dofs(), vec![2, 3]);
    /// assert_eq!(bcs[0], DofCondition::Displacement(0.0));
    /// ```
    pub fn from_options(
        displacements: &[Option<f64>],
        forces: &[Option<f64>],
    ) -> Result<Self, IllPosedSystem> {
        if displacements.len() != forces.len() {
            return Err(IllPosedSystem::ConditionLengthMismatch {
                displacement: displacements.len(),
                force: forces.len(),
            });
        }
        displacements
            .iter()
            .zip(forces)
            .enumerate()
            .map(|(dof, pair)| match pair {
                (Some(value), None) => Ok(DofCondition::Displacement(*value)),
                (None, Some(value)) => Ok(DofCondition::Force(*value)),
                (Some(_), Some(_)) => Err(IllPosedSystem::BothKnown { dof }),
                (None, None) => Err(IllPosedSystem::NeitherKnown { dof }),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Self::new)
    }

    /// Number of degrees of freedom covered.
    #[must_use]
    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    /// Whether no degrees of freedom are covered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Iterate over the conditions in DOF order.
    pub fn iter(&self) -> impl Iterator<Item = &DofCondition> {
        self.conditions.iter()
    }

    /// DOFs whose displacement is unknown, in ascending order.
    ///
    /// This ordering is shared by [`reduce`], [`expand`] and [`restrict`].
    #[must_use]
    pub fn free_dofs(&self) -> Vec<usize> {
        self.dofs_where(DofCondition::is_free)
    }

    /// DOFs whose displacement is prescribed, in ascending order.
    #[must_use]
    pub fn constrained_dofs(&self) -> Vec<usize> {
        self.dofs_where(|condition| !condition.is_free())
    }

    /// Prescribed displacements with zeros at the free DOFs.
    #[must_use]
    pub fn known_displacements(&self) -> DVector<f64> {
        DVector::from_iterator(
            self.len(),
            self.conditions
                .iter()
                .map(|condition| condition.displacement().unwrap_or(0.0)),
        )
    }

    /// Whether any support imposes a non-zero displacement.
    #[must_use]
    pub fn has_settlement(&self) -> bool {
        self.conditions
            .iter()
            .any(|condition| condition.displacement().is_some_and(|value| value != 0.0))
    }

    fn dofs_where(&self, predicate: impl Fn(DofCondition) -> bool) -> Vec<usize> {
        self.conditions
            .iter()
            .enumerate()
            .filter(|(_, condition)| predicate(**condition))
            .map(|(dof, _)| dof)
            .collect()
    }
}

impl std::ops::Index<usize> for BoundaryConditions {
    type Output = DofCondition;

    fn index(&self, dof: usize) -> &DofCondition {
        &self.conditions[dof]
    }
}

/// The system left after removing prescribed displacements.
#[derive(Clone, Debug, PartialEq)]
pub struct ReducedSystem {
    /// `K` restricted to the free rows and columns.
    pub stiffness: DMatrix<f64>,
    /// Load vector at the free DOFs.
    pub load: DVector<f64>,
    /// Global index of each reduced row.
    pub free_dofs: Vec<usize>,
}

/// Restrict the global system to the DOFs with unknown displacement.
///
/// # Errors
///
/// Returns [`AnalysisError::DimensionMismatch`] when `stiffness` does not have
/// one row and column per condition and [`IllPosedSystem::NoFreeDofs`] when
/// every displacement is prescribed.
pub fn reduce(
    stiffness: &DMatrix<f64>,
    conditions: &BoundaryConditions,
    policy: ReductionPolicy,
) -> Result<ReducedSystem, AnalysisError> {
    let size = conditions.len();
    for found in [stiffness.nrows(), stiffness.ncols()] {
        if found != size {
            return Err(AnalysisError::DimensionMismatch {
                expected: size,
                found,
            });
        }
    }
    let free_dofs = conditions.free_dofs();
    if free_dofs.is_empty() {
        return Err(IllPosedSystem::NoFreeDofs.into());
    }

    let reduced = stiffness.select_rows(&free_dofs).select_columns(&free_dofs);
    let mut load = DVector::from_iterator(
        free_dofs.len(),
        free_dofs
            .iter()
            .map(|&dof| conditions[dof].force().unwrap_or(0.0)),
    );

    match policy {
        ReductionPolicy::Corrected => {
            let known = conditions.known_displacements();
            load -= stiffness.select_rows(&free_dofs) * known;
        }
        ReductionPolicy::Direct => {
            if conditions.has_settlement() {
                warn!("direct reduction ignores non-zero prescribed displacements");
            }
        }
    }
    debug!(
        "reduced {} DOFs to {} free DOFs ({policy:?})",
        size,
        free_dofs.len()
    );

    Ok(ReducedSystem {
        stiffness: reduced,
        load,
        free_dofs,
    })
}

/// Scatter solved free displacements back into a full displacement vector.
///
/// # Errors
///
/// Returns [`IllPosedSystem::SolutionLength`] when `reduced` does not hold one
/// value per free DOF.
pub fn expand(
    reduced: &DVector<f64>,
    conditions: &BoundaryConditions,
) -> Result<DVector<f64>, AnalysisError> {
    let expected = conditions.free_dofs().len();
    if reduced.len() != expected {
        return Err(IllPosedSystem::SolutionLength {
            expected,
            actual: reduced.len(),
        }
        .into());
    }
    let mut unknowns = reduced.iter();
    let full = conditions
        .iter()
        .map(|condition| match condition {
            DofCondition::Displacement(value) => *value,
            DofCondition::Force(_) => unknowns.next().copied().unwrap_or_default(),
        })
        .collect::<Vec<_>>();
    Ok(DVector::from_vec(full))
}

/// Pick the free entries out of a full displacement vector.
///
/// The inverse of [`expand`] for vectors that agree with the prescribed
/// displacements.
///
/// # Errors
///
/// Returns [`AnalysisError::DimensionMismatch`] when `full` does not have one
/// entry per condition.
pub fn restrict(
    full: &DVector<f64>,
    conditions: &BoundaryConditions,
) -> Result<DVector<f64>, AnalysisError> {
    if full.len() != conditions.len() {
        return Err(AnalysisError::DimensionMismatch {
            expected: conditions.len(),
            found: full.len(),
        });
    }
    Ok(full.select_rows(&conditions.free_dofs()))
}
