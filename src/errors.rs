//! Error types produced while building or analysing plane trusses.

use thiserror::Error;

use crate::truss::{ElementId, NodeId};

/// Degenerate geometry or material data for a single element.
#[derive(Clone, Copy, Debug, Error, PartialEq)]
pub enum DomainError {
    /// Returned when the two end nodes of an element coincide.
    #[error("element has zero length")]
    ZeroLength,
    /// Returned when the elastic modulus is zero or negative.
    #[error("elastic modulus must be positive (received {elastic_modulus})")]
    NonPositiveModulus {
        /// Rejected elastic modulus.
        elastic_modulus: f64,
    },
    /// Returned when the cross-sectional area is zero or negative.
    #[error("area must be positive (received {area})")]
    NonPositiveArea {
        /// Rejected cross-sectional area.
        area: f64,
    },
    /// Returned when a length, angle or property is NaN or infinite.
    #[error("{quantity} must be finite")]
    NonFinite {
        /// Name of the offending quantity.
        quantity: &'static str,
    },
}

/// Boundary conditions that do not define a solvable system.
///
/// Every degree of freedom needs exactly one known quantity: either its
/// displacement (a support) or the external force acting on it.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum IllPosedSystem {
    /// Both displacement and force were prescribed for the same DOF.
    #[error("degree of freedom {dof} has both displacement and force prescribed")]
    BothKnown {
        /// Zero-based global DOF index.
        dof: usize,
    },
    /// Neither displacement nor force was prescribed for a DOF.
    #[error("degree of freedom {dof} has neither displacement nor force prescribed")]
    NeitherKnown {
        /// Zero-based global DOF index.
        dof: usize,
    },
    /// Every DOF has a prescribed displacement so nothing is left to solve.
    #[error("no free degrees of freedom remain after applying supports")]
    NoFreeDofs,
    /// The displacement and force tables have different lengths.
    #[error("displacement conditions cover {displacement} DOFs but force conditions cover {force}")]
    ConditionLengthMismatch {
        /// Length of the displacement table.
        displacement: usize,
        /// Length of the force table.
        force: usize,
    },
    /// A reduced solution does not match the number of free DOFs.
    #[error("expected {expected} reduced displacements, received {actual}")]
    SolutionLength {
        /// Number of free DOFs.
        expected: usize,
        /// Number of values supplied.
        actual: usize,
    },
}

/// Error returned when a truss analysis fails.
#[derive(Debug, Error, PartialEq)]
pub enum AnalysisError {
    /// Returned when an element has invalid geometry or properties.
    #[error("invalid element data: {0}")]
    Domain(#[from] DomainError),
    /// Returned when a specific element has invalid geometry or properties.
    #[error("element {element} is invalid: {source}")]
    InvalidElement {
        /// Identifier of the offending element.
        element: ElementId,
        /// Description of the problem.
        #[source]
        source: DomainError,
    },
    /// Returned when the boundary conditions do not define a solvable system.
    #[error("ill-posed system: {0}")]
    IllPosed(#[from] IllPosedSystem),
    /// Returned when the reduced stiffness matrix cannot be inverted.
    #[error("stiffness matrix is singular; check supports and connectivity")]
    SingularMatrix,
    /// Returned when an element refers to a node outside the model.
    #[error("node {node} does not exist (model has {node_count} nodes)")]
    UnknownNode {
        /// One-based node number that was requested.
        node: usize,
        /// Number of nodes available.
        node_count: usize,
    },
    /// Returned when an element number is not part of the model.
    #[error("element {0} does not exist")]
    UnknownElement(ElementId),
    /// Returned when an element connects a node to itself.
    #[error("element connects node {0} to itself")]
    SelfConnectedElement(usize),
    /// Returned when matrix and vector sizes do not line up.
    #[error("dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch {
        /// Expected size.
        expected: usize,
        /// Size that was supplied.
        found: usize,
    },
}

/// Error returned when editing a [`PlaneTruss`](crate::PlaneTruss).
///
/// # Examples
///
/// ```
/// use planetruss::{point, ElementProperties, ModelEditError, NodeId, PlaneTruss};
///
/// let mut truss = PlaneTruss::new();
/// let a = truss.add_node(point(0.0, 0.0));
/// let missing = NodeId::new(7);
/// let error = truss
///     .add_element(a, missing, ElementProperties::new(210_000.0, 1_000.0))
///     .expect_err("unknown node is rejected");
/// assert_eq!(error, ModelEditError::UnknownNode(missing));
/// ```
#[derive(Debug, Error, PartialEq)]
pub enum ModelEditError {
    /// Returned when a node cannot be found in the truss.
    #[error("node {0} does not exist in this truss")]
    UnknownNode(NodeId),
    /// Returned when both ends of an element are the same node.
    #[error("element cannot connect node {0} to itself")]
    SelfConnectedElement(NodeId),
    /// Returned when the supplied element properties are invalid.
    #[error("{0}")]
    InvalidElementProperties(DomainError),
}
