#![warn(clippy::all)]
#![warn(missing_docs)]
#![doc = include_str!("../README.md")]

mod assembly;
mod bar;
mod boundary;
mod element;
mod errors;
mod geometry;
mod input;
mod recovery;
mod report;
mod solver;
mod truss;

pub use assembly::{assemble, is_symmetric, node_dofs, DOFS_PER_NODE};
pub use bar::{BarChain, BarSegment, BarSolution};
pub use boundary::{
    expand, reduce, restrict, BoundaryConditions, DofCondition, ReducedSystem, ReductionPolicy,
};
pub use element::{
    axial_force, build_element_stiffness, local_stiffness, transformation_matrix, Transformation,
};
pub use errors::{AnalysisError, DomainError, IllPosedSystem, ModelEditError};
pub use geometry::{
    displacement, element_geometry, force, point, Axis, Displacement, Force, Point,
};
pub use input::{ElementInput, InputError, MaterialInput, TrussInput};
pub use recovery::{load_residual, recover_forces};
pub use report::{render_summary, NodeRecord, SolutionReport};
pub use solver::{solve, solve_reduced, SINGULARITY_TOLERANCE};
pub use truss::{ElementId, ElementProperties, ElementResult, NodeId, PlaneTruss, TrussSolution};
