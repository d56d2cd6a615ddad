//! Plane truss model and the end-to-end stiffness analysis.

use std::fmt;

use log::{debug, info, warn};
use nalgebra::{DMatrix, DVector, Vector4};
use petgraph::algo::connected_components;
use petgraph::graph::{EdgeIndex, Graph, NodeIndex};
use petgraph::visit::EdgeRef;
use serde::Serialize;

use crate::assembly::{assemble, node_dofs, DOFS_PER_NODE};
use crate::boundary::{expand, reduce, BoundaryConditions, DofCondition, ReductionPolicy};
use crate::element::{axial_force, build_element_stiffness};
use crate::errors::{AnalysisError, DomainError, ModelEditError};
use crate::geometry::{element_geometry, Axis, Displacement, Force, Point};
use crate::recovery::{load_residual, recover_forces};
use crate::solver::solve_reduced;

/// One-based node number.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(usize);

impl NodeId {
    /// Refer to the node with the given one-based number.
    #[must_use]
    pub const fn new(number: usize) -> Self {
        Self(number)
    }

    /// The one-based node number.
    #[must_use]
    pub const fn number(self) -> usize {
        self.0
    }

    fn graph_index(self) -> Option<NodeIndex> {
        self.0.checked_sub(1).map(NodeIndex::new)
    }
}

impl From<NodeIndex> for NodeId {
    fn from(index: NodeIndex) -> Self {
        Self(index.index() + 1)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// One-based element number, in insertion order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ElementId(usize);

impl ElementId {
    /// Refer to the element with the given one-based number.
    #[must_use]
    pub const fn new(number: usize) -> Self {
        Self(number)
    }

    /// The one-based element number.
    #[must_use]
    pub const fn number(self) -> usize {
        self.0
    }

    fn graph_index(self) -> Option<EdgeIndex> {
        self.0.checked_sub(1).map(EdgeIndex::new)
    }
}

impl From<EdgeIndex> for ElementId {
    fn from(index: EdgeIndex) -> Self {
        Self(index.index() + 1)
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Material and section data of an element.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ElementProperties {
    /// Elastic modulus `E`.
    pub elastic_modulus: f64,
    /// Cross-sectional area `A`.
    pub area: f64,
}

impl ElementProperties {
    /// Create a property set from `E` and `A`.
    #[must_use]
    pub const fn new(elastic_modulus: f64, area: f64) -> Self {
        Self {
            elastic_modulus,
            area,
        }
    }

    /// Check that both values are finite and strictly positive.
    ///
    /// # Errors
    ///
    /// Returns the matching [`DomainError`] for the first offending value.
    pub fn validate(&self) -> Result<(), DomainError> {
        if !self.elastic_modulus.is_finite() {
            return Err(DomainError::NonFinite {
                quantity: "elastic modulus",
            });
        }
        if !self.area.is_finite() {
            return Err(DomainError::NonFinite { quantity: "area" });
        }
        if self.elastic_modulus <= 0.0 {
            return Err(DomainError::NonPositiveModulus {
                elastic_modulus: self.elastic_modulus,
            });
        }
        if self.area <= 0.0 {
            return Err(DomainError::NonPositiveArea { area: self.area });
        }
        Ok(())
    }
}

/// Internal representation of a truss node.
#[derive(Clone, Debug)]
struct Node {
    /// Position of the node.
    position: Point,
    /// Prescribed displacement for each axis, `None` where the node is free.
    support: [Option<f64>; 2],
    /// External load; only the components along free axes take part.
    load: Force,
}

impl Node {
    fn new(position: Point) -> Self {
        Self {
            position,
            support: [None, None],
            load: Force::default(),
        }
    }
}

/// Element geometry derived from its end nodes.
#[derive(Clone, Copy, Debug)]
struct Bar {
    id: ElementId,
    start: NodeId,
    end: NodeId,
    properties: ElementProperties,
    length: f64,
    angle: f64,
}

/// Container for a plane pin-jointed truss.
///
/// Nodes and elements are numbered from one in the order they are added and
/// can not be removed, so numbering stays stable for the lifetime of the model.
#[derive(Clone, Debug, Default)]
pub struct PlaneTruss {
    /// Nodes are graph vertices, elements are directed edges from `n1` to `n2`.
    graph: Graph<Node, ElementProperties>,
}

impl PlaneTruss {
    /// Create an empty truss.
    ///
    /// # Examples
    /// ```
    /// use planetruss::PlaneTruss;
    ///
    /// let truss = PlaneTruss::new();
    /// assert_eq!(truss.node_count(), 0);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self {
            graph: Graph::new(),
        }
    }

    /// Build a truss from plain tables.
    ///
    /// `connectivity` holds one-based node pairs, `moduli` and `areas` one
    /// entry per element, and the two condition tables one entry per DOF
    /// (`2 * coordinates.len()`), with `None` marking the unknown quantity.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::DimensionMismatch`] for tables of the wrong
    /// length, [`AnalysisError::UnknownNode`] or
    /// [`AnalysisError::SelfConnectedElement`] for bad connectivity,
    /// [`AnalysisError::InvalidElement`] for bad properties and
    /// [`AnalysisError::IllPosed`] for inconsistent conditions.
    pub fn from_tables(
        coordinates: &[(f64, f64)],
        connectivity: &[(usize, usize)],
        moduli: &[f64],
        areas: &[f64],
        displacements: &[Option<f64>],
        forces: &[Option<f64>],
    ) -> Result<Self, AnalysisError> {
        for found in [moduli.len(), areas.len()] {
            if found != connectivity.len() {
                return Err(AnalysisError::DimensionMismatch {
                    expected: connectivity.len(),
                    found,
                });
            }
        }
        let dof_count = coordinates.len() * DOFS_PER_NODE;
        let conditions = BoundaryConditions::from_options(displacements, forces)?;
        if conditions.len() != dof_count {
            return Err(AnalysisError::DimensionMismatch {
                expected: dof_count,
                found: conditions.len(),
            });
        }

        let mut truss = Self::new();
        for &(x, y) in coordinates {
            truss.add_node(Point::new(x, y));
        }
        for (index, (&(start, end), properties)) in connectivity
            .iter()
            .zip(moduli.iter().zip(areas).map(|(&e, &a)| ElementProperties::new(e, a)))
            .enumerate()
        {
            let node_count = coordinates.len();
            truss
                .add_element(NodeId::new(start), NodeId::new(end), properties)
                .map_err(|error| match error {
                    ModelEditError::UnknownNode(node) => AnalysisError::UnknownNode {
                        node: node.number(),
                        node_count,
                    },
                    ModelEditError::SelfConnectedElement(node) => {
                        AnalysisError::SelfConnectedElement(node.number())
                    }
                    ModelEditError::InvalidElementProperties(source) => {
                        AnalysisError::InvalidElement {
                            element: ElementId::new(index + 1),
                            source,
                        }
                    }
                })?;
        }
        for (index, node) in truss.graph.node_weights_mut().enumerate() {
            for axis in Axis::ALL {
                match conditions[2 * index + axis.offset()] {
                    DofCondition::Displacement(value) => node.support[axis.offset()] = Some(value),
                    DofCondition::Force(value) => match axis {
                        Axis::X => node.load.x = value,
                        Axis::Y => node.load.y = value,
                    },
                }
            }
        }
        Ok(truss)
    }

    /// Return the number of nodes in the truss.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Return the number of elements in the truss.
    #[must_use]
    pub fn element_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Add a new node to the truss.
    ///
    /// # Examples
    /// ```
    /// use planetruss::{point, PlaneTruss};
    ///
    /// let mut truss = PlaneTruss::new();
    /// let node = truss.add_node(point(0.0, 0.0));
    /// assert_eq!(node.number(), 1);
    /// ```
    pub fn add_node(&mut self, position: Point) -> NodeId {
        NodeId::from(self.graph.add_node(Node::new(position)))
    }

    /// Connect two nodes with a new element running from `start` to `end`.
    ///
    /// # Errors
    ///
    /// Returns [`ModelEditError::UnknownNode`] when either node is missing,
    /// [`ModelEditError::SelfConnectedElement`] when `start == end` and
    /// [`ModelEditError::InvalidElementProperties`] when `E` or `A` is not
    /// strictly positive.
    pub fn add_element(
        &mut self,
        start: NodeId,
        end: NodeId,
        properties: ElementProperties,
    ) -> Result<ElementId, ModelEditError> {
        let start_index = self.node_index(start)?;
        let end_index = self.node_index(end)?;
        if start == end {
            return Err(ModelEditError::SelfConnectedElement(start));
        }
        properties
            .validate()
            .map_err(ModelEditError::InvalidElementProperties)?;
        Ok(ElementId::from(
            self.graph.add_edge(start_index, end_index, properties),
        ))
    }

    /// Position of a node.
    #[must_use]
    pub fn node_position(&self, node: NodeId) -> Option<Point> {
        let index = node.graph_index()?;
        self.graph.node_weight(index).map(|node| node.position)
    }

    /// End nodes of an element as `(start, end)`.
    #[must_use]
    pub fn element_nodes(&self, element: ElementId) -> Option<(NodeId, NodeId)> {
        let (start, end) = self.graph.edge_endpoints(element.graph_index()?)?;
        Some((NodeId::from(start), NodeId::from(end)))
    }

    /// Fix or release each axis of a node.
    ///
    /// `true` fixes the axis at zero displacement, `false` leaves it free.
    ///
    /// # Errors
    ///
    /// Returns [`ModelEditError::UnknownNode`] when `node` is not part of this truss.
    pub fn set_support(
        &mut self,
        node: NodeId,
        support: [bool; 2],
    ) -> Result<(), ModelEditError> {
        let joint = self.node_mut(node)?;
        for axis in Axis::ALL {
            joint.support[axis.offset()] = support[axis.offset()].then_some(0.0);
        }
        Ok(())
    }

    /// Prescribe a displacement along one axis of a node.
    ///
    /// # Errors
    ///
    /// Returns [`ModelEditError::UnknownNode`] when `node` is not part of this truss.
    pub fn set_prescribed_displacement(
        &mut self,
        node: NodeId,
        axis: Axis,
        value: f64,
    ) -> Result<(), ModelEditError> {
        self.node_mut(node)?.support[axis.offset()] = Some(value);
        Ok(())
    }

    /// Apply a point load to a node.
    ///
    /// Components along supported axes are ignored by the analysis.
    ///
    /// # Errors
    ///
    /// Returns [`ModelEditError::UnknownNode`] when `node` is not part of this truss.
    pub fn set_load(&mut self, node: NodeId, load: Force) -> Result<(), ModelEditError> {
        self.node_mut(node)?.load = load;
        Ok(())
    }

    /// Per-DOF conditions in global DOF order.
    #[must_use]
    pub fn boundary_conditions(&self) -> BoundaryConditions {
        let conditions = self
            .graph
            .node_weights()
            .flat_map(|node| {
                Axis::ALL.map(|axis| match node.support[axis.offset()] {
                    Some(value) => DofCondition::Displacement(value),
                    None => DofCondition::Force(node.load.component(axis)),
                })
            })
            .collect();
        BoundaryConditions::new(conditions)
    }

    /// Length and angle of an element.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::UnknownElement`] when `element` is not part of
    /// this truss and [`AnalysisError::InvalidElement`] when its end nodes
    /// coincide.
    pub fn element_geometry(&self, element: ElementId) -> Result<(f64, f64), AnalysisError> {
        let (start, end) = element
            .graph_index()
            .and_then(|index| self.graph.edge_endpoints(index))
            .ok_or(AnalysisError::UnknownElement(element))?;
        element_geometry(self.graph[start].position, self.graph[end].position)
            .map_err(|source| AnalysisError::InvalidElement { element, source })
    }

    /// Assemble the global `2N × 2N` stiffness matrix.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::InvalidElement`] for degenerate elements.
    pub fn stiffness_matrix(&self) -> Result<DMatrix<f64>, AnalysisError> {
        let bars = self.bars()?;
        self.assemble_bars(&bars)
    }

    /// Analyse the truss with the default [`ReductionPolicy`].
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError`] when an element is degenerate, when the
    /// conditions leave nothing to solve or when the structure is not
    /// sufficiently supported.
    pub fn evaluate(&self) -> Result<TrussSolution, AnalysisError> {
        self.evaluate_with(ReductionPolicy::default())
    }

    /// Analyse the truss with an explicit load reduction policy.
    ///
    /// # Errors
    ///
    /// See [`PlaneTruss::evaluate`].
    pub fn evaluate_with(&self, policy: ReductionPolicy) -> Result<TrussSolution, AnalysisError> {
        let bars = self.bars()?;
        let stiffness = self.assemble_bars(&bars)?;
        self.warn_if_disconnected();

        let conditions = self.boundary_conditions();
        let system = reduce(&stiffness, &conditions, policy)?;
        let free = solve_reduced(&system)?;
        let displacements = expand(&free, &conditions)?;
        let forces = recover_forces(&stiffness, &displacements)?;

        let residual = load_residual(&forces, &conditions);
        debug!("largest load residual at free DOFs: {residual:e}");

        let elements = bars
            .iter()
            .map(|bar| Self::element_result(bar, &displacements))
            .collect();
        info!(
            "analysed truss with {} nodes and {} elements",
            self.node_count(),
            self.element_count()
        );
        Ok(TrussSolution {
            displacements,
            forces,
            conditions,
            elements,
        })
    }

    fn node_index(&self, node: NodeId) -> Result<NodeIndex, ModelEditError> {
        node.graph_index()
            .filter(|index| index.index() < self.graph.node_count())
            .ok_or(ModelEditError::UnknownNode(node))
    }

    fn node_mut(&mut self, node: NodeId) -> Result<&mut Node, ModelEditError> {
        let index = self.node_index(node)?;
        self.graph
            .node_weight_mut(index)
            .ok_or(ModelEditError::UnknownNode(node))
    }

    /// Derive length and orientation of every element.
    fn bars(&self) -> Result<Vec<Bar>, AnalysisError> {
        self.graph
            .edge_references()
            .map(|edge| {
                let id = ElementId::from(edge.id());
                let start = self.graph[edge.source()].position;
                let end = self.graph[edge.target()].position;
                let (length, angle) = element_geometry(start, end)
                    .map_err(|source| AnalysisError::InvalidElement { element: id, source })?;
                Ok(Bar {
                    id,
                    start: NodeId::from(edge.source()),
                    end: NodeId::from(edge.target()),
                    properties: *edge.weight(),
                    length,
                    angle,
                })
            })
            .collect()
    }

    fn assemble_bars(&self, bars: &[Bar]) -> Result<DMatrix<f64>, AnalysisError> {
        let dof_count = self.node_count() * DOFS_PER_NODE;
        let mut stiffness = DMatrix::zeros(dof_count, dof_count);
        for bar in bars {
            let k = build_element_stiffness(
                bar.properties.elastic_modulus,
                bar.properties.area,
                bar.length,
                bar.angle,
            )
            .map_err(|source| AnalysisError::InvalidElement {
                element: bar.id,
                source,
            })?;
            debug!(
                "element {} ({} -> {}): L = {}, angle = {:.3} deg",
                bar.id,
                bar.start,
                bar.end,
                bar.length,
                bar.angle.to_degrees()
            );
            assemble(&mut stiffness, &k, bar.start.number(), bar.end.number())?;
        }
        Ok(stiffness)
    }

    fn warn_if_disconnected(&self) {
        let components = connected_components(&self.graph);
        if components > 1 {
            warn!("truss has {components} disconnected parts; expect a singular stiffness matrix");
        }
    }

    fn element_result(bar: &Bar, displacements: &DVector<f64>) -> ElementResult {
        let [si, sj] = node_dofs(bar.start.number());
        let [ei, ej] = node_dofs(bar.end.number());
        let local = Vector4::new(
            displacements[si],
            displacements[sj],
            displacements[ei],
            displacements[ej],
        );
        let ElementProperties {
            elastic_modulus,
            area,
        } = bar.properties;
        let axial_force = axial_force(elastic_modulus, area, bar.length, bar.angle, &local);
        ElementResult {
            element: bar.id,
            start: bar.start,
            end: bar.end,
            length: bar.length,
            angle: bar.angle,
            axial_force,
            stress: axial_force / area,
        }
    }
}

/// Response of a single element.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ElementResult {
    /// Element number.
    pub element: ElementId,
    /// First node.
    pub start: NodeId,
    /// Second node.
    pub end: NodeId,
    /// Undeformed length.
    pub length: f64,
    /// Orientation from `start` to `end` in radians.
    pub angle: f64,
    /// Axial force, tension positive.
    pub axial_force: f64,
    /// Axial stress, tension positive.
    pub stress: f64,
}

/// Full displacement and force fields of a solved truss.
#[derive(Clone, Debug, PartialEq)]
pub struct TrussSolution {
    displacements: DVector<f64>,
    forces: DVector<f64>,
    conditions: BoundaryConditions,
    elements: Vec<ElementResult>,
}

impl TrussSolution {
    /// Displacement of every DOF, `[u1, v1, u2, v2, ...]`.
    #[must_use]
    pub fn displacements(&self) -> &DVector<f64> {
        &self.displacements
    }

    /// `K · U` for every DOF: applied loads at free DOFs, reactions at supports.
    #[must_use]
    pub fn forces(&self) -> &DVector<f64> {
        &self.forces
    }

    /// Conditions the solution was computed for.
    #[must_use]
    pub fn conditions(&self) -> &BoundaryConditions {
        &self.conditions
    }

    /// Element responses in element order.
    #[must_use]
    pub fn elements(&self) -> &[ElementResult] {
        &self.elements
    }

    /// Response of one element.
    #[must_use]
    pub fn element(&self, element: ElementId) -> Option<&ElementResult> {
        self.elements.get(element.number().checked_sub(1)?)
    }

    /// Number of nodes covered by the solution.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.displacements.len() / DOFS_PER_NODE
    }

    /// Displacement of a node.
    #[must_use]
    pub fn node_displacement(&self, node: NodeId) -> Option<Displacement> {
        let [x, y] = self.dofs(node)?;
        Some(Displacement::new(self.displacements[x], self.displacements[y]))
    }

    /// Total nodal force (applied load or reaction) at a node.
    #[must_use]
    pub fn node_force(&self, node: NodeId) -> Option<Force> {
        let [x, y] = self.dofs(node)?;
        Some(Force::new(self.forces[x], self.forces[y]))
    }

    /// Reaction along `axis` at a node, present only where that axis is supported.
    #[must_use]
    pub fn reaction(&self, node: NodeId, axis: Axis) -> Option<f64> {
        let dof = self.dofs(node)?[axis.offset()];
        (!self.conditions[dof].is_free()).then(|| self.forces[dof])
    }

    /// Largest mismatch between recovered and applied loads at free DOFs.
    #[must_use]
    pub fn load_residual(&self) -> f64 {
        load_residual(&self.forces, &self.conditions)
    }

    /// Sum of all nodal forces along X and Y.
    ///
    /// Both are zero for a structure in static equilibrium.
    #[must_use]
    pub fn force_sums(&self) -> (f64, f64) {
        self.forces
            .iter()
            .enumerate()
            .fold((0.0, 0.0), |(x, y), (dof, value)| {
                if dof % DOFS_PER_NODE == 0 {
                    (x + value, y)
                } else {
                    (x, y + value)
                }
            })
    }

    fn dofs(&self, node: NodeId) -> Option<[usize; 2]> {
        (1..=self.node_count())
            .contains(&node.number())
            .then(|| node_dofs(node.number()))
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::FRAC_PI_2;

    use approx::assert_relative_eq;

    use super::*;
    use crate::errors::IllPosedSystem;
    use crate::geometry::{force, point};

    const STEEL: ElementProperties = ElementProperties::new(210_000.0, 1_000.0);

    #[test]
    fn node_and_element_numbers_are_one_based() {
        let mut truss = PlaneTruss::new();
        let a = truss.add_node(point(0.0, 0.0));
        let b = truss.add_node(point(1.0, 0.0));
        let member = truss.add_element(a, b, STEEL).expect("valid element");
        assert_eq!(a, NodeId::new(1));
        assert_eq!(b, NodeId::new(2));
        assert_eq!(member, ElementId::new(1));
        assert_eq!(truss.element_nodes(member), Some((a, b)));
        assert_eq!(truss.node_position(b), Some(point(1.0, 0.0)));
        assert_eq!(truss.node_position(NodeId::new(0)), None);
    }

    #[test]
    fn edits_reject_unknown_nodes() {
        let mut truss = PlaneTruss::new();
        let a = truss.add_node(point(0.0, 0.0));
        for node in [NodeId::new(0), NodeId::new(2)] {
            assert_eq!(
                truss.set_support(node, [true, true]),
                Err(ModelEditError::UnknownNode(node))
            );
            assert_eq!(
                truss.set_load(node, force(1.0, 0.0)),
                Err(ModelEditError::UnknownNode(node))
            );
            assert_eq!(
                truss.set_prescribed_displacement(node, Axis::X, 0.1),
                Err(ModelEditError::UnknownNode(node))
            );
            assert_eq!(
                truss.add_element(a, node, STEEL),
                Err(ModelEditError::UnknownNode(node))
            );
        }
        assert_eq!(
            truss.add_element(a, a, STEEL),
            Err(ModelEditError::SelfConnectedElement(a))
        );
    }

    #[test]
    fn invalid_element_properties_are_rejected() {
        let mut truss = PlaneTruss::new();
        let a = truss.add_node(point(0.0, 0.0));
        let b = truss.add_node(point(1.0, 0.0));

        let area_error = truss
            .add_element(a, b, ElementProperties::new(210_000.0, 0.0))
            .expect_err("zero area rejected");
        assert!(matches!(
            area_error,
            ModelEditError::InvalidElementProperties(DomainError::NonPositiveArea { .. })
        ));

        let modulus_error = truss
            .add_element(a, b, ElementProperties::new(-1.0, 10.0))
            .expect_err("negative modulus rejected");
        assert!(matches!(
            modulus_error,
            ModelEditError::InvalidElementProperties(DomainError::NonPositiveModulus { .. })
        ));
        assert_eq!(truss.element_count(), 0);
    }

    #[test]
    fn zero_length_element_is_a_domain_error() {
        let mut truss = PlaneTruss::new();
        let a = truss.add_node(point(2.0, 1.0));
        let b = truss.add_node(point(2.0, 1.0));
        let member = truss.add_element(a, b, STEEL).expect("properties accepted");

        let error = truss.evaluate().expect_err("zero length detected");
        assert_eq!(
            error,
            AnalysisError::InvalidElement {
                element: member,
                source: DomainError::ZeroLength
            }
        );
    }

    #[test]
    fn single_bar_matches_closed_form() {
        let mut truss = PlaneTruss::new();
        let fixed = truss.add_node(point(0.0, 0.0));
        let free = truss.add_node(point(1_000.0, 0.0));
        let member = truss.add_element(fixed, free, STEEL).expect("valid element");
        truss.set_support(fixed, [true, true]).expect("support applied");
        truss.set_prescribed_displacement(free, Axis::Y, 0.0).expect("roller applied");
        truss.set_load(free, force(1_000.0, 0.0)).expect("load applied");

        let solution = truss.evaluate().expect("analysis succeeds");

        let displacement = solution.node_displacement(free).expect("node exists");
        let expected = 1_000.0 * 1_000.0 / (210_000.0 * 1_000.0);
        assert_relative_eq!(displacement.x, expected, max_relative = 1.0e-12);
        assert_relative_eq!(displacement.y, 0.0);

        assert_relative_eq!(solution.reaction(fixed, Axis::X).unwrap(), -1_000.0, epsilon = 1.0e-9);
        assert_relative_eq!(solution.reaction(fixed, Axis::Y).unwrap(), 0.0, epsilon = 1.0e-9);
        assert_eq!(solution.reaction(free, Axis::X), None);

        let result = solution.element(member).expect("element exists");
        assert_relative_eq!(result.axial_force, 1_000.0, max_relative = 1.0e-9);
        assert_relative_eq!(result.stress, 1.0, max_relative = 1.0e-9);
    }

    #[test]
    fn table_input_with_roller_support() {
        let truss = PlaneTruss::from_tables(
            &[(0.0, 0.0), (1_000.0, 0.0)],
            &[(1, 2)],
            &[210_000.0],
            &[1_000.0],
            &[Some(0.0), Some(0.0), None, Some(0.0)],
            &[None, None, Some(1_000.0), None],
        )
        .expect("valid tables");
        let solution = truss.evaluate().expect("analysis succeeds");
        assert_relative_eq!(solution.displacements()[2], 1.0 / 210.0, max_relative = 1.0e-12);
        assert_relative_eq!(solution.load_residual(), 0.0, epsilon = 1.0e-9);
    }

    #[test]
    fn unrestrained_transverse_dof_is_singular() {
        // Without a roller the free end of a horizontal bar has no y stiffness.
        let truss = PlaneTruss::from_tables(
            &[(0.0, 0.0), (1_000.0, 0.0)],
            &[(1, 2)],
            &[210_000.0],
            &[1_000.0],
            &[Some(0.0), Some(0.0), None, None],
            &[None, None, Some(1_000.0), Some(0.0)],
        )
        .expect("valid tables");
        assert_eq!(truss.evaluate(), Err(AnalysisError::SingularMatrix));
        assert_eq!(
            truss.element_geometry(ElementId::new(2)),
            Err(AnalysisError::UnknownElement(ElementId::new(2)))
        );
    }

    #[test]
    fn vertical_bar_carries_no_horizontal_load() {
        let mut truss = PlaneTruss::new();
        let base = truss.add_node(point(0.0, 0.0));
        let top = truss.add_node(point(0.0, 2.0));
        let column = truss.add_element(base, top, STEEL).expect("valid element");
        let (length, angle) = truss.element_geometry(column).expect("valid geometry");
        assert_relative_eq!(length, 2.0);
        assert_relative_eq!(angle, FRAC_PI_2);

        let k = truss.stiffness_matrix().expect("assembles");
        let axial = 210_000.0 * 1_000.0 / 2.0;
        for dof in [0, 2] {
            for col in 0..4 {
                assert!(k[(dof, col)].abs() < 1.0e-9 * axial);
            }
        }
    }

    #[test]
    fn settlement_needs_corrected_reduction() {
        // Bar pulled by moving its far support 0.5 to the right.
        let mut truss = PlaneTruss::new();
        let a = truss.add_node(point(0.0, 0.0));
        let b = truss.add_node(point(1.0, 0.0));
        let c = truss.add_node(point(2.0, 0.0));
        truss.add_element(a, b, ElementProperties::new(1.0, 1.0)).unwrap();
        truss.add_element(b, c, ElementProperties::new(1.0, 1.0)).unwrap();
        truss.set_support(a, [true, true]).unwrap();
        truss.set_prescribed_displacement(b, Axis::Y, 0.0).unwrap();
        truss.set_support(c, [true, true]).unwrap();
        truss.set_prescribed_displacement(c, Axis::X, 0.5).unwrap();

        let corrected = truss.evaluate().expect("analysis succeeds");
        assert_relative_eq!(corrected.displacements()[2], 0.25, epsilon = 1.0e-12);
        assert_relative_eq!(corrected.reaction(a, Axis::X).unwrap(), -0.25, epsilon = 1.0e-12);
        assert_relative_eq!(corrected.reaction(c, Axis::X).unwrap(), 0.25, epsilon = 1.0e-12);
        assert_relative_eq!(corrected.load_residual(), 0.0, epsilon = 1.0e-12);

        let direct = truss
            .evaluate_with(ReductionPolicy::Direct)
            .expect("analysis succeeds");
        assert_relative_eq!(direct.displacements()[2], 0.0, epsilon = 1.0e-12);
        assert!(direct.load_residual() > 0.1);
    }

    #[test]
    fn mechanism_is_singular() {
        let mut truss = PlaneTruss::new();
        let a = truss.add_node(point(0.0, 0.0));
        let b = truss.add_node(point(1.0, 1.0));
        truss.add_element(a, b, STEEL).unwrap();
        truss.set_support(a, [true, true]).unwrap();
        truss.set_load(b, force(0.0, -10.0)).unwrap();

        assert_eq!(truss.evaluate(), Err(AnalysisError::SingularMatrix));
    }

    #[test]
    fn fully_supported_truss_is_ill_posed() {
        let mut truss = PlaneTruss::new();
        let a = truss.add_node(point(0.0, 0.0));
        let b = truss.add_node(point(1.0, 0.0));
        truss.add_element(a, b, STEEL).unwrap();
        truss.set_support(a, [true, true]).unwrap();
        truss.set_support(b, [true, true]).unwrap();

        assert_eq!(
            truss.evaluate(),
            Err(AnalysisError::IllPosed(IllPosedSystem::NoFreeDofs))
        );
    }

    #[test]
    fn tables_validate_conditions() {
        let error = PlaneTruss::from_tables(
            &[(0.0, 0.0), (1.0, 0.0)],
            &[(1, 2)],
            &[1.0],
            &[1.0],
            &[Some(0.0), Some(0.0), None, None],
            &[None, Some(3.0), Some(1.0), Some(0.0)],
        )
        .expect_err("DOF 1 has both quantities");
        assert_eq!(error, AnalysisError::IllPosed(IllPosedSystem::BothKnown { dof: 1 }));

        let error = PlaneTruss::from_tables(
            &[(0.0, 0.0), (1.0, 0.0)],
            &[(1, 3)],
            &[1.0],
            &[1.0],
            &[Some(0.0), Some(0.0), None, None],
            &[None, None, Some(1.0), Some(0.0)],
        )
        .expect_err("node 3 does not exist");
        assert_eq!(error, AnalysisError::UnknownNode { node: 3, node_count: 2 });
    }
}
