//! Text and JSON renderings of a solved truss.

use std::fmt::Write;

use serde::Serialize;

use crate::geometry::{Axis, Displacement, Force, Point};
use crate::truss::{ElementResult, NodeId, PlaneTruss, TrussSolution};

/// Render a textual summary of a solved truss.
///
/// Lists nodal displacements, nodal forces (reactions are flagged with `R`)
/// and the axial response of every element.
#[must_use]
pub fn render_summary(truss: &PlaneTruss, solution: &TrussSolution) -> String {
    let mut output = String::new();

    writeln!(
        &mut output,
        "Plane truss analysis ({} nodes, {} elements)",
        truss.node_count(),
        truss.element_count()
    )
    .expect("writing to string cannot fail");

    output.push_str("\nNodal displacements\n");
    writeln!(&mut output, "{:>6} {:>14} {:>14}", "node", "ux", "uy")
        .expect("writing to string cannot fail");
    for record in node_records(truss, solution) {
        writeln!(
            &mut output,
            "{:>6} {:>+14.6e} {:>+14.6e}",
            record.node, record.displacement.x, record.displacement.y
        )
        .expect("writing to string cannot fail");
    }

    output.push_str("\nNodal forces (R = reaction)\n");
    writeln!(&mut output, "{:>6} {:>16} {:>16}", "node", "fx", "fy")
        .expect("writing to string cannot fail");
    for record in node_records(truss, solution) {
        writeln!(
            &mut output,
            "{:>6} {:>+14.6e} {} {:>+14.6e} {}",
            record.node,
            record.force.x,
            reaction_flag(record.supported[0]),
            record.force.y,
            reaction_flag(record.supported[1]),
        )
        .expect("writing to string cannot fail");
    }

    output.push_str("\nElement forces (tension positive)\n");
    writeln!(
        &mut output,
        "{:>8} {:>5} {:>5} {:>12} {:>14} {:>14}",
        "element", "start", "end", "length", "axial force", "stress"
    )
    .expect("writing to string cannot fail");
    for element in solution.elements() {
        writeln!(
            &mut output,
            "{:>8} {:>5} {:>5} {:>12.4} {:>+14.6e} {:>+14.6e}",
            element.element,
            element.start,
            element.end,
            element.length,
            element.axial_force,
            element.stress
        )
        .expect("writing to string cannot fail");
    }

    writeln!(
        &mut output,
        "\nLargest load residual at free DOFs: {:.3e}",
        solution.load_residual()
    )
    .expect("writing to string cannot fail");

    output
}

fn reaction_flag(supported: bool) -> char {
    if supported {
        'R'
    } else {
        ' '
    }
}

/// Response of a single node.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct NodeRecord {
    /// Node number.
    pub node: NodeId,
    /// Undeformed position.
    pub position: Point,
    /// Nodal displacement.
    pub displacement: Displacement,
    /// Nodal force; the reaction along supported axes.
    pub force: Force,
    /// Whether X and Y are supported.
    pub supported: [bool; 2],
}

/// Serializable snapshot of a solved truss, used for `--json` output.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SolutionReport {
    /// One record per node in node order.
    pub nodes: Vec<NodeRecord>,
    /// One record per element in element order.
    pub elements: Vec<ElementResult>,
    /// Largest load residual at free DOFs.
    pub load_residual: f64,
}

impl SolutionReport {
    /// Collect the node and element records of `solution`.
    #[must_use]
    pub fn new(truss: &PlaneTruss, solution: &TrussSolution) -> Self {
        Self {
            nodes: node_records(truss, solution),
            elements: solution.elements().to_vec(),
            load_residual: solution.load_residual(),
        }
    }
}

fn node_records(truss: &PlaneTruss, solution: &TrussSolution) -> Vec<NodeRecord> {
    (1..=truss.node_count().min(solution.node_count()))
        .map(NodeId::new)
        .filter_map(|node| {
            Some(NodeRecord {
                node,
                position: truss.node_position(node)?,
                displacement: solution.node_displacement(node)?,
                force: solution.node_force(node)?,
                supported: Axis::ALL.map(|axis| solution.reaction(node, axis).is_some()),
            })
        })
        .collect()
}
