use std::path::PathBuf;

use approx::assert_relative_eq;
use planetruss::{render_summary, NodeId, ReductionPolicy, SolutionReport, TrussInput};

fn demo_model() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("demos/five_node_truss.json")
}

#[test]
fn loads_and_solves_demo_model() {
    let input = TrussInput::from_path(demo_model()).expect("demo model parses");
    assert_eq!(input.policy, ReductionPolicy::Corrected);
    let truss = input.build_truss().expect("demo model is consistent");
    assert_eq!(truss.node_count(), 5);
    assert_eq!(truss.element_count(), 7);

    let solution = truss.evaluate_with(input.policy).unwrap();
    let loaded = solution.node_displacement(NodeId::new(2)).unwrap();
    assert_relative_eq!(loaded.x, -1.625_815_982_082_425_4e-7, max_relative = 1.0e-9);

    let summary = render_summary(&truss, &solution);
    assert!(summary.contains("Plane truss analysis (5 nodes, 7 elements)"));

    let report = SolutionReport::new(&truss, &solution);
    assert_eq!(report.nodes.len(), 5);
    assert_eq!(report.elements.len(), 7);
    assert_eq!(report.nodes[3].supported, [true, true]);
}

#[test]
fn missing_file_is_an_io_error() {
    let missing = demo_model().with_file_name("does_not_exist.json");
    assert!(matches!(
        TrussInput::from_path(missing),
        Err(planetruss::InputError::Io(_))
    ));
}
