use planetruss::BarChain;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let chain = BarChain::new(
        &[250.0, 120.0, 320.0, 150.0, 220.0],
        &[180.0, 30.0, 90.0, 120.0, 230.0],
        25.0,
    )?;
    let conditions = chain.supported_ends(0.0, 0.5);
    let solution = chain.evaluate(&conditions)?;

    for (node, (position, displacement)) in chain
        .node_positions()
        .iter()
        .zip(solution.displacements.iter())
        .enumerate()
    {
        println!("node {} at x = {position:.1}: u = {displacement:.6}", node + 1);
    }
    for (segment, force) in solution.segment_forces.iter().enumerate() {
        println!("segment {}: N = {force:.6}", segment + 1);
    }

    Ok(())
}
