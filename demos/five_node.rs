use planetruss::{render_summary, PlaneTruss};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let coordinates = [(0.0, 0.0), (0.0, 1.0), (2.0, 1.0), (2.0, 0.0), (1.0, 0.0)];
    let connectivity = [(1, 2), (1, 5), (2, 5), (2, 3), (3, 4), (3, 5), (4, 5)];
    let moduli = [210_000.0; 7];
    let areas = [1_000.0; 7];
    let displacements = [
        None,
        Some(0.0),
        None,
        None,
        None,
        None,
        Some(0.0),
        Some(0.0),
        None,
        None,
    ];
    let forces = [
        Some(0.0),
        None,
        Some(-10.0),
        Some(0.0),
        Some(0.0),
        Some(0.0),
        None,
        None,
        Some(0.0),
        Some(0.0),
    ];

    let truss = PlaneTruss::from_tables(
        &coordinates,
        &connectivity,
        &moduli,
        &areas,
        &displacements,
        &forces,
    )?;
    let solution = truss.evaluate()?;
    println!("{}", render_summary(&truss, &solution));

    Ok(())
}
