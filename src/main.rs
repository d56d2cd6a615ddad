use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use log::info;
use planetruss::{render_summary, ReductionPolicy, SolutionReport, TrussInput};

/// Solve a plane truss described by a JSON model file.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Path to the JSON model.
    input: PathBuf,

    /// Load reduction policy; overrides the `policy` field of the model.
    #[arg(long, value_enum)]
    policy: Option<Policy>,

    /// Print the solution as JSON instead of a table.
    #[arg(long)]
    json: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Policy {
    /// Move prescribed displacements onto the free DOFs.
    Corrected,
    /// Use the applied loads as given.
    Direct,
}

impl From<Policy> for ReductionPolicy {
    fn from(policy: Policy) -> Self {
        match policy {
            Policy::Corrected => ReductionPolicy::Corrected,
            Policy::Direct => ReductionPolicy::Direct,
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let cli = Cli::parse();

    let input = TrussInput::from_path(&cli.input)?;
    let policy = cli.policy.map_or(input.policy, ReductionPolicy::from);
    let truss = input.build_truss()?;
    info!("solving with {policy:?} reduction");
    let solution = truss.evaluate_with(policy)?;

    if cli.json {
        let report = SolutionReport::new(&truss, &solution);
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", render_summary(&truss, &solution));
    }

    Ok(())
}
