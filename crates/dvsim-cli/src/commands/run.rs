//! `dvsim run` — Run a simulation to convergence.

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use dvsim_core::{SimConfig, Topology};
use dvsim_node::{simulation, SimulationReport};

/// Printed for destinations a node never learned a path to.
const UNREACHABLE_COST: u32 = 999;

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Path to the adjacency-matrix topology file.
    pub topology: PathBuf,

    /// Optional TOML file overriding simulation settings.
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

pub async fn run(args: &RunArgs) -> anyhow::Result<()> {
    let topology = Topology::from_file(&args.topology)
        .with_context(|| format!("loading topology {}", args.topology.display()))?;

    let config = match &args.config {
        Some(path) => SimConfig::from_toml_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => SimConfig::default(),
    };

    let report = simulation::run(&topology, &config)
        .await
        .context("simulation failed")?;

    print_report(&topology, &report);
    Ok(())
}

fn print_report(topology: &Topology, report: &SimulationReport) {
    println!();
    for id in topology.node_ids() {
        let table = &report.tables[&id];
        let row: Vec<String> = topology
            .node_ids()
            .map(|dest| {
                table
                    .get(dest)
                    .unwrap_or(UNREACHABLE_COST)
                    .to_string()
            })
            .collect();
        println!("Node {} DV = [{}]", id.label(), row.join(", "));
    }
    println!();
    println!(
        "Converged after {} rounds (last table update in round {})",
        report.rounds, report.last_update_round
    );
}
