//! `dvsim check` — Validate a topology file without running a simulation.

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use dvsim_core::Topology;

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Path to the adjacency-matrix topology file.
    pub topology: PathBuf,
}

pub fn run(args: &CheckArgs) -> anyhow::Result<()> {
    let topology = Topology::from_file(&args.topology)
        .with_context(|| format!("loading topology {}", args.topology.display()))?;

    println!("{} nodes, {} links", topology.len(), topology.links().len());
    for (a, b, weight) in topology.links() {
        println!("  {} <-> {}  weight {}", a.label(), b.label(), weight);
    }
    for id in topology.node_ids() {
        let neighbors = topology.neighbors(id);
        if neighbors.is_empty() {
            println!("Node {} is isolated", id.label());
        }
    }
    Ok(())
}
