//! DVSIM CLI — run distance-vector routing simulations.
//!
//! Subcommands: run, check.

mod commands;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// DVSIM — distributed distance-vector routing simulator.
#[derive(Parser, Debug)]
#[command(name = "dvsim", version, about, long_about = None)]
struct Cli {
    /// Enable debug logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a simulation to convergence and print the final tables.
    Run(commands::run::RunArgs),
    /// Validate a topology file and print its links without running.
    Check(commands::check::CheckArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    match &cli.command {
        Commands::Run(args) => commands::run::run(args).await,
        Commands::Check(args) => commands::check::run(args),
    }
}
