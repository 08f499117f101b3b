//! Ising Simulation Command-Line Interface
//!
//! This is the main entry point for running single simulations and beta
//! sweeps with YAML configuration.

use color_eyre::eyre::Result;
use ising_sim::app::SimApplication;

fn main() -> Result<()> {
    color_eyre::install()?;
    SimApplication::from_cli()?.run()
}
