//! Command-line argument parsing for Ising simulations

use clap::Parser;

use super::InitialState;

/// Metropolis Monte Carlo simulation of the 2D Ising model
#[derive(Parser, Debug, Default)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the YAML configuration file (built-in defaults when omitted)
    #[arg(short, long)]
    pub config_file: Option<String>,

    /// Write log output to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<String>,

    /// Log per-sample detail
    #[arg(short, long)]
    pub verbose: bool,

    /// Override number of lattice rows
    #[arg(long)]
    pub rows: Option<usize>,

    /// Override number of lattice columns
    #[arg(long)]
    pub cols: Option<usize>,

    /// Override coupling constant J
    #[arg(long, allow_hyphen_values = true)]
    pub coupling: Option<f64>,

    /// Override initial spin configuration
    #[arg(long, value_enum)]
    pub initial_state: Option<InitialState>,

    /// Override inverse temperature of a single run
    #[arg(long)]
    pub beta: Option<f64>,

    /// Override number of single-spin update steps per run
    #[arg(long)]
    pub steps: Option<u64>,

    /// Override number of steps between observable samples
    #[arg(long)]
    pub sample_interval: Option<u64>,

    /// Override number of lattice snapshots per run (0 disables)
    #[arg(long)]
    pub frames: Option<usize>,

    /// Override master random seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// Stop a run as soon as the equilibration monitor reports stability
    #[arg(long)]
    pub stop_when_stabilized: bool,

    /// Override directory for CSV results
    #[arg(long)]
    pub output_dir: Option<String>,

    /// Do not write the trajectory table of a single run
    #[arg(long)]
    pub no_trajectory: bool,

    /// Do not write lattice frames of a single run
    #[arg(long)]
    pub no_frames: bool,

    /// Comma separated inverse temperatures; selects sweep mode
    #[arg(long, value_delimiter = ',')]
    pub betas: Option<Vec<f64>>,

    /// Override number of independent runs per beta in a sweep
    #[arg(long)]
    pub runs_per_beta: Option<usize>,

    /// Run sweep jobs one after another instead of on the rayon pool
    #[arg(long)]
    pub serial: bool,
}
