//! Input/Output operations for Ising simulations
//!
//! This module handles logging setup, result directories and CSV tables.

mod output;
mod tables;

pub use output::setup_output;
pub use tables::{
    ensure_directory, write_distribution_table, write_grid, write_run_table, write_sweep_table,
    DistributionRecord, RunRecord, SweepRecord, TrajectoryRecord, TrajectoryWriter,
};
