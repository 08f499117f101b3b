//! Metropolis Monte Carlo simulation of the 2D Ising model.
//!
//! The crate owns the simulation state and its update rule only; driving
//! loops, file output and temperature sweeps live in `ising_sim`.

pub mod analysis;
pub mod equilibration;
mod error;
pub mod lattice;
pub mod metropolis;
pub mod rng;
pub mod topology;

pub use equilibration::{EquilibrationConfig, EquilibrationMonitor, WindowStats};
pub use error::{IsingError, Result};
pub use lattice::{Lattice, Spin, SPIN_DOWN, SPIN_UP};
pub use metropolis::{Metropolis, Move};
pub use topology::{Boundary, Topology};
