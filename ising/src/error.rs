//! Error surface of the simulation core.

use thiserror::Error;

/// Errors raised while building or configuring simulation objects.
///
/// Nothing in the update loop itself can fail; every variant here is a
/// construction-time rejection and leaves no partially built value behind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IsingError {
    #[error("invalid lattice dimension {rows}x{cols}: rows and cols must be positive")]
    InvalidDimension { rows: usize, cols: usize },

    #[error("invalid spin value {value} at ({row}, {col}): expected +1 or -1")]
    InvalidSpin { row: usize, col: usize, value: i8 },

    #[error("expected {expected} spins for the lattice shape, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    #[error("equilibration window size must be at least 1")]
    InvalidWindow,
}

pub type Result<T> = std::result::Result<T, IsingError>;
