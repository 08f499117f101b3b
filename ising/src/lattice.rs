use std::fmt;

use nalgebra::DMatrix;
use rand::Rng;

use crate::error::{IsingError, Result};
use crate::topology::Topology;

/// Spin value stored in each lattice cell, always +1 or -1.
pub type Spin = i8;

pub const SPIN_UP: Spin = 1;
pub const SPIN_DOWN: Spin = -1;

/// 2D Ising spin lattice
///
/// A `rows x cols` grid of spins coupled to their nearest neighbours with
/// strength J. Genuine 2D grids use periodic boundaries in both directions;
/// a single row or column is treated as an open chain (see [`Topology`]).
/// Spins are only ever changed one cell at a time through [`Lattice::flip`].
#[derive(Debug, Clone, PartialEq)]
pub struct Lattice {
    /// Spin configuration, +1 or -1 for each site
    spins: DMatrix<Spin>,
    /// Coupling constant J
    coupling: f64,
    topology: Topology,
}

impl Lattice {
    /// Create a lattice with every spin drawn independently and uniformly from {+1, -1}
    pub fn new<R: Rng + ?Sized>(rows: usize, cols: usize, coupling: f64, rng: &mut R) -> Result<Self> {
        check_shape(rows, cols)?;
        let cells: Vec<Spin> = (0..rows * cols)
            .map(|_| if rng.gen_bool(0.5) { SPIN_UP } else { SPIN_DOWN })
            .collect();
        Ok(Self::from_cells(rows, cols, coupling, &cells))
    }

    /// Create a lattice with all spins aligned (cold start)
    pub fn ordered(rows: usize, cols: usize, coupling: f64, spin: Spin) -> Result<Self> {
        check_shape(rows, cols)?;
        check_spin(0, 0, spin)?;
        Ok(Self::from_cells(rows, cols, coupling, &vec![spin; rows * cols]))
    }

    /// Create a lattice from an explicit row-major spin configuration
    pub fn from_spins(rows: usize, cols: usize, coupling: f64, cells: &[Spin]) -> Result<Self> {
        check_shape(rows, cols)?;
        if cells.len() != rows * cols {
            return Err(IsingError::ShapeMismatch {
                expected: rows * cols,
                actual: cells.len(),
            });
        }
        for (idx, &value) in cells.iter().enumerate() {
            check_spin(idx / cols, idx % cols, value)?;
        }
        Ok(Self::from_cells(rows, cols, coupling, cells))
    }

    fn from_cells(rows: usize, cols: usize, coupling: f64, cells: &[Spin]) -> Self {
        Self {
            spins: DMatrix::from_row_slice(rows, cols, cells),
            coupling,
            topology: Topology::for_shape(rows, cols),
        }
    }

    pub fn rows(&self) -> usize {
        self.spins.nrows()
    }

    pub fn cols(&self) -> usize {
        self.spins.ncols()
    }

    pub fn site_count(&self) -> usize {
        self.spins.len()
    }

    pub fn coupling(&self) -> f64 {
        self.coupling
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    pub fn spin(&self, row: usize, col: usize) -> Spin {
        self.spins[(row, col)]
    }

    /// Flip the spin at (row, col)
    pub fn flip(&mut self, row: usize, col: usize) {
        self.spins[(row, col)] *= -1;
    }

    /// Read-only view of the spin grid
    pub fn snapshot(&self) -> &DMatrix<Spin> {
        &self.spins
    }

    /// Energy of the bonds along each row
    pub fn horizontal_energy(&self) -> f64 {
        let aligned: i64 = self
            .topology
            .horizontal_bonds()
            .map(|(a, b)| self.bond(a, b))
            .sum();
        -self.coupling * aligned as f64
    }

    /// Energy of the bonds along each column
    pub fn vertical_energy(&self) -> f64 {
        let aligned: i64 = self
            .topology
            .vertical_bonds()
            .map(|(a, b)| self.bond(a, b))
            .sum();
        -self.coupling * aligned as f64
    }

    /// Calculate the total energy of the system
    ///
    /// E = -J * sum over bonds <ij> of s_i * s_j, each bond counted once.
    pub fn total_energy(&self) -> f64 {
        self.horizontal_energy() + self.vertical_energy()
    }

    /// Calculate the magnetization (sum of all spins)
    pub fn magnetization(&self) -> i64 {
        self.spins.iter().map(|&s| s as i64).sum()
    }

    pub fn energy_per_site(&self) -> f64 {
        self.total_energy() / self.site_count() as f64
    }

    pub fn magnetization_per_site(&self) -> f64 {
        self.magnetization() as f64 / self.site_count() as f64
    }

    /// Sum of the neighbouring spins of (row, col)
    pub fn local_field(&self, row: usize, col: usize) -> i32 {
        self.topology
            .neighbors(row, col)
            .map(|site| self.spins[site] as i32)
            .sum()
    }

    /// Energy change if the spin at (row, col) were flipped
    ///
    /// ΔE = 2 * J * s_i * (Σ neighbours)
    pub fn flip_energy_delta(&self, row: usize, col: usize) -> f64 {
        let spin = self.spins[(row, col)] as f64;
        2.0 * self.coupling * spin * self.local_field(row, col) as f64
    }

    fn bond(&self, a: (usize, usize), b: (usize, usize)) -> i64 {
        (self.spins[a] * self.spins[b]) as i64
    }
}

impl fmt::Display for Lattice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.spins.row_iter() {
            for &spin in row.iter() {
                f.write_str(if spin == SPIN_UP { "+ " } else { "- " })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

fn check_shape(rows: usize, cols: usize) -> Result<()> {
    if rows == 0 || cols == 0 {
        return Err(IsingError::InvalidDimension { rows, cols });
    }
    Ok(())
}

fn check_spin(row: usize, col: usize, value: Spin) -> Result<()> {
    if value != SPIN_UP && value != SPIN_DOWN {
        return Err(IsingError::InvalidSpin { row, col, value });
    }
    Ok(())
}
