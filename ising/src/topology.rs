//! Neighbour topology of the spin grid.
//!
//! A genuine 2D grid (both axes longer than one site) is a torus: indices wrap
//! modulo the axis length. A degenerate grid (a single row or a single column)
//! is an open chain, so a 1xN lattice has N-1 bonds rather than N. The energy
//! function and the Metropolis local field both go through this type, which
//! keeps the two consistent.

use itertools::iproduct;

/// Boundary behaviour shared by both axes of a lattice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boundary {
    /// Index arithmetic wraps modulo the axis length.
    Periodic,
    /// Finite chain: the end sites have a single neighbour along the axis.
    Open,
}

/// Site coordinates as `(row, col)`.
pub type Site = (usize, usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Topology {
    rows: usize,
    cols: usize,
    boundary: Boundary,
}

impl Topology {
    /// Picks the topology for a `rows x cols` grid.
    pub fn for_shape(rows: usize, cols: usize) -> Self {
        let boundary = if rows > 1 && cols > 1 {
            Boundary::Periodic
        } else {
            Boundary::Open
        };
        Self {
            rows,
            cols,
            boundary,
        }
    }

    pub fn boundary(&self) -> Boundary {
        self.boundary
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn left(&self, col: usize) -> Option<usize> {
        backward(col, self.cols, self.boundary)
    }

    pub fn right(&self, col: usize) -> Option<usize> {
        forward(col, self.cols, self.boundary)
    }

    pub fn up(&self, row: usize) -> Option<usize> {
        backward(row, self.rows, self.boundary)
    }

    pub fn down(&self, row: usize) -> Option<usize> {
        forward(row, self.rows, self.boundary)
    }

    /// Neighbours of a site in up, down, left, right order.
    ///
    /// On a periodic axis of length 2 the same site is reached both ways and
    /// is yielded twice, matching the two bonds the bond iterators report for it.
    pub fn neighbors(&self, row: usize, col: usize) -> impl Iterator<Item = Site> {
        let up = self.up(row).map(|r| (r, col));
        let down = self.down(row).map(|r| (r, col));
        let left = self.left(col).map(|c| (row, c));
        let right = self.right(col).map(|c| (row, c));
        [up, down, left, right].into_iter().flatten()
    }

    /// Horizontal bonds, each counted once via the right neighbour of its left site.
    pub fn horizontal_bonds(&self) -> impl Iterator<Item = (Site, Site)> + '_ {
        iproduct!(0..self.rows, 0..self.cols)
            .filter_map(move |(i, j)| self.right(j).map(|jr| ((i, j), (i, jr))))
    }

    /// Vertical bonds, each counted once via the down neighbour of its upper site.
    pub fn vertical_bonds(&self) -> impl Iterator<Item = (Site, Site)> + '_ {
        iproduct!(0..self.rows, 0..self.cols)
            .filter_map(move |(i, j)| self.down(i).map(|id| ((i, j), (id, j))))
    }

    pub fn bond_count(&self) -> usize {
        self.horizontal_bonds().count() + self.vertical_bonds().count()
    }
}

fn forward(index: usize, len: usize, boundary: Boundary) -> Option<usize> {
    match boundary {
        Boundary::Periodic => Some((index + 1) % len),
        Boundary::Open => (index + 1 < len).then_some(index + 1),
    }
}

fn backward(index: usize, len: usize, boundary: Boundary) -> Option<usize> {
    match boundary {
        Boundary::Periodic => Some((index + len - 1) % len),
        Boundary::Open => index.checked_sub(1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn torus_wraps_both_axes() {
        let topo = Topology::for_shape(3, 4);
        assert_eq!(topo.boundary(), Boundary::Periodic);
        assert_eq!(topo.left(0), Some(3));
        assert_eq!(topo.right(3), Some(0));
        assert_eq!(topo.up(0), Some(2));
        assert_eq!(topo.down(2), Some(0));
        let neighbors: Vec<_> = topo.neighbors(0, 0).collect();
        assert_eq!(neighbors, vec![(2, 0), (1, 0), (0, 3), (0, 1)]);
        assert_eq!(topo.bond_count(), 2 * 3 * 4);
    }

    #[test]
    fn single_row_is_open_chain() {
        let topo = Topology::for_shape(1, 5);
        assert_eq!(topo.boundary(), Boundary::Open);
        assert_eq!(topo.neighbors(0, 0).collect::<Vec<_>>(), vec![(0, 1)]);
        assert_eq!(topo.neighbors(0, 2).collect::<Vec<_>>(), vec![(0, 1), (0, 3)]);
        assert_eq!(topo.neighbors(0, 4).collect::<Vec<_>>(), vec![(0, 3)]);
        assert_eq!(topo.bond_count(), 4);
        assert_eq!(topo.vertical_bonds().count(), 0);
    }

    #[test]
    fn single_column_is_open_chain() {
        let topo = Topology::for_shape(4, 1);
        assert_eq!(topo.neighbors(0, 0).collect::<Vec<_>>(), vec![(1, 0)]);
        assert_eq!(topo.neighbors(3, 0).collect::<Vec<_>>(), vec![(2, 0)]);
        assert_eq!(topo.horizontal_bonds().count(), 0);
        assert_eq!(topo.bond_count(), 3);
    }

    #[test]
    fn single_site_has_no_neighbors() {
        let topo = Topology::for_shape(1, 1);
        assert_eq!(topo.neighbors(0, 0).count(), 0);
        assert_eq!(topo.bond_count(), 0);
    }

    #[test]
    fn two_wide_torus_counts_double_bond() {
        let topo = Topology::for_shape(2, 2);
        let neighbors: Vec<_> = topo.neighbors(0, 0).collect();
        assert_eq!(neighbors, vec![(1, 0), (1, 0), (0, 1), (0, 1)]);
        assert_eq!(topo.bond_count(), 8);
    }
}
