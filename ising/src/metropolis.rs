use rand::Rng;

use crate::lattice::Lattice;

/// Metropolis single-spin-flip updater at a fixed inverse temperature.
///
/// The updater holds no state besides `beta`; the random source is passed in
/// on every call so that independent runs never share a stream.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Metropolis {
    beta: f64,
}

/// Outcome of a single proposed flip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Move {
    pub row: usize,
    pub col: usize,
    pub delta_energy: f64,
    pub accepted: bool,
}

impl Metropolis {
    pub fn new(beta: f64) -> Self {
        Self { beta }
    }

    pub fn beta(&self) -> f64 {
        self.beta
    }

    /// Probability of accepting a flip that changes the energy by `delta_energy`.
    ///
    /// `min(1, exp(-beta * dE))`. Overflow saturates at 1, underflow at 0 and a
    /// NaN exponent (e.g. a NaN beta) counts as rejection.
    pub fn acceptance_probability(&self, delta_energy: f64) -> f64 {
        if delta_energy <= 0.0 {
            return 1.0;
        }
        let p = (-self.beta * delta_energy).exp();
        if p.is_nan() {
            0.0
        } else {
            p.min(1.0)
        }
    }

    /// Propose one flip at a uniformly random site and report what happened.
    ///
    /// A uniform draw is consumed only for energy-raising proposals.
    pub fn attempt<R: Rng + ?Sized>(&self, lattice: &mut Lattice, rng: &mut R) -> Move {
        let row = rng.gen_range(0..lattice.rows());
        let col = rng.gen_range(0..lattice.cols());
        let delta_energy = lattice.flip_energy_delta(row, col);

        let accepted =
            delta_energy <= 0.0 || rng.gen::<f64>() < self.acceptance_probability(delta_energy);
        if accepted {
            lattice.flip(row, col);
        }

        Move {
            row,
            col,
            delta_energy,
            accepted,
        }
    }

    /// Perform exactly one proposed single-spin flip.
    pub fn step<R: Rng + ?Sized>(&self, lattice: &mut Lattice, rng: &mut R) {
        self.attempt(lattice, rng);
    }

    /// One sweep: `rows * cols` proposals. Returns the number of accepted flips.
    pub fn sweep<R: Rng + ?Sized>(&self, lattice: &mut Lattice, rng: &mut R) -> usize {
        let proposals = lattice.site_count();
        (0..proposals)
            .filter(|_| self.attempt(lattice, rng).accepted)
            .count()
    }
}
