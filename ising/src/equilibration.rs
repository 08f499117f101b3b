//! Rolling-window detection of when a run has settled.
//!
//! This is a heuristic: a run counts as stabilized once the most recent
//! window of energy samples is flat and the latest sample sits close to the
//! window mean. Its only contract is that identical histories and
//! configuration give identical answers.

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{IsingError, Result};

/// Window size and thresholds of the stabilization test.
///
/// The right values depend on lattice size and sampling cadence. `fine()` suits
/// dense sampling of small energy changes, `coarse()` sparse sampling of long
/// runs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EquilibrationConfig {
    /// Number of most recent samples considered
    pub window_size: usize,
    /// Upper bound on |E[k+1] - E[k]| inside the window
    pub energy_change_threshold: f64,
    /// Upper bound on |E_latest - mean E| over the window
    pub energy_deviation_threshold: f64,
    /// Upper bound on |M_latest - mean M| over the window; `None` skips the check
    #[serde(default)]
    pub magnetization_deviation_threshold: Option<f64>,
}

impl EquilibrationConfig {
    pub fn fine() -> Self {
        Self {
            window_size: 500,
            energy_change_threshold: 0.01,
            energy_deviation_threshold: 0.001,
            magnetization_deviation_threshold: Some(0.1),
        }
    }

    pub fn coarse() -> Self {
        Self {
            window_size: 5,
            energy_change_threshold: 5.0,
            energy_deviation_threshold: 1.0,
            magnetization_deviation_threshold: None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.window_size == 0 {
            return Err(IsingError::InvalidWindow);
        }
        Ok(())
    }
}

impl Default for EquilibrationConfig {
    fn default() -> Self {
        Self::coarse()
    }
}

/// Summary of the most recent window of samples.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowStats {
    pub mean_energy: f64,
    pub mean_magnetization: f64,
    pub max_energy_change: f64,
}

#[derive(Debug, Clone)]
pub struct EquilibrationMonitor {
    config: EquilibrationConfig,
    energy_history: Vec<f64>,
    magnetization_history: Vec<i64>,
    stabilized_at: Option<usize>,
}

impl EquilibrationMonitor {
    pub fn new(config: EquilibrationConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            energy_history: Vec::new(),
            magnetization_history: Vec::new(),
            stabilized_at: None,
        })
    }

    pub fn config(&self) -> &EquilibrationConfig {
        &self.config
    }

    /// Record one sample and re-evaluate the stabilization test.
    ///
    /// Returns whether the run is stabilized after this sample. Once true it
    /// stays true for the lifetime of the monitor.
    pub fn observe(&mut self, energy: f64, magnetization: i64) -> bool {
        self.energy_history.push(energy);
        self.magnetization_history.push(magnetization);

        if self.stabilized_at.is_none() && self.len() > self.config.window_size {
            if let Some(stats) = self.window_stats() {
                debug!(
                    samples = self.len(),
                    mean_energy = stats.mean_energy,
                    max_energy_change = stats.max_energy_change,
                    "equilibration window evaluated"
                );
                if self.is_settled(&stats, energy, magnetization) {
                    let index = self.len() - 1;
                    self.stabilized_at = Some(index);
                    info!(
                        sample = index,
                        energy, magnetization, "system stabilized"
                    );
                }
            }
        }

        self.is_stabilized()
    }

    fn is_settled(&self, stats: &WindowStats, energy: f64, magnetization: i64) -> bool {
        let flat = stats.max_energy_change < self.config.energy_change_threshold;
        let centered = (energy - stats.mean_energy).abs() < self.config.energy_deviation_threshold;
        let magnetization_ok = match self.config.magnetization_deviation_threshold {
            Some(threshold) => (magnetization as f64 - stats.mean_magnetization).abs() < threshold,
            None => true,
        };
        flat && centered && magnetization_ok
    }

    /// Statistics over the most recent `window_size` samples, if that many exist.
    pub fn window_stats(&self) -> Option<WindowStats> {
        let window = self.config.window_size;
        if window == 0 || self.len() < window {
            return None;
        }
        let start = self.len() - window;
        let energies = &self.energy_history[start..];
        let magnetizations = &self.magnetization_history[start..];

        let mean_energy = energies.iter().sum::<f64>() / window as f64;
        let mean_magnetization =
            magnetizations.iter().map(|&m| m as f64).sum::<f64>() / window as f64;
        let max_energy_change = energies
            .iter()
            .tuple_windows()
            .map(|(a, b)| (b - a).abs())
            .fold(0.0_f64, f64::max);

        Some(WindowStats {
            mean_energy,
            mean_magnetization,
            max_energy_change,
        })
    }

    pub fn is_stabilized(&self) -> bool {
        self.stabilized_at.is_some()
    }

    /// Index of the sample at which stabilization was first detected.
    pub fn stabilized_at(&self) -> Option<usize> {
        self.stabilized_at
    }

    pub fn energy_history(&self) -> &[f64] {
        &self.energy_history
    }

    pub fn magnetization_history(&self) -> &[i64] {
        &self.magnetization_history
    }

    pub fn len(&self) -> usize {
        self.energy_history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.energy_history.is_empty()
    }
}
