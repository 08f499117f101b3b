//! Configuration management for Ising simulations
//!
//! This module handles the YAML configuration structures, their defaults,
//! and the merge of command-line overrides into concrete run settings.

mod args;

pub use args::Args;

use color_eyre::eyre::{bail, Result};
use ising::EquilibrationConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure for Ising simulations
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub lattice: LatticeParams,
    #[serde(default)]
    pub run: RunParams,
    #[serde(default)]
    pub equilibration: EquilibrationParams,
    /// Presence of this section selects a beta sweep
    pub sweep: Option<SweepParams>,
    #[serde(default)]
    pub output: OutputParams,
}

/// Starting spin configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum InitialState {
    /// Each spin +1 or -1 with probability 1/2
    Random,
    /// All spins +1
    Up,
    /// All spins -1
    Down,
}

/// Lattice geometry and coupling
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LatticeParams {
    pub rows: Option<usize>,
    pub cols: Option<usize>,
    pub coupling: Option<f64>,
    pub initial_state: Option<InitialState>,
}

impl Default for LatticeParams {
    fn default() -> Self {
        LatticeParams {
            rows: Some(100),
            cols: Some(100),
            coupling: Some(1.0),
            initial_state: Some(InitialState::Random),
        }
    }
}

impl LatticeParams {
    /// Apply default values to any missing parameters
    pub fn with_defaults(mut self) -> Self {
        let defaults = Self::default();
        if self.rows.is_none() {
            self.rows = defaults.rows;
        }
        if self.cols.is_none() {
            self.cols = defaults.cols;
        }
        if self.coupling.is_none() {
            self.coupling = defaults.coupling;
        }
        if self.initial_state.is_none() {
            self.initial_state = defaults.initial_state;
        }
        self
    }
}

/// Parameters of a single Monte Carlo run
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct RunParams {
    pub beta: Option<f64>,
    /// Single-spin update steps
    pub steps: Option<u64>,
    /// Steps between observable samples
    pub sample_interval: Option<u64>,
    /// Lattice snapshots per run, 0 disables
    pub frames: Option<usize>,
    pub seed: Option<u64>,
}

impl Default for RunParams {
    fn default() -> Self {
        RunParams {
            beta: Some(0.44),
            steps: Some(1_000_000),
            sample_interval: Some(1_000),
            frames: Some(5),
            seed: Some(42),
        }
    }
}

impl RunParams {
    /// Apply default values to any missing parameters
    pub fn with_defaults(mut self) -> Self {
        let defaults = Self::default();
        if self.beta.is_none() {
            self.beta = defaults.beta;
        }
        if self.steps.is_none() {
            self.steps = defaults.steps;
        }
        if self.sample_interval.is_none() {
            self.sample_interval = defaults.sample_interval;
        }
        if self.frames.is_none() {
            self.frames = defaults.frames;
        }
        if self.seed.is_none() {
            self.seed = defaults.seed;
        }
        self
    }
}

/// Named threshold sets for the equilibration monitor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MonitorPreset {
    Fine,
    Coarse,
}

/// Equilibration monitor parameters; explicit values override the preset
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct EquilibrationParams {
    pub preset: Option<MonitorPreset>,
    pub window_size: Option<usize>,
    pub energy_change_threshold: Option<f64>,
    pub energy_deviation_threshold: Option<f64>,
    pub magnetization_deviation_threshold: Option<f64>,
    pub stop_when_stabilized: Option<bool>,
}

impl Default for EquilibrationParams {
    fn default() -> Self {
        EquilibrationParams {
            preset: Some(MonitorPreset::Coarse),
            window_size: None,
            energy_change_threshold: None,
            energy_deviation_threshold: None,
            magnetization_deviation_threshold: None,
            stop_when_stabilized: Some(false),
        }
    }
}

impl EquilibrationParams {
    /// Apply default values to any missing parameters
    pub fn with_defaults(mut self) -> Self {
        let defaults = Self::default();
        if self.preset.is_none() {
            self.preset = defaults.preset;
        }
        if self.stop_when_stabilized.is_none() {
            self.stop_when_stabilized = defaults.stop_when_stabilized;
        }
        self
    }

    /// Monitor configuration: the preset with any explicit overrides applied
    pub fn monitor_config(&self) -> EquilibrationConfig {
        let mut config = match self.preset {
            Some(MonitorPreset::Fine) => EquilibrationConfig::fine(),
            Some(MonitorPreset::Coarse) | None => EquilibrationConfig::coarse(),
        };
        if let Some(window_size) = self.window_size {
            config.window_size = window_size;
        }
        if let Some(threshold) = self.energy_change_threshold {
            config.energy_change_threshold = threshold;
        }
        if let Some(threshold) = self.energy_deviation_threshold {
            config.energy_deviation_threshold = threshold;
        }
        if self.magnetization_deviation_threshold.is_some() {
            config.magnetization_deviation_threshold = self.magnetization_deviation_threshold;
        }
        config
    }
}

/// Beta sweep parameters
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SweepParams {
    pub betas: Option<Vec<f64>>,
    pub runs_per_beta: Option<usize>,
    pub histogram_bins: Option<usize>,
    pub parallel: Option<bool>,
}

impl Default for SweepParams {
    fn default() -> Self {
        SweepParams {
            betas: Some(vec![0.1, 0.2, 0.3, 0.4, 0.44, 0.5, 0.6, 0.7, 0.8, 1.0]),
            runs_per_beta: Some(10),
            histogram_bins: Some(30),
            parallel: Some(true),
        }
    }
}

impl SweepParams {
    /// Apply default values to any missing parameters
    pub fn with_defaults(mut self) -> Self {
        let defaults = Self::default();
        if self.betas.is_none() {
            self.betas = defaults.betas;
        }
        if self.runs_per_beta.is_none() {
            self.runs_per_beta = defaults.runs_per_beta;
        }
        if self.histogram_bins.is_none() {
            self.histogram_bins = defaults.histogram_bins;
        }
        if self.parallel.is_none() {
            self.parallel = defaults.parallel;
        }
        self
    }
}

/// Result file parameters
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct OutputParams {
    pub directory: Option<String>,
    pub write_trajectory: Option<bool>,
    pub write_frames: Option<bool>,
}

impl Default for OutputParams {
    fn default() -> Self {
        OutputParams {
            directory: Some("results".to_string()),
            write_trajectory: Some(true),
            write_frames: Some(true),
        }
    }
}

impl OutputParams {
    /// Apply default values to any missing parameters
    pub fn with_defaults(mut self) -> Self {
        let defaults = Self::default();
        if self.directory.is_none() {
            self.directory = defaults.directory;
        }
        if self.write_trajectory.is_none() {
            self.write_trajectory = defaults.write_trajectory;
        }
        if self.write_frames.is_none() {
            self.write_frames = defaults.write_frames;
        }
        self
    }
}

impl Config {
    /// Apply default values to all sections
    pub fn with_defaults(mut self) -> Self {
        self.lattice = self.lattice.with_defaults();
        self.run = self.run.with_defaults();
        self.equilibration = self.equilibration.with_defaults();
        self.sweep = self.sweep.map(SweepParams::with_defaults);
        self.output = self.output.with_defaults();
        self
    }

    /// Merge command-line overrides into concrete settings
    ///
    /// Precedence is command line, then configuration file, then defaults.
    pub fn resolve(&self, args: &Args) -> Result<Settings> {
        let lattice = self.lattice.clone().with_defaults();
        let run_params = self.run.clone().with_defaults();

        let mut equilibration = self.equilibration.clone().with_defaults();
        if args.stop_when_stabilized {
            equilibration.stop_when_stabilized = Some(true);
        }

        let run = RunSettings {
            rows: args.rows.or(lattice.rows).unwrap_or(100),
            cols: args.cols.or(lattice.cols).unwrap_or(100),
            coupling: args.coupling.or(lattice.coupling).unwrap_or(1.0),
            initial_state: args
                .initial_state
                .or(lattice.initial_state)
                .unwrap_or(InitialState::Random),
            beta: args.beta.or(run_params.beta).unwrap_or(0.44),
            steps: args.steps.or(run_params.steps).unwrap_or(1_000_000),
            sample_interval: args
                .sample_interval
                .or(run_params.sample_interval)
                .unwrap_or(1_000),
            frames: args.frames.or(run_params.frames).unwrap_or(0),
            seed: args.seed.or(run_params.seed).unwrap_or(42),
            equilibration: equilibration.monitor_config(),
            stop_when_stabilized: equilibration.stop_when_stabilized.unwrap_or(false),
        };
        run.validate()?;

        let sweep = if args.betas.is_some() || self.sweep.is_some() {
            let params = self.sweep.clone().unwrap_or_default().with_defaults();
            let sweep = SweepSettings {
                betas: args.betas.clone().or(params.betas).unwrap_or_default(),
                runs_per_beta: args.runs_per_beta.or(params.runs_per_beta).unwrap_or(1),
                histogram_bins: params.histogram_bins.unwrap_or(30),
                parallel: !args.serial && params.parallel.unwrap_or(true),
            };
            sweep.validate()?;
            Some(sweep)
        } else {
            None
        };

        let output_params = self.output.clone().with_defaults();
        let output = OutputSettings {
            directory: PathBuf::from(
                args.output_dir
                    .clone()
                    .or(output_params.directory)
                    .unwrap_or_else(|| "results".to_string()),
            ),
            write_trajectory: !args.no_trajectory
                && output_params.write_trajectory.unwrap_or(true),
            write_frames: !args.no_frames && output_params.write_frames.unwrap_or(true),
        };

        Ok(Settings { run, sweep, output })
    }
}

/// Fully resolved settings for one invocation
#[derive(Debug, Clone)]
pub struct Settings {
    pub run: RunSettings,
    pub sweep: Option<SweepSettings>,
    pub output: OutputSettings,
}

#[derive(Debug, Clone)]
pub struct RunSettings {
    pub rows: usize,
    pub cols: usize,
    pub coupling: f64,
    pub initial_state: InitialState,
    pub beta: f64,
    pub steps: u64,
    pub sample_interval: u64,
    pub frames: usize,
    pub seed: u64,
    pub equilibration: EquilibrationConfig,
    pub stop_when_stabilized: bool,
}

impl RunSettings {
    fn validate(&self) -> Result<()> {
        if self.rows == 0 || self.cols == 0 {
            bail!("lattice must have at least one row and one column, got {}x{}", self.rows, self.cols);
        }
        if self.sample_interval == 0 {
            bail!("sample_interval must be at least 1");
        }
        if self.equilibration.window_size == 0 {
            bail!("equilibration window_size must be at least 1");
        }
        if !self.beta.is_finite() {
            bail!("beta must be finite, got {}", self.beta);
        }
        Ok(())
    }

    /// Copy of these settings at another inverse temperature
    pub fn at_beta(&self, beta: f64) -> Self {
        Self {
            beta,
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone)]
pub struct SweepSettings {
    pub betas: Vec<f64>,
    pub runs_per_beta: usize,
    pub histogram_bins: usize,
    pub parallel: bool,
}

impl SweepSettings {
    fn validate(&self) -> Result<()> {
        if self.betas.is_empty() {
            bail!("beta sweep needs at least one beta value");
        }
        if let Some(beta) = self.betas.iter().find(|b| !b.is_finite()) {
            bail!("beta values must be finite, got {}", beta);
        }
        if self.runs_per_beta == 0 {
            bail!("runs_per_beta must be at least 1");
        }
        if self.histogram_bins == 0 {
            bail!("histogram_bins must be at least 1");
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct OutputSettings {
    pub directory: PathBuf,
    pub write_trajectory: bool,
    pub write_frames: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let config: Config = serde_yml::from_str("{}").unwrap();
        let settings = config.with_defaults().resolve(&Args::default()).unwrap();
        assert_eq!(settings.run.rows, 100);
        assert_eq!(settings.run.cols, 100);
        assert_eq!(settings.run.beta, 0.44);
        assert_eq!(settings.run.seed, 42);
        assert_eq!(settings.run.initial_state, InitialState::Random);
        assert_eq!(settings.run.equilibration, EquilibrationConfig::coarse());
        assert!(settings.sweep.is_none());
        assert_eq!(settings.output.directory, PathBuf::from("results"));
    }

    #[test]
    fn file_values_and_cli_overrides() {
        let yaml = r#"
lattice:
  rows: 1
  cols: 3
  coupling: -1.0
  initial_state: up
run:
  beta: 0.7
  steps: 500
equilibration:
  preset: fine
  window_size: 50
sweep:
  betas: [0.2, 0.4]
"#;
        let config: Config = serde_yml::from_str::<Config>(yaml).unwrap().with_defaults();
        let args = Args {
            cols: Some(8),
            seed: Some(9),
            runs_per_beta: Some(3),
            serial: true,
            ..Args::default()
        };
        let settings = config.resolve(&args).unwrap();

        assert_eq!(settings.run.rows, 1);
        assert_eq!(settings.run.cols, 8);
        assert_eq!(settings.run.coupling, -1.0);
        assert_eq!(settings.run.initial_state, InitialState::Up);
        assert_eq!(settings.run.beta, 0.7);
        assert_eq!(settings.run.steps, 500);
        assert_eq!(settings.run.seed, 9);
        assert_eq!(settings.run.equilibration.window_size, 50);
        assert_eq!(settings.run.equilibration.energy_change_threshold, 0.01);

        let sweep = settings.sweep.unwrap();
        assert_eq!(sweep.betas, vec![0.2, 0.4]);
        assert_eq!(sweep.runs_per_beta, 3);
        assert_eq!(sweep.histogram_bins, 30);
        assert!(!sweep.parallel);
    }

    #[test]
    fn betas_flag_selects_sweep() {
        let args = Args {
            betas: Some(vec![0.3]),
            ..Args::default()
        };
        let settings = Config::default().with_defaults().resolve(&args).unwrap();
        let sweep = settings.sweep.unwrap();
        assert_eq!(sweep.betas, vec![0.3]);
        assert_eq!(sweep.runs_per_beta, 10);
    }

    #[test]
    fn output_switches_override_file() {
        let yaml = "output:\n  write_trajectory: true\n  write_frames: true\n";
        let config = serde_yml::from_str::<Config>(yaml).unwrap().with_defaults();

        let defaults = config.resolve(&Args::default()).unwrap();
        assert!(defaults.output.write_trajectory);
        assert!(defaults.output.write_frames);

        let args = Args {
            no_trajectory: true,
            no_frames: true,
            ..Args::default()
        };
        let quiet = config.resolve(&args).unwrap();
        assert!(!quiet.output.write_trajectory);
        assert!(!quiet.output.write_frames);
    }

    #[test]
    fn invalid_values_are_rejected() {
        let zero_rows = Args {
            rows: Some(0),
            ..Args::default()
        };
        assert!(Config::default().resolve(&zero_rows).is_err());

        let no_interval = Args {
            sample_interval: Some(0),
            ..Args::default()
        };
        assert!(Config::default().resolve(&no_interval).is_err());

        let empty_sweep = Args {
            betas: Some(Vec::new()),
            ..Args::default()
        };
        assert!(Config::default().resolve(&empty_sweep).is_err());

        let yaml = "sweep:\n  betas: [0.4]\n  histogram_bins: 0\n";
        let no_bins = serde_yml::from_str::<Config>(yaml).unwrap().with_defaults();
        assert!(no_bins.resolve(&Args::default()).is_err());
    }
}
