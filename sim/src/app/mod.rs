mod report;
mod runner;
mod sweep;

pub use runner::{build_lattice, run_single, CsvObserver, NullObserver, RunObserver, RunSummary};
pub use sweep::{run_sweep, write_sweep_results, BetaPoint};

use self::report::{report_run_summary, report_sweep_summary};
use crate::config::{Args, Config, Settings};
use crate::io::setup_output;
use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use std::fs;
use tracing::info;

pub struct SimApplication {
    args: Args,
    settings: Settings,
}

impl SimApplication {
    pub fn from_cli() -> Result<Self> {
        Self::new(Args::parse())
    }

    pub fn new(args: Args) -> Result<Self> {
        let config = load_config(&args)?;
        let settings = config.resolve(&args)?;
        Ok(Self { args, settings })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Install logging, then run.
    pub fn run(self) -> Result<()> {
        setup_output(self.args.output.as_deref(), self.args.verbose)?;
        info!("Configuration resolved:\n{:?}", self.settings);
        self.execute()
    }

    /// Run the selected mode without touching the global log subscriber.
    pub fn execute(&self) -> Result<()> {
        let run = &self.settings.run;
        match &self.settings.sweep {
            None => {
                info!(
                    "Single run: {}x{} lattice, J = {}, beta = {}, {} steps",
                    run.rows, run.cols, run.coupling, run.beta, run.steps
                );
                let mut observer = CsvObserver::create(&self.settings.output, run.beta)?;
                let summary = run_single(run, run.seed, &mut observer)?;
                report_run_summary(&summary);
            }
            Some(sweep) => {
                info!(
                    "Beta sweep: {}x{} lattice, J = {}, betas = {:?}",
                    run.rows, run.cols, run.coupling, sweep.betas
                );
                let points = run_sweep(run, sweep)?;
                write_sweep_results(&self.settings.output, &points)?;
                report_sweep_summary(&points);
            }
        }
        Ok(())
    }
}

fn load_config(args: &Args) -> Result<Config> {
    let Some(path) = &args.config_file else {
        return Ok(Config::default().with_defaults());
    };

    let config_content = fs::read_to_string(path)
        .wrap_err_with(|| format!("Unable to read configuration file: {}", path))?;

    let config = serde_yml::from_str::<Config>(&config_content)
        .wrap_err("Failed to parse configuration file")?
        .with_defaults();

    Ok(config)
}
