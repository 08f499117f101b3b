use crate::app::runner::{run_single, NullObserver, RunSummary};
use crate::config::{OutputSettings, RunSettings, SweepSettings};
use crate::io::{
    ensure_directory, write_distribution_table, write_run_table, write_sweep_table,
    DistributionRecord, RunRecord, SweepRecord,
};
use color_eyre::eyre::Result;
use ising::analysis::{self, HistogramBin, SampleStats};
use ising::rng::derive_seed;
use rayon::prelude::*;
use tracing::info;

/// Aggregated results of all runs at one beta.
#[derive(Debug, Clone)]
pub struct BetaPoint {
    pub beta: f64,
    pub runs: Vec<RunSummary>,
    pub energy: SampleStats,
    pub magnetization: SampleStats,
    pub specific_heat: f64,
    pub susceptibility: f64,
    pub energy_histogram: Vec<HistogramBin>,
    pub magnetization_histogram: Vec<HistogramBin>,
}

impl BetaPoint {
    fn aggregate(beta: f64, runs: Vec<RunSummary>, bins: usize) -> Self {
        let sites = runs.first().map(|r| r.sites).unwrap_or(0);
        let energies: Vec<f64> = runs.iter().map(|r| r.final_energy).collect();
        let magnetizations: Vec<f64> = runs.iter().map(|r| r.final_magnetization as f64).collect();

        Self {
            beta,
            energy: SampleStats::from_samples(&energies),
            magnetization: SampleStats::from_samples(&magnetizations),
            specific_heat: analysis::specific_heat(&energies, beta, sites),
            susceptibility: analysis::susceptibility(&magnetizations, beta, sites),
            energy_histogram: analysis::histogram(&energies, bins),
            magnetization_histogram: analysis::histogram(&magnetizations, bins),
            runs,
        }
    }
}

struct Job {
    beta_index: usize,
    beta: f64,
    seed: u64,
}

/// Run `runs_per_beta` independent runs at every beta.
///
/// Each job gets its own random stream derived from the master seed and its
/// position in the sweep, so results do not depend on scheduling.
pub fn run_sweep(run: &RunSettings, sweep: &SweepSettings) -> Result<Vec<BetaPoint>> {
    let jobs: Vec<Job> = sweep
        .betas
        .iter()
        .enumerate()
        .flat_map(|(beta_index, &beta)| {
            (0..sweep.runs_per_beta).map(move |run_index| (beta_index, beta, run_index))
        })
        .enumerate()
        .map(|(job_id, (beta_index, beta, _))| Job {
            beta_index,
            beta,
            seed: derive_seed(run.seed, job_id as u64),
        })
        .collect();

    info!(
        "Beta sweep: {} betas x {} runs = {} jobs ({})",
        sweep.betas.len(),
        sweep.runs_per_beta,
        jobs.len(),
        if sweep.parallel { "parallel" } else { "serial" }
    );

    let execute = |job: &Job| run_single(&run.at_beta(job.beta), job.seed, &mut NullObserver);
    let summaries: Vec<RunSummary> = if sweep.parallel {
        jobs.par_iter().map(execute).collect::<Result<Vec<_>>>()?
    } else {
        jobs.iter().map(execute).collect::<Result<Vec<_>>>()?
    };

    let mut grouped: Vec<Vec<RunSummary>> = vec![Vec::new(); sweep.betas.len()];
    for (job, summary) in jobs.iter().zip(summaries) {
        grouped[job.beta_index].push(summary);
    }

    Ok(sweep
        .betas
        .iter()
        .zip(grouped)
        .map(|(&beta, runs)| BetaPoint::aggregate(beta, runs, sweep.histogram_bins))
        .collect())
}

/// Write the per-run, averaged and distribution tables of a sweep.
pub fn write_sweep_results(output: &OutputSettings, points: &[BetaPoint]) -> Result<()> {
    ensure_directory(&output.directory)?;

    let runs: Vec<RunRecord> = points
        .iter()
        .flat_map(|point| {
            point.runs.iter().enumerate().map(move |(run, summary)| RunRecord {
                beta: point.beta,
                run,
                seed: summary.seed,
                energy: summary.final_energy,
                magnetization: summary.final_magnetization,
                acceptance_rate: summary.acceptance_rate(),
                stabilized_at: summary.stabilized_at_step,
            })
        })
        .collect();
    write_run_table(&output.directory.join("sweep_all_runs.csv"), &runs)?;

    let averaged: Vec<SweepRecord> = points
        .iter()
        .map(|point| SweepRecord {
            beta: point.beta,
            avg_energy: point.energy.mean,
            std_energy: point.energy.std_dev,
            avg_magnetization: point.magnetization.mean,
            std_magnetization: point.magnetization.std_dev,
            specific_heat: point.specific_heat,
            susceptibility: point.susceptibility,
        })
        .collect();
    write_sweep_table(&output.directory.join("sweep_averaged.csv"), &averaged)?;

    let energy_bins = distribution_records(points, |p| &p.energy_histogram);
    write_distribution_table(&output.directory.join("energy_distribution.csv"), &energy_bins)?;
    let magnetization_bins = distribution_records(points, |p| &p.magnetization_histogram);
    write_distribution_table(
        &output.directory.join("magnetization_distribution.csv"),
        &magnetization_bins,
    )?;

    info!("Sweep tables written to {}", output.directory.display());
    Ok(())
}

fn distribution_records(
    points: &[BetaPoint],
    histogram: impl Fn(&BetaPoint) -> &Vec<HistogramBin>,
) -> Vec<DistributionRecord> {
    points
        .iter()
        .flat_map(|point| {
            histogram(point)
                .iter()
                .enumerate()
                .map(move |(idx, bin)| DistributionRecord {
                    beta: point.beta,
                    bin: idx + 1,
                    start: bin.start,
                    end: bin.end,
                    count: bin.count,
                })
        })
        .collect()
}
