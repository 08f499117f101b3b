use crate::app::runner::RunSummary;
use crate::app::sweep::BetaPoint;
use ising::analysis;
use tracing::{info, warn};

pub fn report_run_summary(summary: &RunSummary) {
    info!("\nSimulation finished.");
    info!("  Beta:              {:.4}", summary.beta);
    info!("  Seed:              {}", summary.seed);
    info!("  Steps performed:   {}", summary.steps_performed);
    info!("  Acceptance rate:   {:.4}", summary.acceptance_rate());
    info!("  Samples taken:     {}", summary.samples);
    info!(
        "  Final energy:      {:.4} ({:.6} per site)",
        summary.final_energy,
        summary.final_energy / summary.sites as f64
    );
    info!(
        "  Final magnetization: {} ({:.6} per site)",
        summary.final_magnetization,
        summary.final_magnetization as f64 / summary.sites as f64
    );
    match summary.stabilized_at_step {
        Some(step) => info!("  Stabilized at step {}", step),
        None => warn!("  System did not stabilize within {} steps", summary.steps_performed),
    }
}

pub fn report_sweep_summary(points: &[BetaPoint]) {
    info!("\nBeta sweep finished (critical beta of the infinite 2D lattice: {:.4})", analysis::critical_beta_2d());
    info!(
        "  {:>8} {:>14} {:>12} {:>14} {:>12} {:>10}",
        "Beta", "AvgEnergy", "StdEnergy", "AvgMagnet.", "StdMagnet.", "Stable"
    );
    for point in points {
        let stable = point
            .runs
            .iter()
            .filter(|r| r.stabilized_at_step.is_some())
            .count();
        info!(
            "  {:>8.4} {:>14.4} {:>12.4} {:>14.4} {:>12.4} {:>6}/{:<3}",
            point.beta,
            point.energy.mean,
            point.energy.std_dev,
            point.magnetization.mean,
            point.magnetization.std_dev,
            stable,
            point.runs.len()
        );
    }
}
