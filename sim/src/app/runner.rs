use crate::config::{InitialState, OutputSettings, RunSettings};
use crate::io::{ensure_directory, write_grid, TrajectoryRecord, TrajectoryWriter};
use color_eyre::eyre::Result;
use ising::rng::{self, SimRng};
use ising::{EquilibrationMonitor, Lattice, Metropolis, SPIN_DOWN, SPIN_UP};
use std::path::PathBuf;
use tracing::{debug, info};

/// Receives what a run produces while it is in progress.
pub trait RunObserver {
    fn on_sample(&mut self, sample: &TrajectoryRecord) -> Result<()>;

    /// `index` 0 is the initial configuration.
    fn on_frame(&mut self, index: usize, step: u64, lattice: &Lattice) -> Result<()>;

    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Observer that discards everything, used for sweep jobs.
pub struct NullObserver;

impl RunObserver for NullObserver {
    fn on_sample(&mut self, _sample: &TrajectoryRecord) -> Result<()> {
        Ok(())
    }

    fn on_frame(&mut self, _index: usize, _step: u64, _lattice: &Lattice) -> Result<()> {
        Ok(())
    }
}

/// Writes the trajectory table and lattice frames of a run.
pub struct CsvObserver {
    trajectory: Option<TrajectoryWriter>,
    frames_dir: Option<PathBuf>,
}

impl CsvObserver {
    pub fn create(output: &OutputSettings, beta: f64) -> Result<Self> {
        ensure_directory(&output.directory)?;

        let trajectory = if output.write_trajectory {
            let path = output
                .directory
                .join(format!("trajectory_beta_{:.3}.csv", beta));
            info!("Writing trajectory to {}", path.display());
            Some(TrajectoryWriter::create(&path)?)
        } else {
            None
        };

        let frames_dir = if output.write_frames {
            let dir = output.directory.join(format!("frames_beta_{:.3}", beta));
            ensure_directory(&dir)?;
            Some(dir)
        } else {
            None
        };

        Ok(Self {
            trajectory,
            frames_dir,
        })
    }
}

impl RunObserver for CsvObserver {
    fn on_sample(&mut self, sample: &TrajectoryRecord) -> Result<()> {
        match self.trajectory.as_mut() {
            Some(writer) => writer.write(sample),
            None => Ok(()),
        }
    }

    fn on_frame(&mut self, index: usize, step: u64, lattice: &Lattice) -> Result<()> {
        if let Some(dir) = &self.frames_dir {
            let path = dir.join(format!("frame_{}.csv", index));
            debug!("Writing frame {} (step {}) to {}", index, step, path.display());
            write_grid(&path, lattice)?;
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        match self.trajectory.as_mut() {
            Some(writer) => writer.flush(),
            None => Ok(()),
        }
    }
}

/// What a finished run reports back to the driver.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub beta: f64,
    pub seed: u64,
    pub sites: usize,
    pub steps_performed: u64,
    pub accepted: u64,
    pub samples: usize,
    pub final_energy: f64,
    pub final_magnetization: i64,
    pub stabilized_at_step: Option<u64>,
}

impl RunSummary {
    pub fn acceptance_rate(&self) -> f64 {
        if self.steps_performed == 0 {
            0.0
        } else {
            self.accepted as f64 / self.steps_performed as f64
        }
    }
}

pub fn build_lattice(settings: &RunSettings, rng: &mut SimRng) -> Result<Lattice> {
    let lattice = match settings.initial_state {
        InitialState::Random => Lattice::new(settings.rows, settings.cols, settings.coupling, rng)?,
        InitialState::Up => Lattice::ordered(settings.rows, settings.cols, settings.coupling, SPIN_UP)?,
        InitialState::Down => {
            Lattice::ordered(settings.rows, settings.cols, settings.coupling, SPIN_DOWN)?
        }
    };
    Ok(lattice)
}

/// Run `settings.steps` Metropolis steps from a fresh lattice.
///
/// Every `sample_interval` steps the energy and magnetization are handed to
/// the observer and the equilibration monitor. Frames are taken at the start
/// and at `frames` evenly spaced steps.
pub fn run_single(
    settings: &RunSettings,
    seed: u64,
    observer: &mut impl RunObserver,
) -> Result<RunSummary> {
    let mut rng = rng::seeded(seed);
    let mut lattice = build_lattice(settings, &mut rng)?;
    let updater = Metropolis::new(settings.beta);
    let mut monitor = EquilibrationMonitor::new(settings.equilibration)?;

    debug!(
        rows = settings.rows,
        cols = settings.cols,
        beta = settings.beta,
        seed,
        "starting run"
    );

    let frame_interval = frame_interval(settings.steps, settings.frames);
    let mut frame_index = 0;
    if frame_interval.is_some() {
        observer.on_frame(frame_index, 0, &lattice)?;
        frame_index += 1;
    }

    let mut accepted = 0u64;
    let mut steps_performed = 0u64;
    let mut stabilized_at_step = None;

    for step in 1..=settings.steps {
        if updater.attempt(&mut lattice, &mut rng).accepted {
            accepted += 1;
        }
        steps_performed = step;

        if step % settings.sample_interval == 0 {
            let sample = TrajectoryRecord {
                step,
                energy: lattice.total_energy(),
                magnetization: lattice.magnetization(),
            };
            observer.on_sample(&sample)?;
            if monitor.observe(sample.energy, sample.magnetization) && stabilized_at_step.is_none()
            {
                stabilized_at_step = Some(step);
                info!(
                    "Beta {:.4}: system stabilized at step {} (E = {:.3}, M = {})",
                    settings.beta, step, sample.energy, sample.magnetization
                );
            }
        }

        if let Some(interval) = frame_interval {
            if step % interval == 0 && frame_index <= settings.frames {
                observer.on_frame(frame_index, step, &lattice)?;
                frame_index += 1;
            }
        }

        if settings.stop_when_stabilized && stabilized_at_step.is_some() {
            info!("Stopping early after {} steps", step);
            break;
        }
    }

    observer.finish()?;

    Ok(RunSummary {
        beta: settings.beta,
        seed,
        sites: lattice.site_count(),
        steps_performed,
        accepted,
        samples: monitor.len(),
        final_energy: lattice.total_energy(),
        final_magnetization: lattice.magnetization(),
        stabilized_at_step,
    })
}

fn frame_interval(steps: u64, frames: usize) -> Option<u64> {
    if frames == 0 || steps == 0 {
        return None;
    }
    Some((steps / frames as u64).max(1))
}
