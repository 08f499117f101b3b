//! CSV result tables.
//!
//! Column names follow the layout the plotting scripts read: PascalCase
//! headers, one row per sample, run, beta or histogram bin.

use color_eyre::eyre::{Result, WrapErr};
use csv::{Writer, WriterBuilder};
use ising::Lattice;
use serde::Serialize;
use std::fs::{self, File};
use std::path::Path;

/// One observable sample of a run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct TrajectoryRecord {
    pub step: u64,
    pub energy: f64,
    pub magnetization: i64,
}

/// Final observables of one run in a sweep.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct RunRecord {
    pub beta: f64,
    pub run: usize,
    pub seed: u64,
    pub energy: f64,
    pub magnetization: i64,
    pub acceptance_rate: f64,
    pub stabilized_at: Option<u64>,
}

/// Aggregated observables at one beta.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SweepRecord {
    pub beta: f64,
    pub avg_energy: f64,
    pub std_energy: f64,
    pub avg_magnetization: f64,
    pub std_magnetization: f64,
    pub specific_heat: f64,
    pub susceptibility: f64,
}

/// One histogram bin at one beta.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DistributionRecord {
    pub beta: f64,
    pub bin: usize,
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

pub fn ensure_directory(path: &Path) -> Result<()> {
    fs::create_dir_all(path)
        .wrap_err_with(|| format!("Unable to create directory: {}", path.display()))
}

/// Streaming writer for `Step,Energy,Magnetization` rows.
pub struct TrajectoryWriter {
    writer: Writer<File>,
}

impl TrajectoryWriter {
    pub fn create(path: &Path) -> Result<Self> {
        let writer = Writer::from_path(path)
            .wrap_err_with(|| format!("Unable to create trajectory file: {}", path.display()))?;
        Ok(Self { writer })
    }

    pub fn write(&mut self, record: &TrajectoryRecord) -> Result<()> {
        self.writer
            .serialize(record)
            .wrap_err("Failed to write trajectory sample")
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush().wrap_err("Failed to flush trajectory file")
    }
}

/// Write the spin grid as a headerless matrix of +1/-1 values.
pub fn write_grid(path: &Path, lattice: &Lattice) -> Result<()> {
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .wrap_err_with(|| format!("Unable to create frame file: {}", path.display()))?;
    for row in lattice.snapshot().row_iter() {
        writer
            .write_record(row.iter().map(|spin| spin.to_string()))
            .wrap_err("Failed to write lattice row")?;
    }
    writer.flush().wrap_err("Failed to flush frame file")?;
    Ok(())
}

pub fn write_run_table(path: &Path, records: &[RunRecord]) -> Result<()> {
    write_records(path, records)
}

pub fn write_sweep_table(path: &Path, records: &[SweepRecord]) -> Result<()> {
    write_records(path, records)
}

pub fn write_distribution_table(path: &Path, records: &[DistributionRecord]) -> Result<()> {
    write_records(path, records)
}

fn write_records<T: Serialize>(path: &Path, records: &[T]) -> Result<()> {
    let mut writer = Writer::from_path(path)
        .wrap_err_with(|| format!("Unable to create table: {}", path.display()))?;
    for record in records {
        writer
            .serialize(record)
            .wrap_err_with(|| format!("Failed to write row to {}", path.display()))?;
    }
    writer
        .flush()
        .wrap_err_with(|| format!("Failed to flush {}", path.display()))?;
    Ok(())
}
