//! End-to-end tests of the simulation driver
//!
//! These run small configurations through `SimApplication` and check the CSV
//! tables it leaves behind.

use ising_sim::app::SimApplication;
use ising_sim::config::{Args, Config};
use std::fs;
use std::path::PathBuf;

/// Helper function to get the path to example files
fn example_path(filename: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("example")
        .join(filename)
}

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("ising_sim_{}_{}", name, std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    dir
}

fn read_rows(path: &PathBuf) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("missing {}: {}", path.display(), e))
        .lines()
        .map(str::to_string)
        .collect()
}

#[test]
fn example_configs_parse() {
    for name in ["single_run.yaml", "beta_sweep.yaml", "chain.yaml"] {
        let content = fs::read_to_string(example_path(name)).unwrap();
        let config = serde_yml::from_str::<Config>(&content).unwrap().with_defaults();
        let settings = config.resolve(&Args::default()).unwrap();
        assert!(settings.run.rows >= 1, "{name}");
    }
}

#[test]
fn single_run_writes_trajectory_and_frames() {
    let dir = scratch_dir("single");
    let args = Args {
        rows: Some(8),
        cols: Some(8),
        beta: Some(0.5),
        steps: Some(2_000),
        sample_interval: Some(200),
        frames: Some(2),
        seed: Some(11),
        output_dir: Some(dir.to_string_lossy().into_owned()),
        ..Args::default()
    };
    SimApplication::new(args).unwrap().execute().unwrap();

    let trajectory = read_rows(&dir.join("trajectory_beta_0.500.csv"));
    assert_eq!(trajectory[0], "Step,Energy,Magnetization");
    assert_eq!(trajectory.len(), 1 + 10);
    assert!(trajectory[1].starts_with("200,"));

    let frames = dir.join("frames_beta_0.500");
    for index in 0..=2 {
        let grid = read_rows(&frames.join(format!("frame_{index}.csv")));
        assert_eq!(grid.len(), 8);
        for row in grid {
            let cells: Vec<&str> = row.split(',').collect();
            assert_eq!(cells.len(), 8);
            assert!(cells.iter().all(|c| *c == "1" || *c == "-1"));
        }
    }

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn single_run_is_reproducible() {
    let run = |name: &str| {
        let dir = scratch_dir(name);
        let args = Args {
            rows: Some(1),
            cols: Some(16),
            beta: Some(1.0),
            steps: Some(1_000),
            sample_interval: Some(50),
            frames: Some(0),
            seed: Some(5),
            output_dir: Some(dir.to_string_lossy().into_owned()),
            ..Args::default()
        };
        SimApplication::new(args).unwrap().execute().unwrap();
        let rows = read_rows(&dir.join("trajectory_beta_1.000.csv"));
        let _ = fs::remove_dir_all(&dir);
        rows
    };
    assert_eq!(run("repro_a"), run("repro_b"));
}

#[test]
fn sweep_writes_tables() {
    let dir = scratch_dir("sweep");
    let args = Args {
        rows: Some(4),
        cols: Some(4),
        steps: Some(800),
        sample_interval: Some(80),
        betas: Some(vec![0.2, 0.9]),
        runs_per_beta: Some(3),
        output_dir: Some(dir.to_string_lossy().into_owned()),
        ..Args::default()
    };
    let app = SimApplication::new(args).unwrap();
    assert!(app.settings().sweep.is_some());
    app.execute().unwrap();

    let runs = read_rows(&dir.join("sweep_all_runs.csv"));
    assert_eq!(
        runs[0],
        "Beta,Run,Seed,Energy,Magnetization,AcceptanceRate,StabilizedAt"
    );
    assert_eq!(runs.len(), 1 + 6);

    let averaged = read_rows(&dir.join("sweep_averaged.csv"));
    assert_eq!(
        averaged[0],
        "Beta,AvgEnergy,StdEnergy,AvgMagnetization,StdMagnetization,SpecificHeat,Susceptibility"
    );
    assert_eq!(averaged.len(), 1 + 2);
    assert!(averaged[1].starts_with("0.2,"));
    assert!(averaged[2].starts_with("0.9,"));

    let energy = read_rows(&dir.join("energy_distribution.csv"));
    assert_eq!(energy[0], "Beta,Bin,Start,End,Count");
    assert_eq!(energy.len(), 1 + 2 * 30);
    let counted: usize = energy[1..]
        .iter()
        .map(|row| row.rsplit(',').next().unwrap().parse::<usize>().unwrap())
        .sum();
    assert_eq!(counted, 6);

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn serial_and_parallel_sweeps_agree() {
    let sweep = |name: &str, serial: bool| {
        let dir = scratch_dir(name);
        let args = Args {
            rows: Some(5),
            cols: Some(5),
            steps: Some(500),
            sample_interval: Some(50),
            betas: Some(vec![0.3, 0.6]),
            runs_per_beta: Some(4),
            serial,
            output_dir: Some(dir.to_string_lossy().into_owned()),
            ..Args::default()
        };
        SimApplication::new(args).unwrap().execute().unwrap();
        let rows = read_rows(&dir.join("sweep_all_runs.csv"));
        let _ = fs::remove_dir_all(&dir);
        rows
    };
    assert_eq!(sweep("serial", true), sweep("parallel", false));
}

#[test]
fn output_switches_suppress_files() {
    let dir = scratch_dir("quiet");
    let args = Args {
        rows: Some(4),
        cols: Some(4),
        steps: Some(200),
        sample_interval: Some(20),
        frames: Some(2),
        no_trajectory: true,
        no_frames: true,
        output_dir: Some(dir.to_string_lossy().into_owned()),
        ..Args::default()
    };
    SimApplication::new(args).unwrap().execute().unwrap();

    assert!(dir.is_dir());
    assert!(!dir.join("trajectory_beta_0.440.csv").exists());
    assert!(!dir.join("frames_beta_0.440").exists());

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn missing_config_file_is_an_error() {
    let args = Args {
        config_file: Some("does/not/exist.yaml".to_string()),
        ..Args::default()
    };
    assert!(SimApplication::new(args).is_err());
}
