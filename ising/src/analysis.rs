//! Utility functions for analyzing Ising model results

use serde::Serialize;

/// Critical temperature for 2D Ising model (exact result)
/// T_c = 2J / (k_B * ln(1 + √2)) ≈ 2.269 J/k_B
pub fn critical_temperature_2d() -> f64 {
    2.0 / (1.0 + 2.0_f64.sqrt()).ln()
}

/// Inverse critical temperature, β_c = ln(1 + √2) / 2 ≈ 0.4407
pub fn critical_beta_2d() -> f64 {
    1.0 / critical_temperature_2d()
}

/// Theoretical energy per site at T=0 for 2D (all spins aligned)
pub fn energy_per_site_at_zero_temp_2d() -> f64 {
    // Each spin has 4 aligned neighbors, E = -J * 4 / 2 = -2J per site
    -2.0
}

/// Mean and population standard deviation of a set of samples.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SampleStats {
    pub count: usize,
    pub mean: f64,
    pub std_dev: f64,
}

impl SampleStats {
    pub fn from_samples(samples: &[f64]) -> Self {
        if samples.is_empty() {
            return Self {
                count: 0,
                mean: 0.0,
                std_dev: 0.0,
            };
        }
        let n = samples.len() as f64;
        let mean = samples.iter().sum::<f64>() / n;
        let variance = samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
        Self {
            count: samples.len(),
            mean,
            std_dev: variance.sqrt(),
        }
    }

    pub fn variance(&self) -> f64 {
        self.std_dev * self.std_dev
    }
}

/// Specific heat per site, C = β² (⟨E²⟩ - ⟨E⟩²) / N
pub fn specific_heat(energy_samples: &[f64], beta: f64, sites: usize) -> f64 {
    if energy_samples.len() < 2 || sites == 0 {
        return 0.0;
    }
    let stats = SampleStats::from_samples(energy_samples);
    beta * beta * stats.variance() / sites as f64
}

/// Magnetic susceptibility per site, χ = β (⟨M²⟩ - ⟨M⟩²) / N
pub fn susceptibility(magnetization_samples: &[f64], beta: f64, sites: usize) -> f64 {
    if magnetization_samples.len() < 2 || sites == 0 {
        return 0.0;
    }
    let stats = SampleStats::from_samples(magnetization_samples);
    beta * stats.variance() / sites as f64
}

/// One bin of a histogram, covering `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

/// Equal-width histogram over the sample range.
///
/// The last bin is closed on the right so the maximum sample is counted. A
/// constant sample set is spread over `[x - 0.5, x + 0.5]`.
pub fn histogram(samples: &[f64], bins: usize) -> Vec<HistogramBin> {
    if samples.is_empty() || bins == 0 {
        return Vec::new();
    }

    let (mut lo, mut hi) = samples
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &x| {
            (lo.min(x), hi.max(x))
        });
    if lo == hi {
        lo -= 0.5;
        hi += 0.5;
    }
    let width = (hi - lo) / bins as f64;

    let mut counts = vec![0usize; bins];
    for &x in samples {
        let idx = (((x - lo) / width) as usize).min(bins - 1);
        counts[idx] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            start: lo + i as f64 * width,
            end: lo + (i + 1) as f64 * width,
            count,
        })
        .collect()
}
