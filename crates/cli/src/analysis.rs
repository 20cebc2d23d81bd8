// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Trend and stability analysis over run history.
//!
//! Both are derived from the history plus the current run on every call and
//! are never persisted.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::config::HistoryConfig;
use crate::history::History;
use crate::summary::RunSummary;

/// Failure rates strictly between these bounds mark a suite as flaky.
const FLAKY_LOW: f64 = 0.1;
const FLAKY_HIGH: f64 = 0.9;

/// Change from the previous run to the current one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct TrendMetrics {
    /// Difference in total test count.
    pub test_count: i64,
    /// Pass-rate difference in percentage points, rounded to two decimals.
    pub pass_rate: f64,
    /// Duration difference in milliseconds; negative means faster.
    pub duration_ms: i64,
    /// Difference in the average of the four coverage percentages.
    pub coverage: f64,
}

/// Compare `current` against the most recent run in `previous`.
pub fn calculate_trends(previous: &[RunSummary], current: &RunSummary) -> TrendMetrics {
    let Some(prev) = previous.last() else {
        return TrendMetrics::default();
    };

    TrendMetrics {
        test_count: current.stats.total as i64 - prev.stats.total as i64,
        pass_rate: round2(current.stats.pass_rate() - prev.stats.pass_rate()),
        duration_ms: current.duration_ms as i64 - prev.duration_ms as i64,
        coverage: coverage_delta(prev, current),
    }
}

/// Zero unless both runs collected coverage.
fn coverage_delta(prev: &RunSummary, current: &RunSummary) -> f64 {
    match (prev.coverage, current.coverage) {
        (Some(p), Some(c)) => c.average_percentage() - p.average_percentage(),
        _ => 0.0,
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Mean of a sampled quantity and a 0..=100 score of how steady it was.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Steadiness {
    pub mean: f64,
    pub stability: f64,
}

/// A suite that both passed and failed within the sampled window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlakySuite {
    pub key: String,
    pub failures: usize,
    pub runs: usize,
    pub failure_rate: f64,
}

/// Variance-based stability over the last few runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StabilityMetrics {
    /// Runs sampled; zero when there were too few to say anything.
    pub sample_size: usize,
    pub pass_rate: Steadiness,
    pub duration: Steadiness,
    pub flaky_suites: Vec<FlakySuite>,
}

impl StabilityMetrics {
    /// True when enough runs were sampled for the figures to mean anything.
    pub fn is_sufficient(&self) -> bool {
        self.sample_size > 0
    }
}

/// Stability over the last `window` of `runs`.
///
/// Fewer than `min_runs` runs yields neutral (all-zero) metrics.
pub fn calculate_stability(runs: &[RunSummary], window: usize, min_runs: usize) -> StabilityMetrics {
    if runs.len() < min_runs.max(1) {
        return StabilityMetrics::default();
    }
    let sample = &runs[runs.len().saturating_sub(window.max(1))..];

    // Runs that executed no tests have no pass rate to sample.
    let pass_rates: Vec<f64> = sample
        .iter()
        .filter(|r| r.stats.total > 0)
        .map(|r| r.stats.pass_rate())
        .collect();
    let (pass_mean, pass_var) = mean_variance(&pass_rates);

    let durations: Vec<f64> = sample.iter().map(|r| r.duration_ms as f64).collect();
    let (dur_mean, dur_var) = mean_variance(&durations);
    let dur_stability = if dur_mean > 0.0 {
        (100.0 - dur_var.sqrt() / dur_mean * 100.0).max(0.0)
    } else {
        100.0
    };

    StabilityMetrics {
        sample_size: sample.len(),
        pass_rate: Steadiness {
            mean: pass_mean,
            stability: (100.0 - pass_var.sqrt()).max(0.0),
        },
        duration: Steadiness {
            mean: dur_mean,
            stability: dur_stability,
        },
        flaky_suites: flaky_suites(sample),
    }
}

/// Population mean and variance.
fn mean_variance(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    (mean, variance)
}

fn flaky_suites(sample: &[RunSummary]) -> Vec<FlakySuite> {
    // key -> (failures, runs)
    let mut tally: BTreeMap<&str, (usize, usize)> = BTreeMap::new();
    for run in sample {
        for suite in &run.suites {
            let entry = tally.entry(suite.key.as_str()).or_default();
            entry.1 += 1;
            if !suite.success {
                entry.0 += 1;
            }
        }
    }

    tally
        .into_iter()
        .filter_map(|(key, (failures, runs))| {
            let failure_rate = failures as f64 / runs as f64;
            (failure_rate > FLAKY_LOW && failure_rate < FLAKY_HIGH).then(|| FlakySuite {
                key: key.to_string(),
                failures,
                runs,
                failure_rate,
            })
        })
        .collect()
}

/// Trends and stability for one run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Analysis {
    pub trends: TrendMetrics,
    pub stability: StabilityMetrics,
}

/// Analyze `current` against the runs recorded before it.
///
/// `history` may or may not already contain `current`; only earlier runs are
/// used as the baseline, and the stability window always ends with `current`.
pub fn analyze(history: &History, current: &RunSummary, config: &HistoryConfig) -> Analysis {
    let previous = history.preceding(current.timestamp);
    let trends = calculate_trends(&previous, current);

    let mut runs = previous;
    runs.push(current.clone());

    Analysis {
        trends,
        stability: calculate_stability(&runs, config.stability_window, config.min_stability_runs),
    }
}

#[cfg(test)]
#[path = "analysis_tests.rs"]
mod tests;
