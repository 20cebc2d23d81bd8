// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Chart datasets.

use serde::Serialize;

use crate::coverage::Metric;
use crate::summary::RunSummary;

/// A value per run, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TimeSeries {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

/// One bar per labelled bucket.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BarChart {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChartData {
    pub pass_rate: TimeSeries,
    /// Run duration in seconds.
    pub duration: TimeSeries,
    /// Current coverage percentage per metric.
    pub coverage: BarChart,
    /// Current test count per suite.
    pub suite_tests: BarChart,
}

/// Build chart datasets from the last `window` previous runs plus `current`.
pub fn build_charts(previous: &[RunSummary], current: &RunSummary, window: usize) -> ChartData {
    let start = previous.len().saturating_sub(window);
    let runs: Vec<&RunSummary> = previous[start..].iter().chain([current]).collect();

    let labels: Vec<String> = runs
        .iter()
        .map(|r| r.timestamp.format("%m-%d %H:%M").to_string())
        .collect();

    let pass_rate = TimeSeries {
        labels: labels.clone(),
        values: runs.iter().map(|r| round1(r.stats.pass_rate())).collect(),
    };
    let duration = TimeSeries {
        labels,
        values: runs
            .iter()
            .map(|r| round1(r.duration_ms as f64 / 1000.0))
            .collect(),
    };

    let coverage = BarChart {
        labels: Metric::ALL.iter().map(|m| m.label().to_string()).collect(),
        values: Metric::ALL
            .iter()
            .map(|m| {
                current
                    .coverage
                    .map_or(0.0, |c| round1(c.get(*m).percentage))
            })
            .collect(),
    };

    let suite_tests = BarChart {
        labels: current.suites.iter().map(|s| s.name.clone()).collect(),
        values: current.suites.iter().map(|s| s.stats.total as f64).collect(),
    };

    ChartData {
        pass_rate,
        duration,
        coverage,
        suite_tests,
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
#[path = "charts_tests.rs"]
mod tests;
