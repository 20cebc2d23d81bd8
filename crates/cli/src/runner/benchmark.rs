// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Benchmark runner.
//!
//! Runs a benchmark driver script and scrapes `<n> ops/sec` and
//! `<n> ms avg` figures from its free-text output.

use std::sync::LazyLock;

use regex::Regex;

use super::{
    BenchmarkMetrics, RawSuiteOutput, RunnerContext, RunnerOutput, SuiteRunner, run_process,
    run_setup_command, runner_output, setup_failed, suite_command,
};
use crate::config::SuiteConfig;
use crate::error::Result;

const DEFAULT_COMMAND: &[&str] = &["node", "scripts/benchmark.js"];

#[allow(clippy::expect_used)]
static OPS_PER_SEC_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d[\d,]*(?:\.\d+)?)\s*ops/sec").expect("valid regex")
});

#[allow(clippy::expect_used)]
static AVG_MS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d[\d,]*(?:\.\d+)?)\s*ms avg").expect("valid regex"));

/// Runner for suites whose driver prints throughput and latency figures.
pub struct BenchmarkRunner;

impl SuiteRunner for BenchmarkRunner {
    fn name(&self) -> &'static str {
        "benchmark"
    }

    fn run(&self, suite: &SuiteConfig, ctx: &RunnerContext<'_>) -> Result<RunnerOutput> {
        if let Some(setup) = &suite.setup
            && let Err(e) = run_setup_command(setup, ctx.root)
        {
            return Ok(setup_failed(e));
        }

        let cmd = suite_command(suite, DEFAULT_COMMAND);
        let process = run_process(self.name(), cmd, suite, ctx)?;
        let metrics = parse_benchmark_output(&process.stdout);
        Ok(runner_output(
            self.name(),
            suite,
            &process,
            RawSuiteOutput::Benchmark(metrics),
        ))
    }
}

/// Extract the first throughput and latency figures from benchmark output.
pub fn parse_benchmark_output(stdout: &str) -> BenchmarkMetrics {
    BenchmarkMetrics {
        ops_per_sec: first_number(&OPS_PER_SEC_RE, stdout),
        avg_latency_ms: first_number(&AVG_MS_RE, stdout),
    }
}

fn first_number(re: &Regex, text: &str) -> Option<f64> {
    re.captures(text)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().replace(',', "").parse().ok())
}

#[cfg(test)]
#[path = "benchmark_tests.rs"]
mod tests;
