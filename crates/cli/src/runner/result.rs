// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Suite run result types.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::coverage::{self, Coverage, RawCoverageMap};

/// Test counts for a suite or a whole run.
///
/// `total` always equals `passed + failed + skipped`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub passed: u64,
    pub failed: u64,
    pub skipped: u64,
    pub total: u64,
}

impl Stats {
    pub fn new(passed: u64, failed: u64, skipped: u64) -> Self {
        Self {
            passed,
            failed,
            skipped,
            total: passed + failed + skipped,
        }
    }

    /// Add another suite's counts into this one.
    pub fn accumulate(&mut self, other: &Stats) {
        *self = Stats::new(
            self.passed + other.passed,
            self.failed + other.failed,
            self.skipped + other.skipped,
        );
    }

    /// Passed tests as a percentage of the total; 0 for an empty run.
    pub fn pass_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.passed as f64 / self.total as f64 * 100.0
        }
    }
}

/// Test-file level counts reported by the runner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuiteTotals {
    pub passed: u64,
    pub failed: u64,
    pub total: u64,
}

/// An error reported while running a suite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuiteError {
    /// Test file or subsystem the error came from.
    pub source: String,
    pub message: String,
}

/// Throughput and latency scraped from benchmark output.
///
/// A metric the output did not mention stays `None`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkMetrics {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ops_per_sec: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_latency_ms: Option<f64>,
}

/// Structured output parsed from a runner.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedOutput {
    /// Runner-reported overall success.
    pub success: bool,
    pub stats: Stats,
    pub test_suites: Option<SuiteTotals>,
    pub coverage: Option<RawCoverageMap>,
    pub errors: Vec<SuiteError>,
}

/// What a runner invocation produced, validated at the process boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum RawSuiteOutput {
    /// Machine-readable results were found and parsed.
    Parsed(ParsedOutput),
    /// Output was missing or malformed; only the exit code is meaningful.
    ExitCodeOnly,
    /// Free-text benchmark output.
    Benchmark(BenchmarkMetrics),
}

/// One finished runner process.
#[derive(Debug, Clone)]
pub struct RunnerOutput {
    /// Exit code, `None` if killed by a signal or timeout.
    pub exit_code: Option<i32>,
    pub duration: Duration,
    pub timed_out: bool,
    /// Timeout message with runner-specific advice, when `timed_out`.
    pub timeout_message: Option<String>,
    pub raw: RawSuiteOutput,
    pub stderr: String,
}

impl RunnerOutput {
    fn exited_cleanly(&self) -> bool {
        !self.timed_out && self.exit_code == Some(0)
    }
}

/// Normalized result of running one suite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuiteResult {
    pub key: String,
    pub name: String,
    pub success: bool,
    pub exit_code: Option<i32>,
    pub duration_ms: u64,
    pub stats: Stats,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_suites: Option<SuiteTotals>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coverage: Option<Coverage>,
    #[serde(default)]
    pub errors: Vec<SuiteError>,
    pub attempts: u32,
    /// Failure to start or finish the suite process.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub benchmark: Option<BenchmarkMetrics>,
}

/// Lines of stderr kept when a failing suite reported no errors of its own.
const STDERR_TAIL_LINES: usize = 5;

impl SuiteResult {
    /// Normalize a runner's output into a suite result.
    ///
    /// Coverage is only kept when `collect_coverage` is set.
    pub fn from_output(
        key: &str,
        name: &str,
        output: RunnerOutput,
        collect_coverage: bool,
    ) -> Self {
        let clean_exit = output.exited_cleanly();
        let fallback_stats = if clean_exit {
            Stats::new(1, 0, 0)
        } else {
            Stats::new(0, 1, 0)
        };

        let mut result = SuiteResult {
            key: key.to_string(),
            name: name.to_string(),
            success: clean_exit,
            exit_code: output.exit_code,
            duration_ms: output.duration.as_millis() as u64,
            stats: fallback_stats,
            test_suites: None,
            coverage: None,
            errors: Vec::new(),
            attempts: 1,
            error: output.timeout_message.clone(),
            benchmark: None,
        };

        match output.raw {
            RawSuiteOutput::Parsed(parsed) => {
                result.success = clean_exit && parsed.success && parsed.stats.failed == 0;
                result.stats = parsed.stats;
                if output.timed_out && parsed.stats.failed == 0 {
                    // A killed run never passes, even if partial output looked clean.
                    result.stats = Stats::new(parsed.stats.passed, 1, parsed.stats.skipped);
                }
                result.test_suites = parsed.test_suites;
                if collect_coverage {
                    result.coverage = parsed.coverage.as_ref().map(coverage::aggregate);
                }
                result.errors = parsed.errors;
            }
            RawSuiteOutput::ExitCodeOnly => {
                tracing::debug!(
                    "suite {}: no structured output, using exit code {:?}",
                    key,
                    output.exit_code
                );
            }
            RawSuiteOutput::Benchmark(metrics) => {
                result.benchmark = Some(metrics);
            }
        }

        if !result.success && result.errors.is_empty() && result.error.is_none() {
            let tail = stderr_tail(&output.stderr);
            if !tail.is_empty() {
                result.errors.push(SuiteError {
                    source: "stderr".to_string(),
                    message: tail,
                });
            }
        }

        result
    }

    /// A suite whose process could not be started at all.
    pub fn start_failed(key: &str, name: &str, error: impl Into<String>) -> Self {
        SuiteResult {
            key: key.to_string(),
            name: name.to_string(),
            success: false,
            exit_code: None,
            duration_ms: 0,
            stats: Stats::new(0, 1, 0),
            test_suites: None,
            coverage: None,
            errors: Vec::new(),
            attempts: 1,
            error: Some(error.into()),
            benchmark: None,
        }
    }

    /// Every error message attached to this result, process error first.
    pub fn error_messages(&self) -> Vec<String> {
        self.error
            .iter()
            .cloned()
            .chain(
                self.errors
                    .iter()
                    .map(|e| format!("{}: {}", e.source, e.message)),
            )
            .collect()
    }
}

fn stderr_tail(stderr: &str) -> String {
    let lines: Vec<&str> = stderr
        .lines()
        .map(str::trim_end)
        .filter(|l| !l.is_empty())
        .collect();
    let start = lines.len().saturating_sub(STDERR_TAIL_LINES);
    lines[start..].join("\n")
}

#[cfg(test)]
#[path = "result_tests.rs"]
mod tests;
