// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Run summaries and per-run report files.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::coverage::Coverage;
use crate::error::{Error, Result};
use crate::runner::{Stats, SuiteResult};
use crate::thresholds::ThresholdViolation;

/// Prefix of per-run report file names.
pub const REPORT_PREFIX: &str = "test-report-";

/// Environment variables recorded in the system snapshot.
const ENV_FLAGS: &[&str] = &["CI", "NODE_ENV"];

/// Everything recorded about one orchestrator run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub timestamp: DateTime<Utc>,
    pub duration_ms: u64,
    /// Short git commit hash, when run inside a repository.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit: Option<String>,
    pub system: SystemInfo,
    pub stats: Stats,
    /// Sum of per-suite coverage; absent when coverage was not collected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coverage: Option<Coverage>,
    /// Suite results in execution order.
    pub suites: Vec<SuiteResult>,
    #[serde(default)]
    pub violations: Vec<ThresholdViolation>,
    pub success: bool,
}

impl RunSummary {
    /// Look up a suite result by key.
    pub fn suite(&self, key: &str) -> Option<&SuiteResult> {
        self.suites.iter().find(|s| s.key == key)
    }

    /// Suites that did not pass.
    pub fn failed_suites(&self) -> impl Iterator<Item = &SuiteResult> {
        self.suites.iter().filter(|s| !s.success)
    }

    /// Filesystem-safe timestamp, e.g. `2026-01-15T12-00-00-000Z`.
    pub fn file_stamp(&self) -> String {
        self.timestamp
            .to_rfc3339_opts(SecondsFormat::Millis, true)
            .replace([':', '.'], "-")
    }

    /// Fastest/slowest suite and time totals.
    pub fn performance(&self) -> PerformanceRollup {
        PerformanceRollup::from_suites(&self.suites)
    }

    /// Capture the current commit hash from git, if available.
    pub fn with_commit(mut self, root: &Path) -> Self {
        if let Ok(output) = std::process::Command::new("git")
            .args(["rev-parse", "--short", "HEAD"])
            .current_dir(root)
            .output()
            && output.status.success()
        {
            self.commit = Some(String::from_utf8_lossy(&output.stdout).trim().to_string());
        }
        self
    }
}

/// Snapshot of the machine a run executed on.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SystemInfo {
    pub platform: String,
    pub arch: String,
    /// `node --version`, when node is installed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_version: Option<String>,
    pub cpus: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_memory_bytes: Option<u64>,
    /// Recorded environment flags that were set.
    #[serde(default)]
    pub env: BTreeMap<String, String>,
}

impl SystemInfo {
    pub fn capture() -> Self {
        let node_version = std::process::Command::new("node")
            .arg("--version")
            .output()
            .ok()
            .filter(|o| o.status.success())
            .map(|o| String::from_utf8_lossy(&o.stdout).trim().to_string());

        let env = ENV_FLAGS
            .iter()
            .filter_map(|k| std::env::var(k).ok().map(|v| (k.to_string(), v)))
            .collect();

        Self {
            platform: std::env::consts::OS.to_string(),
            arch: std::env::consts::ARCH.to_string(),
            node_version,
            cpus: std::thread::available_parallelism().map_or(1, |n| n.get()),
            total_memory_bytes: total_memory(),
            env,
        }
    }
}

/// Total physical memory from `/proc/meminfo`.
fn total_memory() -> Option<u64> {
    let meminfo = std::fs::read_to_string("/proc/meminfo").ok()?;
    parse_mem_total(&meminfo)
}

fn parse_mem_total(meminfo: &str) -> Option<u64> {
    let line = meminfo.lines().find(|l| l.starts_with("MemTotal:"))?;
    let kb: u64 = line.split_whitespace().nth(1)?.parse().ok()?;
    Some(kb * 1024)
}

/// Duration of a single suite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuiteTiming {
    pub key: String,
    pub duration_ms: u64,
}

/// Timing rollup across the suites of a run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PerformanceRollup {
    pub fastest: Option<SuiteTiming>,
    pub slowest: Option<SuiteTiming>,
    pub total_ms: u64,
    pub average_ms: f64,
}

impl PerformanceRollup {
    pub fn from_suites(suites: &[SuiteResult]) -> Self {
        let timing = |s: &SuiteResult| SuiteTiming {
            key: s.key.clone(),
            duration_ms: s.duration_ms,
        };
        let total_ms: u64 = suites.iter().map(|s| s.duration_ms).sum();
        Self {
            fastest: suites.iter().min_by_key(|s| s.duration_ms).map(timing),
            slowest: suites.iter().max_by_key(|s| s.duration_ms).map(timing),
            total_ms,
            average_ms: if suites.is_empty() {
                0.0
            } else {
                total_ms as f64 / suites.len() as f64
            },
        }
    }
}

/// Contents of a per-run report file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    #[serde(flatten)]
    pub summary: RunSummary,
    pub performance: PerformanceRollup,
}

impl RunReport {
    pub fn new(summary: RunSummary) -> Self {
        let performance = summary.performance();
        Self {
            summary,
            performance,
        }
    }
}

/// Write a run report into `dir`, returning the file path.
pub fn save_run_report(dir: &Path, summary: &RunSummary) -> Result<PathBuf> {
    std::fs::create_dir_all(dir).map_err(|e| Error::Io {
        path: dir.to_path_buf(),
        source: e,
    })?;

    let path = dir.join(format!("{}{}.json", REPORT_PREFIX, summary.file_stamp()));
    let content = serde_json::to_string_pretty(&RunReport::new(summary.clone()))
        .map_err(|e| Error::Internal(format!("failed to serialize run report: {e}")))?;
    std::fs::write(&path, content).map_err(|e| Error::Io {
        path: path.clone(),
        source: e,
    })?;
    Ok(path)
}

/// Load a run report file.
pub fn load_run_report(path: &Path) -> Result<RunReport> {
    let content = std::fs::read_to_string(path).map_err(|e| Error::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    serde_json::from_str(&content).map_err(|e| Error::Config {
        message: format!("invalid run report: {e}"),
        path: Some(path.to_path_buf()),
    })
}

/// Most recent run report in `dir`.
///
/// Report names embed an ISO-8601 timestamp, so the greatest name is the newest.
pub fn latest_report(dir: &Path) -> Result<PathBuf> {
    let no_reports = || Error::NoReports {
        dir: dir.to_path_buf(),
    };
    let entries = std::fs::read_dir(dir).map_err(|_| no_reports())?;

    entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with(REPORT_PREFIX) && n.ends_with(".json"))
        })
        .max()
        .ok_or_else(no_reports)
}

#[cfg(test)]
#[path = "summary_tests.rs"]
mod tests;
