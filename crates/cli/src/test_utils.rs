// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared unit test utilities.
//!
//! Provides scripted runners and summary builders for unit tests in the cli crate.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use tempfile::TempDir;

use crate::config::SuiteConfig;
use crate::error::{Error, Result};
use crate::runner::{
    ParsedOutput, RawSuiteOutput, RunnerContext, RunnerOutput, Stats, SuiteResult, SuiteRunner,
};
use crate::summary::{RunSummary, SystemInfo};

/// Creates a temp directory with a minimal gauntlet.toml.
pub fn temp_project() -> TempDir {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("gauntlet.toml"), "version = 1\n").unwrap();
    dir
}

/// One scripted runner response.
#[derive(Debug, Clone)]
pub enum Scripted {
    /// Parsed jest-style counts with the given exit code.
    Counts { stats: Stats, exit_code: i32 },
    /// No structured output, only an exit code.
    ExitOnly(i32),
    /// The process cannot be started.
    SpawnFailure,
}

impl Scripted {
    pub fn pass(passed: u64) -> Self {
        Scripted::Counts {
            stats: Stats::new(passed, 0, 0),
            exit_code: 0,
        }
    }

    pub fn fail(passed: u64, failed: u64) -> Self {
        Scripted::Counts {
            stats: Stats::new(passed, failed, 0),
            exit_code: 1,
        }
    }
}

/// Runner that replays queued responses per suite key and records calls.
///
/// When a suite's queue runs dry its last response repeats.
pub struct ScriptedRunner {
    name: &'static str,
    responses: Mutex<HashMap<String, VecDeque<Scripted>>>,
    last: Mutex<HashMap<String, Scripted>>,
    calls: Mutex<Vec<String>>,
    coverage: Option<crate::coverage::RawCoverageMap>,
}

impl ScriptedRunner {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            responses: Mutex::new(HashMap::new()),
            last: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
            coverage: None,
        }
    }

    /// Queue responses for a suite key.
    pub fn script(self, key: &str, responses: Vec<Scripted>) -> Self {
        self.responses
            .lock()
            .unwrap()
            .insert(key.to_string(), responses.into());
        self
    }

    /// Attach a raw coverage map to every parsed response.
    pub fn with_coverage(mut self, map: crate::coverage::RawCoverageMap) -> Self {
        self.coverage = Some(map);
        self
    }

    /// Suite keys in the order they were run (one entry per attempt).
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn next(&self, key: &str) -> Scripted {
        let mut responses = self.responses.lock().unwrap();
        let mut last = self.last.lock().unwrap();
        let next = responses
            .get_mut(key)
            .and_then(|q| q.pop_front())
            .or_else(|| last.get(key).cloned())
            .unwrap_or_else(|| Scripted::pass(1));
        last.insert(key.to_string(), next.clone());
        next
    }
}

impl SuiteRunner for ScriptedRunner {
    fn name(&self) -> &'static str {
        self.name
    }

    fn run(&self, suite: &SuiteConfig, _ctx: &RunnerContext<'_>) -> Result<RunnerOutput> {
        self.calls.lock().unwrap().push(suite.key.clone());
        let (exit_code, raw) = match self.next(&suite.key) {
            Scripted::Counts { stats, exit_code } => (
                exit_code,
                RawSuiteOutput::Parsed(ParsedOutput {
                    success: exit_code == 0,
                    stats,
                    test_suites: None,
                    coverage: self.coverage.clone(),
                    errors: Vec::new(),
                }),
            ),
            Scripted::ExitOnly(code) => (code, RawSuiteOutput::ExitCodeOnly),
            Scripted::SpawnFailure => {
                return Err(Error::Spawn {
                    program: "scripted".to_string(),
                    source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
                });
            }
        };
        Ok(RunnerOutput {
            exit_code: Some(exit_code),
            duration: Duration::from_millis(100),
            timed_out: false,
            timeout_message: None,
            raw,
            stderr: String::new(),
        })
    }
}

/// Fixed timestamp `n` minutes after a base instant.
pub fn at_minute(n: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 15, 12, 0, 0).unwrap() + chrono::Duration::minutes(n)
}

/// A suite result with the given counts.
pub fn suite_result(key: &str, stats: Stats, duration_ms: u64) -> SuiteResult {
    SuiteResult {
        key: key.to_string(),
        name: key.to_string(),
        success: stats.failed == 0,
        exit_code: Some(if stats.failed == 0 { 0 } else { 1 }),
        duration_ms,
        stats,
        test_suites: None,
        coverage: None,
        errors: Vec::new(),
        attempts: 1,
        error: None,
        benchmark: None,
    }
}

/// A run summary with aggregate counts and no suites.
pub fn summary(passed: u64, total: u64, duration_ms: u64) -> RunSummary {
    let stats = Stats::new(passed, total.saturating_sub(passed), 0);
    RunSummary {
        timestamp: at_minute(0),
        duration_ms,
        commit: None,
        system: SystemInfo::default(),
        stats,
        coverage: None,
        suites: Vec::new(),
        violations: Vec::new(),
        success: stats.failed == 0,
    }
}

/// A run summary whose suites pass or fail as listed.
pub fn summary_with_suites(minute: i64, suites: &[(&str, bool)]) -> RunSummary {
    let results: Vec<SuiteResult> = suites
        .iter()
        .map(|(key, ok)| {
            let stats = if *ok {
                Stats::new(1, 0, 0)
            } else {
                Stats::new(0, 1, 0)
            };
            suite_result(key, stats, 100)
        })
        .collect();
    let mut stats = Stats::default();
    for r in &results {
        stats.accumulate(&r.stats);
    }
    RunSummary {
        timestamp: at_minute(minute),
        duration_ms: 100 * results.len() as u64,
        commit: None,
        system: SystemInfo::default(),
        stats,
        coverage: None,
        suites: results,
        violations: Vec::new(),
        success: stats.failed == 0,
    }
}
