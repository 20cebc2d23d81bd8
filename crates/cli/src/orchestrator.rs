// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Run orchestration.
//!
//! Selects and orders suites, runs them one at a time through the
//! [`SuiteExecutor`], accumulates totals, checks coverage thresholds and
//! persists the run.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;

use crate::config::{Config, SuiteConfig};
use crate::coverage::Coverage;
use crate::error::{Error, ExitCode, Result};
use crate::executor::{RetryPolicy, SuiteExecutor};
use crate::history::{History, HistoryStore};
use crate::runner::{RunnerContext, Stats, SuiteResult, SuiteRunner, all_runners, find_runner};
use crate::summary::{RunSummary, SystemInfo, save_run_report};
use crate::thresholds::{ThresholdReport, check_thresholds};
use crate::verbose::VerboseLogger;

/// Options for one orchestrator run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfiguration {
    /// Suite keys to run; empty means every configured suite.
    pub suites: Vec<String>,
    /// Allow intra-suite worker parallelism.
    pub parallel: bool,
    pub coverage: bool,
    pub verbose: bool,
    /// Stop after the first failing suite.
    pub fail_fast: bool,
    pub retry: bool,
    pub save_report: bool,
    pub save_history: bool,
}

impl Default for RunConfiguration {
    fn default() -> Self {
        Self {
            suites: Vec::new(),
            parallel: true,
            coverage: true,
            verbose: false,
            fail_fast: false,
            retry: true,
            save_report: true,
            save_history: true,
        }
    }
}

/// Receives progress events as a run proceeds.
pub trait ProgressSink {
    /// Called once with the suites about to run, in order.
    fn run_started(&mut self, _suites: &[&SuiteConfig]) {}

    fn suite_started(&mut self, _suite: &SuiteConfig) {}

    fn suite_finished(&mut self, _result: &SuiteResult) {}

    /// A non-fatal problem the user should see.
    fn warning(&mut self, _message: &str) {}
}

/// Sink that ignores all events.
pub struct NoProgress;

impl ProgressSink for NoProgress {}

/// Why a run ended the way it did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Passed,
    /// At least one test or suite failed.
    TestsFailed,
    /// Every test passed but coverage fell short.
    ThresholdsFailed,
}

/// Result of a completed run.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub summary: RunSummary,
    pub status: RunStatus,
    pub thresholds: Option<ThresholdReport>,
    /// Where the per-run report was written, if it was.
    pub report_path: Option<PathBuf>,
    /// History after appending this run, if it was saved.
    pub history: Option<History>,
}

impl RunOutcome {
    pub fn exit_code(&self) -> ExitCode {
        match self.status {
            RunStatus::Passed => ExitCode::Success,
            RunStatus::TestsFailed | RunStatus::ThresholdsFailed => ExitCode::Failed,
        }
    }
}

/// Sequential suite driver.
pub struct Orchestrator<'a> {
    config: &'a Config,
    root: &'a Path,
    runners: Vec<Arc<dyn SuiteRunner>>,
    sleep: fn(Duration),
    system: Option<SystemInfo>,
}

impl<'a> Orchestrator<'a> {
    pub fn new(config: &'a Config, root: &'a Path) -> Self {
        Self {
            config,
            root,
            runners: all_runners(),
            sleep: std::thread::sleep,
            system: None,
        }
    }

    /// Replace the runner registry.
    pub fn with_runners(mut self, runners: Vec<Arc<dyn SuiteRunner>>) -> Self {
        self.runners = runners;
        self
    }

    /// Replace the retry back-off sleep.
    pub fn with_sleep(mut self, sleep: fn(Duration)) -> Self {
        self.sleep = sleep;
        self
    }

    /// Use a fixed system snapshot instead of probing the machine.
    pub fn with_system_info(mut self, system: SystemInfo) -> Self {
        self.system = Some(system);
        self
    }

    pub fn output_dir(&self) -> PathBuf {
        self.root.join(&self.config.output_dir)
    }

    pub fn history_store(&self) -> HistoryStore {
        HistoryStore::new(
            self.root.join(&self.config.history_file),
            self.config.history.max_runs,
        )
    }

    /// Execute a run.
    ///
    /// Fails only when no requested suite is known; suite failures are
    /// reported through the outcome.
    pub fn run(&self, run: &RunConfiguration, progress: &mut dyn ProgressSink) -> Result<RunOutcome> {
        let suites = select_suites(self.config, &run.suites, progress)?;
        let verbose = VerboseLogger::new(run.verbose);
        let ctx = RunnerContext {
            root: self.root,
            parallel: run.parallel,
            coverage: run.coverage,
            verbose: run.verbose,
        };
        let policy = RetryPolicy::from_config(&self.config.retry, run.retry);

        verbose.section("Run");
        verbose.log(&format!(
            "suites={} parallel={} coverage={} retries={} fail_fast={}",
            suites
                .iter()
                .map(|s| s.key.as_str())
                .collect::<Vec<_>>()
                .join(","),
            run.parallel,
            run.coverage,
            policy.max_retries,
            run.fail_fast
        ));

        progress.run_started(&suites);
        let timestamp = Utc::now();
        let start = Instant::now();

        let mut stats = Stats::default();
        let mut coverage: Option<Coverage> = None;
        let mut results = Vec::with_capacity(suites.len());

        for suite in suites {
            progress.suite_started(suite);
            verbose.suite_plan(suite, &ctx);

            let result = match find_runner(&self.runners, &suite.runner) {
                Some(runner) => SuiteExecutor::new(runner.as_ref(), policy, &verbose)
                    .with_sleep(self.sleep)
                    .execute(suite, &ctx),
                None => SuiteResult::start_failed(
                    &suite.key,
                    &suite.display_name(),
                    format!("unknown runner: {}", suite.runner),
                ),
            };

            stats.accumulate(&result.stats);
            if let Some(c) = &result.coverage {
                coverage = Some(coverage.map_or(*c, |acc| acc.combine(c)));
            }
            tracing::debug!(
                "suite {} finished: success={} attempts={}",
                result.key,
                result.success,
                result.attempts
            );
            progress.suite_finished(&result);

            let failed = !result.success;
            results.push(result);
            if run.fail_fast && failed {
                verbose.log("fail-fast: skipping remaining suites");
                break;
            }
        }

        let thresholds = match (&coverage, run.coverage) {
            (Some(c), true) => Some(check_thresholds(
                &c.percentages(),
                &self.config.coverage.thresholds,
            )),
            _ => None,
        };

        let tests_passed = stats.failed == 0 && results.iter().all(|r| r.success);
        let thresholds_passed = thresholds.as_ref().is_none_or(|t| t.passed);
        let status = match (tests_passed, thresholds_passed) {
            (true, true) => RunStatus::Passed,
            (false, _) => RunStatus::TestsFailed,
            (true, false) => RunStatus::ThresholdsFailed,
        };

        let summary = RunSummary {
            timestamp,
            duration_ms: start.elapsed().as_millis() as u64,
            commit: None,
            system: self.system.clone().unwrap_or_else(SystemInfo::capture),
            stats,
            coverage,
            suites: results,
            violations: thresholds
                .as_ref()
                .map(|t| t.violations.clone())
                .unwrap_or_default(),
            success: status == RunStatus::Passed,
        }
        .with_commit(self.root);

        let report_path = if run.save_report {
            self.persist("run report", progress, || {
                save_run_report(&self.output_dir(), &summary)
            })
        } else {
            None
        };

        let history = if run.save_history {
            let store = self.history_store();
            self.persist("history", progress, || store.append(summary.clone()))
        } else {
            None
        };

        Ok(RunOutcome {
            summary,
            status,
            thresholds,
            report_path,
            history,
        })
    }

    /// Run a best-effort save, turning failure into a warning.
    fn persist<T, E: std::fmt::Display>(
        &self,
        what: &str,
        progress: &mut dyn ProgressSink,
        save: impl FnOnce() -> std::result::Result<T, E>,
    ) -> Option<T> {
        match save() {
            Ok(value) => Some(value),
            Err(e) => {
                let message = format!("failed to save {what}: {e}");
                tracing::warn!("{}", message);
                progress.warning(&message);
                None
            }
        }
    }
}

/// Resolve requested keys to configured suites in execution order.
///
/// Unknown keys are dropped with a warning. An empty request selects every
/// suite.
pub fn select_suites<'c>(
    config: &'c Config,
    requested: &[String],
    progress: &mut dyn ProgressSink,
) -> Result<Vec<&'c SuiteConfig>> {
    let mut selected: Vec<&SuiteConfig> = if requested.is_empty() {
        config.suites.iter().collect()
    } else {
        let mut selected = Vec::new();
        for key in requested {
            match config.suite(key) {
                Some(suite) if !selected.iter().any(|s: &&SuiteConfig| s.key == *key) => {
                    selected.push(suite)
                }
                Some(_) => {}
                None => {
                    let message = format!("unknown suite: {key}");
                    tracing::warn!("{}", message);
                    progress.warning(&message);
                }
            }
        }
        selected
    };

    if selected.is_empty() {
        return Err(Error::NoSuites {
            requested: requested.to_vec(),
        });
    }

    selected.sort_by_key(|s| s.order);
    Ok(selected)
}

#[cfg(test)]
#[path = "orchestrator_tests.rs"]
mod tests;
