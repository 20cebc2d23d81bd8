// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Suite execution with retries.
//!
//! Wraps a [`SuiteRunner`] so that every invocation yields a well-formed
//! [`SuiteResult`]: failing tests, malformed output and even a runner that
//! cannot start all become `success = false` results rather than errors.

use std::time::Duration;

use crate::config::{RetryConfig, SuiteConfig};
use crate::runner::{RunnerContext, SuiteResult, SuiteRunner};
use crate::verbose::VerboseLogger;

/// How often and how patiently a failing suite is retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Additional attempts after the first.
    pub max_retries: u32,
    /// Attempt `n` waits `base_delay * n` before the next try.
    pub base_delay: Duration,
}

impl RetryPolicy {
    /// Policy that runs each suite exactly once.
    pub const NONE: RetryPolicy = RetryPolicy {
        max_retries: 0,
        base_delay: Duration::ZERO,
    };

    /// Build the policy from config, or [`RetryPolicy::NONE`] when retries are off.
    pub fn from_config(config: &RetryConfig, enabled: bool) -> Self {
        if !enabled {
            return Self::NONE;
        }
        Self {
            max_retries: config.max_retries,
            base_delay: config.delay,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_retries + 1
    }

    /// Delay after failed attempt number `attempt` (1-based).
    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.base_delay * attempt
    }
}

/// Runs one suite through its runner, applying the retry policy.
pub struct SuiteExecutor<'a> {
    runner: &'a dyn SuiteRunner,
    policy: RetryPolicy,
    sleep: fn(Duration),
    verbose: &'a VerboseLogger,
}

impl<'a> SuiteExecutor<'a> {
    pub fn new(runner: &'a dyn SuiteRunner, policy: RetryPolicy, verbose: &'a VerboseLogger) -> Self {
        Self {
            runner,
            policy,
            sleep: std::thread::sleep,
            verbose,
        }
    }

    /// Replace the back-off sleep (tests use a no-op).
    pub fn with_sleep(mut self, sleep: fn(Duration)) -> Self {
        self.sleep = sleep;
        self
    }

    /// Run the suite until it passes or the attempt budget is spent.
    ///
    /// The returned result is the last attempt's, with `attempts` set to the
    /// number of attempts made.
    pub fn execute(&self, suite: &SuiteConfig, ctx: &RunnerContext<'_>) -> SuiteResult {
        let max_attempts = self.policy.max_attempts();
        let mut attempt = 1;

        loop {
            let mut result = self.run_once(suite, ctx);
            result.attempts = attempt;

            if result.success || attempt >= max_attempts {
                return result;
            }

            let delay = self.policy.delay_after(attempt);
            tracing::debug!(
                "suite {} failed on attempt {}/{}, retrying in {:?}",
                suite.key,
                attempt,
                max_attempts,
                delay
            );
            self.verbose.log(&format!(
                "{} failed (attempt {}/{}), retrying in {}ms",
                suite.key,
                attempt,
                max_attempts,
                delay.as_millis()
            ));
            (self.sleep)(delay);
            attempt += 1;
        }
    }

    fn run_once(&self, suite: &SuiteConfig, ctx: &RunnerContext<'_>) -> SuiteResult {
        let name = suite.display_name();
        match self.runner.run(suite, ctx) {
            Ok(output) => SuiteResult::from_output(&suite.key, &name, output, ctx.coverage_for(suite)),
            Err(e) => {
                tracing::warn!("suite {} could not start: {}", suite.key, e);
                SuiteResult::start_failed(&suite.key, &name, e.to_string())
            }
        }
    }
}

#[cfg(test)]
#[path = "executor_tests.rs"]
mod tests;
