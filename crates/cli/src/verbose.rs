// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Verbose run diagnostics.
//!
//! Writes `[verbose]` prefixed lines to stderr when `gauntlet run --verbose`
//! is given. Suite stderr forwarding is handled by the runners themselves.

use crate::config::{SuiteConfig, format_duration};
use crate::runner::RunnerContext;

/// Verbose output logger. Writes to stderr with a `[verbose]` prefix.
pub struct VerboseLogger {
    enabled: bool,
}

impl VerboseLogger {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Print a verbose line to stderr.
    pub fn log(&self, msg: &str) {
        if self.enabled {
            eprintln!("[verbose] {}", msg);
        }
    }

    /// Print a verbose section header.
    pub fn section(&self, title: &str) {
        if self.enabled {
            eprintln!("[verbose] === {} ===", title);
        }
    }

    /// Describe how a suite is about to be invoked.
    pub fn suite_plan(&self, suite: &SuiteConfig, ctx: &RunnerContext<'_>) {
        if self.enabled {
            self.log(&describe_suite(suite, ctx));
        }
    }
}

/// One-line description of a suite invocation.
pub fn describe_suite(suite: &SuiteConfig, ctx: &RunnerContext<'_>) -> String {
    format!(
        "{}: runner={} pattern={} timeout={} workers={} coverage={}",
        suite.key,
        suite.runner,
        suite.pattern.as_deref().unwrap_or("*"),
        format_duration(suite.timeout),
        if ctx.parallel_for(suite) {
            "parallel"
        } else {
            "in-band"
        },
        if ctx.coverage_for(suite) { "on" } else { "off" },
    )
}

#[cfg(test)]
#[path = "verbose_tests.rs"]
mod tests;
