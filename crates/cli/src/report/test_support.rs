// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test utilities for report formatter tests.

// Test helpers that use unwrap for clarity (tests should panic on unexpected failures).
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use crate::config::Config;
use crate::coverage::{Coverage, Metric, MetricCoverage};
use crate::history::History;
use crate::runner::{Stats, SuiteError};
use crate::summary::{RunReport, RunSummary};
use crate::test_utils::{at_minute, suite_result, summary_with_suites};
use crate::thresholds::ThresholdViolation;

use super::{ReportData, ReportFormatter, ReportSections};

/// Assert that buffered and streamed output match for a formatter.
pub fn assert_buffered_matches_streamed<F: ReportFormatter>(formatter: &F, data: &ReportData) {
    let buffered = formatter.format(data).unwrap();
    let mut streamed = Vec::new();
    formatter.format_to(&mut streamed, data).unwrap();
    let streamed_str = String::from_utf8(streamed).unwrap();
    assert_eq!(
        buffered, streamed_str,
        "Buffered and streamed output should match"
    );
}

pub fn sample_coverage() -> Coverage {
    Coverage {
        statements: MetricCoverage::new(85, 100),
        branches: MetricCoverage::new(70, 100),
        functions: MetricCoverage::new(17, 20),
        lines: MetricCoverage::new(180, 200),
    }
}

/// A failing run: unit and integration pass, e2e fails, branches under threshold.
pub fn sample_run() -> RunSummary {
    let mut unit = suite_result("unit", Stats::new(40, 0, 2), 1200);
    unit.name = "Unit Tests".to_string();
    unit.coverage = Some(sample_coverage());
    let mut integration = suite_result("integration", Stats::new(12, 0, 0), 4500);
    integration.name = "Integration Tests".to_string();
    let mut e2e = suite_result("e2e", Stats::new(3, 1, 0), 65_000);
    e2e.name = "E2E <Browser> Tests".to_string();
    e2e.attempts = 3;
    e2e.errors.push(SuiteError {
        source: "checkout.test.js".to_string(),
        message: "expected <button> to be visible".to_string(),
    });

    let mut stats = Stats::default();
    for s in [&unit, &integration, &e2e] {
        stats.accumulate(&s.stats);
    }

    RunSummary {
        timestamp: at_minute(60),
        duration_ms: 70_700,
        commit: Some("abc1234".to_string()),
        system: Default::default(),
        stats,
        coverage: Some(sample_coverage()),
        suites: vec![unit, integration, e2e],
        violations: vec![ThresholdViolation {
            metric: Metric::Branches,
            current: 70.0,
            threshold: 75.0,
        }],
        success: false,
    }
}

/// Ten earlier runs in which e2e failed three times.
pub fn sample_history() -> History {
    History {
        runs: (0..10)
            .map(|m| {
                summary_with_suites(
                    m,
                    &[("unit", true), ("integration", true), ("e2e", m >= 3)],
                )
            })
            .collect(),
    }
}

/// Report data with history, analysis and charts.
pub fn sample_data() -> ReportData {
    ReportData::new(
        RunReport::new(sample_run()),
        &sample_history(),
        &Config::default(),
        ReportSections::default(),
    )
}

/// Report data for a first run with no history at all.
pub fn first_run_data() -> ReportData {
    ReportData::new(
        RunReport::new(sample_run()),
        &History::default(),
        &Config::default(),
        ReportSections::default(),
    )
}

/// Report data with history and charts turned off.
pub fn bare_data() -> ReportData {
    ReportData::new(
        RunReport::new(sample_run()),
        &sample_history(),
        &Config::default(),
        ReportSections {
            history: false,
            charts: false,
        },
    )
}
