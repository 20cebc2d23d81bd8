// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Format-neutral view of report data.
//!
//! HTML and Markdown both render these rows so that numbers are formatted
//! in exactly one place.

use crate::analysis::{StabilityMetrics, TrendMetrics};
use crate::coverage::Metric;
use crate::runner::SuiteResult;
use crate::summary::SystemInfo;

use super::ReportData;

/// How a value should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Good,
    Bad,
    Warn,
    Neutral,
}

impl Tone {
    pub fn class(self) -> &'static str {
        match self {
            Tone::Good => "good",
            Tone::Bad => "bad",
            Tone::Warn => "warn",
            Tone::Neutral => "neutral",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    pub title: &'static str,
    pub value: String,
    pub detail: Option<String>,
    pub tone: Tone,
}

/// Headline cards: status, tests, pass rate, duration and coverage.
pub fn summary_cards(data: &ReportData) -> Vec<Card> {
    let run = &data.run;
    let trends = data.analysis.as_ref().map(|a| &a.trends);

    let mut cards = vec![
        Card {
            title: "Status",
            value: if run.success { "PASSED" } else { "FAILED" }.to_string(),
            detail: None,
            tone: if run.success { Tone::Good } else { Tone::Bad },
        },
        Card {
            title: "Tests",
            value: format!("{}/{}", run.stats.passed, run.stats.total),
            detail: Some(format!(
                "{} failed, {} skipped",
                run.stats.failed, run.stats.skipped
            )),
            tone: if run.stats.failed == 0 {
                Tone::Good
            } else {
                Tone::Bad
            },
        },
        Card {
            title: "Pass Rate",
            value: format_pct(run.stats.pass_rate()),
            detail: trends.map(|t| format_signed(t.pass_rate, "pp")),
            tone: Tone::Neutral,
        },
        Card {
            title: "Duration",
            value: format_ms(run.duration_ms),
            detail: trends.map(|t| format_ms_delta(t.duration_ms)),
            tone: Tone::Neutral,
        },
    ];

    if let Some(coverage) = &run.coverage {
        cards.push(Card {
            title: "Coverage",
            value: format_pct(coverage.average_percentage()),
            detail: trends.map(|t| format_signed(t.coverage, "pp")),
            tone: if run.violations.is_empty() {
                Tone::Good
            } else {
                Tone::Warn
            },
        });
    }
    cards
}

#[derive(Debug, Clone, PartialEq)]
pub struct SuiteRow {
    pub name: String,
    pub passed: bool,
    pub tests: String,
    pub failed: u64,
    pub skipped: u64,
    pub duration: String,
    pub attempts: u32,
    pub coverage: Option<String>,
    pub errors: Vec<String>,
}

impl SuiteRow {
    pub fn status(&self) -> &'static str {
        if self.passed { "PASS" } else { "FAIL" }
    }
}

pub fn suite_rows(suites: &[SuiteResult]) -> Vec<SuiteRow> {
    suites
        .iter()
        .map(|s| SuiteRow {
            name: s.name.clone(),
            passed: s.success,
            tests: format!("{}/{}", s.stats.passed, s.stats.total),
            failed: s.stats.failed,
            skipped: s.stats.skipped,
            duration: format_ms(s.duration_ms),
            attempts: s.attempts,
            coverage: s
                .coverage
                .map(|c| format_pct(c.average_percentage())),
            errors: s.error_messages(),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct CoverageRow {
    pub metric: &'static str,
    pub covered: String,
    pub percentage: String,
    pub threshold: String,
    pub met: bool,
}

/// Coverage vs threshold, one row per metric. Empty without coverage.
pub fn coverage_rows(data: &ReportData) -> Vec<CoverageRow> {
    let Some(coverage) = &data.run.coverage else {
        return Vec::new();
    };
    Metric::ALL
        .iter()
        .map(|metric| {
            let m = coverage.get(*metric);
            let threshold = data.thresholds.get(metric).copied();
            CoverageRow {
                metric: metric.label(),
                covered: format!("{}/{}", m.covered, m.total),
                percentage: format_pct(m.percentage),
                threshold: threshold.map_or_else(|| "-".to_string(), format_pct),
                met: threshold.is_none_or(|t| m.percentage >= t),
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrendRow {
    pub label: &'static str,
    pub value: String,
    pub tone: Tone,
}

pub fn trend_rows(trends: &TrendMetrics) -> Vec<TrendRow> {
    vec![
        TrendRow {
            label: "Test count",
            value: format!("{:+}", trends.test_count),
            tone: Tone::Neutral,
        },
        TrendRow {
            label: "Pass rate",
            value: format_signed(trends.pass_rate, "pp"),
            tone: tone_of(trends.pass_rate),
        },
        TrendRow {
            label: "Duration",
            value: format_ms_delta(trends.duration_ms),
            tone: tone_of(-(trends.duration_ms as f64)),
        },
        TrendRow {
            label: "Coverage",
            value: format_signed(trends.coverage, "pp"),
            tone: tone_of(trends.coverage),
        },
    ]
}

/// Rows describing stability, or `None` when there is too little history.
pub fn stability_rows(stability: &StabilityMetrics) -> Option<Vec<(&'static str, String)>> {
    if !stability.is_sufficient() {
        return None;
    }
    Some(vec![
        ("Runs sampled", stability.sample_size.to_string()),
        ("Mean pass rate", format_pct(stability.pass_rate.mean)),
        ("Pass rate stability", format_pct(stability.pass_rate.stability)),
        ("Mean duration", format_ms(stability.duration.mean.round() as u64)),
        ("Duration stability", format_pct(stability.duration.stability)),
    ])
}

/// One line per flaky suite.
pub fn flaky_lines(stability: &StabilityMetrics) -> Vec<String> {
    stability
        .flaky_suites
        .iter()
        .map(|f| {
            format!(
                "{}: failed {} of {} runs ({})",
                f.key,
                f.failures,
                f.runs,
                format_pct(f.failure_rate * 100.0)
            )
        })
        .collect()
}

pub fn system_rows(system: &SystemInfo) -> Vec<(String, String)> {
    let mut rows = vec![
        (
            "Platform".to_string(),
            format!("{} ({})", system.platform, system.arch),
        ),
        ("CPUs".to_string(), system.cpus.to_string()),
    ];
    if let Some(node) = &system.node_version {
        rows.push(("Node".to_string(), node.clone()));
    }
    if let Some(bytes) = system.total_memory_bytes {
        rows.push(("Memory".to_string(), format_bytes(bytes)));
    }
    rows.extend(system.env.iter().map(|(k, v)| (k.clone(), v.clone())));
    rows
}

/// Message shown in place of an empty history section.
pub fn no_history_message(data: &ReportData) -> Option<String> {
    match &data.analysis {
        None => Some("History disabled for this report.".to_string()),
        Some(_) if data.history_runs == 0 => Some("No previous runs recorded.".to_string()),
        Some(_) => None,
    }
}

pub fn insufficient_stability_message(data: &ReportData) -> String {
    format!(
        "Not enough runs for stability analysis ({} of {} needed).",
        data.history_runs + 1,
        data.min_stability_runs
    )
}

fn tone_of(delta: f64) -> Tone {
    if delta > 0.0 {
        Tone::Good
    } else if delta < 0.0 {
        Tone::Bad
    } else {
        Tone::Neutral
    }
}

pub fn format_pct(value: f64) -> String {
    format!("{value:.1}%")
}

fn format_signed(value: f64, unit: &str) -> String {
    format!("{value:+.2}{unit}")
}

/// Milliseconds as `850ms`, `4.50s` or `2m 05s`.
pub fn format_ms(ms: u64) -> String {
    if ms < 1000 {
        format!("{ms}ms")
    } else if ms < 60_000 {
        format!("{:.2}s", ms as f64 / 1000.0)
    } else {
        format!("{}m {:02}s", ms / 60_000, (ms % 60_000) / 1000)
    }
}

fn format_ms_delta(ms: i64) -> String {
    let sign = if ms < 0 { "-" } else { "+" };
    format!("{sign}{}", format_ms(ms.unsigned_abs()))
}

fn format_bytes(bytes: u64) -> String {
    const GIB: f64 = 1024.0 * 1024.0 * 1024.0;
    format!("{:.1} GiB", bytes as f64 / GIB)
}

#[cfg(test)]
#[path = "view_tests.rs"]
mod tests;
