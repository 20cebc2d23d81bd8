// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use super::*;
use crate::coverage::FileCoverage;
use proptest::prelude::*;

fn output(exit_code: Option<i32>, raw: RawSuiteOutput) -> RunnerOutput {
    RunnerOutput {
        exit_code,
        duration: Duration::from_millis(1500),
        timed_out: false,
        timeout_message: None,
        raw,
        stderr: String::new(),
    }
}

fn parsed(success: bool, stats: Stats) -> RawSuiteOutput {
    RawSuiteOutput::Parsed(ParsedOutput {
        success,
        stats,
        test_suites: None,
        coverage: Some(RawCoverageMap::from([(
            "a.js".to_string(),
            FileCoverage {
                s: [("0".to_string(), 1), ("1".to_string(), 0)].into(),
                ..FileCoverage::default()
            },
        )])),
        errors: Vec::new(),
    })
}

#[test]
fn stats_total_is_sum() {
    let stats = Stats::new(8, 2, 1);
    assert_eq!(stats.total, 11);
}

#[test]
fn pass_rate_of_empty_run_is_zero() {
    assert_eq!(Stats::default().pass_rate(), 0.0);
    assert_eq!(Stats::new(3, 1, 0).pass_rate(), 75.0);
}

#[test]
fn exit_zero_without_json_is_one_pass() {
    let result = SuiteResult::from_output(
        "unit",
        "Unit",
        output(Some(0), RawSuiteOutput::ExitCodeOnly),
        true,
    );
    assert!(result.success);
    assert_eq!(result.stats, Stats::new(1, 0, 0));
    assert_eq!(result.duration_ms, 1500);
}

#[test]
fn nonzero_exit_without_json_is_one_failure() {
    let result = SuiteResult::from_output(
        "unit",
        "Unit",
        output(Some(3), RawSuiteOutput::ExitCodeOnly),
        true,
    );
    assert!(!result.success);
    assert_eq!(result.stats, Stats::new(0, 1, 0));
    assert_eq!(result.exit_code, Some(3));
}

#[test]
fn parsed_output_keeps_counts_and_coverage() {
    let result = SuiteResult::from_output(
        "unit",
        "Unit",
        output(Some(1), parsed(false, Stats::new(8, 2, 0))),
        true,
    );
    assert!(!result.success);
    assert_eq!(result.stats, Stats::new(8, 2, 0));
    let coverage = result.coverage.unwrap();
    assert_eq!(coverage.statements.percentage, 50.0);
}

#[test]
fn coverage_dropped_when_not_collected() {
    let result = SuiteResult::from_output(
        "unit",
        "Unit",
        output(Some(0), parsed(true, Stats::new(2, 0, 0))),
        false,
    );
    assert!(result.success);
    assert!(result.coverage.is_none());
}

#[test]
fn failed_counts_fail_the_suite_even_on_exit_zero() {
    let result = SuiteResult::from_output(
        "unit",
        "Unit",
        output(Some(0), parsed(true, Stats::new(1, 1, 0))),
        false,
    );
    assert!(!result.success);
}

#[test]
fn timeout_fails_suite_with_message() {
    let mut out = output(None, parsed(true, Stats::new(4, 0, 0)));
    out.timed_out = true;
    out.timeout_message = Some("timed out after 30s".to_string());
    let result = SuiteResult::from_output("e2e", "E2E", out, false);

    assert!(!result.success);
    assert_eq!(result.stats, Stats::new(4, 1, 0));
    assert_eq!(result.error.as_deref(), Some("timed out after 30s"));
}

#[test]
fn benchmark_metrics_are_kept() {
    let metrics = BenchmarkMetrics {
        ops_per_sec: Some(900.0),
        avg_latency_ms: None,
    };
    let result = SuiteResult::from_output(
        "benchmarks",
        "Benchmarks",
        output(Some(0), RawSuiteOutput::Benchmark(metrics)),
        false,
    );
    assert!(result.success);
    assert_eq!(result.benchmark, Some(metrics));
    assert_eq!(result.stats, Stats::new(1, 0, 0));
}

#[test]
fn stderr_tail_attached_when_failure_has_no_errors() {
    let mut out = output(Some(1), RawSuiteOutput::ExitCodeOnly);
    out.stderr = (1..=8).map(|i| format!("line {i}\n")).collect();
    let result = SuiteResult::from_output("unit", "Unit", out, false);

    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].source, "stderr");
    assert_eq!(
        result.errors[0].message,
        "line 4\nline 5\nline 6\nline 7\nline 8"
    );
}

#[test]
fn start_failed_records_error() {
    let result = SuiteResult::start_failed("unit", "Unit", "failed to spawn npx");
    assert!(!result.success);
    assert_eq!(result.stats, Stats::new(0, 1, 0));
    assert_eq!(result.error_messages(), vec!["failed to spawn npx".to_string()]);
}

#[test]
fn suite_result_roundtrips_through_json() {
    let result = SuiteResult::from_output(
        "unit",
        "Unit",
        output(Some(1), parsed(false, Stats::new(8, 2, 0))),
        true,
    );
    let json = serde_json::to_string(&result).unwrap();
    let back: SuiteResult = serde_json::from_str(&json).unwrap();
    assert_eq!(back, result);
}

fn arb_stats() -> impl Strategy<Value = Stats> {
    (0u64..1000, 0u64..1000, 0u64..1000).prop_map(|(p, f, s)| Stats::new(p, f, s))
}

proptest! {
    #[test]
    fn accumulation_is_order_independent(
        suites in prop::collection::vec(arb_stats(), 0..8),
        seed in any::<u64>(),
    ) {
        let mut forward = Stats::default();
        for s in &suites {
            forward.accumulate(s);
        }

        let mut shuffled = suites.clone();
        if !shuffled.is_empty() {
            let len = shuffled.len();
            shuffled.rotate_left((seed as usize) % len);
            shuffled.reverse();
        }
        let mut other = Stats::default();
        for s in &shuffled {
            other.accumulate(s);
        }

        prop_assert_eq!(forward, other);
        prop_assert_eq!(forward.total, forward.passed + forward.failed + forward.skipped);
    }
}
