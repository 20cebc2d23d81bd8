//! Behavioral specs for `gauntlet run`.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use crate::prelude::*;

// =============================================================================
// EXIT CODES
// =============================================================================

#[test]
fn passing_suites_exit_0() {
    let project = Project::empty()
        .suite("unit", &jest_json(10, 0), 0)
        .suite("integration", &jest_json(4, 0), 0)
        .config("");

    project
        .gauntlet(&["run"])
        .exits(0)
        .stdout_has("Running 2 suites: unit, integration")
        .stdout_has("PASSED")
        .stdout_has("14 passed, 0 failed, 0 skipped (14 total)");
}

#[test]
fn failing_tests_exit_1() {
    let project = Project::empty()
        .suite("unit", &jest_json(8, 2), 1)
        .config("");

    project
        .gauntlet(&["run"])
        .exits(1)
        .stdout_has("FAIL")
        .stdout_has("(tests failed)")
        .stdout_has("Failed suites:")
        .stdout_has("expected 1 to be 2");
}

#[test]
fn unmet_coverage_threshold_exits_1() {
    let project = Project::empty()
        .suite("unit", &jest_json_with_coverage(3, 5), 0)
        .config("");

    project
        .gauntlet(&["run"])
        .exits(1)
        .stdout_has("(coverage thresholds not met)")
        .stdout_has("Statements")
        .stdout_has("FAIL");
}

#[test]
fn no_coverage_skips_thresholds() {
    let project = Project::empty()
        .suite("unit", &jest_json_with_coverage(3, 5), 0)
        .config("");

    project
        .gauntlet(&["run", "--no-coverage"])
        .exits(0)
        .stdout_has("PASSED");
}

#[test]
fn only_unknown_suites_exits_2() {
    let project = Project::empty()
        .suite("unit", &jest_json(1, 0), 0)
        .config("");

    project
        .gauntlet(&["run", "smoke"])
        .exits(2)
        .stderr_has("unknown suite: smoke")
        .stderr_has("no valid suites to run");
}

#[test]
fn unknown_suite_is_skipped_with_warning() {
    let project = Project::empty()
        .suite("unit", &jest_json(1, 0), 0)
        .config("");

    project
        .gauntlet(&["run", "unit", "smoke", "--no-report", "--no-history"])
        .exits(0)
        .stderr_has("unknown suite: smoke")
        .stdout_has("Running 1 suite: unit");
}

#[test]
fn fail_fast_stops_after_first_failure() {
    let project = Project::empty()
        .suite("unit", &jest_json(0, 1), 1)
        .suite("integration", &jest_json(1, 0), 0)
        .config("");

    project
        .gauntlet(&["run", "--fail-fast", "--no-history", "--no-report"])
        .exits(1)
        .stdout_has("Suites:   0 passed, 1 failed (1 total)");
}

#[test]
fn failing_suite_is_retried() {
    let project = Project::empty()
        .suite("unit", &jest_json(0, 1), 1)
        .config("[retry]\nmax_retries = 1\ndelay = \"0s\"\n");

    project
        .gauntlet(&["run", "--no-history", "--no-report"])
        .exits(1)
        .stdout_has("(2 attempts)");
}

// =============================================================================
// PERSISTENCE
// =============================================================================

#[test]
fn run_saves_report_and_history() {
    let project = Project::empty()
        .suite("unit", &jest_json(3, 0), 0)
        .config("");

    project
        .gauntlet(&["run"])
        .exits(0)
        .stdout_has("Report: ");

    let reports = project.reports("test-report-");
    assert_eq!(reports.len(), 1);
    let report: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&reports[0]).unwrap()).unwrap();
    assert_eq!(report["stats"]["passed"], 3);
    assert_eq!(report["success"], true);
    assert!(report["performance"].is_object());

    let history: serde_json::Value = serde_json::from_str(
        &std::fs::read_to_string(project.join("test-reports/history.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(history["runs"].as_array().unwrap().len(), 1);
}

#[test]
fn history_accumulates_across_runs() {
    let project = Project::empty()
        .suite("unit", &jest_json(3, 0), 0)
        .config("");

    project.gauntlet(&["run", "--no-report"]).exits(0);
    project.gauntlet(&["run", "--no-report"]).exits(0);

    let history: serde_json::Value = serde_json::from_str(
        &std::fs::read_to_string(project.join("test-reports/history.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(history["runs"].as_array().unwrap().len(), 2);
    assert!(project.reports("test-report-").is_empty());
}

#[test]
fn no_history_and_no_report_write_nothing() {
    let project = Project::empty()
        .suite("unit", &jest_json(3, 0), 0)
        .config("");

    project
        .gauntlet(&["run", "--no-history", "--no-report"])
        .exits(0);
    assert!(!project.join("test-reports").exists());
}
