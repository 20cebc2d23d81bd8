//! Behavioral specifications for the gauntlet CLI.
//!
//! These tests are black-box: they invoke the CLI binary and verify
//! stdout, stderr, exit codes and the files a run leaves behind.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

#[path = "specs/prelude.rs"]
mod prelude;

#[path = "specs/report.rs"]
mod report;
#[path = "specs/run.rs"]
mod run;

use prelude::*;

// =============================================================================
// COMMANDS
// =============================================================================

/// Bare invocation shows help and exits 0
#[test]
fn bare_invocation_shows_help() {
    gauntlet_cmd()
        .assert()
        .success()
        .stdout(predicates::str::contains("Usage:"));
}

#[test]
fn version_exits_successfully() {
    gauntlet_cmd().arg("--version").assert().success();
}

/// `run --help` lists the configured suites
#[test]
fn run_help_lists_default_suites() {
    let project = Project::empty();
    project
        .gauntlet(&["run", "--help"])
        .exits(0)
        .stdout_has("Suites:")
        .stdout_has("unit")
        .stdout_has("integration")
        .stdout_has("e2e")
        .stdout_has("benchmarks");
}

#[test]
fn run_help_lists_suites_from_config() {
    let project = Project::empty().suite("smoke", &jest_json(1, 0), 0).config("");
    project
        .gauntlet(&["run", "--help"])
        .exits(0)
        .stdout_has("smoke")
        .stdout_lacks("benchmarks");
}

#[test]
fn suites_command_lists_default_suites() {
    let project = Project::empty();
    project.gauntlet(&["suites"]).exits(0).stdout_eq(
        " 1  unit         jest        30s  Unit tests for components and utilities
 2  integration  jest         1m  Integration tests for page flows and API wiring
 3  e2e          jest         2m  End-to-end tests driving a real browser
 4  benchmarks   benchmark    5m  Throughput and latency benchmarks
",
    );
}

// =============================================================================
// CONFIGURATION ERRORS
// =============================================================================

#[test]
fn invalid_config_exits_2() {
    let project = Project::empty();
    project.file("gauntlet.toml", "version = 7\n");
    project
        .gauntlet(&["run"])
        .exits(2)
        .stderr_has("gauntlet: config error");
}

#[test]
fn missing_explicit_config_exits_2() {
    let project = Project::empty();
    project
        .gauntlet(&["run", "-C", "nope.toml"])
        .exits(2)
        .stderr_has("config file not found");
}

#[test]
fn unknown_config_key_warns() {
    let project = Project::empty()
        .suite("unit", &jest_json(1, 0), 0)
        .config("colour = true\n");
    project
        .gauntlet(&["run", "--no-history", "--no-report"])
        .exits(0)
        .stderr_has("colour");
}
