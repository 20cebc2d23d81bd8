//! Behavioral specs for `gauntlet report`.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use crate::prelude::*;

/// A project with one saved run.
fn project_with_run() -> Project {
    let project = Project::empty()
        .suite("unit", &jest_json(9, 1), 1)
        .config("");
    project.gauntlet(&["run"]).exits(1);
    project
}

#[test]
fn report_without_runs_exits_2() {
    let project = Project::empty();
    project
        .gauntlet(&["report"])
        .exits(2)
        .stderr_has("no test reports found")
        .stderr_has("gauntlet run");
}

#[test]
fn report_writes_all_formats() {
    let project = project_with_run();
    project
        .gauntlet(&["report"])
        .exits(0)
        .stdout_has("Wrote: ");

    let summaries = project.reports("test-summary-");
    let extensions: Vec<String> = summaries
        .iter()
        .map(|p| p.extension().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(extensions, vec!["html", "json", "md"]);
}

#[test]
fn markdown_report_summarizes_run() {
    let project = project_with_run();
    project.gauntlet(&["report", "-f", "markdown"]).exits(0);

    let summaries = project.reports("test-summary-");
    assert_eq!(summaries.len(), 1);
    let markdown = std::fs::read_to_string(&summaries[0]).unwrap();
    assert!(markdown.starts_with("# Test Summary"));
    assert!(markdown.contains("## Suites"));
    assert!(markdown.contains("expected 1 to be 2"));
}

#[test]
fn html_report_uses_requested_theme() {
    let project = project_with_run();
    project
        .gauntlet(&["report", "-f", "html", "--theme", "dark"])
        .exits(0);

    let html = std::fs::read_to_string(&project.reports("test-summary-")[0]).unwrap();
    assert!(html.contains("<!DOCTYPE html>"));
    assert!(html.contains("#1a1a2e"));
}

#[test]
fn json_report_without_charts() {
    let project = project_with_run();
    project
        .gauntlet(&["report", "-f", "json", "--no-charts", "--compact"])
        .exits(0);

    let raw = std::fs::read_to_string(&project.reports("test-summary-")[0]).unwrap();
    assert_eq!(raw.trim_end().lines().count(), 1);
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert!(json.get("charts").is_none());
    assert_eq!(json["run"]["stats"]["failed"], 1);
}

#[test]
fn report_reads_explicit_run_report_into_out_dir() {
    let project = project_with_run();
    let report = project.reports("test-report-").remove(0);
    let report = report.to_string_lossy().into_owned();

    project
        .gauntlet(&["report", "--report", &report, "-f", "md", "-o", "summaries"])
        .exits(0);

    let written: Vec<_> = std::fs::read_dir(project.join("summaries"))
        .unwrap()
        .collect();
    assert_eq!(written.len(), 1);
}

#[test]
fn compact_warning_for_non_json_format() {
    let project = project_with_run();
    project
        .gauntlet(&["report", "-f", "html", "--compact"])
        .exits(0)
        .stderr_has("--compact only applies to JSON");
}
