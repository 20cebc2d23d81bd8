// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Jest test runner.
//!
//! Executes a suite using `jest --json`, optionally with `--coverage`, and
//! reads counts, per-file failures and the istanbul coverage map from the
//! JSON document jest prints on stdout.

use std::process::Command;

use serde::Deserialize;

use super::{
    ParsedOutput, RawSuiteOutput, RunnerContext, RunnerOutput, Stats, SuiteError, SuiteRunner,
    SuiteTotals, run_process, run_setup_command, runner_output, setup_failed, suite_command,
};
use crate::config::SuiteConfig;
use crate::coverage::RawCoverageMap;
use crate::error::Result;

/// Default command when a suite does not override it.
const DEFAULT_COMMAND: &[&str] = &["npx", "jest"];

/// Jest runner for JavaScript/TypeScript test suites.
pub struct JestRunner;

impl SuiteRunner for JestRunner {
    fn name(&self) -> &'static str {
        "jest"
    }

    fn run(&self, suite: &SuiteConfig, ctx: &RunnerContext<'_>) -> Result<RunnerOutput> {
        if let Some(setup) = &suite.setup
            && let Err(e) = run_setup_command(setup, ctx.root)
        {
            return Ok(setup_failed(e));
        }

        let mut cmd: Command = suite_command(suite, DEFAULT_COMMAND);
        cmd.args(jest_args(suite, ctx));

        let process = run_process(self.name(), cmd, suite, ctx)?;
        let raw = parse_jest_json(&process.stdout);
        Ok(runner_output(self.name(), suite, &process, raw))
    }
}

/// Build jest arguments for a suite.
///
/// Workers and coverage are each enabled only when both the run and the
/// suite allow them; otherwise jest runs in-band without coverage.
pub fn jest_args(suite: &SuiteConfig, ctx: &RunnerContext<'_>) -> Vec<String> {
    let mut args = vec!["--json".to_string()];

    if let Some(pattern) = &suite.pattern {
        args.push(format!("--testPathPattern={pattern}"));
    }
    args.push(format!("--testTimeout={}", suite.timeout.as_millis()));

    if ctx.coverage_for(suite) {
        args.push("--coverage".to_string());
    } else {
        args.push("--coverage=false".to_string());
    }

    if ctx.parallel_for(suite) {
        args.push("--maxWorkers=50%".to_string());
    } else {
        args.push("--runInBand".to_string());
    }

    args
}

/// Jest JSON output structure.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JestOutput {
    success: bool,
    num_passed_tests: u64,
    num_failed_tests: u64,
    #[serde(default)]
    num_pending_tests: u64,
    #[serde(default)]
    num_todo_tests: u64,
    #[serde(default)]
    num_passed_test_suites: Option<u64>,
    #[serde(default)]
    num_failed_test_suites: Option<u64>,
    #[serde(default)]
    num_total_test_suites: Option<u64>,
    #[serde(default)]
    test_results: Vec<JestTestFile>,
    #[serde(default)]
    coverage_map: Option<RawCoverageMap>,
}

/// A test file result from jest.
#[derive(Debug, Deserialize)]
struct JestTestFile {
    name: String,
    #[serde(default)]
    status: String,
    #[serde(default)]
    message: String,
}

/// Parse JSON output from jest.
///
/// Returns [`RawSuiteOutput::ExitCodeOnly`] when no well-formed result
/// document can be found.
pub fn parse_jest_json(stdout: &str) -> RawSuiteOutput {
    let output: JestOutput = match find_json_object(stdout).and_then(|s| {
        serde_json::from_str(s)
            .map_err(|e| tracing::debug!("jest output did not parse: {}", e))
            .ok()
    }) {
        Some(o) => o,
        None => return RawSuiteOutput::ExitCodeOnly,
    };

    let stats = Stats::new(
        output.num_passed_tests,
        output.num_failed_tests,
        output.num_pending_tests + output.num_todo_tests,
    );

    let test_suites = match (
        output.num_passed_test_suites,
        output.num_failed_test_suites,
        output.num_total_test_suites,
    ) {
        (Some(passed), Some(failed), Some(total)) => Some(SuiteTotals {
            passed,
            failed,
            total,
        }),
        _ => None,
    };

    let errors = output
        .test_results
        .into_iter()
        .filter(|file| file.status == "failed" && !file.message.trim().is_empty())
        .map(|file| SuiteError {
            source: file.name,
            message: file.message.trim().to_string(),
        })
        .collect();

    RawSuiteOutput::Parsed(ParsedOutput {
        success: output.success,
        stats,
        test_suites,
        coverage: output.coverage_map,
        errors,
    })
}

/// Find the first balanced JSON object in the output.
///
/// Braces inside string literals are skipped so messages containing `{` or
/// `}` do not end the object early.
fn find_json_object(s: &str) -> Option<&str> {
    let start = s.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in s[start..].char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&s[start..start + i + 1]);
                }
            }
            _ => {}
        }
    }

    None
}

#[cfg(test)]
#[path = "jest_tests.rs"]
mod tests;
