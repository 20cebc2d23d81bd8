// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Run command implementation.

use gauntlet::cli::{Cli, RunArgs};
use gauntlet::color::resolve_color;
use gauntlet::discovery;
use gauntlet::error::ExitCode;
use gauntlet::orchestrator::Orchestrator;
use gauntlet::output::ConsoleReporter;

/// Run the selected suites and print the summary.
pub fn run(cli: &Cli, args: &RunArgs) -> anyhow::Result<ExitCode> {
    let cwd = std::env::current_dir()?;
    let project = discovery::load_project(cli.config.as_deref(), &cwd)?;
    let config = &project.config;

    let mut reporter = ConsoleReporter::stdout(resolve_color(args.color, args.no_color));
    let outcome =
        Orchestrator::new(config, &project.root).run(&args.run_configuration(), &mut reporter)?;

    reporter.write_summary(&outcome, &config.coverage.thresholds)?;
    if let Some(history) = &outcome.history {
        tracing::debug!("history holds {} runs", history.len());
    }

    Ok(outcome.exit_code())
}
