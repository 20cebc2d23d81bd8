// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Suites command implementation.

use gauntlet::cli::Cli;
use gauntlet::config::format_duration;
use gauntlet::discovery;

/// List configured suites in execution order.
pub fn run(cli: &Cli) -> anyhow::Result<()> {
    let cwd = std::env::current_dir()?;
    let project = discovery::load_project(cli.config.as_deref(), &cwd)?;

    let mut suites: Vec<_> = project.config.suites.iter().collect();
    suites.sort_by_key(|s| s.order);
    let width = suites.iter().map(|s| s.key.len()).max().unwrap_or(0);
    let runner_width = suites.iter().map(|s| s.runner.len()).max().unwrap_or(0);

    for suite in suites {
        println!(
            "{:>2}  {:<width$}  {:<runner_width$}  {:>4}  {}",
            suite.order,
            suite.key,
            suite.runner,
            format_duration(suite.timeout),
            suite.description,
        );
    }
    Ok(())
}
