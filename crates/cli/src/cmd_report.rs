// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Report command implementation.

use anyhow::Context;

use gauntlet::cli::{Cli, FormatArg, ReportArgs};
use gauntlet::color::resolve_color;
use gauntlet::discovery;
use gauntlet::history::History;
use gauntlet::orchestrator::Orchestrator;
use gauntlet::output::ConsoleReporter;
use gauntlet::report::{self, RenderOptions, ReportData};
use gauntlet::summary;

/// Run the report command.
pub fn run(cli: &Cli, args: &ReportArgs) -> anyhow::Result<()> {
    let cwd = std::env::current_dir()?;
    let project = discovery::load_project(cli.config.as_deref(), &cwd)?;
    let orchestrator = Orchestrator::new(&project.config, &project.root);
    let output_dir = orchestrator.output_dir();

    // Validate --compact flag (only applies to JSON)
    if args.compact && !matches!(args.format, FormatArg::Json | FormatArg::All) {
        eprintln!("warning: --compact only applies to JSON output, ignoring");
    }

    let report_path = match &args.report {
        Some(path) => path.clone(),
        None => summary::latest_report(&output_dir)?,
    };
    let run_report = summary::load_run_report(&report_path)
        .with_context(|| format!("failed to load run report from {}", report_path.display()))?;

    let history = if args.no_history {
        History::default()
    } else {
        orchestrator.history_store().load()
    };

    let data = ReportData::new(run_report, &history, &project.config, args.sections());
    let options = RenderOptions {
        theme: args.theme,
        compact: args.compact,
    };
    let out_dir = args.out_dir.clone().unwrap_or(output_dir);
    let written = report::write_reports(&out_dir, &data, &args.formats(), options)?;

    let mut console = ConsoleReporter::stdout(resolve_color(false, false));
    for path in &written {
        console.write_path("Wrote", path)?;
    }
    Ok(())
}
