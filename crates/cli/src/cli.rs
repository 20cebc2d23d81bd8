// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! CLI argument parsing with clap derive.

use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};

use crate::config::{SuiteConfig, format_duration};
use crate::orchestrator::RunConfiguration;
use crate::report::{ReportFormat, ReportSections, Theme};

/// Runs test suites in order and reports on coverage, trends and stability
#[derive(Parser)]
#[command(name = "gauntlet")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Use specific config file
    #[arg(short = 'C', long = "config", global = true, env = "GAUNTLET_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run test suites
    Run(RunArgs),
    /// Generate summary reports from a saved run
    Report(ReportArgs),
    /// List configured suites
    Suites,
}

#[derive(clap::Args, Default)]
pub struct RunArgs {
    /// Suites to run (default: all)
    #[arg(value_name = "SUITE")]
    pub suites: Vec<String>,

    /// Allow parallel workers within a suite (default)
    #[arg(long, overrides_with = "no_parallel")]
    pub parallel: bool,

    /// Run every suite in band
    #[arg(long, overrides_with = "parallel")]
    pub no_parallel: bool,

    /// Collect coverage (default)
    #[arg(long, overrides_with = "no_coverage")]
    pub coverage: bool,

    /// Skip coverage collection and threshold checks
    #[arg(long, overrides_with = "coverage")]
    pub no_coverage: bool,

    /// Enable verbose output
    #[arg(long, short = 'v')]
    pub verbose: bool,

    /// Stop after the first failing suite
    #[arg(long)]
    pub fail_fast: bool,

    /// Do not retry failing suites
    #[arg(long)]
    pub no_retry: bool,

    /// Do not save the run report
    #[arg(long)]
    pub no_report: bool,

    /// Do not append the run to history
    #[arg(long)]
    pub no_history: bool,

    /// Force color output
    #[arg(long)]
    pub color: bool,

    /// Disable color output
    #[arg(long)]
    pub no_color: bool,
}

impl RunArgs {
    pub fn run_configuration(&self) -> RunConfiguration {
        RunConfiguration {
            suites: self.suites.clone(),
            parallel: !self.no_parallel,
            coverage: !self.no_coverage,
            verbose: self.verbose,
            fail_fast: self.fail_fast,
            retry: !self.no_retry,
            save_report: !self.no_report,
            save_history: !self.no_history,
        }
    }
}

#[derive(clap::Args, Default)]
pub struct ReportArgs {
    /// Output format
    #[arg(short, long, default_value = "all")]
    pub format: FormatArg,

    /// Leave chart datasets out of the report
    #[arg(long)]
    pub no_charts: bool,

    /// Ignore run history (no trends or stability)
    #[arg(long)]
    pub no_history: bool,

    /// HTML color theme
    #[arg(long, default_value = "light")]
    pub theme: Theme,

    /// Run report to render (default: most recent in the output directory)
    #[arg(long, value_name = "PATH")]
    pub report: Option<PathBuf>,

    /// Output compact JSON (no whitespace, single line)
    #[arg(long)]
    pub compact: bool,

    /// Directory to write reports into (default: output_dir from config)
    #[arg(short, long, value_name = "DIR")]
    pub out_dir: Option<PathBuf>,
}

impl ReportArgs {
    pub fn formats(&self) -> Vec<ReportFormat> {
        match self.format {
            FormatArg::Html => vec![ReportFormat::Html],
            FormatArg::Markdown => vec![ReportFormat::Markdown],
            FormatArg::Json => vec![ReportFormat::Json],
            FormatArg::All => ReportFormat::ALL.to_vec(),
        }
    }

    pub fn sections(&self) -> ReportSections {
        ReportSections {
            history: !self.no_history,
            charts: !self.no_charts,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum FormatArg {
    Html,
    #[value(alias = "md")]
    Markdown,
    Json,
    #[default]
    All,
}

/// The `Suites:` block appended to `gauntlet run --help`.
pub fn suites_help(suites: &[SuiteConfig]) -> String {
    let mut sorted: Vec<&SuiteConfig> = suites.iter().collect();
    sorted.sort_by_key(|s| s.order);
    let width = sorted.iter().map(|s| s.key.len()).max().unwrap_or(0);

    let mut help = String::from("Suites:\n");
    for suite in sorted {
        help.push_str(&format!(
            "  {:<width$}  {} (timeout {})\n",
            suite.key,
            suite.description,
            format_duration(suite.timeout),
        ));
    }
    help
}

/// Clap command with the suite list attached to `run --help`.
pub fn command_with_suites(suites: &[SuiteConfig]) -> clap::Command {
    let help = suites_help(suites);
    Cli::command().mut_subcommand("run", |run| run.after_help(help))
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
