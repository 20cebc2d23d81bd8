// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Gauntlet CLI entry point.

use std::path::PathBuf;

use clap::FromArgMatches;
use tracing_subscriber::{EnvFilter, fmt};

use gauntlet::cli::{self, Cli, Command};
use gauntlet::config::{SuiteConfig, default_suites};
use gauntlet::discovery;
use gauntlet::error::ExitCode;

mod cmd_report;
mod cmd_run;
mod cmd_suites;

fn init_logging() {
    let filter = EnvFilter::try_from_env("GAUNTLET_LOG").unwrap_or_else(|_| EnvFilter::new("off"));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    init_logging();

    let exit_code = match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("gauntlet: {}", e);
            match e.downcast_ref::<gauntlet::Error>() {
                Some(err) => ExitCode::from(err),
                None => ExitCode::InternalError,
            }
        }
    };

    std::process::exit(exit_code as i32);
}

fn run() -> anyhow::Result<ExitCode> {
    let args: Vec<String> = std::env::args().collect();
    let mut command = cli::command_with_suites(&help_suites(&args));
    let matches = command.clone().get_matches_from(&args);
    let cli = Cli::from_arg_matches(&matches)?;

    match &cli.command {
        None => {
            // Show help for bare invocation
            command.print_help()?;
            println!();
            Ok(ExitCode::Success)
        }
        Some(Command::Run(args)) => cmd_run::run(&cli, args),
        Some(Command::Report(args)) => {
            cmd_report::run(&cli, args)?;
            Ok(ExitCode::Success)
        }
        Some(Command::Suites) => {
            cmd_suites::run(&cli)?;
            Ok(ExitCode::Success)
        }
    }
}

/// Suites to list in `run --help`.
///
/// Only loads the config when help is requested so normal runs read it once.
fn help_suites(args: &[String]) -> Vec<SuiteConfig> {
    let wants_help = args
        .iter()
        .skip(1)
        .any(|a| a == "-h" || a == "--help" || a == "help");
    if !wants_help {
        return default_suites();
    }

    let explicit = explicit_config(args);
    std::env::current_dir()
        .ok()
        .and_then(|cwd| discovery::load_project(explicit.as_deref(), &cwd).ok())
        .map(|project| project.config.suites)
        .unwrap_or_else(default_suites)
}

/// `-C`/`--config` from raw arguments, falling back to `GAUNTLET_CONFIG`.
fn explicit_config(args: &[String]) -> Option<PathBuf> {
    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        if arg == "-C" || arg == "--config" {
            return iter.next().map(PathBuf::from);
        }
        if let Some(path) = arg.strip_prefix("--config=") {
            return Some(PathBuf::from(path));
        }
    }
    std::env::var_os("GAUNTLET_CONFIG").map(PathBuf::from)
}
