pub mod analysis;
pub mod cli;
pub mod color;
pub mod config;
pub mod coverage;
pub mod discovery;
pub mod error;
pub mod executor;
pub mod history;
pub mod orchestrator;
pub mod output;
pub mod report;
pub mod runner;
pub mod summary;
pub mod thresholds;
pub mod verbose;

pub use cli::{Cli, Command, ReportArgs, RunArgs};
pub use config::{Config, SuiteConfig};
pub use error::{Error, ExitCode, Result};
pub use orchestrator::{Orchestrator, RunConfiguration, RunOutcome, RunStatus};
pub use summary::{RunReport, RunSummary};

#[cfg(test)]
pub mod test_utils;
