// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Configuration parsing and validation.
//!
//! Handles gauntlet.toml parsing with version validation and unknown key warnings.

mod duration;
mod suite;

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

pub use duration::{format_duration, parse_duration};
pub use suite::{SuiteConfig, default_suites};

use crate::coverage::Metric;
use crate::error::{Error, Result};
use crate::runner::RUNNER_NAMES;

/// Supported config version.
pub const SUPPORTED_VERSION: i64 = 1;

/// Config file name looked up during discovery.
pub const CONFIG_FILE: &str = "gauntlet.toml";

/// Known top-level keys.
const KNOWN_KEYS: &[&str] = &[
    "version",
    "output_dir",
    "history_file",
    "history",
    "retry",
    "coverage",
    "suite",
];

/// Full configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Config file version (must be 1).
    pub version: i64,

    /// Directory for per-run reports and generated summaries.
    pub output_dir: PathBuf,

    /// Rolling run history file.
    pub history_file: PathBuf,

    pub history: HistoryConfig,

    pub retry: RetryConfig,

    pub coverage: CoverageConfig,

    /// Configured suites, in declaration order.
    pub suites: Vec<SuiteConfig>,
}

impl Default for Config {
    fn default() -> Self {
        let output_dir = PathBuf::from(DEFAULT_OUTPUT_DIR);
        Self {
            version: SUPPORTED_VERSION,
            history_file: output_dir.join(HISTORY_FILE_NAME),
            output_dir,
            history: HistoryConfig::default(),
            retry: RetryConfig::default(),
            coverage: CoverageConfig::default(),
            suites: default_suites(),
        }
    }
}

const DEFAULT_OUTPUT_DIR: &str = "test-reports";
const HISTORY_FILE_NAME: &str = "history.json";

impl Config {
    /// Look up a suite by key.
    pub fn suite(&self, key: &str) -> Option<&SuiteConfig> {
        self.suites.iter().find(|s| s.key == key)
    }

    /// Suite keys sorted by execution order.
    pub fn suite_keys(&self) -> Vec<&str> {
        let mut suites: Vec<&SuiteConfig> = self.suites.iter().collect();
        suites.sort_by_key(|s| s.order);
        suites.iter().map(|s| s.key.as_str()).collect()
    }
}

/// History retention and analysis windows.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HistoryConfig {
    /// Maximum runs kept in the history file.
    pub max_runs: usize,
    /// Runs sampled for stability metrics.
    pub stability_window: usize,
    /// Below this many runs, stability metrics stay neutral.
    pub min_stability_runs: usize,
    /// History entries plotted in chart datasets.
    pub chart_window: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_runs: 50,
            stability_window: 10,
            min_stability_runs: 5,
            chart_window: 20,
        }
    }
}

/// Retry policy for failing suites.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RetryConfig {
    /// Additional attempts after the first.
    pub max_retries: u32,
    /// Base delay; attempt `n` waits `delay * n` before retrying.
    #[serde(deserialize_with = "duration::deserialize")]
    pub delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 2,
            delay: Duration::from_secs(1),
        }
    }
}

/// Coverage gate configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CoverageConfig {
    /// Minimum percentage per metric. Metrics not listed are not gated.
    pub thresholds: BTreeMap<Metric, f64>,
}

impl Default for CoverageConfig {
    fn default() -> Self {
        Self {
            thresholds: BTreeMap::from([
                (Metric::Statements, 80.0),
                (Metric::Branches, 75.0),
                (Metric::Functions, 80.0),
                (Metric::Lines, 80.0),
            ]),
        }
    }
}

/// Minimum config structure for version checking.
#[derive(Deserialize)]
struct VersionOnly {
    version: Option<i64>,
}

/// Config as written on disk, capturing unknown keys.
#[derive(Deserialize)]
struct FlexibleConfig {
    #[serde(default)]
    output_dir: Option<PathBuf>,

    #[serde(default)]
    history_file: Option<PathBuf>,

    #[serde(default)]
    history: HistoryConfig,

    #[serde(default)]
    retry: RetryConfig,

    #[serde(default)]
    coverage: CoverageConfig,

    #[serde(default)]
    suite: Vec<SuiteConfig>,

    #[serde(flatten)]
    unknown: BTreeMap<String, toml::Value>,
}

/// Load config from a file path.
pub fn load(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| Error::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    parse(&content, path)
}

/// Parse config from string content, warning on unknown top-level keys.
pub fn parse(content: &str, path: &Path) -> Result<Config> {
    let config_error = |message: String| Error::Config {
        message,
        path: Some(path.to_path_buf()),
    };

    let version_check: VersionOnly =
        toml::from_str(content).map_err(|e| config_error(e.to_string()))?;

    let version = version_check
        .version
        .ok_or_else(|| config_error("missing required field: version".to_string()))?;

    if version != SUPPORTED_VERSION {
        return Err(config_error(format!(
            "unsupported config version {} (supported: {})\n  Upgrade gauntlet to use this config.",
            version, SUPPORTED_VERSION
        )));
    }

    let flexible: FlexibleConfig =
        toml::from_str(content).map_err(|e| config_error(e.to_string()))?;

    let unknown: BTreeSet<&String> = flexible
        .unknown
        .keys()
        .filter(|k| !KNOWN_KEYS.contains(&k.as_str()))
        .collect();
    for key in unknown {
        warn_unknown_key(path, key);
    }

    let output_dir = flexible
        .output_dir
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));
    let history_file = flexible
        .history_file
        .unwrap_or_else(|| output_dir.join(HISTORY_FILE_NAME));
    let suites = if flexible.suite.is_empty() {
        default_suites()
    } else {
        flexible.suite
    };

    let config = Config {
        version,
        output_dir,
        history_file,
        history: flexible.history,
        retry: flexible.retry,
        coverage: flexible.coverage,
        suites,
    };
    validate(&config).map_err(config_error)?;
    Ok(config)
}

/// Check cross-field constraints serde cannot express.
fn validate(config: &Config) -> std::result::Result<(), String> {
    let mut seen = BTreeSet::new();
    for suite in &config.suites {
        if suite.key.is_empty() {
            return Err("suite key must not be empty".to_string());
        }
        if !seen.insert(suite.key.as_str()) {
            return Err(format!("duplicate suite key: {}", suite.key));
        }
        if !RUNNER_NAMES.contains(&suite.runner.as_str()) {
            return Err(format!(
                "suite {}: unknown runner '{}' (expected one of: {})",
                suite.key,
                suite.runner,
                RUNNER_NAMES.join(", ")
            ));
        }
        if suite.command.as_ref().is_some_and(|c| c.is_empty()) {
            return Err(format!("suite {}: command must not be empty", suite.key));
        }
    }

    for (metric, min) in &config.coverage.thresholds {
        if !(0.0..=100.0).contains(min) {
            return Err(format!(
                "coverage threshold for {metric} must be between 0 and 100 (got {min})"
            ));
        }
    }

    if config.history.max_runs == 0 {
        return Err("history.max_runs must be at least 1".to_string());
    }

    Ok(())
}

fn warn_unknown_key(path: &Path, key: &str) {
    tracing::warn!("unrecognized config key `{}` in {}", key, path.display());
    eprintln!(
        "gauntlet: warning: {}: unrecognized field `{}` (ignored)",
        path.display(),
        key
    );
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
