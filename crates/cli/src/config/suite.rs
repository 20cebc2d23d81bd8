// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Test suite configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::duration;

/// Configuration for a single test suite.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SuiteConfig {
    /// Key used on the command line and in reports (e.g. "unit").
    pub key: String,

    /// Human-readable name, defaults to the capitalized key.
    #[serde(default)]
    pub name: Option<String>,

    /// Shown in `--help` and `gauntlet suites`.
    #[serde(default)]
    pub description: String,

    /// Test path pattern handed to the runner.
    #[serde(default)]
    pub pattern: Option<String>,

    /// Kill the suite process after this long.
    #[serde(
        default = "SuiteConfig::default_timeout",
        deserialize_with = "duration::deserialize",
        serialize_with = "serialize_duration"
    )]
    pub timeout: Duration,

    /// Whether the suite may use multiple workers.
    #[serde(default = "SuiteConfig::default_true")]
    pub parallel: bool,

    /// Whether coverage collection applies to this suite.
    #[serde(default = "SuiteConfig::default_true")]
    pub coverage: bool,

    /// Execution order; lower runs first.
    #[serde(default)]
    pub order: u32,

    /// Runner name: "jest" or "benchmark".
    #[serde(default = "SuiteConfig::default_runner")]
    pub runner: String,

    /// Program and leading arguments replacing the runner's default command.
    #[serde(default)]
    pub command: Option<Vec<String>>,

    /// Shell command to run before the suite.
    #[serde(default)]
    pub setup: Option<String>,
}

fn serialize_duration<S>(d: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_str(&duration::format_duration(*d))
}

impl SuiteConfig {
    fn default_timeout() -> Duration {
        Duration::from_secs(30)
    }

    fn default_true() -> bool {
        true
    }

    fn default_runner() -> String {
        "jest".to_string()
    }

    /// Create a jest suite with default settings.
    pub fn new(key: impl Into<String>, order: u32) -> Self {
        Self {
            key: key.into(),
            name: None,
            description: String::new(),
            pattern: None,
            timeout: Self::default_timeout(),
            parallel: true,
            coverage: true,
            order,
            runner: Self::default_runner(),
            command: None,
            setup: None,
        }
    }

    /// Display name for progress output and reports.
    pub fn display_name(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => {
                let mut chars = self.key.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect(),
                    None => String::new(),
                }
            }
        }
    }
}

/// Built-in suites used when the config declares none.
pub fn default_suites() -> Vec<SuiteConfig> {
    vec![
        SuiteConfig {
            name: Some("Unit Tests".to_string()),
            description: "Unit tests for components and utilities".to_string(),
            pattern: Some("__tests__/unit".to_string()),
            ..SuiteConfig::new("unit", 1)
        },
        SuiteConfig {
            name: Some("Integration Tests".to_string()),
            description: "Integration tests for page flows and API wiring".to_string(),
            pattern: Some("__tests__/integration".to_string()),
            timeout: Duration::from_secs(60),
            ..SuiteConfig::new("integration", 2)
        },
        SuiteConfig {
            name: Some("E2E Tests".to_string()),
            description: "End-to-end tests driving a real browser".to_string(),
            pattern: Some("__tests__/e2e".to_string()),
            timeout: Duration::from_secs(120),
            parallel: false,
            coverage: false,
            ..SuiteConfig::new("e2e", 3)
        },
        SuiteConfig {
            name: Some("Performance Benchmarks".to_string()),
            description: "Throughput and latency benchmarks".to_string(),
            pattern: None,
            timeout: Duration::from_secs(300),
            parallel: false,
            coverage: false,
            runner: "benchmark".to_string(),
            command: Some(vec!["node".to_string(), "scripts/benchmark.js".to_string()]),
            ..SuiteConfig::new("benchmarks", 4)
        },
    ]
}
