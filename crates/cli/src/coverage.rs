// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Coverage aggregation.
//!
//! Reduces an istanbul-style per-file hit map (the `coverageMap` object that
//! jest embeds in `--json --coverage` output) into covered/total/percentage
//! figures per metric.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

/// A coverage metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    Statements,
    Branches,
    Functions,
    Lines,
}

impl Metric {
    /// All metrics in display order.
    pub const ALL: [Metric; 4] = [
        Metric::Statements,
        Metric::Branches,
        Metric::Functions,
        Metric::Lines,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Metric::Statements => "statements",
            Metric::Branches => "branches",
            Metric::Functions => "functions",
            Metric::Lines => "lines",
        }
    }

    /// Capitalized label for reports.
    pub fn label(self) -> &'static str {
        match self {
            Metric::Statements => "Statements",
            Metric::Branches => "Branches",
            Metric::Functions => "Functions",
            Metric::Lines => "Lines",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Covered/total counts for one metric.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricCoverage {
    pub covered: u64,
    pub total: u64,
    /// Always in `[0, 100]`; 100 when `total == 0`.
    pub percentage: f64,
}

impl MetricCoverage {
    pub fn new(covered: u64, total: u64) -> Self {
        let covered = covered.min(total);
        let percentage = if total == 0 {
            100.0
        } else {
            covered as f64 / total as f64 * 100.0
        };
        Self {
            covered,
            total,
            percentage,
        }
    }

    /// Sum counts with another metric and recompute the percentage.
    pub fn combine(&self, other: &MetricCoverage) -> MetricCoverage {
        MetricCoverage::new(self.covered + other.covered, self.total + other.total)
    }
}

impl Default for MetricCoverage {
    fn default() -> Self {
        Self::new(0, 0)
    }
}

/// Aggregate coverage for a suite or a whole run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Coverage {
    pub statements: MetricCoverage,
    pub branches: MetricCoverage,
    pub functions: MetricCoverage,
    pub lines: MetricCoverage,
}

impl Coverage {
    pub fn get(&self, metric: Metric) -> &MetricCoverage {
        match metric {
            Metric::Statements => &self.statements,
            Metric::Branches => &self.branches,
            Metric::Functions => &self.functions,
            Metric::Lines => &self.lines,
        }
    }

    /// Metric-wise sum of two coverage records.
    pub fn combine(&self, other: &Coverage) -> Coverage {
        Coverage {
            statements: self.statements.combine(&other.statements),
            branches: self.branches.combine(&other.branches),
            functions: self.functions.combine(&other.functions),
            lines: self.lines.combine(&other.lines),
        }
    }

    /// Mean of the four metric percentages.
    pub fn average_percentage(&self) -> f64 {
        Metric::ALL
            .iter()
            .map(|m| self.get(*m).percentage)
            .sum::<f64>()
            / Metric::ALL.len() as f64
    }

    /// Percentages keyed by metric.
    pub fn percentages(&self) -> BTreeMap<Metric, f64> {
        Metric::ALL
            .iter()
            .map(|m| (*m, self.get(*m).percentage))
            .collect()
    }
}

/// Raw per-file coverage, keyed by file path.
pub type RawCoverageMap = BTreeMap<String, FileCoverage>;

/// Hit counts for a single file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileCoverage {
    /// Statement id -> hit count.
    #[serde(default)]
    pub s: BTreeMap<String, u64>,
    /// Branch group id -> hit count per arm.
    #[serde(default)]
    pub b: BTreeMap<String, Vec<u64>>,
    /// Function id -> hit count.
    #[serde(default)]
    pub f: BTreeMap<String, u64>,
    /// Statement id -> source location, used to derive line coverage.
    #[serde(default, rename = "statementMap", skip_serializing_if = "BTreeMap::is_empty")]
    pub statement_map: BTreeMap<String, Location>,
}

/// Source span of a statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub start: Position,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub line: u32,
}

impl FileCoverage {
    /// Line hits: a line is covered if any statement starting on it ran.
    ///
    /// Returns `None` when the file carries no statement map.
    fn line_counts(&self) -> Option<(u64, u64)> {
        if self.statement_map.is_empty() {
            return None;
        }
        let mut lines = BTreeSet::new();
        let mut covered = BTreeSet::new();
        for (id, location) in &self.statement_map {
            let line = location.start.line;
            lines.insert(line);
            if self.s.get(id).is_some_and(|hits| *hits > 0) {
                covered.insert(line);
            }
        }
        Some((covered.len() as u64, lines.len() as u64))
    }
}

/// Reduce a raw coverage map into aggregate per-metric coverage.
///
/// Statements and functions count once per entry. Every arm of every branch
/// group counts individually. Lines come from the statement map; files
/// without one fall back to their statement counts.
pub fn aggregate(map: &RawCoverageMap) -> Coverage {
    let mut statements = (0u64, 0u64);
    let mut branches = (0u64, 0u64);
    let mut functions = (0u64, 0u64);
    let mut lines = (0u64, 0u64);

    for file in map.values() {
        let (s_cov, s_total) = count_hits(file.s.values());
        statements.0 += s_cov;
        statements.1 += s_total;

        for arms in file.b.values() {
            let (b_cov, b_total) = count_hits(arms.iter());
            branches.0 += b_cov;
            branches.1 += b_total;
        }

        let (f_cov, f_total) = count_hits(file.f.values());
        functions.0 += f_cov;
        functions.1 += f_total;

        let (l_cov, l_total) = file.line_counts().unwrap_or((s_cov, s_total));
        lines.0 += l_cov;
        lines.1 += l_total;
    }

    Coverage {
        statements: MetricCoverage::new(statements.0, statements.1),
        branches: MetricCoverage::new(branches.0, branches.1),
        functions: MetricCoverage::new(functions.0, functions.1),
        lines: MetricCoverage::new(lines.0, lines.1),
    }
}

fn count_hits<'a>(hits: impl Iterator<Item = &'a u64>) -> (u64, u64) {
    hits.fold((0, 0), |(covered, total), h| {
        (covered + u64::from(*h > 0), total + 1)
    })
}

#[cfg(test)]
#[path = "coverage_tests.rs"]
mod tests;
