// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Coverage threshold checking.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::coverage::Metric;

/// A metric below its configured minimum.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdViolation {
    pub metric: Metric,
    pub current: f64,
    pub threshold: f64,
}

/// Outcome of comparing coverage to the configured minimums.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ThresholdReport {
    pub passed: bool,
    pub violations: Vec<ThresholdViolation>,
}

/// Compare current per-metric percentages against minimums.
///
/// A metric with a threshold but no current value was not collected and is
/// skipped, not reported. Meeting a threshold exactly passes.
pub fn check_thresholds(
    current: &BTreeMap<Metric, f64>,
    thresholds: &BTreeMap<Metric, f64>,
) -> ThresholdReport {
    let violations: Vec<ThresholdViolation> = thresholds
        .iter()
        .filter_map(|(metric, threshold)| {
            let value = *current.get(metric)?;
            (value < *threshold).then_some(ThresholdViolation {
                metric: *metric,
                current: value,
                threshold: *threshold,
            })
        })
        .collect();

    ThresholdReport {
        passed: violations.is_empty(),
        violations,
    }
}

#[cfg(test)]
#[path = "thresholds_tests.rs"]
mod tests;
