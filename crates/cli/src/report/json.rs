// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! JSON format report output.

use super::{ReportData, ReportFormatter};

/// JSON format report formatter.
///
/// Emits the full [`ReportData`] document.
pub struct JsonFormatter {
    compact: bool,
}

impl JsonFormatter {
    /// Create a new JSON formatter.
    ///
    /// If `compact` is true, outputs single-line JSON without whitespace.
    pub fn new(compact: bool) -> Self {
        Self { compact }
    }
}

impl Default for JsonFormatter {
    fn default() -> Self {
        Self::new(false)
    }
}

impl ReportFormatter for JsonFormatter {
    fn format(&self, data: &ReportData) -> anyhow::Result<String> {
        if self.compact {
            Ok(serde_json::to_string(data)?)
        } else {
            Ok(serde_json::to_string_pretty(data)?)
        }
    }

    fn format_to(&self, writer: &mut dyn std::io::Write, data: &ReportData) -> anyhow::Result<()> {
        if self.compact {
            serde_json::to_writer(writer, data)?;
        } else {
            serde_json::to_writer_pretty(writer, data)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "json_tests.rs"]
mod tests;
