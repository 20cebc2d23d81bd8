// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Summary report rendering.
//!
//! A [`ReportData`] is assembled once from a per-run report, the history and
//! the configuration; each [`ReportFormatter`] turns it into a document.

mod charts;
mod html;
mod json;
mod markdown;
pub(crate) mod view;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::analysis::{Analysis, analyze};
use crate::config::Config;
use crate::coverage::Metric;
use crate::error::{Error, Result};
use crate::history::History;
use crate::summary::{PerformanceRollup, RunReport, RunSummary};

pub use charts::{BarChart, ChartData, TimeSeries, build_charts};
pub use html::HtmlFormatter;
pub use json::JsonFormatter;
pub use markdown::MarkdownFormatter;

/// Prefix of generated summary documents.
pub const SUMMARY_PREFIX: &str = "test-summary-";

/// A single output document format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportFormat {
    Html,
    Markdown,
    Json,
}

impl ReportFormat {
    pub const ALL: [ReportFormat; 3] = [ReportFormat::Html, ReportFormat::Markdown, ReportFormat::Json];

    pub fn extension(self) -> &'static str {
        match self {
            ReportFormat::Html => "html",
            ReportFormat::Markdown => "md",
            ReportFormat::Json => "json",
        }
    }
}

/// HTML color theme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

/// Rendering options shared by all formatters.
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderOptions {
    pub theme: Theme,
    /// Single-line JSON.
    pub compact: bool,
}

/// Which optional sections to include.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportSections {
    pub history: bool,
    pub charts: bool,
}

impl Default for ReportSections {
    fn default() -> Self {
        Self {
            history: true,
            charts: true,
        }
    }
}

/// Everything a formatter renders.
#[derive(Debug, Clone, Serialize)]
pub struct ReportData {
    pub generated_at: DateTime<Utc>,
    pub run: RunSummary,
    pub performance: PerformanceRollup,
    /// Configured coverage minimums.
    pub thresholds: BTreeMap<Metric, f64>,
    /// Runs recorded before this one.
    pub history_runs: usize,
    /// Runs needed before stability figures are reported.
    pub min_stability_runs: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis: Option<Analysis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub charts: Option<ChartData>,
}

impl ReportData {
    pub fn new(report: RunReport, history: &History, config: &Config, sections: ReportSections) -> Self {
        let run = report.summary;
        let previous = history.preceding(run.timestamp);

        let analysis = sections
            .history
            .then(|| analyze(history, &run, &config.history));
        let charts = sections.charts.then(|| {
            let previous = if sections.history { &previous[..] } else { &[][..] };
            build_charts(previous, &run, config.history.chart_window)
        });

        Self {
            generated_at: Utc::now(),
            history_runs: if sections.history { previous.len() } else { 0 },
            min_stability_runs: config.history.min_stability_runs,
            thresholds: config.coverage.thresholds.clone(),
            performance: report.performance,
            analysis,
            charts,
            run,
        }
    }
}

/// Trait for rendering report data into a document format.
pub trait ReportFormatter {
    /// Render the full document.
    fn format(&self, data: &ReportData) -> anyhow::Result<String>;

    /// Render directly to a writer.
    fn format_to(&self, writer: &mut dyn std::io::Write, data: &ReportData) -> anyhow::Result<()> {
        writer.write_all(self.format(data)?.as_bytes())?;
        Ok(())
    }
}

/// Create formatter for a format.
pub fn create_formatter(format: ReportFormat, options: RenderOptions) -> Box<dyn ReportFormatter> {
    match format {
        ReportFormat::Html => Box::new(HtmlFormatter::new(options.theme)),
        ReportFormat::Markdown => Box::new(MarkdownFormatter),
        ReportFormat::Json => Box::new(JsonFormatter::new(options.compact)),
    }
}

/// Path of the summary document for a run, e.g. `test-summary-<stamp>.md`.
pub fn summary_path(dir: &Path, run: &RunSummary, format: ReportFormat) -> PathBuf {
    dir.join(format!(
        "{}{}.{}",
        SUMMARY_PREFIX,
        run.file_stamp(),
        format.extension()
    ))
}

/// Render each format and write it into `dir`, returning the written paths.
pub fn write_reports(
    dir: &Path,
    data: &ReportData,
    formats: &[ReportFormat],
    options: RenderOptions,
) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir).map_err(|e| Error::Io {
        path: dir.to_path_buf(),
        source: e,
    })?;

    let mut written = Vec::with_capacity(formats.len());
    for format in formats {
        let content = create_formatter(*format, options)
            .format(data)
            .map_err(|e| Error::Internal(format!("failed to render {format:?} report: {e}")))?;
        let path = summary_path(dir, &data.run, *format);
        std::fs::write(&path, content).map_err(|e| Error::Io {
            path: path.clone(),
            source: e,
        })?;
        tracing::debug!("wrote {}", path.display());
        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
pub mod test_support;

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
