// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Markdown format report output.

use super::view::{self, Tone};
use super::{ReportData, ReportFormatter};

/// Markdown format report formatter.
pub struct MarkdownFormatter;

/// Escape characters that would break a table cell.
fn cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}

fn mark(tone: Tone) -> &'static str {
    match tone {
        Tone::Good => "✅",
        Tone::Bad => "❌",
        Tone::Warn => "⚠️",
        Tone::Neutral => "",
    }
}

/// Write markdown report content. This macro handles the common formatting logic
/// for both fmt::Write (String) and io::Write (stdout, files).
macro_rules! write_markdown_report {
    ($writer:expr, $data:expr) => {
        let data: &ReportData = $data;
        let run = &data.run;

        // Header
        writeln!($writer, "# Test Summary\n")?;
        write!(
            $writer,
            "**Run:** {}",
            run.timestamp.format("%Y-%m-%d %H:%M:%S UTC")
        )?;
        if let Some(ref commit) = run.commit {
            write!($writer, " · **Commit:** `{}`", commit)?;
        }
        writeln!($writer, "\n")?;

        // Summary cards
        writeln!($writer, "| Metric | Value | Change |")?;
        writeln!($writer, "|--------|------:|-------:|")?;
        for card in view::summary_cards(data) {
            writeln!(
                $writer,
                "| {} | {} {} | {} |",
                card.title,
                card.value,
                mark(card.tone),
                card.detail.as_deref().unwrap_or("")
            )?;
        }
        writeln!($writer)?;

        // Suites
        writeln!($writer, "## Suites\n")?;
        writeln!(
            $writer,
            "| Suite | Status | Tests | Failed | Skipped | Duration | Attempts | Coverage |"
        )?;
        writeln!(
            $writer,
            "|-------|--------|------:|-------:|--------:|---------:|---------:|---------:|"
        )?;
        let rows = view::suite_rows(&run.suites);
        for row in &rows {
            writeln!(
                $writer,
                "| {} | {} | {} | {} | {} | {} | {} | {} |",
                cell(&row.name),
                row.status(),
                row.tests,
                row.failed,
                row.skipped,
                row.duration,
                row.attempts,
                row.coverage.as_deref().unwrap_or("-")
            )?;
        }
        writeln!($writer)?;

        let failing: Vec<_> = rows.iter().filter(|r| !r.passed).collect();
        if !failing.is_empty() {
            writeln!($writer, "### Failures\n")?;
            for row in failing {
                writeln!($writer, "- **{}**", row.name)?;
                for error in &row.errors {
                    writeln!($writer, "  - {}", error.lines().next().unwrap_or(""))?;
                }
            }
            writeln!($writer)?;
        }

        // Coverage
        let coverage = view::coverage_rows(data);
        if !coverage.is_empty() {
            writeln!($writer, "## Coverage\n")?;
            writeln!($writer, "| Metric | Covered | Percentage | Threshold | |")?;
            writeln!($writer, "|--------|--------:|-----------:|----------:|-|")?;
            for row in &coverage {
                writeln!(
                    $writer,
                    "| {} | {} | {} | {} | {} |",
                    row.metric,
                    row.covered,
                    row.percentage,
                    row.threshold,
                    if row.met { "✅" } else { "❌" }
                )?;
            }
            writeln!($writer)?;
        }

        // Performance
        writeln!($writer, "## Performance\n")?;
        if let Some(ref fastest) = data.performance.fastest {
            writeln!(
                $writer,
                "- Fastest suite: {} ({})",
                fastest.key,
                view::format_ms(fastest.duration_ms)
            )?;
        }
        if let Some(ref slowest) = data.performance.slowest {
            writeln!(
                $writer,
                "- Slowest suite: {} ({})",
                slowest.key,
                view::format_ms(slowest.duration_ms)
            )?;
        }
        writeln!(
            $writer,
            "- Total suite time: {} (average {})\n",
            view::format_ms(data.performance.total_ms),
            view::format_ms(data.performance.average_ms.round() as u64)
        )?;

        // History
        writeln!($writer, "## Trends\n")?;
        match (&data.analysis, view::no_history_message(data)) {
            (Some(analysis), None) => {
                writeln!($writer, "Compared with the previous run:\n")?;
                for row in view::trend_rows(&analysis.trends) {
                    writeln!($writer, "- {}: {} {}", row.label, row.value, mark(row.tone))?;
                }
                writeln!($writer)?;
            }
            (_, Some(message)) => writeln!($writer, "*{}*\n", message)?,
            (None, None) => {}
        }

        if let Some(ref analysis) = data.analysis {
            writeln!($writer, "## Stability\n")?;
            match view::stability_rows(&analysis.stability) {
                Some(rows) => {
                    writeln!($writer, "| Metric | Value |")?;
                    writeln!($writer, "|--------|------:|")?;
                    for (label, value) in rows {
                        writeln!($writer, "| {} | {} |", label, value)?;
                    }
                    writeln!($writer)?;

                    let flaky = view::flaky_lines(&analysis.stability);
                    if flaky.is_empty() {
                        writeln!($writer, "No flaky suites detected.\n")?;
                    } else {
                        writeln!($writer, "**Flaky suites:**\n")?;
                        for line in flaky {
                            writeln!($writer, "- ⚠️ {}", line)?;
                        }
                        writeln!($writer)?;
                    }
                }
                None => writeln!($writer, "*{}*\n", view::insufficient_stability_message(data))?,
            }
        }

        // Environment
        writeln!($writer, "## Environment\n")?;
        for (label, value) in view::system_rows(&run.system) {
            writeln!($writer, "- {}: {}", label, value)?;
        }
    };
}

impl ReportFormatter for MarkdownFormatter {
    fn format(&self, data: &ReportData) -> anyhow::Result<String> {
        use std::fmt::Write;

        let mut output = String::with_capacity(2048);
        write_markdown_report!(&mut output, data);
        Ok(output)
    }

    fn format_to(&self, writer: &mut dyn std::io::Write, data: &ReportData) -> anyhow::Result<()> {
        write_markdown_report!(writer, data);
        Ok(())
    }
}

#[cfg(test)]
#[path = "markdown_tests.rs"]
mod tests;
