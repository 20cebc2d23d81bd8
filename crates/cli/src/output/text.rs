// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Text console output.
//!
//! Per-suite progress while a run is in flight, then a final summary:
//! ```text
//!   PASS Unit Tests  40 passed, 0 failed, 2 skipped  1.20s  coverage 82.5%
//!   FAIL E2E Tests  3 passed, 1 failed, 0 skipped  1m 05s  (3 attempts)
//! ```

use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

use termcolor::{ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::color::scheme;
use crate::config::SuiteConfig;
use crate::coverage::Metric;
use crate::orchestrator::{ProgressSink, RunOutcome, RunStatus};
use crate::report::view::{format_ms, format_pct};
use crate::runner::SuiteResult;

/// Colorized progress and summary writer.
pub struct ConsoleReporter<W: WriteColor> {
    out: W,
}

impl ConsoleReporter<StandardStream> {
    /// Reporter writing to stdout.
    pub fn stdout(color_choice: ColorChoice) -> Self {
        Self::new(StandardStream::stdout(color_choice))
    }
}

impl<W: WriteColor> ConsoleReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn colored(&mut self, spec: &ColorSpec, text: &str) -> std::io::Result<()> {
        self.out.set_color(spec)?;
        write!(self.out, "{}", text)?;
        self.out.reset()
    }

    fn write_plan(&mut self, suites: &[&SuiteConfig]) -> std::io::Result<()> {
        let keys: Vec<&str> = suites.iter().map(|s| s.key.as_str()).collect();
        writeln!(
            self.out,
            "Running {} suite{}: {}",
            suites.len(),
            if suites.len() == 1 { "" } else { "s" },
            keys.join(", ")
        )
    }

    /// One line per finished suite.
    pub fn write_suite_result(&mut self, result: &SuiteResult) -> std::io::Result<()> {
        write!(self.out, "  ")?;
        if result.success {
            self.colored(&scheme::pass(), "PASS")?;
        } else {
            self.colored(&scheme::fail(), "FAIL")?;
        }
        write!(self.out, " ")?;
        self.colored(&scheme::suite_name(), &result.name)?;

        let stats = &result.stats;
        write!(
            self.out,
            "  {} passed, {} failed, {} skipped  ",
            stats.passed, stats.failed, stats.skipped
        )?;
        self.colored(&scheme::muted(), &format_ms(result.duration_ms))?;
        if let Some(coverage) = &result.coverage {
            write!(
                self.out,
                "  coverage {}",
                format_pct(coverage.average_percentage())
            )?;
        }
        if result.attempts > 1 {
            write!(self.out, "  ({} attempts)", result.attempts)?;
        }
        if let Some(bench) = &result.benchmark {
            if let Some(ops) = bench.ops_per_sec {
                write!(self.out, "  {ops:.0} ops/sec")?;
            }
            if let Some(avg) = bench.avg_latency_ms {
                write!(self.out, "  {avg:.2}ms avg")?;
            }
        }
        writeln!(self.out)
    }

    /// Final run summary.
    pub fn write_summary(
        &mut self,
        outcome: &RunOutcome,
        thresholds: &BTreeMap<Metric, f64>,
    ) -> std::io::Result<()> {
        let run = &outcome.summary;

        writeln!(self.out)?;
        self.colored(&scheme::suite_name(), "Summary")?;
        writeln!(self.out)?;

        write!(self.out, "  Status:   ")?;
        match outcome.status {
            RunStatus::Passed => self.colored(&scheme::pass(), "PASSED")?,
            RunStatus::TestsFailed => {
                self.colored(&scheme::fail(), "FAILED")?;
                write!(self.out, " (tests failed)")?;
            }
            RunStatus::ThresholdsFailed => {
                self.colored(&scheme::fail(), "FAILED")?;
                write!(self.out, " (coverage thresholds not met)")?;
            }
        }
        writeln!(self.out)?;

        let failed_suites = run.failed_suites().count();
        writeln!(
            self.out,
            "  Suites:   {} passed, {} failed ({} total)",
            run.suites.len() - failed_suites,
            failed_suites,
            run.suites.len()
        )?;
        writeln!(
            self.out,
            "  Tests:    {} passed, {} failed, {} skipped ({} total)",
            run.stats.passed, run.stats.failed, run.stats.skipped, run.stats.total
        )?;
        writeln!(self.out, "  Duration: {}", format_ms(run.duration_ms))?;

        if let Some(coverage) = &run.coverage {
            writeln!(self.out, "  Coverage:")?;
            for metric in Metric::ALL {
                let pct = coverage.get(metric).percentage;
                write!(self.out, "    {:<11} {:>6}", metric.label(), format_pct(pct))?;
                if let Some(t) = thresholds.get(&metric) {
                    write!(self.out, "  (threshold {:>6})  ", format_pct(*t))?;
                    if pct >= *t {
                        self.colored(&scheme::pass(), "PASS")?;
                    } else {
                        self.colored(&scheme::fail(), "FAIL")?;
                    }
                }
                writeln!(self.out)?;
            }
        }

        let perf = run.performance();
        if let Some(fastest) = &perf.fastest {
            writeln!(
                self.out,
                "  Fastest:  {} ({})",
                fastest.key,
                format_ms(fastest.duration_ms)
            )?;
        }
        if let Some(slowest) = &perf.slowest {
            writeln!(
                self.out,
                "  Slowest:  {} ({})",
                slowest.key,
                format_ms(slowest.duration_ms)
            )?;
        }

        if failed_suites > 0 {
            writeln!(self.out)?;
            self.colored(&scheme::fail(), "Failed suites:")?;
            writeln!(self.out)?;
            for suite in run.failed_suites() {
                write!(self.out, "  ")?;
                self.colored(&scheme::suite_name(), &suite.name)?;
                writeln!(self.out)?;
                for message in suite.error_messages() {
                    for line in message.lines() {
                        write!(self.out, "    ")?;
                        self.colored(&scheme::muted(), line)?;
                        writeln!(self.out)?;
                    }
                }
            }
        }

        if let Some(path) = &outcome.report_path {
            self.write_path("Report", path)?;
        }
        Ok(())
    }

    /// `<label>: <path>` with the path highlighted.
    pub fn write_path(&mut self, label: &str, path: &Path) -> std::io::Result<()> {
        write!(self.out, "{}: ", label)?;
        self.colored(&scheme::path(), &path.display().to_string())?;
        writeln!(self.out)
    }
}

impl<W: WriteColor> ProgressSink for ConsoleReporter<W> {
    fn run_started(&mut self, suites: &[&SuiteConfig]) {
        if let Err(e) = self.write_plan(suites) {
            tracing::debug!("console write failed: {}", e);
        }
    }

    fn suite_finished(&mut self, result: &SuiteResult) {
        if let Err(e) = self.write_suite_result(result) {
            tracing::debug!("console write failed: {}", e);
        }
    }

    fn warning(&mut self, message: &str) {
        eprintln!("warning: {}", message);
    }
}

#[cfg(test)]
#[path = "text_tests.rs"]
mod tests;
