// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! HTML format report output.

use std::fmt::Write;

use super::view::{self, Card, Tone};
use super::{ChartData, ReportData, ReportFormatter, Theme};

/// Chart rendering library, loaded by the browser.
const CHART_JS_URL: &str = "https://cdn.jsdelivr.net/npm/chart.js@4.4.1/dist/chart.umd.min.js";

/// HTML format report formatter.
pub struct HtmlFormatter {
    theme: Theme,
}

impl HtmlFormatter {
    pub fn new(theme: Theme) -> Self {
        Self { theme }
    }

    /// CSS custom properties for the theme.
    fn palette(&self) -> &'static str {
        match self.theme {
            Theme::Light => {
                r#"--bg: #f5f7fa;
      --card-bg: #ffffff;
      --text: #1f2933;
      --muted: #616e7c;
      --border: #e4e7eb;
      --accent: #2563eb;"#
            }
            Theme::Dark => {
                r#"--bg: #1a1a2e;
      --card-bg: #16213e;
      --text: #eef;
      --muted: #8892b0;
      --border: #233554;
      --accent: #64ffda;"#
            }
        }
    }

    /// Generate CSS styles for the report.
    fn css(&self) -> String {
        format!(
            r#":root {{
      {palette}
      --good: #10b981;
      --bad: #ef4444;
      --warn: #f59e0b;
    }}
    * {{ box-sizing: border-box; margin: 0; padding: 0; }}
    body {{
      font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
      background: var(--bg);
      color: var(--text);
      padding: 2rem;
      line-height: 1.6;
    }}
    .container {{ max-width: 1200px; margin: 0 auto; }}
    header {{
      margin-bottom: 2rem;
      padding-bottom: 1rem;
      border-bottom: 1px solid var(--border);
    }}
    h1 {{ color: var(--accent); font-size: 1.5rem; }}
    h2 {{ font-size: 1.1rem; margin: 2rem 0 1rem; }}
    .meta {{ color: var(--muted); font-size: 0.875rem; margin-top: 0.5rem; }}
    .cards {{
      display: grid;
      grid-template-columns: repeat(auto-fill, minmax(200px, 1fr));
      gap: 1rem;
    }}
    .card {{
      background: var(--card-bg);
      padding: 1.5rem;
      border-radius: 8px;
      border-left: 4px solid var(--accent);
    }}
    .card.good {{ border-color: var(--good); }}
    .card.bad {{ border-color: var(--bad); }}
    .card.warn {{ border-color: var(--warn); }}
    .card-title {{ color: var(--muted); font-size: 0.75rem; text-transform: uppercase; }}
    .card-value {{ font-size: 2rem; font-weight: 600; margin-top: 0.5rem; }}
    .card-detail {{ color: var(--muted); font-size: 0.875rem; }}
    .good {{ color: var(--good); }}
    .bad {{ color: var(--bad); }}
    .warn {{ color: var(--warn); }}
    .charts {{
      display: grid;
      grid-template-columns: repeat(auto-fill, minmax(480px, 1fr));
      gap: 1rem;
    }}
    .chart {{ background: var(--card-bg); padding: 1rem; border-radius: 8px; }}
    .callout {{
      background: var(--card-bg);
      border-left: 4px solid var(--warn);
      padding: 1rem 1.5rem;
      border-radius: 8px;
    }}
    .empty {{ color: var(--muted); font-style: italic; }}
    table {{
      width: 100%;
      border-collapse: collapse;
      background: var(--card-bg);
      border-radius: 8px;
      overflow: hidden;
    }}
    th, td {{ padding: 0.75rem 1rem; text-align: left; }}
    th {{ background: rgba(0,0,0,0.05); color: var(--muted); font-size: 0.75rem; text-transform: uppercase; }}
    tr:not(:last-child) td {{ border-bottom: 1px solid var(--border); }}
    td.num {{ text-align: right; font-family: monospace; }}
    ul.errors {{ margin: 0.25rem 0 0 1.25rem; color: var(--muted); font-size: 0.875rem; }}"#,
            palette = self.palette()
        )
    }

    /// Render a metric card.
    fn render_card(card: &Card) -> String {
        let detail = card
            .detail
            .as_deref()
            .map(|d| format!("\n        <div class=\"card-detail\">{}</div>", escape(d)))
            .unwrap_or_default();
        format!(
            r#"      <div class="card {tone}">
        <div class="card-title">{title}</div>
        <div class="card-value">{value}</div>{detail}
      </div>"#,
            tone = card.tone.class(),
            title = escape(card.title),
            value = escape(&card.value),
        )
    }

    fn render_suites(data: &ReportData, out: &mut String) -> std::fmt::Result {
        writeln!(out, "    <h2>Suites</h2>")?;
        writeln!(out, "    <table>")?;
        writeln!(
            out,
            "      <thead><tr><th>Suite</th><th>Status</th><th>Tests</th><th>Failed</th><th>Skipped</th><th>Duration</th><th>Attempts</th><th>Coverage</th></tr></thead>"
        )?;
        writeln!(out, "      <tbody>")?;
        for row in view::suite_rows(&data.run.suites) {
            let tone = if row.passed { Tone::Good } else { Tone::Bad };
            let errors = if row.errors.is_empty() {
                String::new()
            } else {
                let items: String = row
                    .errors
                    .iter()
                    .map(|e| format!("<li>{}</li>", escape(e)))
                    .collect();
                format!("<ul class=\"errors\">{items}</ul>")
            };
            writeln!(
                out,
                r#"        <tr><td>{name}{errors}</td><td class="{tone}">{status}</td><td class="num">{tests}</td><td class="num">{failed}</td><td class="num">{skipped}</td><td class="num">{duration}</td><td class="num">{attempts}</td><td class="num">{coverage}</td></tr>"#,
                name = escape(&row.name),
                tone = tone.class(),
                status = row.status(),
                tests = row.tests,
                failed = row.failed,
                skipped = row.skipped,
                duration = row.duration,
                attempts = row.attempts,
                coverage = row.coverage.as_deref().unwrap_or("-"),
            )?;
        }
        writeln!(out, "      </tbody>")?;
        writeln!(out, "    </table>")
    }

    fn render_coverage(data: &ReportData, out: &mut String) -> std::fmt::Result {
        let rows = view::coverage_rows(data);
        if rows.is_empty() {
            return Ok(());
        }
        writeln!(out, "    <h2>Coverage</h2>")?;
        writeln!(out, "    <table>")?;
        writeln!(
            out,
            "      <thead><tr><th>Metric</th><th>Covered</th><th>Percentage</th><th>Threshold</th></tr></thead>"
        )?;
        writeln!(out, "      <tbody>")?;
        for row in rows {
            let tone = if row.met { Tone::Good } else { Tone::Bad };
            writeln!(
                out,
                r#"        <tr><td>{}</td><td class="num">{}</td><td class="num {}">{}</td><td class="num">{}</td></tr>"#,
                row.metric,
                row.covered,
                tone.class(),
                row.percentage,
                row.threshold
            )?;
        }
        writeln!(out, "      </tbody>")?;
        writeln!(out, "    </table>")
    }

    fn render_history(data: &ReportData, out: &mut String) -> std::fmt::Result {
        writeln!(out, "    <h2>Trends</h2>")?;
        if let Some(message) = view::no_history_message(data) {
            writeln!(out, "    <p class=\"empty\">{}</p>", escape(&message))?;
        } else if let Some(analysis) = &data.analysis {
            writeln!(out, "    <section class=\"cards\">")?;
            for row in view::trend_rows(&analysis.trends) {
                let card = Card {
                    title: row.label,
                    value: row.value,
                    detail: Some("vs previous run".to_string()),
                    tone: row.tone,
                };
                writeln!(out, "{}", Self::render_card(&card))?;
            }
            writeln!(out, "    </section>")?;
        }

        let Some(analysis) = &data.analysis else {
            return Ok(());
        };
        writeln!(out, "    <h2>Stability</h2>")?;
        let Some(rows) = view::stability_rows(&analysis.stability) else {
            return writeln!(
                out,
                "    <p class=\"empty\">{}</p>",
                escape(&view::insufficient_stability_message(data))
            );
        };
        writeln!(out, "    <table>")?;
        writeln!(out, "      <tbody>")?;
        for (label, value) in rows {
            writeln!(
                out,
                r#"        <tr><td>{label}</td><td class="num">{value}</td></tr>"#
            )?;
        }
        writeln!(out, "      </tbody>")?;
        writeln!(out, "    </table>")?;

        let flaky = view::flaky_lines(&analysis.stability);
        if !flaky.is_empty() {
            writeln!(out, "    <h2>Flaky Suites</h2>")?;
            writeln!(out, "    <div class=\"callout\">")?;
            writeln!(out, "      <ul>")?;
            for line in flaky {
                writeln!(out, "        <li>{}</li>", escape(&line))?;
            }
            writeln!(out, "      </ul>")?;
            writeln!(out, "    </div>")?;
        }
        Ok(())
    }

    fn render_environment(data: &ReportData, out: &mut String) -> std::fmt::Result {
        writeln!(out, "    <h2>Environment</h2>")?;
        writeln!(out, "    <table>")?;
        writeln!(out, "      <tbody>")?;
        for (label, value) in view::system_rows(&data.run.system) {
            writeln!(
                out,
                r#"        <tr><td>{}</td><td class="num">{}</td></tr>"#,
                escape(&label),
                escape(&value)
            )?;
        }
        writeln!(out, "      </tbody>")?;
        writeln!(out, "    </table>")
    }

    fn render_charts(charts: &ChartData, out: &mut String) -> anyhow::Result<()> {
        // "</" inside a script block would end it early.
        let json = serde_json::to_string(charts)?.replace("</", "<\\/");
        writeln!(out, "    <h2>Charts</h2>")?;
        writeln!(out, "    <section class=\"charts\">")?;
        for id in ["passRateChart", "durationChart", "coverageChart", "suiteChart"] {
            writeln!(
                out,
                "      <div class=\"chart\"><canvas id=\"{id}\"></canvas></div>"
            )?;
        }
        writeln!(out, "    </section>")?;
        write!(
            out,
            r#"    <script src="{CHART_JS_URL}"></script>
    <script>
      const data = {json};
      const line = (id, label, series) => new Chart(document.getElementById(id), {{
        type: 'line',
        data: {{ labels: series.labels, datasets: [{{ label, data: series.values, tension: 0.2 }}] }},
      }});
      const bar = (id, label, chart, max) => new Chart(document.getElementById(id), {{
        type: 'bar',
        data: {{ labels: chart.labels, datasets: [{{ label, data: chart.values }}] }},
        options: {{ scales: {{ y: {{ beginAtZero: true, max }} }} }},
      }});
      line('passRateChart', 'Pass rate (%)', data.pass_rate);
      line('durationChart', 'Duration (s)', data.duration);
      bar('coverageChart', 'Coverage (%)', data.coverage, 100);
      bar('suiteChart', 'Tests per suite', data.suite_tests, undefined);
    </script>
"#
        )?;
        Ok(())
    }
}

impl ReportFormatter for HtmlFormatter {
    fn format(&self, data: &ReportData) -> anyhow::Result<String> {
        let run = &data.run;
        let mut body = String::with_capacity(8 * 1024);

        writeln!(body, "    <section class=\"cards\">")?;
        for card in view::summary_cards(data) {
            writeln!(body, "{}", Self::render_card(&card))?;
        }
        writeln!(body, "    </section>")?;
        Self::render_suites(data, &mut body)?;
        Self::render_coverage(data, &mut body)?;
        Self::render_history(data, &mut body)?;
        if let Some(charts) = &data.charts {
            Self::render_charts(charts, &mut body)?;
        }
        Self::render_environment(data, &mut body)?;

        let commit = run.commit.as_deref().unwrap_or("unknown");
        let date = run.timestamp.format("%Y-%m-%d %H:%M UTC");
        let css = self.css();
        Ok(format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>Test Summary</title>
  <style>
    {css}
  </style>
</head>
<body>
  <div class="container">
    <header>
      <h1>Test Summary</h1>
      <div class="meta">Commit: {commit} &middot; {date}</div>
    </header>
{body}  </div>
</body>
</html>
"#,
            commit = escape(commit),
        ))
    }
}

/// Escape text for HTML element content and attribute values.
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
#[path = "html_tests.rs"]
mod tests;
