//! Plain-text views over `DashboardState` for terminal front ends.
//!
//! DESIGN
//! ======
//! `results_view` decides which panel applies (loading, error, empty,
//! chart) in the same priority order a graphical view would use. The
//! `render_*` functions turn that into text. Charts are approximated with
//! horizontal bars scaled to the largest absolute value; pie charts show
//! each slice's share instead.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use std::fmt::Write as _;

use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};

use crate::net::types::{ChartKind, ResultData};
use crate::state::{DashboardState, HistoryEntry};

const BAR_WIDTH: usize = 30;
const EMPTY_HINT: &str = "Enter a query to visualize your data";
const EXAMPLE_QUERY: &str = "Show me the sales trend for the last 6 months";

/// Which results panel the current state calls for.
#[derive(Debug, PartialEq)]
pub enum ResultsView<'a> {
    Loading,
    Error(&'a str),
    Empty,
    Chart,
}

#[must_use]
pub fn results_view(state: &DashboardState) -> ResultsView<'_> {
    let results = &state.results;
    if let Some(error) = results.error.as_deref() {
        return ResultsView::Error(error);
    }
    if results.loading {
        return ResultsView::Loading;
    }
    if results.data.labels.is_empty() {
        return ResultsView::Empty;
    }
    ResultsView::Chart
}

/// Full results panel: heading, chart and insights.
#[must_use]
pub fn render_results(state: &DashboardState) -> String {
    match results_view(state) {
        ResultsView::Loading => "Analyzing...\n".to_owned(),
        ResultsView::Error(error) => {
            format!("Error: {error}\nPlease try again with a different query\n")
        }
        ResultsView::Empty => format!("{EMPTY_HINT}\nExample: \"{EXAMPLE_QUERY}\"\n"),
        ResultsView::Chart => {
            let viz = &state.ai_response.visualization;
            let mut out = String::new();
            if !viz.title.is_empty() {
                let _ = writeln!(out, "{}", viz.title);
            }
            if !viz.description.is_empty() {
                let _ = writeln!(out, "{}", viz.description);
            }
            let _ = writeln!(out, "[{} chart, {}]", viz.kind.renderer().as_str(), viz.aggregation.as_str());
            out.push_str(&render_chart(viz.kind, &state.results.data));

            let insights = &state.ai_response.insights;
            if !insights.is_empty() {
                out.push_str("\nKey Insights\n");
                for insight in insights {
                    let _ = writeln!(out, "  - {insight}");
                }
            }
            out
        }
    }
}

/// Text chart for `data`. Rows with no value are skipped.
#[must_use]
pub fn render_chart(kind: ChartKind, data: &ResultData) -> String {
    let rows: Vec<(&str, f64)> = data
        .labels
        .iter()
        .zip(&data.values)
        .map(|(label, value)| (label.as_str(), *value))
        .collect();
    let label_width = rows.iter().map(|(l, _)| l.chars().count()).max().unwrap_or(0);

    let mut out = String::new();
    if kind.renderer() == ChartKind::Pie {
        let total: f64 = rows.iter().map(|(_, v)| v.abs()).sum();
        for (label, value) in &rows {
            let share = if total > 0.0 { value.abs() / total * 100.0 } else { 0.0 };
            let _ = writeln!(out, "  {label:<label_width$}  {value:>12}  {share:>5.1}%");
        }
        return out;
    }

    let max = rows.iter().map(|(_, v)| v.abs()).fold(0.0_f64, f64::max);
    for (i, (label, value)) in rows.iter().enumerate() {
        let bar = "#".repeat(bar_len(*value, max));
        let _ = write!(out, "  {label:<label_width$}  {value:>12}  {bar:<BAR_WIDTH$}");
        if let Some(growth) = data.growth.as_deref().and_then(|g| g.get(i)) {
            let _ = write!(out, "  {growth:+.1}%");
        }
        if let Some(target) = data.target.as_deref().and_then(|t| t.get(i)) {
            let _ = write!(out, "  target {target}");
        }
        out.push('\n');
    }
    out
}

/// History list, most recent first, one `time  text  [id]` line per entry.
#[must_use]
pub fn render_history(history: &[HistoryEntry], offset: UtcOffset) -> String {
    if history.is_empty() {
        return "No queries yet\n".to_owned();
    }
    let mut out = String::new();
    for entry in history {
        let _ = writeln!(out, "{}  {}  [{}]", format_time(entry.timestamp, offset), entry.text, entry.id);
    }
    out
}

/// Wall-clock time of an epoch-ms timestamp, `HH:MM:SS` in `offset`.
#[must_use]
pub fn format_time(timestamp_ms: i64, offset: UtcOffset) -> String {
    let nanos = i128::from(timestamp_ms) * 1_000_000;
    OffsetDateTime::from_unix_timestamp_nanos(nanos)
        .map(|t| t.to_offset(offset))
        .ok()
        .and_then(|t| t.format(&format_description!("[hour]:[minute]:[second]")).ok())
        .unwrap_or_else(|| "--:--:--".to_owned())
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
fn bar_len(value: f64, max: f64) -> usize {
    if max <= 0.0 || !value.is_finite() {
        return 0;
    }
    ((value.abs() / max) * BAR_WIDTH as f64).round() as usize
}
