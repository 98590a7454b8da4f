use super::*;
use crate::net::types::{Aggregation, VisualizationSpec};
use crate::state::QueryResults;

fn chart_state() -> DashboardState {
    let mut state = DashboardState::default();
    state.results = QueryResults::loaded(ResultData {
        labels: vec!["Jan".into(), "Feb".into()],
        values: vec![50.0, 100.0],
        growth: Some(vec![2.5, -1.0]),
        target: None,
    });
    state.ai_response.visualization = VisualizationSpec {
        kind: ChartKind::Bar,
        title: "Sales".into(),
        description: "Monthly sales".into(),
        metrics: vec!["value".into()],
        aggregation: Aggregation::Sum,
    };
    state.ai_response.insights = vec!["February doubled January".into()];
    state
}

// =========================================================================
// results_view
// =========================================================================

#[test]
fn default_state_is_empty_view() {
    assert_eq!(results_view(&DashboardState::default()), ResultsView::Empty);
}

#[test]
fn error_takes_priority_over_loading() {
    let mut state = chart_state();
    state.results.loading = true;
    state.results.error = Some("boom".into());
    assert_eq!(results_view(&state), ResultsView::Error("boom"));
}

#[test]
fn loading_hides_stale_chart() {
    let mut state = chart_state();
    state.results.loading = true;
    assert_eq!(results_view(&state), ResultsView::Loading);
}

// =========================================================================
// render_results
// =========================================================================

#[test]
fn chart_view_includes_title_bars_and_insights() {
    let text = render_results(&chart_state());
    let lines: Vec<_> = text.lines().collect();
    assert_eq!(lines[0], "Sales");
    assert_eq!(lines[1], "Monthly sales");
    assert_eq!(lines[2], "[bar chart, sum]");
    assert!(lines[3].contains("Jan") && lines[3].contains(&"#".repeat(15)) && lines[3].contains("+2.5%"));
    assert!(lines[4].contains(&"#".repeat(30)) && lines[4].contains("-1.0%"));
    assert!(text.contains("Key Insights\n  - February doubled January"));
}

#[test]
fn unknown_chart_kind_renders_as_line_chart() {
    let mut state = chart_state();
    state.ai_response.visualization.kind = ChartKind::Other;
    assert_eq!(results_view(&state), ResultsView::Chart);

    let text = render_results(&state);
    assert_eq!(text.lines().nth(2), Some("[line chart, sum]"));
    assert!(text.contains(&"#".repeat(30)));
}

#[test]
fn error_view_shows_message() {
    let mut state = DashboardState::default();
    state.results.error = Some("Failed to process query".into());
    assert!(render_results(&state).starts_with("Error: Failed to process query\n"));
}

#[test]
fn pie_chart_shows_shares() {
    let data = ResultData {
        labels: vec!["A".into(), "B".into()],
        values: vec![1.0, 3.0],
        growth: None,
        target: None,
    };
    let text = render_chart(ChartKind::Pie, &data);
    assert!(text.lines().next().unwrap().ends_with(" 25.0%"));
    assert!(text.lines().nth(1).unwrap().ends_with(" 75.0%"));
}

#[test]
fn chart_skips_labels_without_values() {
    let data = ResultData { labels: vec!["A".into(), "B".into()], values: vec![1.0], growth: None, target: None };
    assert_eq!(render_chart(ChartKind::Line, &data).lines().count(), 1);
}

// =========================================================================
// history
// =========================================================================

#[test]
fn format_time_applies_offset() {
    // 2024-03-01T12:34:56Z
    let ts = 1_709_296_496_000;
    assert_eq!(format_time(ts, UtcOffset::UTC), "12:34:56");
    let plus_two = UtcOffset::from_hms(2, 0, 0).unwrap();
    assert_eq!(format_time(ts, plus_two), "14:34:56");
}

#[test]
fn empty_history_message() {
    assert_eq!(render_history(&[], UtcOffset::UTC), "No queries yet\n");
}

#[test]
fn history_lines_carry_text_and_id() {
    let entry = HistoryEntry { id: "abc".into(), text: "revenue".into(), timestamp: 0 };
    assert_eq!(render_history(&[entry], UtcOffset::UTC), "00:00:00  revenue  [abc]\n");
}
