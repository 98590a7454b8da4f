use super::*;
use crate::net::types::{ChartKind, ResultData, VisualizationSpec};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

fn entry(id: &str, text: &str) -> HistoryEntry {
    HistoryEntry { id: id.to_owned(), text: text.to_owned(), timestamp: 1_700_000_000_000 }
}

fn ids(store: &QueryStore) -> Vec<&str> {
    store.state().history.iter().map(|e| e.id.as_str()).collect()
}

// =============================================================
// History
// =============================================================

#[test]
fn add_to_history_is_most_recent_first() {
    let mut store = QueryStore::new();
    store.add_to_history(entry("1", "first"));
    store.add_to_history(entry("2", "second"));
    store.add_to_history(entry("3", "third"));
    assert_eq!(ids(&store), vec!["3", "2", "1"]);
}

#[test]
fn add_to_history_keeps_duplicates() {
    let mut store = QueryStore::new();
    store.add_to_history(entry("1", "same"));
    store.add_to_history(entry("2", "same"));
    assert_eq!(store.state().history.len(), 2);
}

#[test]
fn history_length_tracks_adds_minus_removals() {
    let mut store = QueryStore::new();
    for i in 0..10 {
        store.add_to_history(entry(&i.to_string(), "q"));
    }
    store.remove_from_history("3");
    store.remove_from_history("7");
    store.remove_from_history("7");
    store.remove_from_history("missing");

    assert_eq!(store.state().history.len(), 8);
    assert_eq!(ids(&store), vec!["9", "8", "6", "5", "4", "2", "1", "0"]);
}

#[test]
fn remove_from_history_unknown_id_is_noop() {
    let mut store = QueryStore::new();
    store.add_to_history(entry("1", "a"));
    store.add_to_history(entry("2", "b"));
    let before = store.state().history.clone();

    store.remove_from_history("nope");
    assert_eq!(store.state().history, before);
}

#[test]
fn clear_history_empties() {
    let mut store = QueryStore::new();
    store.add_to_history(entry("1", "a"));
    store.clear_history();
    assert!(store.state().history.is_empty());
}

// =============================================================
// Results and AI response
// =============================================================

#[test]
fn set_loading_and_error_touch_only_their_fields() {
    let mut store = QueryStore::new();
    let data = ResultData { labels: vec!["Jan".into()], values: vec![1.0], growth: None, target: None };
    store.set_results(QueryResults::loaded(data.clone()));

    store.set_loading(true);
    store.set_error(Some("boom".into()));

    let results = &store.state().results;
    assert!(results.loading);
    assert_eq!(results.error.as_deref(), Some("boom"));
    assert_eq!(results.data, data);

    store.set_error(None);
    assert!(store.state().results.error.is_none());
}

#[test]
fn set_results_replaces_wholesale() {
    let mut store = QueryStore::new();
    store.set_loading(true);
    store.set_error(Some("old".into()));
    store.set_results(QueryResults::default());
    assert_eq!(store.state().results, QueryResults::default());
}

#[test]
fn set_results_stores_mismatched_lengths_as_is() {
    let mut store = QueryStore::new();
    let data = ResultData { labels: vec!["a".into(), "b".into()], values: vec![1.0], growth: None, target: None };
    store.set_results(QueryResults::loaded(data.clone()));
    assert_eq!(store.state().results.data, data);
}

#[test]
fn set_ai_response_merges() {
    let mut store = QueryStore::new();
    store.set_ai_response(AiResponsePatch { insights: Some(vec!["first".into()]), ..AiResponsePatch::default() });

    let viz = VisualizationSpec { kind: ChartKind::Bar, ..VisualizationSpec::default() };
    store.set_ai_response(AiResponsePatch { visualization: Some(viz), ..AiResponsePatch::default() });

    let response = &store.state().ai_response;
    assert_eq!(response.visualization.kind, ChartKind::Bar);
    assert_eq!(response.insights, vec!["first"]);
}

#[test]
fn set_suggestions_replaces_wholesale() {
    let mut store = QueryStore::new();
    store.set_suggestions(vec!["a".into(), "b".into()]);
    store.set_suggestions(vec!["c".into()]);
    assert_eq!(store.state().suggestions, vec!["c"]);
    store.set_suggestions(Vec::new());
    assert!(store.state().suggestions.is_empty());
}

#[test]
fn set_current_query_replaces_text() {
    let mut store = QueryStore::new();
    store.set_current_query("sales");
    store.set_current_query("sales by region");
    assert_eq!(store.state().current_query, "sales by region");
}

// =============================================================
// Listeners
// =============================================================

#[test]
fn listeners_notified_once_per_transition() {
    let mut store = QueryStore::new();
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    store.subscribe(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    store.set_current_query("a");
    store.set_loading(true);
    store.remove_from_history("missing");
    store.clear_history();
    assert_eq!(calls.load(Ordering::SeqCst), 4);
}

#[test]
fn listeners_see_post_transition_state() {
    let mut store = QueryStore::new();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    store.subscribe(move |state| {
        sink.lock().unwrap().push(state.current_query.clone());
    });

    store.set_current_query("one");
    store.set_current_query("two");
    assert_eq!(*seen.lock().unwrap(), vec!["one", "two"]);
}

#[test]
fn unsubscribe_stops_notifications() {
    let mut store = QueryStore::new();
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let id = store.subscribe(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    store.set_loading(true);
    assert!(store.unsubscribe(id));
    assert!(!store.unsubscribe(id));
    store.set_loading(false);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}
