#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Explorer session scenarios: selection, rebuild triggers, caching,
//! last-request-wins and the error boundary.

use serde_json::{json, Value};
use trustlens_core::diff::MAX_DIFF_DEPTH;
use trustlens_core::errors::ExErrorKind;
use trustlens_core::graph::{Direction, Graph, NodeType};
use trustlens_core::importance::ViewMode;
use trustlens_core::logging_facility::{init_test_capture, EVENT_END_ERROR};
use trustlens_core_types::SnapshotRef;
use trustlens_engine::{Explorer, Side, Snapshot};

fn base() -> Value {
    json!({
        "schemaVersion": 1,
        "expires": "2024-01-01",
        "roles": {"a": {"threshold": 1}},
        "rules": {"r1": {"pattern": "src/**"}},
        "keyval": {"public": "abc"}
    })
}

fn head() -> Value {
    json!({
        "schemaVersion": 1,
        "expires": "2025-01-01",
        "roles": {},
        "rules": {"r1": {"pattern": "src/**", "action": "allow"}},
        "keyval": {"public": "abc"}
    })
}

fn selected() -> Explorer {
    let mut explorer = Explorer::default();
    explorer
        .select(
            Snapshot::from_value("root.json", base()),
            Snapshot::from_value("root.json", head()),
        )
        .unwrap();
    explorer
}

fn deep(depth: usize) -> Value {
    let mut v = json!(1);
    for _ in 0..depth {
        v = json!({ "n": v });
    }
    v
}

#[test]
fn test_select_publishes_graph_and_stats() {
    let explorer = selected();
    let stats = explorer.stats().unwrap();
    assert_eq!((stats.added, stats.removed, stats.changed), (1, 1, 1));

    let graph = explorer.graph().unwrap();
    assert_eq!(graph.roots().len(), 1);
    assert!(graph.node_by_path("$.rules.r1.action").is_some());
    assert!(graph.node_by_path("$.keyval").is_none());
    assert!(explorer.summary().unwrap().contains("$.roles.a"));
    assert_eq!(explorer.security().unwrap().expiration.len(), 1);
}

#[test]
fn test_show_unchanged_rebuilds() {
    let mut explorer = selected();
    let graph = explorer.set_show_unchanged(true).unwrap();
    assert!(graph.node_by_path("$.keyval").is_some());
    let graph = explorer.set_show_unchanged(false).unwrap();
    assert!(graph.node_by_path("$.keyval").is_none());
}

#[test]
fn test_toggle_collapses_and_restores() {
    let mut explorer = selected();
    let graph = explorer.toggle("$.rules").unwrap();
    assert!(!graph.node_by_path("$.rules").unwrap().expanded);
    assert!(graph.node_by_path("$.rules.r1").is_none());

    let graph = explorer.toggle("$.rules").unwrap();
    assert!(graph.node_by_path("$.rules.r1").is_some());
}

#[test]
fn test_toggle_opens_collapsed_subtree_node() {
    let mut explorer = Explorer::default();
    explorer
        .select(
            Snapshot::from_value("a.json", json!({})),
            Snapshot::from_value("b.json", json!({"roles": {"x": {"y": 1}}})),
        )
        .unwrap();
    let graph = explorer.graph().unwrap();
    assert!(!graph.node_by_path("$.roles.x").unwrap().expanded);
    assert!(graph.node_by_path("$.roles.x.y").is_none());

    let graph = explorer.toggle("$.roles.x").unwrap();
    assert!(graph.node_by_path("$.roles.x").unwrap().expanded);
    assert_eq!(graph.node_by_path("$.roles.x.y").unwrap().node_type, NodeType::Added);

    let graph = explorer.toggle("$.roles.x").unwrap();
    assert!(graph.node_by_path("$.roles.x.y").is_none());
    assert_eq!(graph.nodes.len(), 3);
}

#[test]
fn test_same_pair_keeps_expansion_new_pair_resets() {
    let mut explorer = selected();
    let first = explorer.comparison_key().unwrap().clone();
    explorer.toggle("$.rules").unwrap();

    explorer
        .select(
            Snapshot::from_value("root.json", base()),
            Snapshot::from_value("root.json", head()),
        )
        .unwrap();
    assert_eq!(explorer.comparison_key(), Some(&first));
    assert_eq!(explorer.expansion().len(), 1);

    explorer
        .select(
            Snapshot::from_value("root.json", head()),
            Snapshot::from_value("root.json", base()),
        )
        .unwrap();
    assert_ne!(explorer.comparison_key(), Some(&first));
    assert!(explorer.expansion().is_empty());
}

#[test]
fn test_reselect_with_new_content_recompiles() {
    let main = SnapshotRef::new("repo", "main", "root.json");
    let head = SnapshotRef::new("repo", "HEAD", "root.json");
    let mut explorer = Explorer::default();
    explorer
        .select(
            Snapshot::new(main.clone(), json!({"a": 1})),
            Snapshot::new(head.clone(), json!({"a": 1})),
        )
        .unwrap();
    assert!(explorer.graph().unwrap().node_by_path("$.a").is_none());

    let graph = explorer
        .select(
            Snapshot::new(main, json!({"a": 1})),
            Snapshot::new(head, json!({"a": 2})),
        )
        .unwrap();
    assert_eq!(graph.count_type(NodeType::Changed), 1);
    assert_eq!(explorer.stats().unwrap().changed, 1);
    assert_eq!(explorer.compile_cache_stats(), (0, 2));
}

#[test]
fn test_compile_and_layout_are_memoised() {
    let mut explorer = selected();
    explorer.refresh().unwrap();
    let (compile_hits, _) = explorer.compile_cache_stats();
    assert_eq!(compile_hits, 1);

    // Content-only change: same topology, layout reused
    explorer.set_recorded_at(Some("2024-06-01T00:00:00Z".parse().unwrap()));
    explorer.refresh().unwrap();
    let (_, compile_misses) = explorer.compile_cache_stats();
    let (layout_hits, _) = explorer.layout_cache_stats();
    assert_eq!(compile_misses, 2);
    assert!(layout_hits >= 2);
}

#[test]
fn test_direction_changes_layout_only() {
    let mut explorer = selected();
    let tb: Graph = explorer.graph().unwrap().clone();
    let lr = explorer.set_direction(Direction::LeftRight).unwrap().clone();

    assert_eq!(tb.nodes.len(), lr.nodes.len());
    let root_child_tb = tb.node_by_path("$.roles").unwrap().position;
    let root_child_lr = lr.node_by_path("$.roles").unwrap().position;
    assert!(root_child_tb.y > 0.0);
    assert!(root_child_lr.x > 0.0);
    assert_eq!(explorer.compile_cache_stats().0, 1);
}

#[test]
fn test_failed_select_keeps_previous_graph() {
    let mut explorer = selected();
    let before = explorer.graph().unwrap().clone();

    let err = explorer
        .select(
            Snapshot::from_value("a.json", deep(MAX_DIFF_DEPTH + 2)),
            Snapshot::from_value("b.json", deep(MAX_DIFF_DEPTH + 2)),
        )
        .unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::ComparisonFailed);
    assert_eq!(explorer.last_error().unwrap().kind(), ExErrorKind::ComparisonFailed);
    assert_eq!(explorer.graph().unwrap(), &before);
    assert_eq!(explorer.stats().unwrap().removed, 1);
}

#[test]
fn test_refresh_without_selection_fails() {
    let mut explorer = Explorer::default();
    let err = explorer.refresh().unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::NoComparison);
    assert!(explorer.graph().is_none());
}

#[test]
fn test_stale_ticket_is_dropped() {
    let mut explorer = selected();
    let published = explorer.graph().unwrap().clone();

    let slow = explorer.issue_ticket();
    let fast = explorer.issue_ticket();
    assert!(explorer.publish(fast, published.clone()));
    assert!(!explorer.publish(slow, Graph::default()));
    assert_eq!(explorer.graph().unwrap(), &published);
}

#[test]
fn test_tree_view_of_each_side() {
    let mut explorer = selected();
    let simplified = explorer.tree(Side::Compare).unwrap();
    assert!(simplified.node_by_path("$.keyval").is_none());
    assert_eq!(simplified.hidden_count, explorer.hidden_count().unwrap());

    explorer.set_view_mode(ViewMode::Full);
    let full = explorer.tree(Side::Base).unwrap();
    assert_eq!(full.node_by_path("$.keyval").unwrap().node_type, NodeType::Object);
    assert!(full.node_by_path("$.roles.a").is_some());
    assert_eq!(full.hidden_count, 0);
}

#[test]
fn test_boundary_events_emitted() {
    let capture = init_test_capture();
    let mut explorer = selected();
    explorer.refresh().unwrap();

    let select = capture.boundary("select");
    assert!(select.starts >= 1 && select.ends >= 1);
    assert!(capture.boundary("refresh").ends >= 2);
    assert!(capture
        .events_for_op("select")
        .iter()
        .all(|e| e.request_id().is_some()));

    let mut empty = Explorer::default();
    let _ = empty.refresh();
    let errors = capture.count_events(|e| {
        e.is("refresh", EVENT_END_ERROR) && e.field("err_code") == Some("ERR_NO_COMPARISON")
    });
    assert!(errors >= 1);
}
