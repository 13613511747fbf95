//! Single snapshot → node/edge compilation (plain tree view).

use crate::describe::ValueKind;
use crate::diff::path::{self, ROOT_PATH};
use crate::diff::MAX_DIFF_DEPTH;
use crate::errors::{ExError, ExErrorKind, Result, TrustLensError};
use crate::expansion::ExpansionState;
use crate::graph::compiler::{CompileOptions, GraphBuilder, NodeSpec};
use crate::graph::model::{EdgeStyle, Graph, NodeId, NodeType};
use crate::importance::{count_hidden, should_display, ViewMode};
use serde_json::Value;

/// Nodes shallower than this are expanded unless toggled
const DEFAULT_EXPANDED_DEPTH: usize = 2;

/// Compile one snapshot into a tree of object, array and value nodes.
///
/// Fields are filtered through the importance tiers of `options.view_mode`.
/// In simplified mode the graph reports how many fields were suppressed.
///
/// # Errors
///
/// - `GraphBuildFailed` if the value nests deeper than [`MAX_DIFF_DEPTH`]
pub fn build_tree(
    value: &Value,
    options: &CompileOptions,
    expansion: &ExpansionState,
) -> std::result::Result<Graph, ExError> {
    let mut builder = GraphBuilder::new(options, expansion);

    let mut metadata = builder.metadata("root", ROOT_PATH, value, 0);
    metadata.sensitive = false;
    metadata.schema_version = value.get("schemaVersion").cloned();
    let root = builder.push(
        NodeSpec {
            node_type: NodeType::Root,
            label: "Root".to_string(),
            path: ROOT_PATH.to_string(),
            value: (!ValueKind::of(value).is_composite()).then(|| value.clone()),
            old_value: None,
            new_value: None,
            metadata,
            expanded: true,
        },
        None,
        None,
        EdgeStyle::for_kind(ValueKind::of(value)),
    );

    walk(&mut builder, root, ROOT_PATH, value, 1).map_err(|e| {
        ExError::new(ExErrorKind::GraphBuildFailed)
            .with_op("build_tree")
            .with_message("failed to compile snapshot tree")
            .with_source(e.into())
    })?;

    let hidden = match options.view_mode {
        ViewMode::Simplified => count_hidden(value),
        ViewMode::Full => 0,
    };
    let graph = builder.finish(hidden);
    tracing::debug!(
        nodes = graph.nodes.len(),
        hidden = graph.hidden_count,
        "compiled snapshot tree"
    );
    Ok(graph)
}

fn walk(
    builder: &mut GraphBuilder<'_>,
    parent: NodeId,
    at: &str,
    value: &Value,
    depth: usize,
) -> Result<()> {
    if depth > MAX_DIFF_DEPTH {
        return Err(TrustLensError::DepthLimitExceeded {
            path: at.to_string(),
            limit: MAX_DIFF_DEPTH,
        });
    }

    let children: Vec<(String, String, &Value)> = match value {
        Value::Object(map) => map
            .iter()
            .map(|(k, v)| (k.clone(), path::join(at, k), v))
            .collect(),
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(i, v)| (format!("[{}]", i), path::join_index(at, i), v))
            .collect(),
        _ => return Ok(()),
    };

    let mode = builder.options.view_mode;
    for (key, child_path, child) in children {
        if !should_display(&key, child, depth, mode) {
            continue;
        }
        let kind = ValueKind::of(child);
        let expanded = builder
            .expansion
            .resolve(&child_path, depth < DEFAULT_EXPANDED_DEPTH);
        let metadata = builder.metadata(&key, &child_path, child, depth);
        let id = builder.push(
            NodeSpec {
                node_type: NodeType::from_kind(kind),
                label: key,
                path: child_path.clone(),
                value: (!kind.is_composite()).then(|| child.clone()),
                old_value: None,
                new_value: None,
                metadata,
                expanded,
            },
            Some(parent),
            None,
            EdgeStyle::for_kind(kind),
        );
        if expanded {
            walk(builder, id, &child_path, child, depth + 1)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc() -> Value {
        json!({
            "threshold": 1,
            "keyval": {"public": "abc"},
            "roles": {"root": {"threshold": 2, "keyid": "k1"}},
            "notes": ["a"]
        })
    }

    #[test]
    fn test_full_mode_emits_every_field() {
        let options = CompileOptions::default().with_view_mode(ViewMode::Full);
        let graph = build_tree(&doc(), &options, &ExpansionState::new()).unwrap();
        assert!(graph.node_by_path("$.keyval").is_some());
        assert!(graph.node_by_path("$.notes[0]").is_some());
        assert_eq!(graph.hidden_count, 0);
        assert_eq!(graph.node_by_path("$.roles").unwrap().node_type, NodeType::Object);
        assert_eq!(graph.node_by_path("$.notes").unwrap().node_type, NodeType::Array);
    }

    #[test]
    fn test_simplified_mode_filters_and_counts() {
        let graph = build_tree(&doc(), &CompileOptions::default(), &ExpansionState::new()).unwrap();
        assert!(graph.node_by_path("$.keyval").is_none());
        assert!(graph.node_by_path("$.notes").is_none());
        assert!(graph.node_by_path("$.roles").is_some());
        assert_eq!(graph.hidden_count, count_hidden(&doc()));
    }

    #[test]
    fn test_default_expansion_stops_at_depth_two() {
        let options = CompileOptions::default().with_view_mode(ViewMode::Full);
        let graph = build_tree(&doc(), &options, &ExpansionState::new()).unwrap();
        assert!(graph.node_by_path("$.roles").unwrap().expanded);
        let root_role = graph.node_by_path("$.roles.root").unwrap();
        assert!(!root_role.expanded);
        assert!(graph.node_by_path("$.roles.root.threshold").is_none());
    }

    #[test]
    fn test_toggle_expands_deeper_node() {
        let options = CompileOptions::default().with_view_mode(ViewMode::Full);
        let mut expansion = ExpansionState::new();
        expansion.set("$.roles.root", true);
        let graph = build_tree(&doc(), &options, &expansion).unwrap();
        assert!(graph.node_by_path("$.roles.root.threshold").is_some());
    }
}
