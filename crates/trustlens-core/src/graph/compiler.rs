//! Diff tree → node/edge compilation.
//!
//! The compiler is a pure function of the diff, the display options and the
//! expansion state. Node ids are assigned in emission order starting at the
//! root (`node-0`), so equal inputs always yield equal graphs.

use crate::describe::{change_details, is_sensitive, security_implication, ValueKind};
use crate::diff::model::{DiffEntry, DiffOutcome, DiffResult, DiffStatus};
use crate::diff::path::{self, ROOT_PATH};
use crate::diff::MAX_DIFF_DEPTH;
use crate::errors::{ExError, ExErrorKind, Result, TrustLensError};
use crate::expansion::ExpansionState;
use crate::graph::model::{
    EdgeStyle, Graph, GraphEdge, GraphNode, NodeId, NodeMetadata, NodeType, Position,
};
use crate::importance::{classify, ViewMode};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Label of the node standing in for a whole-value diff of non-object roots
pub const WHOLE_VALUE_LABEL: &str = "(value)";

/// Display options for graph compilation
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(default, rename_all = "camelCase")]
pub struct CompileOptions {
    /// Emit unchanged leaves and unchanged containers without changes below
    pub show_unchanged: bool,
    /// Field filter for the plain tree view
    pub view_mode: ViewMode,
    /// Timestamp stamped onto top-level change nodes and used as the
    /// reference instant for expiry notes
    pub recorded_at: Option<DateTime<Utc>>,
}

impl CompileOptions {
    pub fn with_show_unchanged(mut self, show_unchanged: bool) -> Self {
        self.show_unchanged = show_unchanged;
        self
    }

    pub fn with_view_mode(mut self, view_mode: ViewMode) -> Self {
        self.view_mode = view_mode;
        self
    }

    pub fn with_recorded_at(mut self, recorded_at: DateTime<Utc>) -> Self {
        self.recorded_at = Some(recorded_at);
        self
    }
}

/// Compile a diff into a node/edge graph.
///
/// The graph always has exactly one root (`$`) standing for the compare
/// snapshot. Positions are left at the origin; run [`crate::graph::layout`]
/// afterwards.
///
/// # Errors
///
/// - `GraphBuildFailed` if an added or removed subtree nests deeper than
///   [`MAX_DIFF_DEPTH`]; no partial graph is returned
pub fn build(
    diff: &DiffOutcome,
    options: &CompileOptions,
    expansion: &ExpansionState,
) -> std::result::Result<Graph, ExError> {
    let mut builder = GraphBuilder::new(options, expansion);
    builder.compile(diff).map_err(|e| {
        ExError::new(ExErrorKind::GraphBuildFailed)
            .with_op("build")
            .with_message("failed to compile diff graph")
            .with_source(e.into())
    })?;
    let graph = builder.finish(0);
    tracing::debug!(
        nodes = graph.nodes.len(),
        edges = graph.edges.len(),
        "compiled diff graph"
    );
    Ok(graph)
}

/// Shared node/edge accumulator for the diff and tree compilers
pub(crate) struct GraphBuilder<'a> {
    pub(crate) options: &'a CompileOptions,
    pub(crate) expansion: &'a ExpansionState,
    nodes: Vec<GraphNode>,
    edges: Vec<GraphEdge>,
}

/// Node content before an id is assigned
pub(crate) struct NodeSpec {
    pub(crate) node_type: NodeType,
    pub(crate) label: String,
    pub(crate) path: String,
    pub(crate) value: Option<Value>,
    pub(crate) old_value: Option<Value>,
    pub(crate) new_value: Option<Value>,
    pub(crate) metadata: NodeMetadata,
    pub(crate) expanded: bool,
}

impl<'a> GraphBuilder<'a> {
    pub(crate) fn new(options: &'a CompileOptions, expansion: &'a ExpansionState) -> Self {
        Self {
            options,
            expansion,
            nodes: Vec::new(),
            edges: Vec::new(),
        }
    }

    pub(crate) fn finish(self, hidden_count: usize) -> Graph {
        Graph {
            nodes: self.nodes,
            edges: self.edges,
            hidden_count,
        }
    }

    /// Append a node and, when `parent` is given, the edge into it
    pub(crate) fn push(
        &mut self,
        node: NodeSpec,
        parent: Option<NodeId>,
        status: Option<DiffStatus>,
        style: EdgeStyle,
    ) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(GraphNode {
            id,
            node_type: node.node_type,
            label: node.label,
            value: node.value,
            old_value: node.old_value,
            new_value: node.new_value,
            path: node.path,
            metadata: node.metadata,
            expanded: node.expanded,
            position: Position::default(),
        });
        if let Some(parent) = parent {
            self.edges.push(GraphEdge {
                id: GraphEdge::edge_id(parent, id),
                source: parent,
                target: id,
                label: status
                    .filter(|s| *s != DiffStatus::Unchanged)
                    .map(|s| s.as_str().to_string()),
                status,
                style,
            });
        }
        id
    }

    /// Baseline metadata for a keyed value at a depth
    pub(crate) fn metadata(&self, key: &str, path: &str, value: &Value, depth: usize) -> NodeMetadata {
        let importance = classify(key, value, depth);
        let kind = ValueKind::of(value);
        NodeMetadata {
            value_kind: Some(kind),
            old_kind: None,
            new_kind: None,
            size: container_size(value),
            has_nested_changes: false,
            change_details: None,
            importance: importance.level,
            importance_reason: importance.reason,
            sensitive: is_sensitive(path),
            security_note: self
                .options
                .recorded_at
                .and_then(|now| security_implication(path, value, now)),
            recorded_at: None,
            schema_version: None,
        }
    }

    fn compile(&mut self, diff: &DiffOutcome) -> Result<()> {
        let compare = diff.compare_value();
        let root = self.push_root(diff, compare.as_ref());

        match diff {
            DiffOutcome::Empty => Ok(()),
            DiffOutcome::Keyed(result) => self.emit_result(root, ROOT_PATH, result, 1),
            DiffOutcome::Whole(DiffEntry::Added { value } | DiffEntry::Removed { value })
                if ValueKind::of(value).is_composite() =>
            {
                let status = diff_root_status(diff);
                self.emit_subtree(root, ROOT_PATH, value, status, 1)
            }
            DiffOutcome::Whole(entry) => self.emit_entry(
                root,
                WHOLE_VALUE_LABEL,
                &path::join(ROOT_PATH, WHOLE_VALUE_LABEL),
                entry,
                1,
            ),
        }
    }

    fn push_root(&mut self, diff: &DiffOutcome, compare: Option<&Value>) -> NodeId {
        let (kind, schema_version) = match diff {
            DiffOutcome::Empty => (None, None),
            DiffOutcome::Whole(entry) => (
                Some(ValueKind::of(entry.value())),
                entry.value().get("schemaVersion").cloned(),
            ),
            DiffOutcome::Keyed(result) => (
                Some(ValueKind::Object),
                result
                    .get("schemaVersion")
                    .filter(|e| e.status() != DiffStatus::Removed)
                    .map(|e| e.value().clone()),
            ),
        };

        let root_value = Value::Null;
        let mut metadata = self.metadata("root", ROOT_PATH, &root_value, 0);
        metadata.value_kind = kind;
        metadata.sensitive = false;
        metadata.has_nested_changes = !diff.is_unchanged();
        metadata.schema_version = schema_version;
        if let DiffOutcome::Keyed(result) = diff {
            metadata.size = Some(result.len());
        }

        self.push(
            NodeSpec {
                node_type: NodeType::Root,
                label: "Root".to_string(),
                path: ROOT_PATH.to_string(),
                value: compare.cloned(),
                old_value: None,
                new_value: None,
                metadata,
                expanded: true,
            },
            None,
            None,
            EdgeStyle::for_status(DiffStatus::Unchanged),
        )
    }

    fn emit_result(&mut self, parent: NodeId, at: &str, result: &DiffResult, depth: usize) -> Result<()> {
        for (key, entry) in result {
            self.emit_entry(parent, key, &path::join(at, key), entry, depth)?;
        }
        Ok(())
    }

    fn emit_entry(
        &mut self,
        parent: NodeId,
        key: &str,
        at: &str,
        entry: &DiffEntry,
        depth: usize,
    ) -> Result<()> {
        if !entry.has_changes() && !self.options.show_unchanged {
            return Ok(());
        }

        let status = entry.status();
        let expanded = self.expansion.resolve(at, true);
        let mut metadata = self.metadata(key, at, entry.value(), depth);
        if depth == 1 && status != DiffStatus::Unchanged {
            metadata.recorded_at = self.options.recorded_at;
        }

        let (old_value, new_value) = match entry {
            DiffEntry::Added { value } => (None, Some(value.clone())),
            DiffEntry::Removed { value } => (Some(value.clone()), None),
            DiffEntry::Changed { old_value, value } => {
                metadata.old_kind = Some(ValueKind::of(old_value));
                metadata.new_kind = Some(ValueKind::of(value));
                metadata.change_details = Some(change_details(old_value, value));
                (Some(old_value.clone()), Some(value.clone()))
            }
            DiffEntry::Unchanged { children, .. } => {
                metadata.has_nested_changes = children.is_some();
                (None, None)
            }
        };

        let id = self.push(
            NodeSpec {
                node_type: NodeType::from_status(status),
                label: key.to_string(),
                path: at.to_string(),
                value: Some(entry.value().clone()),
                old_value,
                new_value,
                metadata,
                expanded,
            },
            Some(parent),
            Some(status),
            EdgeStyle::for_status(status),
        );

        if !expanded {
            return Ok(());
        }

        match entry {
            DiffEntry::Unchanged {
                children: Some(children),
                ..
            } => self.emit_result(id, at, children, depth + 1),
            DiffEntry::Added { value } | DiffEntry::Removed { value } => {
                self.emit_subtree(id, at, value, status, depth + 1)
            }
            _ => Ok(()),
        }
    }

    /// Emit the keys or elements of an added or removed value with the same
    /// status. Nested nodes start collapsed and only their expanded
    /// descendants are walked.
    fn emit_subtree(
        &mut self,
        parent: NodeId,
        at: &str,
        value: &Value,
        status: DiffStatus,
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

        for (key, child_path, child) in children {
            let (old_value, new_value) = match status {
                DiffStatus::Removed => (Some(child.clone()), None),
                _ => (None, Some(child.clone())),
            };
            let metadata = self.metadata(&key, &child_path, child, depth);
            let expanded = self.expansion.resolve(&child_path, false);
            let nested = expanded && ValueKind::of(child).is_composite();
            let id = self.push(
                NodeSpec {
                    node_type: NodeType::from_status(status),
                    label: key,
                    path: child_path.clone(),
                    value: Some(child.clone()),
                    old_value,
                    new_value,
                    metadata,
                    expanded,
                },
                Some(parent),
                Some(status),
                EdgeStyle::for_status(status),
            );
            if nested {
                self.emit_subtree(id, &child_path, child, status, depth + 1)?;
            }
        }
        Ok(())
    }
}

fn diff_root_status(diff: &DiffOutcome) -> DiffStatus {
    match diff {
        DiffOutcome::Whole(entry) => entry.status(),
        _ => DiffStatus::Unchanged,
    }
}

fn container_size(value: &Value) -> Option<usize> {
    match value {
        Value::Object(map) => Some(map.len()),
        Value::Array(items) => Some(items.len()),
        _ => None,
    }
}
