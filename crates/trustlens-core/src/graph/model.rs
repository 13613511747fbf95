//! Node/edge graph types produced by the compilers and consumed by layout.

use crate::describe::ValueKind;
use crate::diff::model::DiffStatus;
use crate::importance::ImportanceLevel;
use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use serde_json::Value;

/// Pass-local node identifier, rendered `node-N`.
///
/// Ids are assigned in emission order and are only meaningful within one
/// compiled graph. Use the node path for anything that must survive a
/// recompile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "node-{}", self.0)
    }
}

impl Serialize for NodeId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Node classification
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    Root,
    Added,
    Removed,
    Changed,
    Unchanged,
    /// Tree view only
    Object,
    /// Tree view only
    Array,
    /// Tree view only
    Value,
}

impl NodeType {
    pub fn from_status(status: DiffStatus) -> Self {
        match status {
            DiffStatus::Added => NodeType::Added,
            DiffStatus::Removed => NodeType::Removed,
            DiffStatus::Changed => NodeType::Changed,
            DiffStatus::Unchanged => NodeType::Unchanged,
        }
    }

    pub fn from_kind(kind: ValueKind) -> Self {
        match kind {
            ValueKind::Object => NodeType::Object,
            ValueKind::Array => NodeType::Array,
            _ => NodeType::Value,
        }
    }

    /// Tooltip heading for the node type
    pub fn description(&self) -> &'static str {
        match self {
            NodeType::Root => "Root Object",
            NodeType::Added => "Added",
            NodeType::Removed => "Removed",
            NodeType::Changed => "Changed",
            NodeType::Unchanged => "Unchanged",
            NodeType::Object => "Object",
            NodeType::Array => "Array",
            NodeType::Value => "Value",
        }
    }
}

/// Stroke colours used for edges
pub mod colors {
    pub const GREEN: &str = "#22c55e";
    pub const RED: &str = "#ef4444";
    pub const AMBER: &str = "#f59e0b";
    pub const SLATE: &str = "#94a3b8";
    pub const PURPLE: &str = "#a855f7";
}

/// Edge rendering hints
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
pub struct EdgeStyle {
    pub animated: bool,
    pub stroke: &'static str,
}

impl EdgeStyle {
    /// Style of an edge into a diff node with the given status
    pub fn for_status(status: DiffStatus) -> Self {
        let stroke = match status {
            DiffStatus::Added => colors::GREEN,
            DiffStatus::Removed => colors::RED,
            DiffStatus::Changed => colors::AMBER,
            DiffStatus::Unchanged => colors::SLATE,
        };
        Self {
            animated: status != DiffStatus::Unchanged,
            stroke,
        }
    }

    /// Style of an edge into a tree view node of the given kind
    pub fn for_kind(kind: ValueKind) -> Self {
        let stroke = match kind {
            ValueKind::Array => colors::GREEN,
            ValueKind::Object => colors::PURPLE,
            _ => colors::AMBER,
        };
        Self {
            animated: false,
            stroke,
        }
    }
}

/// Top-left corner of a node box
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// Derived facts about a node used by tooltips and filters
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NodeMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_kind: Option<ValueKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old_kind: Option<ValueKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_kind: Option<ValueKind>,
    /// Number of keys or elements for containers
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<usize>,
    pub has_nested_changes: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change_details: Option<String>,
    pub importance: ImportanceLevel,
    pub importance_reason: &'static str,
    pub sensitive: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub security_note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recorded_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema_version: Option<Value>,
}

/// A compiled node
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GraphNode {
    pub id: NodeId,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old_value: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_value: Option<Value>,
    pub path: String,
    pub metadata: NodeMetadata,
    pub expanded: bool,
    pub position: Position,
}

/// A compiled parent → child edge
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct GraphEdge {
    pub id: String,
    pub source: NodeId,
    pub target: NodeId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<DiffStatus>,
    pub style: EdgeStyle,
}

impl GraphEdge {
    pub fn edge_id(source: NodeId, target: NodeId) -> String {
        format!("edge-{}-{}", source, target)
    }
}

/// Compiled graph, in emission order
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Graph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
    /// Fields suppressed by the simplified tree view
    pub hidden_count: usize,
}

impl Graph {
    /// Nodes without an incoming edge
    pub fn roots(&self) -> Vec<&GraphNode> {
        self.nodes
            .iter()
            .filter(|n| !self.edges.iter().any(|e| e.target == n.id))
            .collect()
    }

    pub fn node(&self, id: NodeId) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn node_by_path(&self, path: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.path == path)
    }

    /// Direct children of a node in emission order
    pub fn children(&self, id: NodeId) -> Vec<&GraphNode> {
        self.edges
            .iter()
            .filter(|e| e.source == id)
            .filter_map(|e| self.node(e.target))
            .collect()
    }

    /// Number of nodes of the given type
    pub fn count_type(&self, node_type: NodeType) -> usize {
        self.nodes.iter().filter(|n| n.node_type == node_type).count()
    }
}
