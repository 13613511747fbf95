//! Diff-to-graph compilation and layout.
//!
//! ## Pipeline
//!
//! ```
//! use serde_json::json;
//! use trustlens_core::diff::compare;
//! use trustlens_core::expansion::ExpansionState;
//! use trustlens_core::graph::{build, layout, CompileOptions, LayoutConfig};
//!
//! let old = json!({"roles": {"a": {"threshold": 1}}});
//! let new = json!({"roles": {}});
//! let diff = compare(Some(&old), Some(&new)).unwrap();
//! let graph = build(&diff, &CompileOptions::default(), &ExpansionState::new()).unwrap();
//! let graph = layout(&graph, &LayoutConfig::default()).unwrap();
//! assert_eq!(graph.roots().len(), 1);
//! ```
//!
//! Compilation never reads the clock and never performs I/O; layout depends
//! only on topology and the layout configuration.

pub mod compiler;
pub mod layout;
pub mod model;
pub mod tree;

pub use compiler::{build, CompileOptions, WHOLE_VALUE_LABEL};
pub use layout::{apply_positions, compute_positions, layout, layout_nodes, Direction, LayoutConfig};
pub use model::{
    EdgeStyle, Graph, GraphEdge, GraphNode, NodeId, NodeMetadata, NodeType, Position,
};
pub use tree::build_tree;
