//! Layered layout.
//!
//! Ranks are longest-path distances from the sources of the graph, computed
//! over a topological order. Within a rank nodes start in emission order and
//! are reordered once by the barycentre of their parents. Breadth coordinates
//! are then packed, parents are centred over their children, and overlaps are
//! pushed apart left to right.
//!
//! Only topology, direction and box sizes influence the result, so a graph
//! whose node content changed but whose edges did not lays out identically.

use crate::errors::{ExError, ExErrorKind, TrustLensError};
use crate::graph::model::{Graph, GraphEdge, GraphNode, NodeId, Position};
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Flow direction of the ranks
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Ranks stacked vertically
    #[default]
    #[serde(rename = "TB", alias = "tb")]
    TopBottom,
    /// Ranks laid out horizontally
    #[serde(rename = "LR", alias = "lr")]
    LeftRight,
}

impl std::str::FromStr for Direction {
    type Err = ExError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "TB" => Ok(Direction::TopBottom),
            "LR" => Ok(Direction::LeftRight),
            other => Err(ExError::new(ExErrorKind::InvalidConfig)
                .with_op("parse_direction")
                .with_message(format!("unknown layout direction '{}'", other))),
        }
    }
}

/// Box sizes and spacing
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutConfig {
    pub node_width: f64,
    pub node_height: f64,
    /// Gap between consecutive ranks
    pub rank_sep: f64,
    /// Gap between neighbours within a rank
    pub node_sep: f64,
    pub direction: Direction,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            node_width: 220.0,
            node_height: 80.0,
            rank_sep: 100.0,
            node_sep: 50.0,
            direction: Direction::TopBottom,
        }
    }
}

impl LayoutConfig {
    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Box extent along the rank axis and across it
    fn extents(&self) -> (f64, f64) {
        match self.direction {
            Direction::TopBottom => (self.node_height, self.node_width),
            Direction::LeftRight => (self.node_width, self.node_height),
        }
    }
}

/// Lay out a compiled graph, returning a copy with positions assigned.
///
/// # Errors
///
/// - `LayoutFailed` with a `CycleDetected`, `DanglingEdge` or `DuplicateNode`
///   source when the edge list is not a DAG over the node list
pub fn layout(graph: &Graph, config: &LayoutConfig) -> std::result::Result<Graph, ExError> {
    let positions = compute_positions(&graph.nodes, &graph.edges, config)?;
    let mut out = graph.clone();
    apply_positions(&mut out.nodes, &positions);
    Ok(out)
}

/// Lay out a node list with its edges.
///
/// # Errors
///
/// See [`layout`].
pub fn layout_nodes(
    nodes: &[GraphNode],
    edges: &[GraphEdge],
    config: &LayoutConfig,
) -> std::result::Result<Vec<GraphNode>, ExError> {
    let positions = compute_positions(nodes, edges, config)?;
    let mut out = nodes.to_vec();
    apply_positions(&mut out, &positions);
    Ok(out)
}

/// Copy positions (in node order) onto nodes
pub fn apply_positions(nodes: &mut [GraphNode], positions: &[Position]) {
    for (node, position) in nodes.iter_mut().zip(positions) {
        node.position = *position;
    }
}

/// Positions for `nodes`, in the same order.
///
/// # Errors
///
/// See [`layout`].
pub fn compute_positions(
    nodes: &[GraphNode],
    edges: &[GraphEdge],
    config: &LayoutConfig,
) -> std::result::Result<Vec<Position>, ExError> {
    positions(nodes, edges, config).map_err(|e| {
        ExError::new(ExErrorKind::LayoutFailed)
            .with_op("layout")
            .with_message("failed to lay out graph")
            .with_source(e.into())
    })
}

fn positions(
    nodes: &[GraphNode],
    edges: &[GraphEdge],
    config: &LayoutConfig,
) -> crate::errors::Result<Vec<Position>> {
    if nodes.is_empty() {
        return Ok(Vec::new());
    }

    let mut dag: DiGraph<usize, ()> = DiGraph::with_capacity(nodes.len(), edges.len());
    let mut index: HashMap<NodeId, NodeIndex> = HashMap::with_capacity(nodes.len());
    for (i, node) in nodes.iter().enumerate() {
        if index.insert(node.id, dag.add_node(i)).is_some() {
            return Err(TrustLensError::DuplicateNode {
                node_id: node.id.to_string(),
            });
        }
    }
    for edge in edges {
        let endpoint = |id: NodeId| {
            index
                .get(&id)
                .copied()
                .ok_or_else(|| TrustLensError::DanglingEdge {
                    edge_id: edge.id.clone(),
                    node_id: id.to_string(),
                })
        };
        dag.add_edge(endpoint(edge.source)?, endpoint(edge.target)?, ());
    }

    let order = toposort(&dag, None).map_err(|cycle| TrustLensError::CycleDetected {
        node_id: nodes[dag[cycle.node_id()]].id.to_string(),
    })?;

    // Longest-path ranks
    let mut rank = vec![0usize; nodes.len()];
    for ix in &order {
        let r = rank[dag[*ix]];
        for child in dag.neighbors_directed(*ix, petgraph::Direction::Outgoing) {
            let c = dag[child];
            rank[c] = rank[c].max(r + 1);
        }
    }

    let depth = rank.iter().copied().max().unwrap_or(0) + 1;
    let mut layers: Vec<Vec<usize>> = vec![Vec::new(); depth];
    for (i, r) in rank.iter().enumerate() {
        layers[*r].push(i);
    }

    let parents_of = |i: usize| -> Vec<usize> {
        dag.neighbors_directed(NodeIndex::new(i), petgraph::Direction::Incoming)
            .map(|p| dag[p])
            .collect()
    };
    let children_of = |i: usize| -> Vec<usize> {
        dag.neighbors_directed(NodeIndex::new(i), petgraph::Direction::Outgoing)
            .map(|c| dag[c])
            .filter(|c| rank[*c] == rank[i] + 1)
            .collect()
    };

    // Barycentre down-sweep; sort_by is stable so ties keep emission order
    let mut slot = vec![0usize; nodes.len()];
    for (s, i) in layers[0].iter().enumerate() {
        slot[*i] = s;
    }
    for r in 1..layers.len() {
        let mut keyed: Vec<(f64, usize)> = layers[r]
            .iter()
            .enumerate()
            .map(|(s, i)| {
                let parents: Vec<usize> = parents_of(*i)
                    .into_iter()
                    .filter(|p| rank[*p] + 1 == r)
                    .collect();
                let key = if parents.is_empty() {
                    s as f64
                } else {
                    parents.iter().map(|p| slot[*p] as f64).sum::<f64>() / parents.len() as f64
                };
                (key, *i)
            })
            .collect();
        keyed.sort_by(|a, b| a.0.total_cmp(&b.0));
        layers[r] = keyed.into_iter().map(|(_, i)| i).collect();
        for (s, i) in layers[r].iter().enumerate() {
            slot[*i] = s;
        }
    }

    // Breadth coordinates, deepest rank first so parents can centre
    let (rank_extent, breadth_extent) = config.extents();
    let step = breadth_extent + config.node_sep;
    let mut breadth = vec![0.0f64; nodes.len()];
    for layer in layers.iter().rev() {
        for (s, i) in layer.iter().enumerate() {
            let children = children_of(*i);
            breadth[*i] = if children.is_empty() {
                s as f64 * step
            } else {
                children.iter().map(|c| breadth[*c]).sum::<f64>() / children.len() as f64
            };
        }
        for pair in 1..layer.len() {
            let floor = breadth[layer[pair - 1]] + step;
            if breadth[layer[pair]] < floor {
                breadth[layer[pair]] = floor;
            }
        }
    }

    let min_breadth = breadth.iter().copied().fold(f64::INFINITY, f64::min);
    let positions = (0..nodes.len())
        .map(|i| {
            let along = rank[i] as f64 * (rank_extent + config.rank_sep);
            let across = breadth[i] - min_breadth;
            match config.direction {
                Direction::TopBottom => Position { x: across, y: along },
                Direction::LeftRight => Position { x: along, y: across },
            }
        })
        .collect();

    tracing::debug!(nodes = nodes.len(), ranks = layers.len(), "computed layout");
    Ok(positions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::model::{EdgeStyle, NodeMetadata, NodeType};
    use crate::importance::ImportanceLevel;

    fn node(n: u32) -> GraphNode {
        GraphNode {
            id: NodeId(n),
            node_type: NodeType::Value,
            label: format!("n{}", n),
            value: None,
            old_value: None,
            new_value: None,
            path: format!("$.n{}", n),
            metadata: NodeMetadata {
                value_kind: None,
                old_kind: None,
                new_kind: None,
                size: None,
                has_nested_changes: false,
                change_details: None,
                importance: ImportanceLevel::Normal,
                importance_reason: "",
                sensitive: false,
                security_note: None,
                recorded_at: None,
                schema_version: None,
            },
            expanded: true,
            position: Position::default(),
        }
    }

    fn edge(s: u32, t: u32) -> GraphEdge {
        GraphEdge {
            id: GraphEdge::edge_id(NodeId(s), NodeId(t)),
            source: NodeId(s),
            target: NodeId(t),
            label: None,
            status: None,
            style: EdgeStyle::for_kind(crate::describe::ValueKind::Object),
        }
    }

    #[test]
    fn test_single_node_at_origin() {
        let pos = compute_positions(&[node(0)], &[], &LayoutConfig::default()).unwrap();
        assert_eq!(pos, vec![Position { x: 0.0, y: 0.0 }]);
    }

    #[test]
    fn test_parent_centred_over_children() {
        let nodes = vec![node(0), node(1), node(2)];
        let edges = vec![edge(0, 1), edge(0, 2)];
        let pos = compute_positions(&nodes, &edges, &LayoutConfig::default()).unwrap();
        assert_eq!(pos[1], Position { x: 0.0, y: 180.0 });
        assert_eq!(pos[2], Position { x: 270.0, y: 180.0 });
        assert_eq!(pos[0], Position { x: 135.0, y: 0.0 });
    }

    #[test]
    fn test_dangling_edge_fails() {
        let err = compute_positions(&[node(0)], &[edge(0, 7)], &LayoutConfig::default()).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::LayoutFailed);
        assert_eq!(
            err.source_error().map(|e| e.kind()),
            Some(ExErrorKind::DanglingEdge)
        );
    }

    #[test]
    fn test_cycle_fails() {
        let nodes = vec![node(0), node(1)];
        let err = compute_positions(&nodes, &[edge(0, 1), edge(1, 0)], &LayoutConfig::default())
            .unwrap_err();
        assert_eq!(
            err.source_error().map(|e| e.kind()),
            Some(ExErrorKind::CycleDetected)
        );
    }

    #[test]
    fn test_duplicate_node_fails() {
        let err = compute_positions(&[node(0), node(0)], &[], &LayoutConfig::default()).unwrap_err();
        assert_eq!(
            err.source_error().map(|e| e.kind()),
            Some(ExErrorKind::DuplicateNode)
        );
    }

    #[test]
    fn test_direction_parses() {
        assert_eq!("lr".parse::<Direction>().unwrap(), Direction::LeftRight);
        assert_eq!("TB".parse::<Direction>().unwrap(), Direction::TopBottom);
        assert!("diagonal".parse::<Direction>().is_err());
    }
}
