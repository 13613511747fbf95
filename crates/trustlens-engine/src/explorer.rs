//! Comparison session orchestration.
//!
//! ## Pipeline (in order):
//! 1. `select` runs the diff for a snapshot pair and binds expansion state
//! 2. `refresh` compiles the diff into a graph (memoised by comparison,
//!    diff content, options and expansion flags)
//! 3. Layout positions are computed or served from the topology cache
//! 4. The result is published under its ticket; stale results are dropped
//!
//! Any failure leaves the previously published graph and comparison in place
//! and is recorded as the session's last error.
//!
//! ## Logging
//! Each public operation is a boundary:
//! - `log_op_start!` at entry
//! - `log_op_end!` on success
//! - `log_op_error!` on failure

use crate::cache::{compile_key, layout_key, DigestCache};
use crate::publish::{Publisher, Ticket};
use crate::snapshot::Snapshot;
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::time::Instant;
use trustlens_core::diff::{compare, count, render_summary, ChangeCounts, DiffOutcome};
use trustlens_core::errors::{ExError, TrustLensError};
use trustlens_core::expansion::ExpansionState;
use trustlens_core::graph::{
    apply_positions, build, build_tree, compute_positions, layout, CompileOptions, Direction,
    Graph, LayoutConfig, Position,
};
use trustlens_core::importance::{count_hidden, ViewMode};
use trustlens_core::security::{categorize, SecurityChanges};
use trustlens_core::{log_op_end, log_op_error, log_op_start};
use trustlens_core_types::{ComparisonKey, RequestId};

/// Which snapshot of the selected pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Base,
    Compare,
}

/// The currently selected snapshot pair and its diff
#[derive(Debug, Clone)]
struct Comparison {
    key: ComparisonKey,
    base: Option<Value>,
    compare: Option<Value>,
    diff: DiffOutcome,
    counts: ChangeCounts,
}

/// Interactive comparison session
#[derive(Debug)]
pub struct Explorer {
    options: CompileOptions,
    layout_config: LayoutConfig,
    expansion: ExpansionState,
    comparison: Option<Comparison>,
    compile_cache: DigestCache<Graph>,
    layout_cache: DigestCache<Vec<Position>>,
    publisher: Publisher<Graph>,
    last_error: Option<ExError>,
}

impl Default for Explorer {
    fn default() -> Self {
        Self::new(CompileOptions::default(), LayoutConfig::default())
    }
}

impl Explorer {
    pub fn new(options: CompileOptions, layout_config: LayoutConfig) -> Self {
        Self {
            options,
            layout_config,
            expansion: ExpansionState::new(),
            comparison: None,
            compile_cache: DigestCache::default(),
            layout_cache: DigestCache::default(),
            publisher: Publisher::new(),
            last_error: None,
        }
    }

    /// Select a base and compare snapshot, diff them and rebuild the graph.
    ///
    /// Expansion flags are kept when the same pair is selected again and
    /// cleared for a different pair.
    ///
    /// # Errors
    ///
    /// - `ComparisonFailed` if the diff cannot be produced; the previous
    ///   comparison and graph stay selected
    /// - `GraphBuildFailed` / `LayoutFailed` from the rebuild that follows
    pub fn select(&mut self, base: Snapshot, compare_with: Snapshot) -> Result<&Graph, ExError> {
        let request_id = RequestId::new();
        let key = ComparisonKey::new(base.reference, compare_with.reference);
        log_op_start!(
            "select",
            request_id = %request_id,
            comparison = %key
        );
        let start = Instant::now();

        let diff = compare(base.document.as_ref(), compare_with.document.as_ref()).map_err(|e| {
            log_op_error!(
                "select",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64,
                request_id = %request_id
            );
            self.last_error = Some(e.clone());
            e
        })?;

        let counts = count(&diff);
        self.expansion.bind(&key);
        self.comparison = Some(Comparison {
            key,
            base: base.document,
            compare: compare_with.document,
            diff,
            counts,
        });
        self.last_error = None;

        log_op_end!(
            "select",
            duration_ms = start.elapsed().as_millis() as u64,
            request_id = %request_id,
            change_count = (counts.added + counts.removed + counts.changed) as u64
        );

        self.refresh()
    }

    /// Change counts of the selected comparison
    pub fn stats(&self) -> Option<ChangeCounts> {
        self.comparison.as_ref().map(|c| c.counts)
    }

    /// Raw diff of the selected comparison
    pub fn diff(&self) -> Option<&DiffOutcome> {
        self.comparison.as_ref().map(|c| &c.diff)
    }

    /// Text summary of the selected comparison
    pub fn summary(&self) -> Option<String> {
        self.comparison.as_ref().map(|c| render_summary(&c.diff))
    }

    /// Security-categorised changes of the selected comparison
    pub fn security(&self) -> Option<SecurityChanges> {
        self.comparison.as_ref().map(|c| categorize(&c.diff))
    }

    /// Fields of the compare snapshot the simplified view hides
    pub fn hidden_count(&self) -> Option<usize> {
        self.comparison
            .as_ref()
            .map(|c| c.compare.as_ref().map(count_hidden).unwrap_or(0))
    }

    pub fn comparison_key(&self) -> Option<&ComparisonKey> {
        self.comparison.as_ref().map(|c| &c.key)
    }

    pub fn options(&self) -> &CompileOptions {
        &self.options
    }

    pub fn layout_config(&self) -> &LayoutConfig {
        &self.layout_config
    }

    pub fn expansion(&self) -> &ExpansionState {
        &self.expansion
    }

    /// # Errors
    ///
    /// See [`Explorer::refresh`].
    pub fn set_show_unchanged(&mut self, show_unchanged: bool) -> Result<&Graph, ExError> {
        self.options.show_unchanged = show_unchanged;
        self.refresh()
    }

    /// # Errors
    ///
    /// See [`Explorer::refresh`].
    pub fn set_direction(&mut self, direction: Direction) -> Result<&Graph, ExError> {
        self.layout_config.direction = direction;
        self.refresh()
    }

    /// Timestamp stamped on top-level change nodes; no rebuild is triggered
    pub fn set_recorded_at(&mut self, recorded_at: Option<DateTime<Utc>>) {
        self.options.recorded_at = recorded_at;
    }

    pub fn set_view_mode(&mut self, view_mode: ViewMode) {
        self.options.view_mode = view_mode;
    }

    /// Flip the expansion flag of the node at `path` and rebuild.
    ///
    /// The current flag is read from the published graph; paths not in the
    /// graph start from expanded.
    ///
    /// # Errors
    ///
    /// See [`Explorer::refresh`].
    pub fn toggle(&mut self, path: &str) -> Result<&Graph, ExError> {
        let current = self
            .graph()
            .and_then(|g| g.node_by_path(path))
            .map(|n| n.expanded)
            .unwrap_or(true);
        let expanded = self.expansion.toggle(path, current);
        tracing::debug!(path, expanded, "toggled node");
        self.refresh()
    }

    /// Reserve a publication ticket for a rebuild
    pub fn issue_ticket(&mut self) -> Ticket {
        self.publisher.issue()
    }

    /// Publish a graph under `ticket`; false if a newer graph was already
    /// published
    pub fn publish(&mut self, ticket: Ticket, graph: Graph) -> bool {
        self.publisher.publish(ticket, graph)
    }

    /// Recompile and lay out the selected comparison, then publish.
    ///
    /// # Errors
    ///
    /// - `NoComparison` if no pair has been selected
    /// - `GraphBuildFailed` / `LayoutFailed`; the previous graph stays
    ///   published and the error is kept in [`Explorer::last_error`]
    pub fn refresh(&mut self) -> Result<&Graph, ExError> {
        let request_id = RequestId::new();
        log_op_start!(
            "refresh",
            request_id = %request_id,
            show_unchanged = self.options.show_unchanged
        );
        let start = Instant::now();
        let ticket = self.issue_ticket();

        let graph = self.render().map_err(|e| {
            log_op_error!(
                "refresh",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64,
                request_id = %request_id
            );
            self.last_error = Some(e.clone());
            e
        })?;

        let node_count = graph.nodes.len() as u64;
        let edge_count = graph.edges.len() as u64;
        self.publish(ticket, graph);
        self.last_error = None;

        log_op_end!(
            "refresh",
            duration_ms = start.elapsed().as_millis() as u64,
            request_id = %request_id,
            node_count = node_count,
            edge_count = edge_count
        );

        self.publisher
            .current()
            .ok_or_else(|| TrustLensError::NoComparisonSelected.into())
    }

    /// Compile (or fetch) and lay out the graph without publishing it
    fn render(&mut self) -> Result<Graph, ExError> {
        let comparison = self
            .comparison
            .as_ref()
            .ok_or_else(|| ExError::from(TrustLensError::NoComparisonSelected).with_op("refresh"))?;

        let entries: Vec<(&str, bool)> = self.expansion.entries().collect();
        let key = compile_key(
            &comparison.key.digest(),
            &comparison.diff,
            &self.options,
            &entries,
        )?;
        let options = &self.options;
        let expansion = &self.expansion;
        let mut graph = self
            .compile_cache
            .get_or_try_insert(&key, || build(&comparison.diff, options, expansion))?;

        let config = &self.layout_config;
        let key = layout_key(graph.nodes.len(), &graph.edges, config)?;
        let positions = self
            .layout_cache
            .get_or_try_insert(&key, || compute_positions(&graph.nodes, &graph.edges, config))?;
        apply_positions(&mut graph.nodes, &positions);
        Ok(graph)
    }

    /// Plain tree view of one side of the selected comparison.
    ///
    /// Uses the session's view mode, expansion flags and layout config.
    ///
    /// # Errors
    ///
    /// - `NoComparison` if no pair has been selected
    /// - `GraphBuildFailed` / `LayoutFailed`
    pub fn tree(&self, side: Side) -> Result<Graph, ExError> {
        log_op_start!("tree", side = ?side);
        let start = Instant::now();

        let result = self.tree_impl(side).map_err(|e| {
            log_op_error!(
                "tree",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64
            );
            e
        })?;

        log_op_end!(
            "tree",
            duration_ms = start.elapsed().as_millis() as u64,
            node_count = result.nodes.len() as u64,
            hidden = result.hidden_count as u64
        );
        Ok(result)
    }

    fn tree_impl(&self, side: Side) -> Result<Graph, ExError> {
        let comparison = self
            .comparison
            .as_ref()
            .ok_or_else(|| ExError::from(TrustLensError::NoComparisonSelected).with_op("tree"))?;
        let absent = Value::Null;
        let document = match side {
            Side::Base => comparison.base.as_ref(),
            Side::Compare => comparison.compare.as_ref(),
        }
        .unwrap_or(&absent);
        let graph = build_tree(document, &self.options, &self.expansion)?;
        layout(&graph, &self.layout_config)
    }

    /// The last successfully published graph
    pub fn graph(&self) -> Option<&Graph> {
        self.publisher.current()
    }

    /// Error from the most recent failed operation, cleared on success
    pub fn last_error(&self) -> Option<&ExError> {
        self.last_error.as_ref()
    }

    /// Compile cache (hits, misses)
    pub fn compile_cache_stats(&self) -> (u64, u64) {
        (self.compile_cache.hits(), self.compile_cache.misses())
    }

    /// Layout cache (hits, misses)
    pub fn layout_cache_stats(&self) -> (u64, u64) {
        (self.layout_cache.hits(), self.layout_cache.misses())
    }
}
