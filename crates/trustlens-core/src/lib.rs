//! TrustLens Core - structural diff and graph pipeline
//!
//! This crate provides the pure, synchronous building blocks for comparing
//! two security-metadata snapshots, including:
//! - A recursive JSON diff engine producing a typed diff tree
//! - Change counting and security-oriented categorisation of the diff
//! - Field importance tiers for progressive disclosure
//! - Compilation of a diff tree (or a single snapshot) into nodes and edges
//! - Deterministic layered layout of the compiled graph
//! - Path-keyed expansion state shared across rebuilds
//!
//! Nothing in this crate performs I/O or reads the clock.

pub mod describe;
pub mod diff;
pub mod errors;
pub mod expansion;
pub mod graph;
pub mod importance;
pub mod logging_facility;
pub mod security;

// Re-export commonly used types
pub use diff::{compare, count, ChangeCounts, DiffEntry, DiffOutcome, DiffResult};
pub use errors::{ExError, ExErrorKind, Result, TrustLensError};
pub use expansion::ExpansionState;
pub use graph::{build, build_tree, layout, CompileOptions, Direction, Graph, LayoutConfig};
pub use importance::{classify, ImportanceLevel, ViewMode};
