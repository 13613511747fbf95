//! TrustLens Engine - Orchestration layer
//!
//! Owns the interactive comparison session: runs the diff when a snapshot
//! pair is selected, recompiles and lays out the graph when display options
//! or expansion flags change, memoises both stages, and publishes results
//! with last-request-wins semantics. Every public operation is a logging
//! boundary.

pub mod cache;
pub mod explorer;
pub mod publish;
pub mod snapshot;

pub use explorer::{Explorer, Side};
pub use publish::{Publisher, Ticket};
pub use snapshot::Snapshot;
