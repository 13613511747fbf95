//! Core types shared across TrustLens crates
//!
//! This crate provides the leaf types used by the diff core, the engine
//! and the CLI:
//!
//! - **Correlation types**: RequestId tagging a single compile request
//! - **Snapshot identity**: SnapshotRef and the ComparisonKey of a base/compare pair
//! - **Schema constants**: Canonical field keys and event names for logging

pub mod correlation;
pub mod schema;
pub mod snapshot;

pub use correlation::RequestId;
pub use snapshot::{ComparisonKey, SnapshotRef};
