//! Structural JSON diff.
//!
//! Compares two snapshot documents key by key and produces a typed diff tree
//! suitable for counting, categorisation, text rendering and graph
//! compilation.
//!
//! ## Entry point
//!
//! ```
//! use serde_json::json;
//! use trustlens_core::diff::{compare, count};
//!
//! let old = json!({"threshold": 1});
//! let new = json!({"threshold": 2});
//! let diff = compare(Some(&old), Some(&new)).unwrap();
//! assert_eq!(count(&diff).changed, 1);
//! ```
//!
//! ## Guarantees
//!
//! - **Determinism**: keys are visited in sorted order, so identical inputs
//!   produce identical diff trees and identical serialised output.
//! - **Pruning**: an unchanged container carries `children` only when some
//!   descendant differs.
//! - **All-or-nothing**: a failed comparison returns an error, never a
//!   partially built tree.

pub mod counter;
pub mod engine;
pub mod model;
pub mod path;
pub mod summary;

pub use counter::{count, count_result, ChangeCounts, ChangePercentages};
pub use engine::{compare, MAX_DIFF_DEPTH};
pub use model::{DiffEntry, DiffOutcome, DiffResult, DiffStatus};
pub use summary::render_summary;
