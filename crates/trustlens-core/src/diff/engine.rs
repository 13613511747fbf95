//! Diff computation engine.
//!
//! The entry point is [`compare`], which borrows two optional JSON documents
//! and produces a [`DiffOutcome`].

use crate::diff::model::{DiffEntry, DiffOutcome, DiffResult};
use crate::diff::path::{self, ROOT_PATH};
use crate::errors::{ExError, ExErrorKind, Result, TrustLensError};
use serde_json::{Map, Value};
use std::collections::BTreeSet;

/// Maximum object nesting followed before the comparison is abandoned.
pub const MAX_DIFF_DEPTH: usize = 512;

/// Compare a base snapshot against a compare snapshot.
///
/// - both absent (or `null`) → [`DiffOutcome::Empty`]
/// - base absent → whole-value `Added`, compare absent → whole-value `Removed`
/// - both objects → per-key [`DiffOutcome::Keyed`]
/// - any other pair → whole-value `Changed` or `Unchanged`
///
/// Only plain objects are recursed into. Arrays, scalars and kind mismatches
/// are compared as whole values and reported as a single `Changed` entry.
///
/// # Errors
///
/// - `ComparisonFailed` if nesting exceeded [`MAX_DIFF_DEPTH`]; the cause is
///   attached as the error source and no partial tree is returned
pub fn compare(old: Option<&Value>, new: Option<&Value>) -> std::result::Result<DiffOutcome, ExError> {
    let old = old.filter(|v| !v.is_null());
    let new = new.filter(|v| !v.is_null());

    let outcome = match (old, new) {
        (None, None) => Ok(DiffOutcome::Empty),
        (None, Some(new)) => Ok(DiffOutcome::Whole(DiffEntry::Added { value: new.clone() })),
        (Some(old), None) => Ok(DiffOutcome::Whole(DiffEntry::Removed { value: old.clone() })),
        (Some(Value::Object(old)), Some(Value::Object(new))) => {
            diff_objects(old, new, ROOT_PATH, 0).map(DiffOutcome::Keyed)
        }
        (Some(old), Some(new)) => Ok(DiffOutcome::Whole(leaf_entry(old, new))),
    };

    outcome.map_err(|e| {
        ExError::new(ExErrorKind::ComparisonFailed)
            .with_op("compare")
            .with_message("failed to compare snapshots")
            .with_source(e.into())
    })
}

/// Per-key comparison of two objects.
fn diff_objects(
    old: &Map<String, Value>,
    new: &Map<String, Value>,
    at: &str,
    depth: usize,
) -> Result<DiffResult> {
    if depth >= MAX_DIFF_DEPTH {
        return Err(TrustLensError::DepthLimitExceeded {
            path: at.to_string(),
            limit: MAX_DIFF_DEPTH,
        });
    }

    let keys: BTreeSet<&String> = old.keys().chain(new.keys()).collect();
    let mut result = DiffResult::new();

    for key in keys {
        let entry = match (old.get(key), new.get(key)) {
            (Some(Value::Object(old_child)), Some(new_value @ Value::Object(new_child))) => {
                let child_path = path::join(at, key);
                let children = diff_objects(old_child, new_child, &child_path, depth + 1)?;
                let hides_change = children.values().any(DiffEntry::has_changes);
                DiffEntry::Unchanged {
                    value: new_value.clone(),
                    children: hides_change.then_some(children),
                }
            }
            (Some(old_value), Some(new_value)) => leaf_entry(old_value, new_value),
            (None, Some(new_value)) => DiffEntry::Added {
                value: new_value.clone(),
            },
            (Some(old_value), None) => DiffEntry::Removed {
                value: old_value.clone(),
            },
            (None, None) => continue,
        };
        result.insert(key.clone(), entry);
    }

    tracing::debug!(path = at, entries = result.len(), "compared object");
    Ok(result)
}

/// Whole-value comparison of two present values.
fn leaf_entry(old: &Value, new: &Value) -> DiffEntry {
    if old == new {
        DiffEntry::Unchanged {
            value: new.clone(),
            children: None,
        }
    } else {
        DiffEntry::Changed {
            old_value: old.clone(),
            value: new.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::model::DiffStatus;
    use serde_json::json;

    #[test]
    fn test_both_absent_is_empty() {
        assert_eq!(compare(None, None).unwrap(), DiffOutcome::Empty);
        assert_eq!(
            compare(Some(&Value::Null), None).unwrap(),
            DiffOutcome::Empty
        );
    }

    #[test]
    fn test_kind_mismatch_is_single_change() {
        let old = json!({"keys": ["a", "b"]});
        let new = json!({"keys": {"0": "a"}});
        let DiffOutcome::Keyed(diff) = compare(Some(&old), Some(&new)).unwrap() else {
            panic!("expected keyed diff");
        };
        assert_eq!(diff["keys"].status(), DiffStatus::Changed);
        assert!(diff["keys"].children().is_none());
    }

    #[test]
    fn test_arrays_compared_as_whole_values() {
        let old = json!({"principalIDs": ["alice"]});
        let new = json!({"principalIDs": ["alice", "bob"]});
        let DiffOutcome::Keyed(diff) = compare(Some(&old), Some(&new)).unwrap() else {
            panic!("expected keyed diff");
        };
        assert_eq!(
            diff["principalIDs"],
            DiffEntry::Changed {
                old_value: json!(["alice"]),
                value: json!(["alice", "bob"]),
            }
        );
    }

    #[test]
    fn test_scalar_roots_compare_as_whole_value() {
        let outcome = compare(Some(&json!(1)), Some(&json!(2))).unwrap();
        assert_eq!(
            outcome,
            DiffOutcome::Whole(DiffEntry::Changed {
                old_value: json!(1),
                value: json!(2)
            })
        );
    }

    #[test]
    fn test_static_nested_object_is_pruned() {
        let doc = json!({"roles": {"root": {"threshold": 1}}, "expires": "x"});
        let DiffOutcome::Keyed(diff) = compare(Some(&doc), Some(&doc)).unwrap() else {
            panic!("expected keyed diff");
        };
        assert!(diff["roles"].children().is_none());
    }

    #[test]
    fn test_depth_limit_fails_whole_comparison() {
        let mut old = json!(1);
        let mut new = json!(2);
        for _ in 0..(MAX_DIFF_DEPTH + 1) {
            old = json!({ "n": old });
            new = json!({ "n": new });
        }
        let err = compare(Some(&old), Some(&new)).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::ComparisonFailed);
        assert!(err.source_error().is_some());
    }
}
