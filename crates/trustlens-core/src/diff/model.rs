//! Diff tree types.
//!
//! All collections use `BTreeMap` for deterministic serialization.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Per-key diff of two objects, ordered by key.
pub type DiffResult = BTreeMap<String, DiffEntry>;

/// Status of a single diff entry
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum DiffStatus {
    Added,
    Removed,
    Changed,
    Unchanged,
}

impl DiffStatus {
    /// Lowercase name as used on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            DiffStatus::Added => "added",
            DiffStatus::Removed => "removed",
            DiffStatus::Changed => "changed",
            DiffStatus::Unchanged => "unchanged",
        }
    }
}

impl std::fmt::Display for DiffStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One node of the diff tree.
///
/// Serialises with a `status` tag, e.g.
/// `{"status":"changed","oldValue":1,"value":2}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum DiffEntry {
    /// Present only on the compare side
    Added { value: Value },
    /// Present only on the base side; `value` is the removed base value
    Removed { value: Value },
    /// Present on both sides with different values that are not both objects
    Changed {
        #[serde(rename = "oldValue")]
        old_value: Value,
        value: Value,
    },
    /// Present on both sides and equal, or an object whose descendants differ
    Unchanged {
        value: Value,
        /// Set iff at least one descendant entry is not unchanged
        #[serde(default, skip_serializing_if = "Option::is_none")]
        children: Option<DiffResult>,
    },
}

impl DiffEntry {
    /// Status tag of this entry
    pub fn status(&self) -> DiffStatus {
        match self {
            DiffEntry::Added { .. } => DiffStatus::Added,
            DiffEntry::Removed { .. } => DiffStatus::Removed,
            DiffEntry::Changed { .. } => DiffStatus::Changed,
            DiffEntry::Unchanged { .. } => DiffStatus::Unchanged,
        }
    }

    /// The entry's `value`: the new value, or the base value for removals
    pub fn value(&self) -> &Value {
        match self {
            DiffEntry::Added { value }
            | DiffEntry::Removed { value }
            | DiffEntry::Changed { value, .. }
            | DiffEntry::Unchanged { value, .. } => value,
        }
    }

    /// The base-side value of a changed entry
    pub fn old_value(&self) -> Option<&Value> {
        match self {
            DiffEntry::Changed { old_value, .. } => Some(old_value),
            _ => None,
        }
    }

    /// Nested per-key diff of an unchanged container hiding a change
    pub fn children(&self) -> Option<&DiffResult> {
        match self {
            DiffEntry::Unchanged { children, .. } => children.as_ref(),
            _ => None,
        }
    }

    /// True for anything other than a plain unchanged leaf
    pub fn has_changes(&self) -> bool {
        !matches!(
            self,
            DiffEntry::Unchanged {
                children: None,
                ..
            }
        )
    }
}

/// Result of comparing two snapshots.
///
/// Serialises as `null`, a single [`DiffEntry`], or a key → entry map.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum DiffOutcome {
    /// Both sides absent
    Empty,
    /// Whole-value diff: one side absent, or the roots are not both objects
    Whole(DiffEntry),
    /// Per-key diff of two objects
    Keyed(DiffResult),
}

impl DiffOutcome {
    /// True if no entry anywhere in the tree differs
    pub fn is_unchanged(&self) -> bool {
        match self {
            DiffOutcome::Empty => true,
            DiffOutcome::Whole(entry) => !entry.has_changes(),
            DiffOutcome::Keyed(result) => result.values().all(|e| !e.has_changes()),
        }
    }

    /// The compare snapshot as recorded in the diff, `None` if it was absent
    pub fn compare_value(&self) -> Option<Value> {
        match self {
            DiffOutcome::Empty | DiffOutcome::Whole(DiffEntry::Removed { .. }) => None,
            DiffOutcome::Whole(entry) => Some(entry.value().clone()),
            DiffOutcome::Keyed(result) => Some(Value::Object(
                result
                    .iter()
                    .filter(|(_, e)| e.status() != DiffStatus::Removed)
                    .map(|(k, e)| (k.clone(), e.value().clone()))
                    .collect(),
            )),
        }
    }
}
