//! Change counting over a diff tree.

use crate::diff::model::{DiffEntry, DiffOutcome, DiffResult, DiffStatus};
use serde::{Deserialize, Serialize};

/// Number of entries per status in a diff tree
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChangeCounts {
    pub added: usize,
    pub removed: usize,
    pub changed: usize,
    pub unchanged: usize,
}

/// Rounded share of each status, in whole percent
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChangePercentages {
    pub added: u32,
    pub removed: u32,
    pub changed: u32,
    pub unchanged: u32,
}

impl ChangeCounts {
    /// Total number of entries visited
    pub fn total(&self) -> usize {
        self.added + self.removed + self.changed + self.unchanged
    }

    /// True if anything was added, removed or changed
    pub fn has_changes(&self) -> bool {
        self.added + self.removed + self.changed > 0
    }

    /// Per-status percentages rounded half away from zero; all zero for an empty tree
    pub fn percentages(&self) -> ChangePercentages {
        let total = self.total();
        let pct = |n: usize| -> u32 {
            if total == 0 {
                0
            } else {
                ((n as f64 / total as f64) * 100.0).round() as u32
            }
        };
        ChangePercentages {
            added: pct(self.added),
            removed: pct(self.removed),
            changed: pct(self.changed),
            unchanged: pct(self.unchanged),
        }
    }

    fn record(&mut self, status: DiffStatus) {
        match status {
            DiffStatus::Added => self.added += 1,
            DiffStatus::Removed => self.removed += 1,
            DiffStatus::Changed => self.changed += 1,
            DiffStatus::Unchanged => self.unchanged += 1,
        }
    }
}

/// Count every entry of a diff outcome.
///
/// A whole-value outcome counts its root entry and any children; a keyed
/// outcome counts every entry at every depth. Display filters applied by the
/// graph compiler have no influence on these totals.
pub fn count(diff: &DiffOutcome) -> ChangeCounts {
    let mut counts = ChangeCounts::default();
    match diff {
        DiffOutcome::Empty => {}
        DiffOutcome::Whole(entry) => count_entry(entry, &mut counts),
        DiffOutcome::Keyed(result) => count_into(result, &mut counts),
    }
    counts
}

/// Count every entry of a per-key diff.
pub fn count_result(result: &DiffResult) -> ChangeCounts {
    let mut counts = ChangeCounts::default();
    count_into(result, &mut counts);
    counts
}

fn count_into(result: &DiffResult, counts: &mut ChangeCounts) {
    for entry in result.values() {
        count_entry(entry, counts);
    }
}

fn count_entry(entry: &DiffEntry, counts: &mut ChangeCounts) {
    counts.record(entry.status());
    if let Some(children) = entry.children() {
        count_into(children, counts);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_whole_value_counts_single_entry() {
        let diff = DiffOutcome::Whole(DiffEntry::Added {
            value: json!({"a": 1, "b": 2}),
        });
        assert_eq!(
            count(&diff),
            ChangeCounts {
                added: 1,
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_nested_children_are_counted() {
        let mut inner = DiffResult::new();
        inner.insert("action".into(), DiffEntry::Added { value: json!("allow") });
        inner.insert(
            "pattern".into(),
            DiffEntry::Unchanged {
                value: json!("src/**"),
                children: None,
            },
        );
        let mut top = DiffResult::new();
        top.insert(
            "r1".into(),
            DiffEntry::Unchanged {
                value: json!({}),
                children: Some(inner),
            },
        );
        let counts = count_result(&top);
        assert_eq!(counts.added, 1);
        assert_eq!(counts.unchanged, 2);
        assert_eq!(counts.total(), 3);
    }

    #[test]
    fn test_percentages() {
        let counts = ChangeCounts {
            added: 1,
            removed: 0,
            changed: 1,
            unchanged: 1,
        };
        let pct = counts.percentages();
        assert_eq!(pct.added, 33);
        assert_eq!(pct.changed, 33);
        assert_eq!(ChangeCounts::default().percentages(), ChangePercentages::default());
    }
}
