//! Security-oriented grouping of diff entries.
//!
//! Every added, removed or changed entry is placed in exactly one category
//! by matching its path (case-insensitive) against the category keywords in
//! a fixed order; the first match wins.

use crate::diff::model::{DiffEntry, DiffOutcome, DiffResult, DiffStatus};
use crate::diff::path::{self, ROOT_PATH};
use serde::Serialize;
use serde_json::Value;

/// Category of a security-relevant change
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum SecurityCategory {
    Expiration,
    Principals,
    Roles,
    Rules,
    Thresholds,
    Trust,
    Other,
}

impl SecurityCategory {
    /// Every category in match order
    pub const ALL: [SecurityCategory; 7] = [
        SecurityCategory::Expiration,
        SecurityCategory::Principals,
        SecurityCategory::Roles,
        SecurityCategory::Rules,
        SecurityCategory::Thresholds,
        SecurityCategory::Trust,
        SecurityCategory::Other,
    ];

    /// Category for a path; `Other` when no keyword matches
    pub fn for_path(path: &str) -> Self {
        let path = path.to_lowercase();
        if path.contains("expire") {
            SecurityCategory::Expiration
        } else if path.contains("principal") {
            SecurityCategory::Principals
        } else if path.contains("role") {
            SecurityCategory::Roles
        } else if path.contains("rule") {
            SecurityCategory::Rules
        } else if path.contains("threshold") {
            SecurityCategory::Thresholds
        } else if path.contains("trusted") {
            SecurityCategory::Trust
        } else {
            SecurityCategory::Other
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            SecurityCategory::Expiration => "Security Expiration",
            SecurityCategory::Principals => "Security Principals",
            SecurityCategory::Roles => "Access Roles",
            SecurityCategory::Rules => "Security Rules",
            SecurityCategory::Thresholds => "Security Thresholds",
            SecurityCategory::Trust => "Trust Settings",
            SecurityCategory::Other => "Other",
        }
    }

    pub fn impact(&self) -> Impact {
        match self {
            SecurityCategory::Expiration | SecurityCategory::Thresholds | SecurityCategory::Trust => {
                Impact::High
            }
            SecurityCategory::Principals | SecurityCategory::Roles | SecurityCategory::Rules => {
                Impact::Medium
            }
            SecurityCategory::Other => Impact::Low,
        }
    }
}

/// Review priority of a change
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Impact {
    High,
    Medium,
    Low,
}

/// One categorised change
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SecurityChange {
    pub path: String,
    pub status: DiffStatus,
    pub category: SecurityCategory,
    pub impact: Impact,
    #[serde(rename = "oldValue", skip_serializing_if = "Option::is_none")]
    pub old_value: Option<Value>,
    #[serde(rename = "newValue", skip_serializing_if = "Option::is_none")]
    pub new_value: Option<Value>,
}

/// Changes grouped by category, each list in diff order
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct SecurityChanges {
    pub expiration: Vec<SecurityChange>,
    pub principals: Vec<SecurityChange>,
    pub roles: Vec<SecurityChange>,
    pub rules: Vec<SecurityChange>,
    pub thresholds: Vec<SecurityChange>,
    pub trust: Vec<SecurityChange>,
    pub other: Vec<SecurityChange>,
}

impl SecurityChanges {
    pub fn bucket(&self, category: SecurityCategory) -> &[SecurityChange] {
        match category {
            SecurityCategory::Expiration => &self.expiration,
            SecurityCategory::Principals => &self.principals,
            SecurityCategory::Roles => &self.roles,
            SecurityCategory::Rules => &self.rules,
            SecurityCategory::Thresholds => &self.thresholds,
            SecurityCategory::Trust => &self.trust,
            SecurityCategory::Other => &self.other,
        }
    }

    fn bucket_mut(&mut self, category: SecurityCategory) -> &mut Vec<SecurityChange> {
        match category {
            SecurityCategory::Expiration => &mut self.expiration,
            SecurityCategory::Principals => &mut self.principals,
            SecurityCategory::Roles => &mut self.roles,
            SecurityCategory::Rules => &mut self.rules,
            SecurityCategory::Thresholds => &mut self.thresholds,
            SecurityCategory::Trust => &mut self.trust,
            SecurityCategory::Other => &mut self.other,
        }
    }

    /// Total number of categorised changes
    pub fn len(&self) -> usize {
        SecurityCategory::ALL
            .iter()
            .map(|c| self.bucket(*c).len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All changes ordered by impact, then by path
    pub fn by_impact(&self) -> Vec<&SecurityChange> {
        let mut all: Vec<&SecurityChange> = SecurityCategory::ALL
            .iter()
            .flat_map(|c| self.bucket(*c).iter())
            .collect();
        all.sort_by(|a, b| a.impact.cmp(&b.impact).then_with(|| a.path.cmp(&b.path)));
        all
    }

    fn push(&mut self, path: String, entry: &DiffEntry) {
        let (old_value, new_value) = match entry {
            DiffEntry::Added { value } => (None, Some(value.clone())),
            DiffEntry::Removed { value } => (Some(value.clone()), None),
            DiffEntry::Changed { old_value, value } => (Some(old_value.clone()), Some(value.clone())),
            DiffEntry::Unchanged { .. } => return,
        };
        let category = SecurityCategory::for_path(&path);
        self.bucket_mut(category).push(SecurityChange {
            path,
            status: entry.status(),
            category,
            impact: category.impact(),
            old_value,
            new_value,
        });
    }
}

/// Group every added, removed or changed entry of a diff by category.
///
/// Nested entries under unchanged containers are visited; added and removed
/// subtrees count once, at their own path.
pub fn categorize(diff: &DiffOutcome) -> SecurityChanges {
    let mut changes = SecurityChanges::default();
    match diff {
        DiffOutcome::Empty => {}
        DiffOutcome::Whole(entry) => visit(ROOT_PATH, entry, &mut changes),
        DiffOutcome::Keyed(result) => walk(result, ROOT_PATH, &mut changes),
    }
    changes
}

fn walk(result: &DiffResult, at: &str, changes: &mut SecurityChanges) {
    for (key, entry) in result {
        visit(&path::join(at, key), entry, changes);
    }
}

fn visit(at: &str, entry: &DiffEntry, changes: &mut SecurityChanges) {
    match entry.children() {
        Some(children) => walk(children, at, changes),
        None => changes.push(at.to_string(), entry),
    }
}
