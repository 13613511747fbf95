//! Field importance tiers for progressive disclosure.
//!
//! The simplified view shows only critical and important fields; the full
//! view shows everything. Classification is keyed on the field name alone
//! (case-insensitive) plus the depth, never on the node instance.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Disclosure tier of a field
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum ImportanceLevel {
    Critical,
    Important,
    Normal,
    Hidden,
}

/// Importance level with a short human-readable reason
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct Importance {
    pub level: ImportanceLevel,
    pub reason: &'static str,
}

/// Which fields a view should display
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    /// Critical and important fields only
    #[default]
    Simplified,
    /// Every field
    Full,
}

const IMPORTANT_FIELDS: &[(&str, &str)] = &[
    ("principals", "Security principals"),
    ("roles", "Access control roles"),
    ("rules", "Security policies"),
    ("githubapps", "GitHub integrations"),
    ("requirements", "Policy requirements"),
    ("authorizedprincipals", "Authorized users"),
    ("principalids", "Principal references"),
    ("pattern", "Rule pattern"),
    ("action", "Rule action"),
    ("identity", "User identity"),
    ("issuer", "Identity provider"),
    ("keytype", "Key algorithm"),
];

const HIDDEN_FIELDS: &[(&str, &str)] = &[
    ("type", "Technical metadata type"),
    ("schemaversion", "Technical schema version"),
    ("keyid_hash_algorithms", "Technical key details"),
    ("keyid", "Technical key identifier"),
    ("scheme", "Technical signature scheme"),
    ("public", "Raw key material"),
    ("keyval", "Raw key data"),
];

/// Classify a field by name and depth.
///
/// Depth 0 is always critical. `value` is accepted for signature stability
/// but does not currently influence the tier.
pub fn classify(key: &str, _value: &Value, depth: usize) -> Importance {
    if depth == 0 {
        return Importance {
            level: ImportanceLevel::Critical,
            reason: "Root level",
        };
    }

    let key = key.to_lowercase();

    if key.contains("expire") {
        return critical("Security expiration");
    }
    if key == "trusted" {
        return critical("Trust status");
    }
    if key == "threshold" {
        return critical("Security threshold");
    }

    if let Some(&(_, reason)) = IMPORTANT_FIELDS.iter().find(|(name, _)| *name == key) {
        return Importance {
            level: ImportanceLevel::Important,
            reason,
        };
    }
    if let Some(&(_, reason)) = HIDDEN_FIELDS.iter().find(|(name, _)| *name == key) {
        return Importance {
            level: ImportanceLevel::Hidden,
            reason,
        };
    }

    Importance {
        level: ImportanceLevel::Normal,
        reason: "Standard field",
    }
}

fn critical(reason: &'static str) -> Importance {
    Importance {
        level: ImportanceLevel::Critical,
        reason,
    }
}

/// Whether a field is shown in the given view mode
pub fn should_display(key: &str, value: &Value, depth: usize, mode: ViewMode) -> bool {
    match mode {
        ViewMode::Full => true,
        ViewMode::Simplified => matches!(
            classify(key, value, depth).level,
            ImportanceLevel::Critical | ImportanceLevel::Important
        ),
    }
}

/// Count fields the simplified view would hide.
///
/// The document itself sits at depth 0, so its top-level keys are classified
/// at depth 1, matching the tree view. Every nested object and array is
/// visited whether or not its own entry is visible. Array elements are keyed
/// as `[i]`.
pub fn count_hidden(tree: &Value) -> usize {
    count_hidden_at(tree, 1)
}

fn count_hidden_at(tree: &Value, depth: usize) -> usize {
    let tally = |key: &str, value: &Value| -> usize {
        let own = match classify(key, value, depth).level {
            ImportanceLevel::Hidden | ImportanceLevel::Normal => 1,
            ImportanceLevel::Critical | ImportanceLevel::Important => 0,
        };
        let nested = if value.is_object() || value.is_array() {
            count_hidden_at(value, depth + 1)
        } else {
            0
        };
        own + nested
    };

    match tree {
        Value::Object(map) => map.iter().map(|(k, v)| tally(k, v)).sum(),
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(i, v)| tally(&format!("[{}]", i), v))
            .sum(),
        _ => 0,
    }
}
