//! Human-facing descriptions of snapshot values.
//!
//! Formatting for tooltips and text output, change explanations for changed
//! entries, and path-based security hints. The reference time for expiry
//! hints is always passed in by the caller.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// JSON kind of a value
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    Object,
    Array,
    String,
    Number,
    Boolean,
    Null,
}

impl ValueKind {
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Object(_) => ValueKind::Object,
            Value::Array(_) => ValueKind::Array,
            Value::String(_) => ValueKind::String,
            Value::Number(_) => ValueKind::Number,
            Value::Bool(_) => ValueKind::Boolean,
            Value::Null => ValueKind::Null,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ValueKind::Object => "object",
            ValueKind::Array => "array",
            ValueKind::String => "string",
            ValueKind::Number => "number",
            ValueKind::Boolean => "boolean",
            ValueKind::Null => "null",
        }
    }

    /// Objects and arrays
    pub fn is_composite(&self) -> bool {
        matches!(self, ValueKind::Object | ValueKind::Array)
    }
}

impl std::fmt::Display for ValueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Format a value for display.
///
/// Containers are pretty-printed JSON, strings are shown bare.
pub fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Object(_) | Value::Array(_) => {
            serde_json::to_string_pretty(value).unwrap_or_else(|_| "[Complex Object]".to_string())
        }
        other => other.to_string(),
    }
}

/// Single-line rendering used in summaries and labels
pub fn format_inline(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Short explanation of how a changed value differs
pub fn change_details(old: &Value, new: &Value) -> String {
    match (old, new) {
        (Value::String(a), Value::String(b)) if a.chars().count() != b.chars().count() => format!(
            "Length changed from {} to {} characters",
            a.chars().count(),
            b.chars().count()
        ),
        _ if ValueKind::of(old) != ValueKind::of(new) => format!(
            "Type changed from {} to {}",
            ValueKind::of(old),
            ValueKind::of(new)
        ),
        _ => "Value changed".to_string(),
    }
}

const SENSITIVE_PATTERNS: &[&str] = &["private", "secret", "password", "token", "key", "auth"];

/// Whether a path likely points at sensitive key material or credentials
pub fn is_sensitive(path: &str) -> bool {
    let path = path.to_lowercase();
    SENSITIVE_PATTERNS.iter().any(|p| path.contains(p))
}

/// Security hint for a node, if its path is security-relevant.
///
/// `now` is the reference instant for expiry calculations.
pub fn security_implication(path: &str, value: &Value, now: DateTime<Utc>) -> Option<String> {
    if path.contains("principals") || path.contains("keyval") {
        return Some("Contains security principal information".to_string());
    }

    if path.contains("threshold") {
        return Some(format!(
            "Requires {} signature(s) for validation",
            format_inline(value)
        ));
    }

    if path.contains("expires") {
        let expiry = value.as_str().and_then(parse_timestamp)?;
        if expiry < now {
            return Some("EXPIRED! This metadata has passed its expiration date".to_string());
        }
        let days = (expiry - now).num_days();
        if days < 30 {
            return Some(format!("Expiring soon! Only {} days remaining", days));
        }
        return Some(format!("Valid for {} more days", days));
    }

    if path.contains("trusted") && value == &Value::Bool(true) {
        return Some("Trusted security component".to_string());
    }

    if path.contains("rules") || path.contains("pattern") || path.contains("action") {
        return Some("Security policy rule component".to_string());
    }

    None
}

/// Parse an RFC 3339 timestamp or a bare `YYYY-MM-DD` date (midnight UTC)
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}
