//! Path-keyed expansion state.
//!
//! Expansion flags are keyed by node path, never by node id, so they survive
//! recompiles of the same comparison. Paths with no recorded flag fall back to
//! the default supplied by the caller.

use std::collections::BTreeMap;
use trustlens_core_types::ComparisonKey;

/// Per-path expanded/collapsed flags for one comparison
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpansionState {
    bound: Option<ComparisonKey>,
    entries: BTreeMap<String, bool>,
}

impl ExpansionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind the state to a comparison.
    ///
    /// Clears every flag when `key` differs from the bound comparison.
    /// Returns true if the state was reset.
    pub fn bind(&mut self, key: &ComparisonKey) -> bool {
        if self.bound.as_ref() == Some(key) {
            return false;
        }
        let reset = !self.entries.is_empty();
        self.entries.clear();
        self.bound = Some(key.clone());
        tracing::debug!(comparison = %key, reset, "expansion state bound");
        reset
    }

    /// The comparison the state is bound to
    pub fn bound(&self) -> Option<&ComparisonKey> {
        self.bound.as_ref()
    }

    /// Effective flag for `path`
    pub fn resolve(&self, path: &str, default: bool) -> bool {
        self.entries.get(path).copied().unwrap_or(default)
    }

    /// Flip the effective flag for `path` and return the new value
    pub fn toggle(&mut self, path: &str, default: bool) -> bool {
        let next = !self.resolve(path, default);
        self.entries.insert(path.to_string(), next);
        next
    }

    pub fn set(&mut self, path: &str, expanded: bool) {
        self.entries.insert(path.to_string(), expanded);
    }

    /// Drop all flags but keep the binding
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Recorded flags in path order
    pub fn entries(&self) -> impl Iterator<Item = (&str, bool)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
