//! Digest-keyed memoisation for compiled graphs and layouts.

use serde::Serialize;
use sha2::{Digest, Sha256};
use std::collections::{HashMap, VecDeque};
use trustlens_core::errors::{ExError, ExErrorKind};
use trustlens_core::graph::{GraphEdge, LayoutConfig};

/// Default number of entries kept per cache
pub const DEFAULT_CAPACITY: usize = 32;

/// Bounded map from hex digest to value, evicting the oldest insert first
#[derive(Debug, Clone)]
pub struct DigestCache<V> {
    capacity: usize,
    entries: HashMap<String, V>,
    order: VecDeque<String>,
    hits: u64,
    misses: u64,
}

impl<V: Clone> DigestCache<V> {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: HashMap::new(),
            order: VecDeque::new(),
            hits: 0,
            misses: 0,
        }
    }

    /// Cached value for `key`, or compute, store and return it.
    ///
    /// Errors from `compute` are returned and nothing is stored.
    pub fn get_or_try_insert<F>(&mut self, key: &str, compute: F) -> Result<V, ExError>
    where
        F: FnOnce() -> Result<V, ExError>,
    {
        if let Some(value) = self.entries.get(key) {
            self.hits += 1;
            return Ok(value.clone());
        }
        self.misses += 1;
        let value = compute()?;
        if self.order.len() >= self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.entries.remove(&oldest);
            }
        }
        self.order.push_back(key.to_string());
        self.entries.insert(key.to_string(), value.clone());
        Ok(value)
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }
}

impl<V: Clone> Default for DigestCache<V> {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

/// Incremental SHA-256 over length-delimited key parts
pub struct KeyHasher(Sha256);

impl KeyHasher {
    pub fn new() -> Self {
        Self(Sha256::new())
    }

    pub fn text(mut self, part: &str) -> Self {
        self.0.update(part.as_bytes());
        self.0.update([0u8]);
        self
    }

    /// Hash a part through its JSON serialisation
    pub fn json<T: Serialize + ?Sized>(self, part: &T) -> Result<Self, ExError> {
        let bytes = serde_json::to_string(part).map_err(|e| {
            ExError::new(ExErrorKind::Serialization)
                .with_op("cache_key")
                .with_message(e.to_string())
        })?;
        Ok(self.text(&bytes))
    }

    pub fn finish(self) -> String {
        hex::encode(self.0.finalize())
    }
}

impl Default for KeyHasher {
    fn default() -> Self {
        Self::new()
    }
}

/// Key of a compiled graph: comparison, diff content, display options and
/// expansion flags.
///
/// The diff takes part because a snapshot reference can carry different
/// documents across selections.
pub fn compile_key<D: Serialize, O: Serialize>(
    comparison_digest: &str,
    diff: &D,
    options: &O,
    expansion: &[(&str, bool)],
) -> Result<String, ExError> {
    Ok(KeyHasher::new()
        .text(comparison_digest)
        .json(diff)?
        .json(options)?
        .json(expansion)?
        .finish())
}

/// Key of a layout: node count, edge endpoints and layout configuration.
///
/// Node content does not participate, so recompiles that only change labels
/// or values reuse the cached positions.
pub fn layout_key(
    node_count: usize,
    edges: &[GraphEdge],
    config: &LayoutConfig,
) -> Result<String, ExError> {
    let topology: Vec<(u32, u32)> = edges.iter().map(|e| (e.source.0, e.target.0)).collect();
    Ok(KeyHasher::new()
        .json(&node_count)?
        .json(&topology)?
        .json(config)?
        .finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_hit_after_miss() {
        let mut cache: DigestCache<u32> = DigestCache::new(4);
        assert_eq!(cache.get_or_try_insert("k", || Ok(1)).unwrap(), 1);
        assert_eq!(cache.get_or_try_insert("k", || Ok(2)).unwrap(), 1);
        assert_eq!((cache.hits(), cache.misses()), (1, 1));
    }

    #[test]
    fn test_errors_are_not_cached() {
        let mut cache: DigestCache<u32> = DigestCache::new(4);
        let err = cache
            .get_or_try_insert("k", || Err(ExError::new(ExErrorKind::LayoutFailed)))
            .unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::LayoutFailed);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_oldest_entry_evicted() {
        let mut cache: DigestCache<u32> = DigestCache::new(2);
        for (k, v) in [("a", 1), ("b", 2), ("c", 3)] {
            cache.get_or_try_insert(k, || Ok(v)).unwrap();
        }
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get_or_try_insert("a", || Ok(9)).unwrap(), 9);
    }

    #[test]
    fn test_compile_key_follows_diff_content() {
        let options = ("opts", false);
        let before = compile_key("pair", &json!({"a": 1}), &options, &[]).unwrap();
        let after = compile_key("pair", &json!({"a": 2}), &options, &[]).unwrap();
        assert_ne!(before, after);
        assert_eq!(before, compile_key("pair", &json!({"a": 1}), &options, &[]).unwrap());
        assert_ne!(before, compile_key("pair", &json!({"a": 1}), &options, &[("$.a", false)]).unwrap());
    }

    #[test]
    fn test_layout_key_ignores_content_but_not_direction() {
        use trustlens_core::graph::Direction;
        let tb = LayoutConfig::default();
        let lr = LayoutConfig::default().with_direction(Direction::LeftRight);
        assert_eq!(layout_key(3, &[], &tb).unwrap(), layout_key(3, &[], &tb).unwrap());
        assert_ne!(layout_key(3, &[], &tb).unwrap(), layout_key(3, &[], &lr).unwrap());
        assert_ne!(layout_key(3, &[], &tb).unwrap(), layout_key(4, &[], &tb).unwrap());
    }
}
