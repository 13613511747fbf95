//! Snapshot identity types
//!
//! A snapshot is identified by the repository it was fetched from, the commit
//! hash and the metadata file name. Two snapshot identities form a
//! [`ComparisonKey`], which scopes expansion state and compile caches.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Identity of one metadata snapshot
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SnapshotRef {
    pub repository: String,
    pub commit: String,
    pub file: String,
}

impl SnapshotRef {
    /// Create a snapshot identity from its parts
    pub fn new(
        repository: impl Into<String>,
        commit: impl Into<String>,
        file: impl Into<String>,
    ) -> Self {
        Self {
            repository: repository.into(),
            commit: commit.into(),
            file: file.into(),
        }
    }

    /// Identity for a snapshot that has no repository coordinates
    ///
    /// The commit slot carries the SHA-256 of the content, so two anonymous
    /// snapshots compare equal iff their bytes are identical.
    pub fn from_content(file: impl Into<String>, bytes: &[u8]) -> Self {
        Self {
            repository: String::new(),
            commit: hex::encode(Sha256::digest(bytes)),
            file: file.into(),
        }
    }
}

impl std::fmt::Display for SnapshotRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let commit = self.commit.get(..12).unwrap_or(&self.commit);
        if self.repository.is_empty() {
            write!(f, "{}@{}", self.file, commit)
        } else {
            write!(f, "{}:{}@{}", self.repository, self.file, commit)
        }
    }
}

/// Identity of a base/compare snapshot pair
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ComparisonKey {
    pub base: SnapshotRef,
    pub compare: SnapshotRef,
}

impl ComparisonKey {
    pub fn new(base: SnapshotRef, compare: SnapshotRef) -> Self {
        Self { base, compare }
    }

    /// Stable hex digest of the pair, used as a cache key component
    pub fn digest(&self) -> String {
        let mut hasher = Sha256::new();
        for part in [
            &self.base.repository,
            &self.base.commit,
            &self.base.file,
            &self.compare.repository,
            &self.compare.commit,
            &self.compare.file,
        ] {
            hasher.update(part.as_bytes());
            hasher.update([0u8]);
        }
        hex::encode(hasher.finalize())
    }
}

impl std::fmt::Display for ComparisonKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.base, self.compare)
    }
}
