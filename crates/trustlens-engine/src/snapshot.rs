//! Snapshot documents paired with their identity.

use serde_json::Value;
use trustlens_core::errors::{ExError, ExErrorKind};
use trustlens_core_types::SnapshotRef;

/// One side of a comparison
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub reference: SnapshotRef,
    /// `None` when the snapshot does not exist on this side
    pub document: Option<Value>,
}

impl Snapshot {
    pub fn new(reference: SnapshotRef, document: Value) -> Self {
        Self {
            reference,
            document: Some(document),
        }
    }

    /// A side with no document, e.g. a file that does not exist at a commit
    pub fn absent(reference: SnapshotRef) -> Self {
        Self {
            reference,
            document: None,
        }
    }

    /// Content-addressed snapshot from an already parsed document
    pub fn from_value(file: impl Into<String>, document: Value) -> Self {
        let reference = SnapshotRef::from_content(file, document.to_string().as_bytes());
        Self::new(reference, document)
    }

    /// Parse a JSON document.
    ///
    /// # Errors
    ///
    /// - `InvalidSnapshot` if `bytes` is not valid JSON
    pub fn from_json(file: impl Into<String>, bytes: &[u8]) -> Result<Self, ExError> {
        let file = file.into();
        let document: Value = serde_json::from_slice(bytes).map_err(|e| {
            ExError::new(ExErrorKind::InvalidSnapshot)
                .with_op("parse_snapshot")
                .with_path(file.clone())
                .with_message(e.to_string())
        })?;
        Ok(Self::from_value(file, document))
    }
}
