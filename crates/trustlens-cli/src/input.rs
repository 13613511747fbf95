//! Snapshot file loading

use clap::Args;
use serde_json::Value;
use std::path::{Path, PathBuf};
use trustlens_core::errors::{ExError, ExErrorKind};
use trustlens_core_types::SnapshotRef;
use trustlens_engine::Snapshot;

/// The snapshot pair shared by the comparison commands
#[derive(Debug, Args)]
pub struct PairArgs {
    /// Base snapshot (JSON, or YAML by .yaml/.yml extension)
    pub base: PathBuf,

    /// Snapshot to compare against the base
    pub compare: PathBuf,

    /// Treat a missing file as an absent snapshot instead of an error
    #[arg(long)]
    pub allow_missing: bool,
}

impl PairArgs {
    /// # Errors
    ///
    /// See [`load`].
    pub fn load(&self) -> Result<(Snapshot, Snapshot), ExError> {
        Ok((
            load(&self.base, self.allow_missing)?,
            load(&self.compare, self.allow_missing)?,
        ))
    }
}

/// Read and parse one snapshot file.
///
/// # Errors
///
/// - `Io` if the file cannot be read (or is missing without `allow_missing`)
/// - `InvalidSnapshot` if it does not parse
pub fn load(path: &Path, allow_missing: bool) -> Result<Snapshot, ExError> {
    let name = path.display().to_string();
    if allow_missing && !path.exists() {
        tracing::debug!(path = %name, "snapshot missing, treating as absent");
        return Ok(Snapshot::absent(SnapshotRef::new("", "", name)));
    }

    let bytes = std::fs::read(path).map_err(|e| {
        ExError::new(ExErrorKind::Io)
            .with_op("load_snapshot")
            .with_path(name.clone())
            .with_message(e.to_string())
    })?;

    if is_yaml(path) {
        let document: Value = serde_yaml::from_slice(&bytes).map_err(|e| {
            ExError::new(ExErrorKind::InvalidSnapshot)
                .with_op("parse_snapshot")
                .with_path(name.clone())
                .with_message(e.to_string())
        })?;
        Ok(Snapshot::from_value(name, document))
    } else {
        Snapshot::from_json(name, &bytes)
    }
}

fn is_yaml(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"))
}
