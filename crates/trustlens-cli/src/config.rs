//! CLI configuration file
//!
//! ```toml
//! [layout]
//! nodeWidth = 220.0
//! direction = "LR"
//!
//! [display]
//! showUnchanged = true
//! viewMode = "full"
//! ```
//!
//! Missing tables and keys fall back to the library defaults. Command-line
//! flags are applied on top by each command.

use serde::Deserialize;
use std::path::Path;
use trustlens_core::errors::{ExError, ExErrorKind};
use trustlens_core::graph::{CompileOptions, LayoutConfig};

/// Effective display and layout settings for one invocation
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub layout: LayoutConfig,
    pub display: CompileOptions,
}

impl Settings {
    /// Read settings from `path`, or use defaults when no file is given.
    ///
    /// # Errors
    ///
    /// - `Io` if the file cannot be read
    /// - `InvalidConfig` if it is not valid TOML for these tables
    pub fn load(path: Option<&Path>) -> Result<Self, ExError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path).map_err(|e| {
            ExError::new(ExErrorKind::Io)
                .with_op("load_config")
                .with_path(path.display().to_string())
                .with_message(e.to_string())
        })?;
        let settings = Self::parse(&text).map_err(|e| e.with_path(path.display().to_string()))?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(settings)
    }

    /// # Errors
    ///
    /// - `InvalidConfig` if `text` is not valid TOML for these tables
    pub fn parse(text: &str) -> Result<Self, ExError> {
        toml::from_str(text).map_err(|e| {
            ExError::new(ExErrorKind::InvalidConfig)
                .with_op("load_config")
                .with_message(e.to_string())
        })
    }
}
