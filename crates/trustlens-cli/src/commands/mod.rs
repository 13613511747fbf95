//! CLI subcommands and their shared flags

pub mod diff;
pub mod graph;
pub mod stats;
pub mod tree;

use crate::config::Settings;
use chrono::{DateTime, Utc};
use clap::{Args, ValueEnum};
use serde::Serialize;
use std::path::PathBuf;
use trustlens_core::errors::{ExError, ExErrorKind};
use trustlens_core::graph::Direction;
use trustlens_core::importance::ViewMode;
use trustlens_engine::Explorer;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum DirectionArg {
    Tb,
    Lr,
}

impl From<DirectionArg> for Direction {
    fn from(arg: DirectionArg) -> Self {
        match arg {
            DirectionArg::Tb => Direction::TopBottom,
            DirectionArg::Lr => Direction::LeftRight,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ModeArg {
    Simplified,
    Full,
}

impl From<ModeArg> for ViewMode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Simplified => ViewMode::Simplified,
            ModeArg::Full => ViewMode::Full,
        }
    }
}

/// Display flags; each one given overrides the config file
#[derive(Debug, Default, Args)]
pub struct ViewArgs {
    /// Include unchanged fields in the graph
    #[arg(long)]
    pub show_unchanged: bool,

    /// Layout direction
    #[arg(long, value_enum)]
    pub direction: Option<DirectionArg>,

    /// Field filter for the tree view
    #[arg(long, value_enum)]
    pub mode: Option<ModeArg>,

    /// Timestamp (RFC 3339) stamped on top-level changes and used for expiry notes
    #[arg(long)]
    pub recorded_at: Option<DateTime<Utc>>,
}

impl ViewArgs {
    pub fn apply(&self, mut settings: Settings) -> Settings {
        if self.show_unchanged {
            settings.display.show_unchanged = true;
        }
        if let Some(direction) = self.direction {
            settings.layout.direction = direction.into();
        }
        if let Some(mode) = self.mode {
            settings.display.view_mode = mode.into();
        }
        if self.recorded_at.is_some() {
            settings.display.recorded_at = self.recorded_at;
        }
        settings
    }
}

/// Where rendered output goes
#[derive(Debug, Default, Args)]
pub struct OutputArgs {
    /// Output file path (default: stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl OutputArgs {
    /// # Errors
    ///
    /// - `Io` if the output file cannot be written
    pub fn write(&self, text: &str) -> Result<(), ExError> {
        match &self.output {
            Some(path) => std::fs::write(path, text).map_err(|e| {
                ExError::new(ExErrorKind::Io)
                    .with_op("write_output")
                    .with_path(path.display().to_string())
                    .with_message(e.to_string())
            }),
            None => {
                print!("{}", text);
                Ok(())
            }
        }
    }
}

pub fn explorer(settings: Settings) -> Explorer {
    Explorer::new(settings.display, settings.layout)
}

/// # Errors
///
/// - `Serialization` if `value` cannot be rendered as JSON
pub fn to_json<T: Serialize>(value: &T) -> Result<String, ExError> {
    serde_json::to_string_pretty(value)
        .map(|mut text| {
            text.push('\n');
            text
        })
        .map_err(|e| {
            ExError::new(ExErrorKind::Serialization)
                .with_op("render_json")
                .with_message(e.to_string())
        })
}
