//! Diff command
//!
//! Usage: trustlens diff <BASE> <COMPARE> [--format text|json] [--output <FILE>]

use super::{explorer, to_json, OutputArgs, OutputFormat};
use crate::config::Settings;
use crate::input::PairArgs;
use clap::Args;
use serde::Serialize;
use trustlens_core::diff::{ChangeCounts, DiffOutcome};
use trustlens_core::errors::{ExError, TrustLensError};
use trustlens_core::security::SecurityChanges;

#[derive(Debug, Args)]
pub struct DiffArgs {
    #[command(flatten)]
    pub pair: PairArgs,

    /// Markdown summary (text) or the raw diff tree with counts (json)
    #[arg(long, value_enum, default_value_t)]
    pub format: OutputFormat,

    #[command(flatten)]
    pub out: OutputArgs,
}

#[derive(Debug, Serialize)]
struct DiffReport<'a> {
    counts: ChangeCounts,
    diff: &'a DiffOutcome,
    security: SecurityChanges,
}

/// Execute diff command
pub fn execute(args: DiffArgs, settings: Settings) -> Result<(), ExError> {
    let (base, compare_with) = args.pair.load()?;
    let mut explorer = explorer(settings);
    explorer.select(base, compare_with)?;

    let missing = || ExError::from(TrustLensError::NoComparisonSelected);
    let text = match args.format {
        OutputFormat::Text => explorer.summary().ok_or_else(missing)?,
        OutputFormat::Json => to_json(&DiffReport {
            counts: explorer.stats().ok_or_else(missing)?,
            diff: explorer.diff().ok_or_else(missing)?,
            security: explorer.security().ok_or_else(missing)?,
        })?,
    };
    args.out.write(&text)
}
