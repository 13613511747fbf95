//! Graph command
//!
//! Usage: trustlens graph <BASE> <COMPARE> [--show-unchanged] [--direction tb|lr]
//!        [--toggle <PATH>]... [--output <FILE>]

use super::{explorer, to_json, OutputArgs, ViewArgs};
use crate::config::Settings;
use crate::input::PairArgs;
use clap::Args;
use trustlens_core::errors::{ExError, TrustLensError};

#[derive(Debug, Args)]
pub struct GraphArgs {
    #[command(flatten)]
    pub pair: PairArgs,

    #[command(flatten)]
    pub view: ViewArgs,

    /// Flip the expansion of the node at this path (repeatable, applied in order)
    #[arg(long = "toggle", value_name = "PATH")]
    pub toggles: Vec<String>,

    #[command(flatten)]
    pub out: OutputArgs,
}

/// Execute graph command
pub fn execute(args: GraphArgs, settings: Settings) -> Result<(), ExError> {
    let (base, compare_with) = args.pair.load()?;
    let mut explorer = explorer(args.view.apply(settings));
    explorer.select(base, compare_with)?;
    for path in &args.toggles {
        explorer.toggle(path)?;
    }
    let graph = explorer
        .graph()
        .ok_or_else(|| ExError::from(TrustLensError::NoComparisonSelected))?;
    args.out.write(&to_json(graph)?)
}
