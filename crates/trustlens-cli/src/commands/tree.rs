//! Tree command
//!
//! Usage: trustlens tree <BASE> <COMPARE> [--side base|compare] [--mode simplified|full]

use super::{explorer, to_json, OutputArgs, ViewArgs};
use crate::config::Settings;
use crate::input::PairArgs;
use clap::{Args, ValueEnum};
use trustlens_core::errors::ExError;
use trustlens_engine::Side;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SideArg {
    Base,
    Compare,
}

impl From<SideArg> for Side {
    fn from(arg: SideArg) -> Self {
        match arg {
            SideArg::Base => Side::Base,
            SideArg::Compare => Side::Compare,
        }
    }
}

#[derive(Debug, Args)]
pub struct TreeArgs {
    #[command(flatten)]
    pub pair: PairArgs,

    /// Snapshot to render
    #[arg(long, value_enum, default_value_t = SideArg::Compare)]
    pub side: SideArg,

    #[command(flatten)]
    pub view: ViewArgs,

    #[command(flatten)]
    pub out: OutputArgs,
}

/// Execute tree command
pub fn execute(args: TreeArgs, settings: Settings) -> Result<(), ExError> {
    let (base, compare_with) = args.pair.load()?;
    let mut explorer = explorer(args.view.apply(settings));
    explorer.select(base, compare_with)?;
    let graph = explorer.tree(args.side.into())?;
    args.out.write(&to_json(&graph)?)
}
