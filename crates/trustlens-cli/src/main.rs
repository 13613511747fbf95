//! TrustLens CLI
//!
//! Command-line interface for comparing security-metadata snapshots

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use trustlens_core::logging_facility::{self, Profile};

mod commands;
mod config;
mod input;

#[derive(Debug, Parser)]
#[command(name = "trustlens")]
#[command(about = "TrustLens - Security metadata snapshot comparison", long_about = None)]
struct Cli {
    /// TOML file with [layout] and [display] tables
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log output format, written to stderr
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print the diff of two snapshots (summary or raw tree)
    Diff(commands::diff::DiffArgs),
    /// Print added/removed/changed/unchanged counts
    Stats(commands::stats::StatsArgs),
    /// Print the positioned change graph as JSON
    Graph(commands::graph::GraphArgs),
    /// Print the positioned tree view of a single snapshot as JSON
    Tree(commands::tree::TreeArgs),
}

fn main() {
    let cli = Cli::parse();

    logging_facility::init(match cli.log_format {
        LogFormat::Pretty => Profile::Development,
        LogFormat::Json => Profile::Production,
    });

    let result = config::Settings::load(cli.config.as_deref()).and_then(|settings| {
        match cli.command {
            Commands::Diff(args) => commands::diff::execute(args, settings),
            Commands::Stats(args) => commands::stats::execute(args, settings),
            Commands::Graph(args) => commands::graph::execute(args, settings),
            Commands::Tree(args) => commands::tree::execute(args, settings),
        }
    });

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
