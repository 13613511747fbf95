//! Stats command
//!
//! Usage: trustlens stats <BASE> <COMPARE> [--format text|json]

use super::{explorer, to_json, OutputArgs, OutputFormat};
use crate::config::Settings;
use crate::input::PairArgs;
use clap::Args;
use serde::Serialize;
use trustlens_core::diff::{ChangeCounts, ChangePercentages};
use trustlens_core::errors::{ExError, TrustLensError};

#[derive(Debug, Args)]
pub struct StatsArgs {
    #[command(flatten)]
    pub pair: PairArgs,

    #[arg(long, value_enum, default_value_t)]
    pub format: OutputFormat,

    #[command(flatten)]
    pub out: OutputArgs,
}

#[derive(Debug, Serialize)]
struct StatsReport {
    #[serde(flatten)]
    counts: ChangeCounts,
    total: usize,
    percentages: ChangePercentages,
    /// Fields of the compare snapshot the simplified view hides
    hidden: usize,
}

/// Execute stats command
pub fn execute(args: StatsArgs, settings: Settings) -> Result<(), ExError> {
    let (base, compare_with) = args.pair.load()?;
    let mut explorer = explorer(settings);
    explorer.select(base, compare_with)?;

    let counts = explorer
        .stats()
        .ok_or_else(|| ExError::from(TrustLensError::NoComparisonSelected))?;
    let report = StatsReport {
        counts,
        total: counts.total(),
        percentages: counts.percentages(),
        hidden: explorer.hidden_count().unwrap_or(0),
    };

    let text = match args.format {
        OutputFormat::Text => render_text(&report),
        OutputFormat::Json => to_json(&report)?,
    };
    args.out.write(&text)
}

fn render_text(report: &StatsReport) -> String {
    let rows = [
        ("Added", report.counts.added, report.percentages.added),
        ("Removed", report.counts.removed, report.percentages.removed),
        ("Changed", report.counts.changed, report.percentages.changed),
        ("Unchanged", report.counts.unchanged, report.percentages.unchanged),
    ];
    let mut out = String::new();
    for (label, count, pct) in rows {
        out.push_str(&format!("{:<10} {:>6} ({}%)\n", format!("{}:", label), count, pct));
    }
    out.push_str(&format!("{:<10} {:>6}\n", "Total:", report.total));
    out.push_str(&format!("{:<10} {:>6}\n", "Hidden:", report.hidden));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_rows() {
        let counts = ChangeCounts {
            added: 1,
            removed: 0,
            changed: 1,
            unchanged: 2,
        };
        let text = render_text(&StatsReport {
            counts,
            total: counts.total(),
            percentages: counts.percentages(),
            hidden: 3,
        });
        assert!(text.contains("Added:          1 (25%)"));
        assert!(text.contains("Unchanged:      2 (50%)"));
        assert!(text.contains("Total:          4"));
        assert!(text.ends_with("Hidden:         3\n"));
    }
}
