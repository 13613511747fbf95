//! Human-readable summary renderer for snapshot diffs.

use crate::describe::format_inline;
use crate::diff::counter::count;
use crate::diff::model::{DiffEntry, DiffOutcome, DiffResult};
use crate::diff::path::{self, ROOT_PATH};
use crate::security::{categorize, SecurityCategory};

/// Render a Markdown/text summary of a [`DiffOutcome`].
///
/// Lists counts with percentages, the security-relevant changes by category,
/// and every non-unchanged entry as an indented tree.
pub fn render_summary(diff: &DiffOutcome) -> String {
    let mut out = String::new();

    out.push_str("## Snapshot Diff\n\n");

    let counts = count(diff);
    let pct = counts.percentages();
    out.push_str("| Status | Count | Share |\n|---|---|---|\n");
    out.push_str(&format!("| Added | {} | {}% |\n", counts.added, pct.added));
    out.push_str(&format!("| Removed | {} | {}% |\n", counts.removed, pct.removed));
    out.push_str(&format!("| Changed | {} | {}% |\n", counts.changed, pct.changed));
    out.push_str(&format!(
        "| Unchanged | {} | {}% |\n\n",
        counts.unchanged, pct.unchanged
    ));

    if !counts.has_changes() {
        out.push_str("_No changes detected._\n");
        return out;
    }

    let security = categorize(diff);
    out.push_str("### Security Changes\n\n");
    for category in SecurityCategory::ALL {
        let bucket = security.bucket(category);
        if bucket.is_empty() {
            continue;
        }
        out.push_str(&format!("- **{}** ({}):", category.title(), bucket.len()));
        for change in bucket {
            out.push_str(&format!(" `{}`", change.path));
        }
        out.push('\n');
    }
    out.push('\n');

    out.push_str("### Changes\n\n");
    match diff {
        DiffOutcome::Empty => {}
        DiffOutcome::Whole(entry) => render_entry(&mut out, ROOT_PATH, ROOT_PATH, entry, 0),
        DiffOutcome::Keyed(result) => render_result(&mut out, ROOT_PATH, result, 0),
    }

    out
}

fn render_result(out: &mut String, at: &str, result: &DiffResult, indent: usize) {
    for (key, entry) in result {
        if entry.has_changes() {
            render_entry(out, key, &path::join(at, key), entry, indent);
        }
    }
}

fn render_entry(out: &mut String, key: &str, at: &str, entry: &DiffEntry, indent: usize) {
    let pad = "  ".repeat(indent);
    match entry {
        DiffEntry::Added { value } => {
            out.push_str(&format!("{pad}- `+` **{key}** `{at}`: `{}`\n", format_inline(value)));
        }
        DiffEntry::Removed { value } => {
            out.push_str(&format!("{pad}- `-` **{key}** `{at}`: `{}`\n", format_inline(value)));
        }
        DiffEntry::Changed { old_value, value } => {
            out.push_str(&format!(
                "{pad}- `~` **{key}** `{at}`: `{}` → `{}`\n",
                format_inline(old_value),
                format_inline(value)
            ));
        }
        DiffEntry::Unchanged { children, .. } => {
            if let Some(children) = children {
                out.push_str(&format!("{pad}- **{key}**\n"));
                render_result(out, at, children, indent + 1);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::compare;
    use serde_json::json;

    #[test]
    fn test_identical_reports_no_changes() {
        let doc = json!({"a": 1});
        let summary = render_summary(&compare(Some(&doc), Some(&doc)).unwrap());
        assert!(summary.contains("| Unchanged | 1 | 100% |"));
        assert!(summary.contains("_No changes detected._"));
    }

    #[test]
    fn test_nested_changes_are_indented() {
        let old = json!({"rules": {"r1": {"pattern": "src/**"}}, "threshold": 1});
        let new = json!({"rules": {"r1": {"pattern": "src/**", "action": "allow"}}, "threshold": 2});
        let summary = render_summary(&compare(Some(&old), Some(&new)).unwrap());

        assert!(summary.contains("- **rules**\n  - **r1**\n    - `+` **action** `$.rules.r1.action`: `allow`\n"));
        assert!(summary.contains("- `~` **threshold** `$.threshold`: `1` → `2`\n"));
        assert!(summary.contains("- **Security Thresholds** (1): `$.threshold`"));
        assert!(!summary.contains("pattern"));
    }
}
