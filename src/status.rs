//! Status bar label formatting.

use crate::metrics::{DocumentMetrics, Metrics};

/// Codicon shown in front of the counts unless configured otherwise
pub const DEFAULT_ICON: &str = "$(pencil)";

/// Render the status text for a document.
///
/// A one-word document with no selection reads `"<icon> 1 Word"`. Everything
/// else uses the full form, where a `" / n"` suffix appears only for a
/// non-zero selection count.
pub fn format_status(icon: &str, metrics: &DocumentMetrics) -> String {
    let DocumentMetrics { total, selected } = metrics;

    if total.words == 1 && selected.words == 0 {
        return format!("{} 1 Word", icon);
    }

    format!(
        "{} {}{} Words | {}{} Chars",
        icon,
        total.words,
        selection_suffix(selected.words),
        total.characters,
        selection_suffix(selected.characters),
    )
}

/// Shorthand for a document with no selection
pub fn format_total(icon: &str, total: Metrics) -> String {
    format_status(
        icon,
        &DocumentMetrics {
            total,
            selected: Metrics::default(),
        },
    )
}

fn selection_suffix(count: usize) -> String {
    if count == 0 {
        String::new()
    } else {
        format!(" / {}", count)
    }
}
