//! Turning a multi-cursor selection set into one logical text stream.

use crate::traits::EditorHost;
use crate::types::Range;

/// Joins the text covered by `ranges` into a single string.
///
/// Empty ranges are dropped and the rest are sorted by start position, so the
/// result does not depend on the order the cursors were created in. Fragments
/// whose ranges start on different lines are separated by a single `\n`;
/// fragments starting on the same line are concatenated as they are.
pub fn linearize<F>(ranges: &[Range], mut text_of: F) -> String
where
    F: FnMut(Range) -> String,
{
    let mut sorted: Vec<Range> = ranges.iter().copied().filter(|r| !r.is_empty()).collect();
    sorted.sort_by_key(|r| r.start);

    let mut text = String::new();
    let mut prev_line = None;
    for range in sorted {
        if prev_line.is_some_and(|line| line != range.start.line) {
            text.push('\n');
        }
        text.push_str(&text_of(range));
        prev_line = Some(range.start.line);
    }
    text
}

/// Non-empty ranges of every active selection, in host order.
pub fn selection_ranges<H: EditorHost + ?Sized>(host: &H) -> Vec<Range> {
    host.selections()
        .iter()
        .filter(|s| !s.is_empty())
        .map(|s| s.range())
        .collect()
}

/// The linearized text of the host's current selections.
pub fn selections_text<H: EditorHost + ?Sized>(host: &H) -> String {
    linearize(&selection_ranges(host), |range| host.text_in(range))
}
