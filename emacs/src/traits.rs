use unicode_segmentation::UnicodeSegmentation;

use crate::error::EditRejected;
use crate::types::{EditorId, Motion, Position, Range, RevealPlacement, Selection};

/// Capabilities the host editor exposes for the active document.
///
/// Queries and mutations always refer to the editor returned by
/// [`active_editor`](EditorHost::active_editor). Every call is synchronous;
/// the host reports the resulting changes later through
/// [`Coordinator::notify`](crate::Coordinator::notify).
pub trait EditorHost {
    /// The focused editor, if any.
    fn active_editor(&self) -> Option<EditorId>;

    // Selections (primary first)
    fn selections(&self) -> Vec<Selection>;
    fn set_selections(&mut self, selections: Vec<Selection>);

    // Document queries
    fn line_count(&self) -> u32;
    fn line_text(&self, line: u32) -> String; // without the line terminator
    fn text_in(&self, range: Range) -> String;

    fn line_len(&self, line: u32) -> u32 {
        self.line_text(line).graphemes(true).count() as u32
    }

    // Atomic edits
    fn delete_ranges(&mut self, ranges: &[Range]) -> Result<(), EditRejected>;
    /// Paste `text` at every cursor, replacing whatever each one selects.
    fn paste(&mut self, text: &str) -> Result<(), EditRejected>;
    /// Insert a line break at every cursor without moving it.
    fn insert_line_break(&mut self) -> Result<(), EditRejected>;
    fn undo(&mut self) -> Result<(), EditRejected>;

    // Cursor movement; `select` extends each selection instead of relocating the caret
    fn move_cursor(&mut self, motion: Motion, select: bool);
    /// Native cancel: collapse to the primary caret.
    fn cancel_selection(&mut self);
    fn remove_secondary_cursors(&mut self);

    // Viewport
    fn reveal(&mut self, range: Range, placement: RevealPlacement);
    fn scroll_page_up(&mut self);

    fn primary_selection(&self) -> Option<Selection> {
        self.selections().into_iter().next()
    }

    fn last_line(&self) -> u32 {
        self.line_count().saturating_sub(1)
    }

    fn line_end(&self, line: u32) -> Position {
        Position {
            line,
            col: self.line_len(line),
        }
    }

    /// A line is blank when it holds nothing but whitespace.
    fn is_line_blank(&self, line: u32) -> bool {
        self.line_text(line).chars().all(char::is_whitespace)
    }
}

pub trait Clipboard {
    fn get(&mut self) -> Option<String>;
    fn set(&mut self, text: String);
    /// Empty the clipboard, whatever kind of content it holds.
    fn clear(&mut self);
}
