use serde::Deserialize;

/// A caret position within a document.
///
/// Positions are zero-indexed and column values are counted in grapheme clusters,
/// not bytes or chars. Ordering is lexicographic on `(line, col)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    /// Zero-based line number.
    pub line: u32,
    /// Zero-based column position in grapheme clusters.
    pub col: u32,
}

impl Position {
    /// The origin position (0, 0).
    pub const ZERO: Position = Position { line: 0, col: 0 };

    pub const fn new(line: u32, col: u32) -> Self {
        Self { line, col }
    }
}

/// A contiguous span of text.
///
/// Ranges are half-open intervals [start, end) with `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Range {
    /// The start position (inclusive).
    pub start: Position,
    /// The end position (exclusive).
    pub end: Position,
}

impl Range {
    /// Builds a range from two positions in either order.
    pub fn new(a: Position, b: Position) -> Self {
        if a <= b {
            Self { start: a, end: b }
        } else {
            Self { start: b, end: a }
        }
    }

    /// Zero-width ranges carry no text.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// One cursor of a (possibly multi-cursor) selection set.
///
/// The anchor stays put while the active end follows cursor movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub anchor: Position,
    pub active: Position,
}

impl Selection {
    pub fn new(anchor: Position, active: Position) -> Self {
        Self { anchor, active }
    }

    /// An empty selection: a plain caret.
    pub fn caret(pos: Position) -> Self {
        Self {
            anchor: pos,
            active: pos,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.anchor == self.active
    }

    pub fn range(&self) -> Range {
        Range::new(self.anchor, self.active)
    }

    /// Drops the selected extent, keeping the caret where the active end is.
    pub fn collapsed(&self) -> Self {
        Self::caret(self.active)
    }
}

/// Identifies one open editor (document view) of the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EditorId(pub u64);

/// Cursor movement primitives provided by the host.
///
/// Each motion has a selection-extending variant, chosen with the `select`
/// flag of [`EditorHost::move_cursor`](crate::traits::EditorHost::move_cursor).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Motion {
    Up,
    Down,
    Left,
    Right,
    /// Start of the current line.
    Home,
    /// End of the current line.
    End,
    WordLeft,
    WordRight,
    PageUp,
    PageDown,
    /// Start of the document.
    Top,
    /// End of the document.
    Bottom,
}

/// Placement hints understood by the host viewport.
///
/// There is no bottom placement; it is approximated by scrolling a page up
/// without moving the caret.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealPlacement {
    Center,
    Top,
}

/// One step of the recenter cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecenterPosition {
    /// Scroll so the caret line is centered.
    Center,
    /// Scroll so the caret line is the first visible line.
    Top,
    /// Scroll one page up without moving the caret.
    Bottom,
}

/// How the host says a selection change came about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionChangeKind {
    Keyboard,
    /// The user clicked somewhere; this clears any transient mark.
    Mouse,
    /// Caused by a command, including the ones issued by this crate.
    Command,
}

/// Notifications delivered by the host after the fact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostEvent {
    ActiveEditorChanged(Option<EditorId>),
    DocumentChanged(EditorId),
    SelectionChanged {
        editor: EditorId,
        kind: SelectionChangeKind,
    },
    /// The editor went away; its state is dropped.
    EditorClosed(EditorId),
}
