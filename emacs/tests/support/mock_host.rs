use ropey::Rope;
use unicode_segmentation::UnicodeSegmentation;
use emacs_mini::error::EditRejected;
use emacs_mini::traits::EditorHost;
use emacs_mini::types::{
    EditorId, HostEvent, Motion, Position, Range, RevealPlacement, Selection, SelectionChangeKind,
};

const PAGE_LINES: u32 = 10;

/// In-memory editor: one document, a multi-cursor selection set, and a queue
/// of the notifications a real host would deliver afterwards.
pub struct MockHost {
    pub id: EditorId,
    pub focused: bool,
    pub read_only: bool,
    pub reveals: Vec<(Range, RevealPlacement)>,
    pub page_scrolls: usize,
    rope: Rope,
    selections: Vec<Selection>,
    events: Vec<HostEvent>,
    history: Vec<String>,
}

impl MockHost {
    pub fn new(text: &str) -> Self {
        Self::with_id(text, EditorId(1))
    }

    pub fn with_id(text: &str, id: EditorId) -> Self {
        Self {
            id,
            focused: true,
            read_only: false,
            reveals: Vec::new(),
            page_scrolls: 0,
            rope: Rope::from_str(text),
            selections: vec![Selection::caret(Position::ZERO)],
            events: Vec::new(),
            history: Vec::new(),
        }
    }

    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    pub fn cursor(&self) -> Position {
        self.selections[0].active
    }

    pub fn set_cursor(&mut self, pos: Position) {
        self.selections = vec![Selection::caret(pos)];
    }

    /// Replace the selection set; `(anchor, active)` pairs, primary first.
    pub fn select(&mut self, pairs: &[(Position, Position)]) {
        self.selections = pairs
            .iter()
            .map(|&(anchor, active)| Selection::new(anchor, active))
            .collect();
    }

    pub fn current_selections(&self) -> &[Selection] {
        &self.selections
    }

    pub fn drain_events(&mut self) -> Vec<HostEvent> {
        std::mem::take(&mut self.events)
    }

    /// The user clicks somewhere.
    pub fn click(&mut self, pos: Position) {
        self.set_cursor(pos);
        self.selection_changed(SelectionChangeKind::Mouse);
    }

    /// The user types at the primary caret; an edit that is not a kill.
    pub fn type_text(&mut self, text: &str) {
        let at = self.pos_to_char(self.cursor());
        self.checkpoint();
        self.rope.insert(at, text);
        let caret = self.char_to_pos(at + text.chars().count());
        self.set_cursor(caret);
        self.document_changed();
        self.selection_changed(SelectionChangeKind::Keyboard);
    }

    fn line_str(&self, line: u32) -> String {
        if line as usize >= self.rope.len_lines() {
            return String::new();
        }
        let mut s = self.rope.line(line as usize).to_string();
        // Remove trailing newline if present
        if s.ends_with('\n') {
            s.pop();
        }
        if s.ends_with('\r') {
            s.pop();
        }
        s
    }

    fn pos_to_char(&self, pos: Position) -> usize {
        let last = self.rope.len_lines().saturating_sub(1);
        let line = (pos.line as usize).min(last);
        let line_start = self.rope.line_to_char(line);
        let offset: usize = self
            .line_str(line as u32)
            .graphemes(true)
            .take(pos.col as usize)
            .map(|g| g.chars().count())
            .sum();
        line_start + offset
    }

    fn char_to_pos(&self, idx: usize) -> Position {
        let idx = idx.min(self.rope.len_chars());
        let line = self.rope.char_to_line(idx);
        let mut remaining = idx - self.rope.line_to_char(line);
        let mut col = 0;
        for g in self.line_str(line as u32).graphemes(true) {
            let n = g.chars().count();
            if remaining < n {
                break;
            }
            remaining -= n;
            col += 1;
        }
        Position {
            line: line as u32,
            col,
        }
    }

    fn checkpoint(&mut self) {
        self.history.push(self.rope.to_string());
    }

    fn document_changed(&mut self) {
        self.events.push(HostEvent::DocumentChanged(self.id));
    }

    fn selection_changed(&mut self, kind: SelectionChangeKind) {
        self.events.push(HostEvent::SelectionChanged {
            editor: self.id,
            kind,
        });
    }

    fn writable(&self) -> Result<(), EditRejected> {
        if self.read_only {
            Err(EditRejected("document is read-only".to_string()))
        } else {
            Ok(())
        }
    }

    fn moved(&self, pos: Position, motion: Motion) -> Position {
        let last = self.last_line();
        let len = |line| self.line_len(line);
        match motion {
            Motion::Left if pos.col > 0 => Position::new(pos.line, pos.col - 1),
            Motion::Left if pos.line > 0 => Position::new(pos.line - 1, len(pos.line - 1)),
            Motion::Left => pos,
            Motion::Right if pos.col < len(pos.line) => Position::new(pos.line, pos.col + 1),
            Motion::Right if pos.line < last => Position::new(pos.line + 1, 0),
            Motion::Right => pos,
            Motion::Up | Motion::PageUp => {
                let step = if motion == Motion::Up { 1 } else { PAGE_LINES };
                if pos.line == 0 {
                    Position::ZERO
                } else {
                    let line = pos.line.saturating_sub(step);
                    Position::new(line, pos.col.min(len(line)))
                }
            }
            Motion::Down | Motion::PageDown => {
                let step = if motion == Motion::Down { 1 } else { PAGE_LINES };
                if pos.line >= last {
                    self.line_end(last)
                } else {
                    let line = (pos.line + step).min(last);
                    Position::new(line, pos.col.min(len(line)))
                }
            }
            Motion::Home => Position::new(pos.line, 0),
            Motion::End => self.line_end(pos.line),
            Motion::Top => Position::ZERO,
            Motion::Bottom => self.line_end(last),
            Motion::WordRight => {
                let chars: Vec<char> = self.line_str(pos.line).chars().collect();
                let mut col = pos.col as usize;
                if col >= chars.len() {
                    return self.moved(pos, Motion::Right);
                }
                while col < chars.len() && !chars[col].is_alphanumeric() {
                    col += 1;
                }
                while col < chars.len() && chars[col].is_alphanumeric() {
                    col += 1;
                }
                Position::new(pos.line, col as u32)
            }
            Motion::WordLeft => {
                let chars: Vec<char> = self.line_str(pos.line).chars().collect();
                let mut col = (pos.col as usize).min(chars.len());
                if col == 0 {
                    return self.moved(pos, Motion::Left);
                }
                while col > 0 && !chars[col - 1].is_alphanumeric() {
                    col -= 1;
                }
                while col > 0 && chars[col - 1].is_alphanumeric() {
                    col -= 1;
                }
                Position::new(pos.line, col as u32)
            }
        }
    }
}

impl EditorHost for MockHost {
    fn active_editor(&self) -> Option<EditorId> {
        self.focused.then_some(self.id)
    }

    fn selections(&self) -> Vec<Selection> {
        self.selections.clone()
    }

    fn set_selections(&mut self, selections: Vec<Selection>) {
        self.selections = selections;
        self.selection_changed(SelectionChangeKind::Command);
    }

    fn line_count(&self) -> u32 {
        self.rope.len_lines() as u32
    }

    fn line_text(&self, line: u32) -> String {
        self.line_str(line)
    }

    fn text_in(&self, range: Range) -> String {
        let start = self.pos_to_char(range.start);
        let end = self.pos_to_char(range.end);
        self.rope.slice(start..end).to_string()
    }

    fn delete_ranges(&mut self, ranges: &[Range]) -> Result<(), EditRejected> {
        self.writable()?;
        let mut spans: Vec<(usize, usize)> = ranges
            .iter()
            .map(|r| (self.pos_to_char(r.start), self.pos_to_char(r.end)))
            .filter(|(s, e)| s < e)
            .collect();
        if spans.is_empty() {
            return Ok(());
        }
        spans.sort_unstable();

        let remap = |o: usize| {
            let removed: usize = spans
                .iter()
                .map(|&(s, e)| if o >= e { e - s } else { o.saturating_sub(s) })
                .sum();
            o - removed
        };
        let offsets: Vec<(usize, usize)> = self
            .selections
            .iter()
            .map(|s| (remap(self.pos_to_char(s.anchor)), remap(self.pos_to_char(s.active))))
            .collect();

        self.checkpoint();
        for &(s, e) in spans.iter().rev() {
            self.rope.remove(s..e);
        }
        self.selections = offsets
            .into_iter()
            .map(|(a, b)| Selection::new(self.char_to_pos(a), self.char_to_pos(b)))
            .collect();
        self.document_changed();
        self.selection_changed(SelectionChangeKind::Command);
        Ok(())
    }

    fn paste(&mut self, text: &str) -> Result<(), EditRejected> {
        self.writable()?;
        let inserted = text.chars().count();
        let mut spans: Vec<(usize, usize)> = self
            .selections
            .iter()
            .map(|s| {
                let r = s.range();
                (self.pos_to_char(r.start), self.pos_to_char(r.end))
            })
            .collect();
        spans.sort_unstable();
        spans.dedup();

        let mut carets = Vec::with_capacity(spans.len());
        let mut delta: isize = 0;
        for &(s, e) in &spans {
            carets.push((s as isize + delta) as usize + inserted);
            delta += inserted as isize - (e - s) as isize;
        }

        self.checkpoint();
        for &(s, e) in spans.iter().rev() {
            self.rope.remove(s..e);
            self.rope.insert(s, text);
        }
        self.selections = carets
            .into_iter()
            .map(|c| Selection::caret(self.char_to_pos(c)))
            .collect();
        self.document_changed();
        self.selection_changed(SelectionChangeKind::Command);
        Ok(())
    }

    fn insert_line_break(&mut self) -> Result<(), EditRejected> {
        self.writable()?;
        let mut offsets: Vec<usize> = self
            .selections
            .iter()
            .map(|s| self.pos_to_char(s.active))
            .collect();
        offsets.sort_unstable();
        offsets.dedup();

        self.checkpoint();
        for &o in offsets.iter().rev() {
            self.rope.insert_char(o, '\n');
        }
        self.selections = offsets
            .iter()
            .enumerate()
            .map(|(i, &o)| Selection::caret(self.char_to_pos(o + i)))
            .collect();
        self.document_changed();
        Ok(())
    }

    fn undo(&mut self) -> Result<(), EditRejected> {
        let Some(previous) = self.history.pop() else {
            return Ok(());
        };
        self.rope = Rope::from_str(&previous);
        let clamped = self
            .selections
            .iter()
            .map(|s| Selection::caret(self.char_to_pos(self.pos_to_char(s.active))))
            .collect();
        self.selections = clamped;
        self.document_changed();
        Ok(())
    }

    fn move_cursor(&mut self, motion: Motion, select: bool) {
        self.selections = self
            .selections
            .iter()
            .map(|s| {
                let active = self.moved(s.active, motion);
                let anchor = if select { s.anchor } else { active };
                Selection::new(anchor, active)
            })
            .collect();
        self.selection_changed(SelectionChangeKind::Keyboard);
    }

    fn cancel_selection(&mut self) {
        let primary = self.selections[0].collapsed();
        self.selections = vec![primary];
        self.selection_changed(SelectionChangeKind::Command);
    }

    fn remove_secondary_cursors(&mut self) {
        self.selections.truncate(1);
        self.selection_changed(SelectionChangeKind::Command);
    }

    fn reveal(&mut self, range: Range, placement: RevealPlacement) {
        self.reveals.push((range, placement));
    }

    fn scroll_page_up(&mut self) {
        self.page_scrolls += 1;
    }
}
