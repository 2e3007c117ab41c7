use std::collections::HashMap;

use crate::mark::MarkMode;
use crate::types::{EditorId, Position};

/// Kill continuity: where the last kill started, and whether the next
/// document change is the one that kill produced.
#[derive(Debug, Clone, Default)]
pub struct KillState {
    anchor: Option<Position>,
    latched: bool,
}

impl KillState {
    pub fn anchor(&self) -> Option<Position> {
        self.anchor
    }

    pub fn is_latched(&self) -> bool {
        self.latched
    }

    /// Whether a kill starting at `start` continues the previous one.
    pub fn continues_at(&self, start: Position) -> bool {
        self.anchor == Some(start)
    }

    /// Record a kill that started at `start`. `deleted` arms the latch for
    /// the document change the deletion will produce.
    pub fn record(&mut self, start: Position, deleted: bool) {
        self.anchor = Some(start);
        self.latched = deleted;
    }

    /// Called for every document change. The latch absorbs exactly one.
    ///
    /// The latch is a flag, not a count: when two kills run before either
    /// notification arrives, the second notification clears the anchor and
    /// the next kill starts over.
    pub fn observe_document_change(&mut self) {
        if !std::mem::take(&mut self.latched) {
            self.anchor = None;
        }
    }

    /// Yanking is not a kill.
    pub fn clear_latch(&mut self) {
        self.latched = false;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Step of the recenter cycle, as an index into the configured positions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecenterCycle {
    step: usize,
}

impl RecenterCycle {
    pub fn step(&self) -> usize {
        self.step
    }

    /// Returns the current step and moves to the next one.
    pub fn advance(&mut self, len: usize) -> usize {
        let current = self.step % len.max(1);
        self.step = (current + 1) % len.max(1);
        current
    }

    pub fn reset(&mut self) {
        self.step = 0;
    }
}

/// Everything tracked for one editor.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub mark: MarkMode,
    pub kill: KillState,
    pub recenter: RecenterCycle,
}

/// Per-editor sessions, created on first use.
#[derive(Debug, Clone, Default)]
pub struct Sessions {
    by_editor: HashMap<EditorId, Session>,
}

impl Sessions {
    pub fn get(&self, id: EditorId) -> Option<&Session> {
        self.by_editor.get(&id)
    }

    pub fn get_mut(&mut self, id: EditorId) -> Option<&mut Session> {
        self.by_editor.get_mut(&id)
    }

    pub fn entry(&mut self, id: EditorId) -> &mut Session {
        self.by_editor.entry(id).or_default()
    }

    pub fn remove(&mut self, id: EditorId) -> Option<Session> {
        self.by_editor.remove(&id)
    }

    pub fn len(&self) -> usize {
        self.by_editor.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_editor.is_empty()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Session> {
        self.by_editor.values_mut()
    }
}
