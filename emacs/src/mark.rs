use crate::traits::EditorHost;
use crate::types::{Motion, Selection};

/// Transient mark state of one editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MarkState {
    #[default]
    Inactive,
    /// Mark set, caret not moved since.
    ActiveUnmoved,
    /// Mark set and the caret moved, so there may be a region.
    ActiveMoved,
}

impl MarkState {
    pub fn is_active(self) -> bool {
        !matches!(self, MarkState::Inactive)
    }
}

/// Set-mark / cancel semantics layered over the host's selections.
///
/// The host only knows about anchors and active ends; this tracks whether a
/// mark is set and whether the caret has moved away from it since.
#[derive(Debug, Clone, Default)]
pub struct MarkMode {
    state: MarkState,
}

impl MarkMode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> MarkState {
        self.state
    }

    /// Set the mark at every caret, or cancel if the mark was just set and
    /// nothing moved since.
    pub fn enter_or_toggle<H: EditorHost + ?Sized>(&mut self, host: &mut H) {
        if self.state == MarkState::ActiveUnmoved {
            self.state = MarkState::Inactive;
            tracing::debug!("mark toggled off before moving");
            return;
        }
        collapse_to_active(host);
        self.state = MarkState::ActiveUnmoved;
        tracing::debug!("mark set");
    }

    /// Drop the region(s) and leave mark mode.
    pub fn exit<H: EditorHost + ?Sized>(&mut self, host: &mut H) {
        let selections = host.selections();
        if selections.len() > 1 {
            if selections.iter().all(Selection::is_empty) {
                host.remove_secondary_cursors();
            } else {
                // cancel_selection would also drop the secondary cursors
                collapse_to_active(host);
            }
        } else {
            host.cancel_selection();
        }
        self.deactivate();
    }

    /// Leave mark mode without touching the host, e.g. after a mouse click
    /// already replaced the selection.
    pub fn deactivate(&mut self) {
        if self.state.is_active() {
            tracing::debug!("mark deactivated");
        }
        self.state = MarkState::Inactive;
    }

    /// Move every caret, extending the selections while the mark is active.
    pub fn on_cursor_movement<H: EditorHost + ?Sized>(&mut self, host: &mut H, motion: Motion) {
        let select = self.state.is_active();
        if select {
            self.state = MarkState::ActiveMoved;
        }
        host.move_cursor(motion, select);
    }
}

fn collapse_to_active<H: EditorHost + ?Sized>(host: &mut H) {
    let collapsed = host.selections().iter().map(Selection::collapsed).collect();
    host.set_selections(collapsed);
}
