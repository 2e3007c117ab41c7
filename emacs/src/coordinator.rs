use crate::command::Command;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::linearize::{selection_ranges, selections_text};
use crate::mark::MarkState;
use crate::session::{Session, Sessions};
use crate::traits::{Clipboard, EditorHost};
use crate::types::{
    EditorId, HostEvent, Motion, Position, Range, RecenterPosition, RevealPlacement, Selection,
    SelectionChangeKind,
};

/// Editing state across commands: kill continuity, transient mark and the
/// recenter cycle, kept per editor.
#[derive(Debug, Clone)]
pub struct Coordinator {
    config: Config,
    sessions: Sessions,
    active: Option<EditorId>,
}

/// State of the active editor, for status lines and tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoordinatorSnapshot {
    pub editor: Option<EditorId>,
    pub mark: MarkState,
    pub kill_anchor: Option<Position>,
    pub kill_latched: bool,
    pub next_recenter: Option<RecenterPosition>,
}

#[derive(Default)]
pub struct CoordinatorBuilder {
    config: Config,
}

impl CoordinatorBuilder {
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> Coordinator {
        Coordinator {
            config: self.config,
            sessions: Sessions::default(),
            active: None,
        }
    }
}

impl Default for Coordinator {
    fn default() -> Self {
        CoordinatorBuilder::default().build()
    }
}

impl Coordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> CoordinatorBuilder {
        CoordinatorBuilder::default()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn snapshot(&self) -> CoordinatorSnapshot {
        let session = self.active.and_then(|id| self.sessions.get(id));
        let step = session.map_or(0, |s| s.recenter.step());
        CoordinatorSnapshot {
            editor: self.active,
            mark: session.map_or(MarkState::Inactive, |s| s.mark.state()),
            kill_anchor: session.and_then(|s| s.kill.anchor()),
            kill_latched: session.is_some_and(|s| s.kill.is_latched()),
            next_recenter: self.config.recenter.positions.get(step).copied(),
        }
    }

    /// Number of editors with tracked state.
    pub fn tracked_editors(&self) -> usize {
        self.sessions.len()
    }

    /// Feed a host notification. Hosts call this after the fact, in the order
    /// the events happened.
    pub fn notify(&mut self, event: HostEvent) {
        tracing::trace!(?event, "host event");
        match event {
            HostEvent::ActiveEditorChanged(next) => self.switch_to(next),
            HostEvent::DocumentChanged(id) => {
                if let Some(session) = self.sessions.get_mut(id) {
                    session.kill.observe_document_change();
                }
            }
            HostEvent::SelectionChanged { editor, kind } => {
                if let Some(session) = self.sessions.get_mut(editor) {
                    session.recenter.reset();
                    if kind == SelectionChangeKind::Mouse {
                        session.mark.deactivate();
                    }
                }
            }
            HostEvent::EditorClosed(id) => {
                self.sessions.remove(id);
                if self.active == Some(id) {
                    self.active = None;
                }
            }
        }
    }

    /// Run one command against the host's active editor.
    pub fn execute<H, C>(&mut self, host: &mut H, clipboard: &mut C, command: Command) -> Result<()>
    where
        H: EditorHost + ?Sized,
        C: Clipboard + ?Sized,
    {
        tracing::debug!(%command, "execute");
        match command {
            Command::KeyboardQuit => self.exit_mark(host),
            Command::SetMark => self.set_mark(host),
            Command::KillLine => self.kill_line(host, clipboard),
            Command::KillRegion => self.kill_region(host, clipboard),
            Command::CopyRegion => self.copy_region(host, clipboard),
            Command::Yank => self.yank(host, clipboard),
            Command::DeleteBlankLines => self.delete_blank_lines(host),
            Command::KillWholeLine => self.kill_whole_line(host),
            Command::Newline => self.newline(host),
            Command::Undo => self.undo(host),
            Command::Recenter => self.recenter_top_bottom(host),
            Command::Move(motion) => self.move_cursor(host, motion),
        }
    }

    pub fn set_mark<H: EditorHost + ?Sized>(&mut self, host: &mut H) -> Result<()> {
        self.session(host)?.mark.enter_or_toggle(host);
        Ok(())
    }

    pub fn exit_mark<H: EditorHost + ?Sized>(&mut self, host: &mut H) -> Result<()> {
        self.session(host)?.mark.exit(host);
        Ok(())
    }

    pub fn move_cursor<H: EditorHost + ?Sized>(&mut self, host: &mut H, motion: Motion) -> Result<()> {
        self.session(host)?.mark.on_cursor_movement(host, motion);
        Ok(())
    }

    /// Kill from the caret to the end of the line.
    ///
    /// When only whitespace is left on the line the line break goes too. A
    /// kill starting where the previous one started appends to the clipboard,
    /// provided nothing else touched the document in between.
    pub fn kill_line<H, C>(&mut self, host: &mut H, clipboard: &mut C) -> Result<()>
    where
        H: EditorHost + ?Sized,
        C: Clipboard + ?Sized,
    {
        let append_consecutive = self.config.kill.append_consecutive;
        let session = self.session(host)?;
        session.mark.exit(host);

        let Some(primary) = host.primary_selection() else {
            return Ok(());
        };
        let start = primary.active;
        let end = kill_end(host, start);

        host.set_selections(vec![Selection::new(start, end)]);
        let append = append_consecutive && session.kill.continues_at(start);
        tracing::debug!(?start, ?end, append, "kill line");

        let deleted = cut(session, host, clipboard, append)?;
        session.kill.record(start, deleted);
        Ok(())
    }

    /// Cut the selected regions into the clipboard, replacing its contents.
    pub fn kill_region<H, C>(&mut self, host: &mut H, clipboard: &mut C) -> Result<()>
    where
        H: EditorHost + ?Sized,
        C: Clipboard + ?Sized,
    {
        let session = self.session(host)?;
        cut(session, host, clipboard, false)?;
        Ok(())
    }

    /// Copy the selected regions; copying never appends.
    pub fn copy_region<H, C>(&mut self, host: &mut H, clipboard: &mut C) -> Result<()>
    where
        H: EditorHost + ?Sized,
        C: Clipboard + ?Sized,
    {
        let session = self.session(host)?;
        clipboard.set(selections_text(host));
        session.mark.exit(host);
        Ok(())
    }

    pub fn yank<H, C>(&mut self, host: &mut H, clipboard: &mut C) -> Result<()>
    where
        H: EditorHost + ?Sized,
        C: Clipboard + ?Sized,
    {
        let session = self.session(host)?;
        session.kill.clear_latch();

        let result = match clipboard.get() {
            Some(text) if !text.is_empty() => host.paste(&text),
            _ => Ok(()),
        };
        session.mark.exit(host);
        result.map_err(rejected)
    }

    /// Delete the blank lines around the caret.
    ///
    /// On a non-blank line the blank lines below it go. On a blank line the
    /// whole run of blank lines containing it goes, and the caret ends up
    /// where the run started.
    pub fn delete_blank_lines<H: EditorHost + ?Sized>(&mut self, host: &mut H) -> Result<()> {
        self.session(host)?;
        let Some(selection) = host.primary_selection() else {
            return Ok(());
        };

        let line = selection.range().start.line;
        let (target, mut restore) = if host.is_line_blank(line) {
            let first = first_blank_line(host, line);
            (first, Position::new(first, 0))
        } else {
            (line + 1, selection.anchor)
        };

        let before = host.line_count();
        if target <= host.last_line() {
            let caret = Position::new(target, 0);
            host.set_selections(vec![Selection::caret(caret)]);
            while target < host.last_line() && host.is_line_blank(target) {
                let right = delete_right_range(host, caret);
                host.delete_ranges(&[right]).map_err(rejected)?;
            }
        }

        // an anchor below the deleted run moves up with the text after it
        let removed = before.saturating_sub(host.line_count());
        if restore.line >= target + removed {
            restore.line -= removed;
        } else if restore.line >= target {
            restore = Position::new(target, 0);
        }
        host.set_selections(vec![Selection::caret(clamped(host, restore))]);
        Ok(())
    }

    /// Delete every line holding a cursor. The clipboard is left alone.
    pub fn kill_whole_line<H: EditorHost + ?Sized>(&mut self, host: &mut H) -> Result<()> {
        self.session(host)?.mark.exit(host);

        let last = host.last_line();
        let mut lines: Vec<u32> = host.selections().iter().map(|s| s.active.line).collect();
        lines.sort_unstable();
        lines.dedup();

        let ranges: Vec<Range> = line_blocks(&lines)
            .into_iter()
            .map(|(first, end)| {
                if end < last {
                    Range::new(Position::new(first, 0), Position::new(end + 1, 0))
                } else if first > 0 {
                    Range::new(host.line_end(first - 1), host.line_end(end))
                } else {
                    Range::new(Position::ZERO, host.line_end(end))
                }
            })
            .filter(|r| !r.is_empty())
            .collect();

        if ranges.is_empty() {
            return Ok(());
        }
        host.delete_ranges(&ranges).map_err(rejected)
    }

    /// Break the line at every cursor and move to the start of the new line.
    pub fn newline<H: EditorHost + ?Sized>(&mut self, host: &mut H) -> Result<()> {
        let session = self.session(host)?;
        host.insert_line_break().map_err(rejected)?;
        session.mark.on_cursor_movement(host, Motion::Home);
        session.mark.on_cursor_movement(host, Motion::Down);
        Ok(())
    }

    pub fn undo<H: EditorHost + ?Sized>(&mut self, host: &mut H) -> Result<()> {
        self.session(host)?;
        host.undo().map_err(rejected)
    }

    /// Scroll the caret line to the next configured position.
    ///
    /// Repeated calls walk the cycle; any selection change in between starts
    /// it over.
    pub fn recenter_top_bottom<H: EditorHost + ?Sized>(&mut self, host: &mut H) -> Result<()> {
        let positions = self.config.recenter.positions.clone();
        let session = self.session(host)?;
        let Some(selection) = host.primary_selection() else {
            return Ok(());
        };

        let step = session.recenter.advance(positions.len());
        let Some(position) = positions.get(step).copied() else {
            return Ok(());
        };
        tracing::debug!(?position, "recenter");
        match position {
            RecenterPosition::Center => host.reveal(selection.range(), RevealPlacement::Center),
            RecenterPosition::Top => host.reveal(selection.range(), RevealPlacement::Top),
            RecenterPosition::Bottom => host.scroll_page_up(),
        }
        Ok(())
    }

    /// Session of the host's active editor. Noticing a different editor here
    /// counts as a switch even if the host has not reported it yet.
    fn session<H: EditorHost + ?Sized>(&mut self, host: &H) -> Result<&mut Session> {
        let id = host.active_editor().ok_or(Error::NoActiveEditor)?;
        self.switch_to(Some(id));
        Ok(self.sessions.entry(id))
    }

    fn switch_to(&mut self, next: Option<EditorId>) {
        if self.active == next {
            return;
        }
        // kill continuity never spans an editor switch
        for session in self.sessions.iter_mut() {
            session.kill.reset();
        }
        tracing::debug!(from = ?self.active, to = ?next, "active editor changed");
        self.active = next;
    }
}

/// Copy the linearized selection text to the clipboard and delete the
/// regions. Returns whether anything was deleted.
fn cut<H, C>(session: &mut Session, host: &mut H, clipboard: &mut C, append: bool) -> Result<bool>
where
    H: EditorHost + ?Sized,
    C: Clipboard + ?Sized,
{
    let text = selections_text(host);
    let previous = clipboard.get();
    match (&previous, append) {
        (Some(prev), true) => clipboard.set(format!("{prev}{text}")),
        _ => clipboard.set(text),
    }

    let ranges = selection_ranges(host);
    let result = if ranges.is_empty() {
        Ok(())
    } else {
        host.delete_ranges(&ranges)
    };

    if result.is_err() {
        match previous {
            Some(prev) => clipboard.set(prev),
            None => clipboard.clear(),
        }
    }
    session.mark.exit(host);
    result.map_err(rejected)?;
    Ok(!ranges.is_empty())
}

fn rejected(err: crate::error::EditRejected) -> Error {
    tracing::warn!("host rejected edit: {err}");
    Error::HostEditFailed(err)
}

/// End of the span killed from `start`: the rest of the line, plus the line
/// break when that rest is only whitespace. Lines are treated as unwrapped.
fn kill_end<H: EditorHost + ?Sized>(host: &H, start: Position) -> Position {
    if start.line >= host.last_line() {
        return host.line_end(start.line);
    }
    let next_line = Position::new(start.line + 1, 0);
    let rest = host.text_in(Range::new(start, next_line));
    if rest.chars().all(char::is_whitespace) {
        next_line
    } else {
        host.line_end(start.line)
    }
}

/// First line of the run of blank lines that contains `line`.
fn first_blank_line<H: EditorHost + ?Sized>(host: &H, line: u32) -> u32 {
    if line == 0 {
        return 0;
    }
    let mut above = line - 1;
    while above > 0 && host.is_line_blank(above) {
        above -= 1;
    }
    if host.is_line_blank(above) {
        above
    } else {
        above + 1
    }
}

/// `pos` moved onto the nearest existing position of the document.
fn clamped<H: EditorHost + ?Sized>(host: &H, pos: Position) -> Position {
    let line = pos.line.min(host.last_line());
    Position::new(line, pos.col.min(host.line_len(line)))
}

/// The one-grapheme span right of `pos`, or the line break at line end.
fn delete_right_range<H: EditorHost + ?Sized>(host: &H, pos: Position) -> Range {
    if pos.col < host.line_len(pos.line) {
        Range::new(pos, Position::new(pos.line, pos.col + 1))
    } else {
        Range::new(pos, Position::new(pos.line + 1, 0))
    }
}

/// Runs of consecutive line numbers as `(first, last)` pairs. `lines` must be
/// sorted and free of duplicates.
fn line_blocks(lines: &[u32]) -> Vec<(u32, u32)> {
    let mut blocks: Vec<(u32, u32)> = Vec::new();
    for &line in lines {
        match blocks.last_mut() {
            Some((_, end)) if *end + 1 == line => *end = line,
            _ => blocks.push((line, line)),
        }
    }
    blocks
}
