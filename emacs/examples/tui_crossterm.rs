//! Terminal UI example using crossterm and ratatui.
//!
//! A small rope-backed editor driven by the emacs_mini keymap and coordinator.
//! Run with: cargo run --example tui_crossterm [config.toml]
//!
//! Logs go to `emacs_mini_demo.log` in the temp directory; set `RUST_LOG=debug`
//! to see every command.

use crossterm::{
    event::{self, Event, KeyCode as CKeyCode, KeyEvent as CKeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use emacs_mini::{
    Config, Coordinator, EditorId, HostEvent, KeyChord, KeyCode, KeyLookup, Keymap, Modifiers,
    Motion, Position, Range, RevealPlacement, Selection, SelectionChangeKind,
    error::EditRejected,
    key::parse_keys,
    traits::{Clipboard, EditorHost},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use ropey::Rope;
use std::{fs::File, io, sync::Mutex};
use tracing_subscriber::EnvFilter;
use unicode_segmentation::UnicodeSegmentation;

const EDITOR: EditorId = EditorId(1);

/// Simple clipboard implementation using an internal buffer
struct SimpleClipboard {
    content: Option<String>,
}

impl Clipboard for SimpleClipboard {
    fn get(&mut self) -> Option<String> {
        self.content.clone()
    }

    fn set(&mut self, text: String) {
        self.content = Some(text);
    }

    fn clear(&mut self) {
        self.content = None;
    }
}

/// Rope-backed editor with a selection set and a scrolled viewport
struct RopeHost {
    rope: Rope,
    selections: Vec<Selection>,
    history: Vec<String>,
    events: Vec<HostEvent>,
    top: u32,
    height: u32,
}

impl RopeHost {
    fn new() -> Self {
        Self {
            rope: Rope::from(
                "Welcome to emacs_mini!\n\nC-SPC sets the mark, C-w kills the region, M-w copies it.\nC-k kills to the end of the line; repeat it to append.\nC-y yanks, C-x u undoes, C-l recenters.\n\n\n\nC-x C-o on the line above squeezes these blank lines.\nC-x C-c quits.\n",
            ),
            selections: vec![Selection::caret(Position::ZERO)],
            history: Vec::new(),
            events: Vec::new(),
            top: 0,
            height: 20,
        }
    }

    fn char_idx(&self, pos: Position) -> usize {
        let line = (pos.line as usize).min(self.rope.len_lines().saturating_sub(1));
        let offset: usize = self
            .line_text(line as u32)
            .graphemes(true)
            .take(pos.col as usize)
            .map(|g| g.chars().count())
            .sum();
        self.rope.line_to_char(line) + offset
    }

    fn position(&self, idx: usize) -> Position {
        let idx = idx.min(self.rope.len_chars());
        let line = self.rope.char_to_line(idx);
        let mut remaining = idx - self.rope.line_to_char(line);
        let mut col = 0;
        for g in self.line_text(line as u32).graphemes(true) {
            let n = g.chars().count();
            if remaining < n {
                break;
            }
            remaining -= n;
            col += 1;
        }
        Position::new(line as u32, col)
    }

    /// Replace every span with `text`, leaving a caret after each insertion
    fn replace_spans(&mut self, mut spans: Vec<(usize, usize)>, text: &str) {
        spans.sort_unstable();
        spans.dedup();
        self.history.push(self.rope.to_string());

        let inserted = text.chars().count();
        let mut carets = Vec::with_capacity(spans.len());
        let mut shift: isize = 0;
        for &(start, end) in &spans {
            carets.push((start as isize + shift) as usize + inserted);
            shift += inserted as isize - (end - start) as isize;
        }
        for &(start, end) in spans.iter().rev() {
            self.rope.remove(start..end);
            self.rope.insert(start, text);
        }

        self.selections = carets
            .into_iter()
            .map(|c| Selection::caret(self.position(c)))
            .collect();
        self.events.push(HostEvent::DocumentChanged(EDITOR));
        self.selection_changed(SelectionChangeKind::Command);
    }

    fn selection_changed(&mut self, kind: SelectionChangeKind) {
        self.events.push(HostEvent::SelectionChanged {
            editor: EDITOR,
            kind,
        });
    }

    fn self_insert(&mut self, text: &str) {
        let spans = self
            .selections
            .iter()
            .map(|s| (self.char_idx(s.range().start), self.char_idx(s.range().end)))
            .collect();
        self.replace_spans(spans, text);
    }

    fn delete_backward(&mut self) {
        let spans: Vec<(usize, usize)> = self
            .selections
            .iter()
            .map(|s| {
                let at = self.char_idx(s.active);
                (at.saturating_sub(1), at)
            })
            .filter(|(start, end)| start < end)
            .collect();
        if !spans.is_empty() {
            self.replace_spans(spans, "");
        }
    }

    fn moved(&self, pos: Position, motion: Motion) -> Position {
        let last = self.last_line();
        let clamp = |line: u32| Position::new(line, pos.col.min(self.line_len(line)));
        match motion {
            Motion::Left if pos.col > 0 => Position::new(pos.line, pos.col - 1),
            Motion::Left if pos.line > 0 => self.line_end(pos.line - 1),
            Motion::Right if pos.col < self.line_len(pos.line) => Position::new(pos.line, pos.col + 1),
            Motion::Right if pos.line < last => Position::new(pos.line + 1, 0),
            Motion::Left | Motion::Right => pos,
            Motion::Up => clamp(pos.line.saturating_sub(1)),
            Motion::Down => clamp((pos.line + 1).min(last)),
            Motion::PageUp => clamp(pos.line.saturating_sub(self.height)),
            Motion::PageDown => clamp((pos.line + self.height).min(last)),
            Motion::Home => Position::new(pos.line, 0),
            Motion::End => self.line_end(pos.line),
            Motion::Top => Position::ZERO,
            Motion::Bottom => self.line_end(last),
            Motion::WordLeft | Motion::WordRight => {
                let idx = self.char_idx(pos);
                let chars: Vec<char> = self.rope.chars().collect();
                let mut i = idx;
                if motion == Motion::WordRight {
                    while i < chars.len() && !chars[i].is_alphanumeric() {
                        i += 1;
                    }
                    while i < chars.len() && chars[i].is_alphanumeric() {
                        i += 1;
                    }
                } else {
                    while i > 0 && !chars[i - 1].is_alphanumeric() {
                        i -= 1;
                    }
                    while i > 0 && chars[i - 1].is_alphanumeric() {
                        i -= 1;
                    }
                }
                self.position(i)
            }
        }
    }

    /// Scroll just enough to keep the primary caret on screen
    fn follow_caret(&mut self) {
        let line = self.selections[0].active.line;
        if line < self.top {
            self.top = line;
        } else if line >= self.top + self.height {
            self.top = line + 1 - self.height;
        }
    }
}

impl EditorHost for RopeHost {
    fn active_editor(&self) -> Option<EditorId> {
        Some(EDITOR)
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
        if line as usize >= self.rope.len_lines() {
            return String::new();
        }
        self.rope
            .line(line as usize)
            .to_string()
            .trim_end_matches(['\n', '\r'])
            .to_string()
    }

    fn text_in(&self, range: Range) -> String {
        let start = self.char_idx(range.start);
        let end = self.char_idx(range.end);
        self.rope.slice(start..end).to_string()
    }

    fn delete_ranges(&mut self, ranges: &[Range]) -> Result<(), EditRejected> {
        let spans = ranges
            .iter()
            .map(|r| (self.char_idx(r.start), self.char_idx(r.end)))
            .filter(|(start, end)| start < end)
            .collect();
        self.replace_spans(spans, "");
        Ok(())
    }

    fn paste(&mut self, text: &str) -> Result<(), EditRejected> {
        self.self_insert(text);
        Ok(())
    }

    fn insert_line_break(&mut self) -> Result<(), EditRejected> {
        let carets = self.selections.clone();
        self.self_insert("\n");
        self.selections = carets.iter().map(|s| s.collapsed()).collect();
        Ok(())
    }

    fn undo(&mut self) -> Result<(), EditRejected> {
        let Some(previous) = self.history.pop() else {
            return Err(EditRejected("no further undo information".to_string()));
        };
        let caret = self.char_idx(self.selections[0].active);
        self.rope = Rope::from_str(&previous);
        self.selections = vec![Selection::caret(self.position(caret))];
        self.events.push(HostEvent::DocumentChanged(EDITOR));
        Ok(())
    }

    fn move_cursor(&mut self, motion: Motion, select: bool) {
        self.selections = self
            .selections
            .iter()
            .map(|s| {
                let active = self.moved(s.active, motion);
                Selection::new(if select { s.anchor } else { active }, active)
            })
            .collect();
        self.selection_changed(SelectionChangeKind::Keyboard);
    }

    fn cancel_selection(&mut self) {
        self.selections = vec![self.selections[0].collapsed()];
        self.selection_changed(SelectionChangeKind::Command);
    }

    fn remove_secondary_cursors(&mut self) {
        self.selections.truncate(1);
        self.selection_changed(SelectionChangeKind::Command);
    }

    fn reveal(&mut self, range: Range, placement: RevealPlacement) {
        self.top = match placement {
            RevealPlacement::Center => range.start.line.saturating_sub(self.height / 2),
            RevealPlacement::Top => range.start.line,
        };
    }

    fn scroll_page_up(&mut self) {
        self.top = self.top.saturating_sub(self.height);
    }
}

struct App {
    coordinator: Coordinator,
    keymap: Keymap,
    host: RopeHost,
    clipboard: SimpleClipboard,
    pending: Vec<KeyChord>,
    quit: Vec<KeyChord>,
    message: String,
    should_quit: bool,
}

impl App {
    fn new(config: Config) -> emacs_mini::Result<Self> {
        let mut keymap = config.keymap()?;
        keymap.bind("RET", emacs_mini::Command::Newline)?;
        Ok(Self {
            coordinator: Coordinator::builder().config(config).build(),
            keymap,
            host: RopeHost::new(),
            clipboard: SimpleClipboard { content: None },
            pending: Vec::new(),
            quit: parse_keys("C-x C-c")?,
            message: String::new(),
            should_quit: false,
        })
    }

    fn handle_crossterm_event(&mut self, event: CKeyEvent) {
        let Some(chord) = convert_crossterm_event(event) else {
            return;
        };
        self.pending.push(chord);
        if self.pending == self.quit {
            self.should_quit = true;
            return;
        }

        match self.keymap.lookup(&self.pending) {
            KeyLookup::Prefix => {
                self.message = format!("{} -", render_keys(&self.pending));
                return;
            }
            KeyLookup::Bound(command) => {
                self.message = match self.coordinator.execute(
                    &mut self.host,
                    &mut self.clipboard,
                    command,
                ) {
                    Ok(()) => command.to_string(),
                    Err(err) => err.to_string(),
                };
            }
            KeyLookup::Unbound => self.self_insert_or_complain(chord),
        }
        self.pending.clear();

        for event in std::mem::take(&mut self.host.events) {
            self.coordinator.notify(event);
        }
        self.host.follow_caret();
    }

    fn self_insert_or_complain(&mut self, chord: KeyChord) {
        let typed = match (self.pending.len(), chord.code) {
            (1, KeyCode::Char(c)) if chord.mods.is_empty() => Some(c.to_string()),
            (1, KeyCode::Space) if chord.mods.is_empty() => Some(" ".to_string()),
            (1, KeyCode::Tab) => Some("\t".to_string()),
            _ => None,
        };
        match typed {
            Some(text) => {
                self.host.self_insert(&text);
                self.message.clear();
            }
            None if self.pending.len() == 1 && chord.code == KeyCode::Backspace => {
                self.host.delete_backward();
                self.message.clear();
            }
            None => self.message = format!("{} is undefined", render_keys(&self.pending)),
        }
    }
}

fn render_keys(keys: &[KeyChord]) -> String {
    keys.iter().map(ToString::to_string).collect::<Vec<_>>().join(" ")
}

fn convert_crossterm_event(event: CKeyEvent) -> Option<KeyChord> {
    let mut mods = Modifiers::empty();
    if event.modifiers.contains(KeyModifiers::CONTROL) {
        mods |= Modifiers::CTRL;
    }
    if event.modifiers.contains(KeyModifiers::ALT) {
        mods |= Modifiers::META;
    }
    if event.modifiers.contains(KeyModifiers::SHIFT) {
        mods |= Modifiers::SHIFT;
    }

    let code = match event.code {
        CKeyCode::Char(' ') => KeyCode::Space,
        CKeyCode::Char(c) => {
            // Shift is already folded into the character
            mods.remove(Modifiers::SHIFT);
            KeyCode::Char(c)
        }
        CKeyCode::Enter => KeyCode::Enter,
        CKeyCode::Tab => KeyCode::Tab,
        CKeyCode::Esc => KeyCode::Esc,
        CKeyCode::Backspace => KeyCode::Backspace,
        CKeyCode::Left => return Some(KeyChord::ctrl('b')),
        CKeyCode::Right => return Some(KeyChord::ctrl('f')),
        CKeyCode::Up => return Some(KeyChord::ctrl('p')),
        CKeyCode::Down => return Some(KeyChord::ctrl('n')),
        _ => return None,
    };
    Some(KeyChord::new(code, mods))
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([Constraint::Min(3), Constraint::Length(3)].as_ref())
        .split(f.size());
    app.host.height = u32::from(chunks[0].height.saturating_sub(2)).max(1);

    let host = &app.host;
    let primary = host.selections[0];
    let region = primary.range();
    let highlight = Style::default().bg(Color::Blue);

    let mut lines = vec![];
    for i in host.top..host.line_count().min(host.top + host.height) {
        let text = host.line_text(i);
        let graphemes: Vec<&str> = text.graphemes(true).collect();
        let len = graphemes.len() as u32;

        // Column span of the region on this line
        let from = if i == region.start.line { region.start.col } else { 0 };
        let to = if i == region.end.line { region.end.col } else { len };
        if region.is_empty() || i < region.start.line || i > region.end.line || from >= to {
            lines.push(Line::from(text.clone()));
            continue;
        }

        let (from, to) = (from.min(len) as usize, to.min(len) as usize);
        lines.push(Line::from(vec![
            Span::raw(graphemes[..from].concat()),
            Span::styled(graphemes[from..to].concat(), highlight),
            Span::raw(graphemes[to..].concat()),
        ]));
    }

    let snapshot = app.coordinator.snapshot();
    let title = format!(
        "emacs_mini demo  mark: {:?}  next recenter: {:?}",
        snapshot.mark, snapshot.next_recenter
    );
    let text = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(text, chunks[0]);

    let status = Paragraph::new(app.message.as_str())
        .style(Style::default().add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(status, chunks[1]);

    f.set_cursor(
        chunks[0].x + 1 + primary.active.col as u16,
        chunks[0].y + 1 + primary.active.line.saturating_sub(host.top) as u16,
    );
}

fn init_tracing() -> io::Result<()> {
    let path = std::env::temp_dir().join("emacs_mini_demo.log");
    let file = File::create(path)?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing()?;

    let config = match std::env::args().nth(1) {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    let mut app = App::new(config)?;
    tracing::info!(bindings = app.keymap.len(), "demo started");

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    loop {
        terminal.draw(|f| ui(f, &mut app))?;

        if let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            app.handle_crossterm_event(key);

            if app.should_quit {
                break;
            }
        }
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    Ok(())
}
