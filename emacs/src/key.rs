use std::collections::HashMap;
use std::fmt;

use crate::command::Command;
use crate::error::{Error, Result};
use crate::types::Motion;

/// Key codes representing individual keys on the keyboard.
///
/// Hosts map their platform-specific key events to these codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A character key, as typed (shifted letters are uppercase).
    Char(char),
    Space,
    Enter,
    Tab,
    Esc,
    Backspace,
}

bitflags::bitflags! {
    /// Keyboard modifier flags.
    ///
    /// These can be combined to represent multiple modifiers held simultaneously.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b0001;
        const CTRL  = 0b0010;
        const META  = 0b0100;
    }
}

/// A key press with the modifiers held during it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyChord {
    pub code: KeyCode,
    pub mods: Modifiers,
}

impl KeyChord {
    pub fn new(code: KeyCode, mods: Modifiers) -> Self {
        Self { code, mods }.normalized()
    }

    pub fn ctrl(c: char) -> Self {
        Self::new(KeyCode::Char(c), Modifiers::CTRL)
    }

    pub fn meta(c: char) -> Self {
        Self::new(KeyCode::Char(c), Modifiers::META)
    }

    /// Character keys already carry shift in the character itself.
    fn normalized(mut self) -> Self {
        if let KeyCode::Char(c) = self.code
            && self.mods.contains(Modifiers::SHIFT)
        {
            self.mods.remove(Modifiers::SHIFT);
            self.code = KeyCode::Char(c.to_ascii_uppercase());
        }
        self
    }
}

impl fmt::Display for KeyChord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.mods.contains(Modifiers::CTRL) {
            f.write_str("C-")?;
        }
        if self.mods.contains(Modifiers::META) {
            f.write_str("M-")?;
        }
        if self.mods.contains(Modifiers::SHIFT) {
            f.write_str("S-")?;
        }
        match self.code {
            KeyCode::Char(c) => write!(f, "{c}"),
            KeyCode::Space => f.write_str("SPC"),
            KeyCode::Enter => f.write_str("RET"),
            KeyCode::Tab => f.write_str("TAB"),
            KeyCode::Esc => f.write_str("ESC"),
            KeyCode::Backspace => f.write_str("<backspace>"),
        }
    }
}

/// Parses a key sequence in Emacs `kbd` notation, e.g. `"C-x C-o"` or `"C-S-<backspace>"`.
pub fn parse_keys(keys: &str) -> Result<Vec<KeyChord>> {
    let chords = keys
        .split_whitespace()
        .map(parse_chord)
        .collect::<Result<Vec<_>>>()?;
    if chords.is_empty() {
        return Err(Error::InvalidKey(keys.to_string()));
    }
    Ok(chords)
}

fn parse_chord(token: &str) -> Result<KeyChord> {
    let mut mods = Modifiers::empty();
    let mut rest = token;
    // "C--" is ctrl + '-', so only strip while something follows the prefix
    while rest.len() > 2 {
        let flag = match rest.get(..2) {
            Some("C-") => Modifiers::CTRL,
            Some("M-") => Modifiers::META,
            Some("S-") => Modifiers::SHIFT,
            _ => break,
        };
        mods |= flag;
        rest = &rest[2..];
    }

    let code = match rest {
        "SPC" => KeyCode::Space,
        "RET" => KeyCode::Enter,
        "TAB" => KeyCode::Tab,
        "ESC" => KeyCode::Esc,
        "DEL" | "<backspace>" => KeyCode::Backspace,
        _ => {
            let mut chars = rest.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => KeyCode::Char(c),
                _ => return Err(Error::InvalidKey(token.to_string())),
            }
        }
    };
    Ok(KeyChord::new(code, mods))
}

/// Result of looking up a (possibly partial) key sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyLookup {
    Bound(Command),
    /// A longer binding starts with these keys; wait for more.
    Prefix,
    Unbound,
}

const EMACS_BINDINGS: &[(&str, Command)] = &[
    ("C-g", Command::KeyboardQuit),
    ("C-SPC", Command::SetMark),
    ("C-k", Command::KillLine),
    ("C-w", Command::KillRegion),
    ("M-w", Command::CopyRegion),
    ("C-y", Command::Yank),
    ("C-x C-o", Command::DeleteBlankLines),
    ("C-S-<backspace>", Command::KillWholeLine),
    ("C-j", Command::Newline),
    ("C-x u", Command::Undo),
    ("C-/", Command::Undo),
    ("C-l", Command::Recenter),
    ("C-p", Command::Move(Motion::Up)),
    ("C-n", Command::Move(Motion::Down)),
    ("C-b", Command::Move(Motion::Left)),
    ("C-f", Command::Move(Motion::Right)),
    ("C-a", Command::Move(Motion::Home)),
    ("C-e", Command::Move(Motion::End)),
    ("M-b", Command::Move(Motion::WordLeft)),
    ("M-f", Command::Move(Motion::WordRight)),
    ("M-v", Command::Move(Motion::PageUp)),
    ("C-v", Command::Move(Motion::PageDown)),
    ("M-<", Command::Move(Motion::Top)),
    ("M->", Command::Move(Motion::Bottom)),
];

/// Key sequence to command bindings.
#[derive(Debug, Clone, Default)]
pub struct Keymap {
    bindings: HashMap<Vec<KeyChord>, Command>,
}

impl Keymap {
    /// An empty keymap.
    pub fn new() -> Self {
        Self::default()
    }

    /// The default Emacs bindings.
    pub fn emacs() -> Self {
        let mut map = Self::new();
        for (keys, command) in EMACS_BINDINGS {
            // The table is static and well formed
            if let Ok(chords) = parse_keys(keys) {
                map.bindings.insert(chords, *command);
            }
        }
        map
    }

    /// Binds `keys` (kbd notation) to `command`, replacing any earlier binding.
    pub fn bind(&mut self, keys: &str, command: Command) -> Result<()> {
        let chords = parse_keys(keys)?;
        self.bindings.insert(chords, command);
        Ok(())
    }

    /// Binds `keys` to the command named `command`.
    pub fn bind_named(&mut self, keys: &str, command: &str) -> Result<()> {
        self.bind(keys, command.parse()?)
    }

    pub fn lookup(&self, keys: &[KeyChord]) -> KeyLookup {
        if keys.is_empty() {
            return KeyLookup::Unbound;
        }
        if let Some(command) = self.bindings.get(keys) {
            return KeyLookup::Bound(*command);
        }
        if self
            .bindings
            .keys()
            .any(|bound| bound.len() > keys.len() && bound.starts_with(keys))
        {
            KeyLookup::Prefix
        } else {
            KeyLookup::Unbound
        }
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
