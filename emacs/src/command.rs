use std::fmt;
use std::str::FromStr;

use crate::error::Error;
use crate::types::Motion;

/// Every command the coordinator can execute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// `C-g`: leave mark mode.
    KeyboardQuit,
    /// `C-SPC`: set the mark, or cancel it if nothing moved.
    SetMark,
    /// `C-k`: kill to end of line.
    KillLine,
    /// `C-w`: cut the region.
    KillRegion,
    /// `M-w`: copy the region.
    CopyRegion,
    /// `C-y`
    Yank,
    /// `C-x C-o`
    DeleteBlankLines,
    /// `C-S-<backspace>`
    KillWholeLine,
    /// `C-j`
    Newline,
    /// `C-x u`, `C-/`
    Undo,
    /// `C-l`
    Recenter,
    /// Mark-aware cursor movement.
    Move(Motion),
}

const NAMES: &[(&str, Command)] = &[
    ("keyboard-quit", Command::KeyboardQuit),
    ("set-mark-command", Command::SetMark),
    ("kill-line", Command::KillLine),
    ("kill-region", Command::KillRegion),
    ("kill-ring-save", Command::CopyRegion),
    ("yank", Command::Yank),
    ("delete-blank-lines", Command::DeleteBlankLines),
    ("kill-whole-line", Command::KillWholeLine),
    ("newline", Command::Newline),
    ("undo", Command::Undo),
    ("recenter-top-bottom", Command::Recenter),
    ("previous-line", Command::Move(Motion::Up)),
    ("next-line", Command::Move(Motion::Down)),
    ("backward-char", Command::Move(Motion::Left)),
    ("forward-char", Command::Move(Motion::Right)),
    ("move-beginning-of-line", Command::Move(Motion::Home)),
    ("move-end-of-line", Command::Move(Motion::End)),
    ("backward-word", Command::Move(Motion::WordLeft)),
    ("forward-word", Command::Move(Motion::WordRight)),
    ("scroll-down-command", Command::Move(Motion::PageUp)),
    ("scroll-up-command", Command::Move(Motion::PageDown)),
    ("beginning-of-buffer", Command::Move(Motion::Top)),
    ("end-of-buffer", Command::Move(Motion::Bottom)),
];

impl Command {
    /// The Emacs function name of this command.
    pub fn name(self) -> &'static str {
        NAMES
            .iter()
            .find(|(_, cmd)| *cmd == self)
            .map(|(name, _)| *name)
            .unwrap_or("ignore")
    }

    /// All named commands, in a stable order.
    pub fn all() -> impl Iterator<Item = Command> {
        NAMES.iter().map(|(_, cmd)| *cmd)
    }
}

impl FromStr for Command {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NAMES
            .iter()
            .find(|(name, _)| *name == s.trim())
            .map(|(_, cmd)| *cmd)
            .ok_or_else(|| Error::UnknownCommand(s.to_string()))
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
