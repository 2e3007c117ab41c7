#[cfg(feature = "clipboard")]
pub mod clipboard;
pub mod command;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod key;
pub mod linearize;
pub mod mark;
pub mod session;
pub mod traits;
pub mod types;

#[cfg(feature = "clipboard")]
pub use crate::clipboard::SystemClipboard;
pub use crate::command::Command;
pub use crate::config::Config;
pub use crate::coordinator::{Coordinator, CoordinatorBuilder, CoordinatorSnapshot};
pub use crate::error::{EditRejected, Error, Result};
pub use crate::key::{KeyChord, KeyCode, KeyLookup, Keymap, Modifiers};
pub use crate::linearize::{linearize, selections_text};
pub use crate::mark::{MarkMode, MarkState};
pub use crate::traits::{Clipboard, EditorHost};
pub use crate::types::{
    EditorId, HostEvent, Motion, Position, Range, RecenterPosition, RevealPlacement, Selection,
    SelectionChangeKind,
};
