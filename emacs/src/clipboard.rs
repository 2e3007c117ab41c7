//! System clipboard backed by `arboard`.

use crate::traits::Clipboard;

/// The OS clipboard. Failures are logged and read as an empty clipboard.
pub struct SystemClipboard {
    inner: arboard::Clipboard,
}

impl SystemClipboard {
    pub fn new() -> Result<Self, arboard::Error> {
        Ok(Self {
            inner: arboard::Clipboard::new()?,
        })
    }
}

impl Clipboard for SystemClipboard {
    fn get(&mut self) -> Option<String> {
        match self.inner.get_text() {
            Ok(text) => Some(text),
            Err(arboard::Error::ContentNotAvailable) => None,
            Err(err) => {
                tracing::warn!("clipboard read failed: {err}");
                None
            }
        }
    }

    fn set(&mut self, text: String) {
        if let Err(err) = self.inner.set_text(text) {
            tracing::warn!("clipboard write failed: {err}");
        }
    }

    fn clear(&mut self) {
        if let Err(err) = self.inner.clear() {
            tracing::warn!("clipboard clear failed: {err}");
        }
    }
}
