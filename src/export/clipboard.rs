//! Clipboard access backed by the `arboard` crate.
//!
//! [`SystemClipboard`] opens a short-lived [`arboard::Clipboard`] handle per
//! write rather than keeping one around, because `arboard::Clipboard` is not
//! `Send` on all platforms and the handle is cheap to create.

use super::ExportError;

/// Something text can be copied to.
pub trait Clipboard: Send + Sync {
    fn write_text(&self, text: &str) -> Result<(), ExportError>;
}

/// The operating system clipboard.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClipboard;

impl SystemClipboard {
    pub fn new() -> Self {
        Self
    }
}

impl Clipboard for SystemClipboard {
    /// Write `text` into the system clipboard, replacing whatever was there.
    ///
    /// # Errors
    ///
    /// [`ExportError::ClipboardUnavailable`] if the clipboard cannot be
    /// opened or written (no display server, access denied, …).
    fn write_text(&self, text: &str) -> Result<(), ExportError> {
        let mut clipboard = arboard::Clipboard::new()
            .map_err(|e| ExportError::ClipboardUnavailable(e.to_string()))?;
        clipboard
            .set_text(text)
            .map_err(|e| ExportError::ClipboardUnavailable(e.to_string()))
    }
}
