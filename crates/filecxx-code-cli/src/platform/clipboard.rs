//! Clipboard ownership.
//!
//! X11 and Wayland selections are served by the process that set them, so
//! on Linux the text disappears once the owning [`Clipboard`] is dropped.
//! The owner is kept for the rest of the run and [`HeldClipboard::release`]
//! then serves the text until another application replaces it.

use std::cell::RefCell;

use arboard::Clipboard;
use tracing::debug;

use filecxx_code::{CodeError, CodeResult};

#[derive(Default)]
pub struct HeldClipboard {
    owner: RefCell<Option<(Clipboard, String)>>,
}

impl HeldClipboard {
    /// Put `text` on the clipboard and keep ownership of it.
    pub fn copy(&self, text: &str) -> CodeResult<()> {
        let mut clipboard = Clipboard::new()
            .map_err(|e| CodeError::Clipboard(format!("Failed to access system clipboard: {e}")))?;
        clipboard
            .set_text(text)
            .map_err(|e| CodeError::Clipboard(format!("Failed to copy text to clipboard: {e}")))?;

        *self.owner.borrow_mut() = Some((clipboard, text.to_string()));
        Ok(())
    }

    /// Text this process currently owns on the clipboard.
    #[cfg(test)]
    pub fn held_text(&self) -> Option<String> {
        self.owner.borrow().as_ref().map(|(_, text)| text.clone())
    }

    /// Give up the clipboard. On Linux this blocks until another client
    /// takes the selection over.
    pub fn release(&self) {
        let Some((clipboard, text)) = self.owner.borrow_mut().take() else {
            return;
        };
        hand_over(clipboard, text);
    }
}

#[cfg(target_os = "linux")]
fn hand_over(mut clipboard: Clipboard, text: String) {
    use arboard::SetExtLinux;

    eprintln!(
        "Keeping the activation code on the clipboard until something else is copied \
         (Ctrl+C to quit)."
    );
    debug!("Serving clipboard selection until it is replaced");
    if let Err(e) = clipboard.set().wait().text(text) {
        tracing::warn!("Lost the clipboard selection: {e}");
    }
}

#[cfg(not(target_os = "linux"))]
fn hand_over(clipboard: Clipboard, _text: String) {
    debug!("Releasing clipboard");
    drop(clipboard);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nothing_is_held_before_a_copy() {
        let held = HeldClipboard::default();
        assert!(held.held_text().is_none());
        held.release();
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_headless_copy_fails_instead_of_claiming_success() {
        if std::env::var_os("DISPLAY").is_some() || std::env::var_os("WAYLAND_DISPLAY").is_some() {
            return;
        }
        let held = HeldClipboard::default();

        let err = held.copy("ABCDEF").unwrap_err();
        assert!(matches!(err, CodeError::Clipboard(_)));
        assert!(held.held_text().is_none());
    }
}
