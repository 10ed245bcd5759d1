//! OS-backed [`Desktop`] implementation.
//!
//! Window lookup, keystroke injection and message boxes use Win32 on
//! Windows. Other platforms fall back to the console and report that window
//! automation is unavailable.

mod clipboard;
mod process;

#[cfg(target_os = "windows")]
mod win32;
#[cfg(target_os = "windows")]
use self::win32 as native;

#[cfg(not(target_os = "windows"))]
mod console;
#[cfg(not(target_os = "windows"))]
use self::console as native;

use tracing::debug;

use filecxx_code::{CodeResult, Desktop, NoticeLevel, TypingPlan, WindowHandle};

use self::clipboard::HeldClipboard;

/// Caption of every message box the tool shows.
pub const DIALOG_TITLE: &str = "FileCxx Automatic Activation Code";

/// The real desktop.
#[derive(Default)]
pub struct SystemDesktop {
    clipboard: HeldClipboard,
}

impl SystemDesktop {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hand the copied code over before the process exits.
    pub fn release_clipboard(&self) {
        self.clipboard.release();
    }
}

impl Desktop for SystemDesktop {
    fn is_process_running(&self, name: &str) -> bool {
        process::is_process_running(name)
    }

    fn locate_window(&self, title: &str) -> Option<WindowHandle> {
        native::locate_window(title)
    }

    fn focus_and_type(&self, window: &WindowHandle, plan: &TypingPlan) -> CodeResult<()> {
        debug!("Attempting to type into {window:?}");
        native::focus_and_type(window, plan)
    }

    fn copy_to_clipboard(&self, text: &str) -> CodeResult<()> {
        self.clipboard.copy(text)
    }

    fn notify(&self, level: NoticeLevel, message: &str) {
        native::message_box(DIALOG_TITLE, level, message);
    }

    fn confirm(&self, message: &str) -> bool {
        native::confirm_box(DIALOG_TITLE, message)
    }
}
