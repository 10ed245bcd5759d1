//! Hand the selected code to the user.
//!
//! Manual delivery writes `key.txt` and fills the clipboard. Automatic
//! delivery types the code into the File Centipede activation dialog. Every
//! OS interaction goes through the [`Desktop`] capability so the logic here
//! runs the same against a fake in tests.

use std::path::{Path, PathBuf};

use tracing::{debug, error, info};

use crate::config::AutomationTarget;
use crate::types::CodeResult;

/// Horizontal offset of the code input field inside the activation dialog.
pub const INPUT_FIELD_OFFSET_X: i32 = 30;

/// Vertical offset of the code input field inside the activation dialog.
pub const INPUT_FIELD_OFFSET_Y: i32 = 95;

/// "The File Centipede activation code has been copied to the clipboard."
pub const COPIED_MESSAGE: &str = "已将文件蜈蚣的注册码复制到剪贴板";
pub const PROCESS_MISSING_MESSAGE: &str =
    "FileCxx is not running. Please start FileCxx and try again.";
pub const WINDOW_MISSING_MESSAGE: &str = "Open FileCxx Activation window and try again.";

/// How the code reaches the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeliveryMode {
    /// `key.txt` plus clipboard.
    #[default]
    Manual,
    /// Keystrokes into the activation dialog.
    Automatic,
}

/// Severity of a user notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// A top-level window found on the desktop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowHandle {
    /// Platform handle (HWND on Windows).
    pub raw: isize,
    pub title: String,
    pub left: i32,
    pub top: i32,
}

/// One simulated input step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyStroke {
    /// Left click at an offset relative to the window's top-left corner.
    Click { x: i32, y: i32 },
    /// Ctrl+A.
    SelectAll,
    Backspace,
    Text(String),
    Enter,
}

/// The input sequence sent to a focused window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypingPlan {
    pub steps: Vec<KeyStroke>,
}

impl TypingPlan {
    /// Click the code field, clear it, type `code`, submit.
    pub fn replace_field_contents(code: &str) -> Self {
        Self {
            steps: vec![
                KeyStroke::Click {
                    x: INPUT_FIELD_OFFSET_X,
                    y: INPUT_FIELD_OFFSET_Y,
                },
                KeyStroke::SelectAll,
                KeyStroke::Backspace,
                KeyStroke::Text(code.to_string()),
                KeyStroke::Enter,
            ],
        }
    }
}

/// OS capabilities delivery depends on.
pub trait Desktop {
    /// Whether a process with this executable name (case-insensitive) runs.
    fn is_process_running(&self, name: &str) -> bool;

    /// First visible window whose title contains `title`.
    fn locate_window(&self, title: &str) -> Option<WindowHandle>;

    /// Bring `window` to the foreground and play `plan` into it.
    fn focus_and_type(&self, window: &WindowHandle, plan: &TypingPlan) -> CodeResult<()>;

    fn copy_to_clipboard(&self, text: &str) -> CodeResult<()>;

    /// Show a blocking notification.
    fn notify(&self, level: NoticeLevel, message: &str);

    /// Ask a yes/no question. `true` means yes.
    fn confirm(&self, message: &str) -> bool;
}

/// Why automatic delivery stopped before typing anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryBlocker {
    ProcessNotRunning(String),
    WindowNotFound(String),
}

/// Result of a delivery attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// Code written to `key_path` and placed on the clipboard.
    Copied { key_path: PathBuf },
    /// Code typed into the activation dialog.
    Injected { window_title: String },
    /// Preconditions for automatic delivery were not met.
    NotDelivered(DeliveryBlocker),
}

/// Deliver `code` according to `mode`.
pub fn deliver(
    mode: DeliveryMode,
    code: &str,
    key_path: &Path,
    target: &AutomationTarget,
    desktop: &dyn Desktop,
) -> CodeResult<DeliveryOutcome> {
    match mode {
        DeliveryMode::Manual => deliver_manually(code, key_path, desktop),
        DeliveryMode::Automatic => deliver_automatically(code, target, desktop),
    }
}

fn deliver_manually(code: &str, key_path: &Path, desktop: &dyn Desktop) -> CodeResult<DeliveryOutcome> {
    std::fs::write(key_path, code)?;
    debug!("Wrote activation code to {}", key_path.display());

    if let Err(e) = desktop.copy_to_clipboard(code) {
        error!("Failed to copy activation code to clipboard: {e}");
        desktop.notify(NoticeLevel::Error, &format!("Failed to copy to the clipboard: {e}"));
        return Err(e);
    }

    info!("Activation code copied to clipboard");
    desktop.notify(NoticeLevel::Info, COPIED_MESSAGE);
    Ok(DeliveryOutcome::Copied {
        key_path: key_path.to_path_buf(),
    })
}

fn deliver_automatically(
    code: &str,
    target: &AutomationTarget,
    desktop: &dyn Desktop,
) -> CodeResult<DeliveryOutcome> {
    if !desktop.is_process_running(&target.process_name) {
        error!("{} is not running", target.process_name);
        desktop.notify(NoticeLevel::Error, PROCESS_MISSING_MESSAGE);
        return Ok(DeliveryOutcome::NotDelivered(
            DeliveryBlocker::ProcessNotRunning(target.process_name.clone()),
        ));
    }

    let Some(window) = desktop.locate_window(&target.window_title) else {
        error!("Activation window '{}' not found", target.window_title);
        desktop.notify(NoticeLevel::Error, WINDOW_MISSING_MESSAGE);
        return Ok(DeliveryOutcome::NotDelivered(DeliveryBlocker::WindowNotFound(
            target.window_title.clone(),
        )));
    };

    debug!("Window: {window:?}");
    let plan = TypingPlan::replace_field_contents(code);
    desktop.focus_and_type(&window, &plan)?;

    info!("Typed activation code into '{}'", window.title);
    Ok(DeliveryOutcome::Injected {
        window_title: window.title,
    })
}
