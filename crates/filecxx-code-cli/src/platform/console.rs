//! Console fallback for platforms without window automation.

use std::io::{BufRead, Write};

use tracing::warn;

use filecxx_code::{CodeError, CodeResult, NoticeLevel, TypingPlan, WindowHandle};

pub fn locate_window(title: &str) -> Option<WindowHandle> {
    warn!("Window automation is not supported on this platform; cannot look up '{title}'");
    None
}

pub fn focus_and_type(window: &WindowHandle, _plan: &TypingPlan) -> CodeResult<()> {
    Err(CodeError::Automation(format!(
        "cannot type into '{}': window automation is not supported on this platform",
        window.title
    )))
}

pub fn message_box(title: &str, level: NoticeLevel, message: &str) {
    match level {
        NoticeLevel::Info => println!("{title}: {message}"),
        NoticeLevel::Error => eprintln!("{title}: {message}"),
    }
}

pub fn confirm_box(title: &str, message: &str) -> bool {
    print!("{title}: {message} [y/N] ");
    let _ = std::io::stdout().flush();

    let mut answer = String::new();
    if std::io::stdin().lock().read_line(&mut answer).is_err() {
        return false;
    }
    is_yes(&answer)
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}
