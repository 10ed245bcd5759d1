//! Win32 window lookup, input injection and message boxes.

use std::mem;
use std::thread;
use std::time::Duration;

use tracing::debug;
use windows::core::PCWSTR;
use windows::Win32::Foundation::{BOOL, HWND, LPARAM, RECT};
use windows::Win32::UI::Input::KeyboardAndMouse::{
    SendInput, INPUT, INPUT_0, INPUT_KEYBOARD, INPUT_MOUSE, KEYBDINPUT, KEYBD_EVENT_FLAGS,
    KEYEVENTF_KEYUP, KEYEVENTF_UNICODE, MOUSEEVENTF_LEFTDOWN, MOUSEEVENTF_LEFTUP, MOUSEINPUT,
    MOUSE_EVENT_FLAGS, VIRTUAL_KEY, VK_BACK, VK_CONTROL, VK_RETURN,
};
use windows::Win32::UI::WindowsAndMessaging::{
    EnumWindows, GetWindowRect, GetWindowTextLengthW, GetWindowTextW, IsWindowVisible,
    MessageBoxW, SetCursorPos, SetForegroundWindow, IDYES, MB_ICONERROR, MB_ICONINFORMATION,
    MB_ICONQUESTION, MB_OK, MB_YESNO,
};

use filecxx_code::{CodeError, CodeResult, KeyStroke, NoticeLevel, TypingPlan, WindowHandle};

const VK_A: VIRTUAL_KEY = VIRTUAL_KEY(0x41);

/// Pause between input steps so the target window keeps up.
const STEP_DELAY: Duration = Duration::from_millis(50);

/// First visible top-level window whose title contains `title`
/// (case-insensitive).
pub fn locate_window(title: &str) -> Option<WindowHandle> {
    let mut found: Vec<(HWND, String)> = Vec::new();
    unsafe {
        // Stops early only if the callback says so; ours never does.
        let _ = EnumWindows(Some(collect_window), LPARAM(&mut found as *mut _ as isize));
    }

    let wanted = title.to_lowercase();
    let (hwnd, window_title) = found
        .into_iter()
        .find(|(_, t)| t.to_lowercase().contains(&wanted))?;

    let mut rect = RECT::default();
    unsafe { GetWindowRect(hwnd, &mut rect) }.ok()?;

    debug!("Found window '{window_title}' at ({}, {})", rect.left, rect.top);
    Some(WindowHandle {
        raw: hwnd.0 as isize,
        title: window_title,
        left: rect.left,
        top: rect.top,
    })
}

unsafe extern "system" fn collect_window(hwnd: HWND, lparam: LPARAM) -> BOOL {
    let found = &mut *(lparam.0 as *mut Vec<(HWND, String)>);
    if IsWindowVisible(hwnd).as_bool() {
        let title = window_title(hwnd);
        if !title.is_empty() {
            found.push((hwnd, title));
        }
    }
    BOOL::from(true)
}

unsafe fn window_title(hwnd: HWND) -> String {
    let len = GetWindowTextLengthW(hwnd);
    if len <= 0 {
        return String::new();
    }
    let mut buf = vec![0u16; len as usize + 1];
    let copied = GetWindowTextW(hwnd, &mut buf).max(0) as usize;
    String::from_utf16_lossy(&buf[..copied])
}

/// Bring the window to the foreground and play the plan into it.
pub fn focus_and_type(window: &WindowHandle, plan: &TypingPlan) -> CodeResult<()> {
    let hwnd = HWND(window.raw as *mut _);
    if !unsafe { SetForegroundWindow(hwnd) }.as_bool() {
        return Err(CodeError::Automation(format!(
            "could not bring '{}' to the foreground",
            window.title
        )));
    }
    thread::sleep(STEP_DELAY);

    for step in &plan.steps {
        debug!("Input step: {step:?}");
        play(window, step)?;
        thread::sleep(STEP_DELAY);
    }
    Ok(())
}

fn play(window: &WindowHandle, step: &KeyStroke) -> CodeResult<()> {
    match step {
        KeyStroke::Click { x, y } => {
            unsafe { SetCursorPos(window.left + x, window.top + y) }
                .map_err(|e| CodeError::Automation(format!("failed to move the cursor: {e}")))?;
            send(&[mouse(MOUSEEVENTF_LEFTDOWN), mouse(MOUSEEVENTF_LEFTUP)])
        }
        KeyStroke::SelectAll => send(&[
            key(VK_CONTROL, KEYBD_EVENT_FLAGS(0)),
            key(VK_A, KEYBD_EVENT_FLAGS(0)),
            key(VK_A, KEYEVENTF_KEYUP),
            key(VK_CONTROL, KEYEVENTF_KEYUP),
        ]),
        KeyStroke::Backspace => tap(VK_BACK),
        KeyStroke::Enter => tap(VK_RETURN),
        KeyStroke::Text(text) => {
            let inputs: Vec<INPUT> = text
                .encode_utf16()
                .flat_map(|unit| [unicode(unit, KEYBD_EVENT_FLAGS(0)), unicode(unit, KEYEVENTF_KEYUP)])
                .collect();
            send(&inputs)
        }
    }
}

fn send(inputs: &[INPUT]) -> CodeResult<()> {
    let sent = unsafe { SendInput(inputs, mem::size_of::<INPUT>() as i32) } as usize;
    if sent != inputs.len() {
        return Err(CodeError::Automation(format!(
            "SendInput injected {sent} of {} events",
            inputs.len()
        )));
    }
    Ok(())
}

fn tap(vk: VIRTUAL_KEY) -> CodeResult<()> {
    send(&[key(vk, KEYBD_EVENT_FLAGS(0)), key(vk, KEYEVENTF_KEYUP)])
}

fn key(vk: VIRTUAL_KEY, flags: KEYBD_EVENT_FLAGS) -> INPUT {
    INPUT {
        r#type: INPUT_KEYBOARD,
        Anonymous: INPUT_0 {
            ki: KEYBDINPUT {
                wVk: vk,
                wScan: 0,
                dwFlags: flags,
                time: 0,
                dwExtraInfo: 0,
            },
        },
    }
}

fn unicode(unit: u16, flags: KEYBD_EVENT_FLAGS) -> INPUT {
    INPUT {
        r#type: INPUT_KEYBOARD,
        Anonymous: INPUT_0 {
            ki: KEYBDINPUT {
                wVk: VIRTUAL_KEY(0),
                wScan: unit,
                dwFlags: KEYEVENTF_UNICODE | flags,
                time: 0,
                dwExtraInfo: 0,
            },
        },
    }
}

fn mouse(flags: MOUSE_EVENT_FLAGS) -> INPUT {
    INPUT {
        r#type: INPUT_MOUSE,
        Anonymous: INPUT_0 {
            mi: MOUSEINPUT {
                dx: 0,
                dy: 0,
                mouseData: 0,
                dwFlags: flags,
                time: 0,
                dwExtraInfo: 0,
            },
        },
    }
}

fn wide(s: &str) -> Vec<u16> {
    s.encode_utf16().chain(std::iter::once(0)).collect()
}

pub fn message_box(title: &str, level: NoticeLevel, message: &str) {
    let style = match level {
        NoticeLevel::Info => MB_OK | MB_ICONINFORMATION,
        NoticeLevel::Error => MB_OK | MB_ICONERROR,
    };
    let text = wide(message);
    let caption = wide(title);
    unsafe {
        MessageBoxW(
            HWND::default(),
            PCWSTR(text.as_ptr()),
            PCWSTR(caption.as_ptr()),
            style,
        );
    }
}

pub fn confirm_box(title: &str, message: &str) -> bool {
    let text = wide(message);
    let caption = wide(title);
    let answer = unsafe {
        MessageBoxW(
            HWND::default(),
            PCWSTR(text.as_ptr()),
            PCWSTR(caption.as_ptr()),
            MB_YESNO | MB_ICONQUESTION,
        )
    };
    answer == IDYES
}
