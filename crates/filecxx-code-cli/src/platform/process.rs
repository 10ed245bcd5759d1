//! Process detection for the File Centipede client.
//!
//! Shells out to `tasklist` on Windows and `pgrep` elsewhere. A check that
//! cannot run counts as "not running".

use std::process::{Command, Stdio};

use tracing::{debug, warn};

/// Whether a process with this executable name (case-insensitive) runs.
pub fn is_process_running(name: &str) -> bool {
    match query(name) {
        Some(running) => {
            debug!("Process {name} running: {running}");
            running
        }
        None => false,
    }
}

#[cfg(target_os = "windows")]
fn query(name: &str) -> Option<bool> {
    use std::os::windows::process::CommandExt;

    let output = Command::new("tasklist")
        .args(["/FI", &format!("IMAGENAME eq {name}"), "/NH"])
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .creation_flags(0x08000000) // CREATE_NO_WINDOW
        .output();

    match output {
        Ok(output) if output.status.success() => {
            let stdout = String::from_utf8_lossy(&output.stdout);
            Some(listing_mentions(&stdout, name))
        }
        Ok(output) => {
            warn!(exit_code = ?output.status.code(), "tasklist command failed");
            None
        }
        Err(e) => {
            warn!(error = %e, "Failed to spawn tasklist");
            None
        }
    }
}

#[cfg(not(target_os = "windows"))]
fn query(name: &str) -> Option<bool> {
    let output = Command::new("pgrep")
        .args(["-i", "-x", name])
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .output();

    match output {
        Ok(output) => match output.status.code() {
            Some(0) => Some(true),
            Some(1) => Some(false),
            other => {
                warn!(exit_code = ?other, "pgrep returned unexpected exit code");
                None
            }
        },
        Err(e) => {
            warn!(error = %e, "Failed to spawn pgrep");
            None
        }
    }
}

/// Whether a `tasklist` listing contains `name` as an image name.
#[cfg_attr(not(target_os = "windows"), allow(dead_code))]
fn listing_mentions(listing: &str, name: &str) -> bool {
    let name = name.to_lowercase();
    listing
        .lines()
        .filter_map(|line| line.split_whitespace().next())
        .any(|image| image.to_lowercase() == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_mentions_image_name() {
        let listing = "\r\nFileU.exe                     4312 Console                    1     52,112 K\r\n";
        assert!(listing_mentions(listing, "fileu.exe"));
    }

    #[test]
    fn test_listing_without_match() {
        let listing = "INFO: No tasks are running which match the specified criteria.\r\n";
        assert!(!listing_mentions(listing, "fileu.exe"));
    }

    #[test]
    fn test_unknown_process_is_not_running() {
        assert!(!is_process_running("no-such-process-filecxx-code.exe"));
    }
}
