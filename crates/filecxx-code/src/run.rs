//! One end-to-end run: fetch, parse, normalize, select, deliver.

use std::path::Path;

use chrono::{DateTime, Utc};
use tracing::{debug, error, info, warn};

use crate::cache::KeysFile;
use crate::config::{RefreshPolicy, RunConfig};
use crate::delivery::{deliver, DeliveryOutcome, Desktop, NoticeLevel};
use crate::fetch::CodePageClient;
use crate::normalize::normalize_entries;
use crate::parser::parse_page;
use crate::select::select_code;
use crate::types::{ActivationWindow, CodeResult};

pub const CONNECT_FAILED_MESSAGE: &str = "Failed to connect to the server. Please try again later.";
pub const WRITE_FAILED_MESSAGE: &str = "Failed to write keys to file. Check your file permissions.";
pub const READ_FAILED_MESSAGE: &str = "Failed to read the saved keys file.";
pub const NO_VALID_CODE_MESSAGE: &str = "No valid activation code found. Please try again later.";

/// Question asked before an existing code list at `keys_path` is replaced.
pub fn overwrite_prompt(keys_path: &Path) -> String {
    format!("{} already exists. Do you want to overwrite it?", keys_path.display())
}

/// How a run ended. Failures the user was already notified about are
/// outcomes, not errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Delivered(DeliveryOutcome),
    /// No window contains the current instant.
    NoValidCode,
    /// No code list could be obtained.
    Unavailable,
}

/// Run the whole pipeline once, treating `now` as the current instant.
///
/// Only malformed timestamps, `key.txt` write failures, clipboard and
/// automation failures come back as `Err`.
pub async fn run(config: &RunConfig, desktop: &dyn Desktop, now: DateTime<Utc>) -> CodeResult<RunOutcome> {
    let Some(windows) = load_windows(config, desktop).await? else {
        return Ok(RunOutcome::Unavailable);
    };
    debug!("{} activation windows available", windows.len());

    let Some(code) = select_code(now, &windows) else {
        warn!("No activation window contains {now}");
        desktop.notify(NoticeLevel::Error, NO_VALID_CODE_MESSAGE);
        return Ok(RunOutcome::NoValidCode);
    };
    info!("Selected activation code valid at {now}");

    let outcome = deliver(config.delivery, code, &config.key_path, &config.target, desktop)?;
    Ok(RunOutcome::Delivered(outcome))
}

async fn load_windows(
    config: &RunConfig,
    desktop: &dyn Desktop,
) -> CodeResult<Option<Vec<ActivationWindow>>> {
    if config.keys_path.exists() {
        let refresh = match config.refresh {
            RefreshPolicy::Always => true,
            RefreshPolicy::Prompt => desktop.confirm(&overwrite_prompt(&config.keys_path)),
        };

        if !refresh {
            debug!("Keeping {}", config.keys_path.display());
            return Ok(read_cached(config, desktop));
        }
        debug!("Overwriting {}...", config.keys_path.display());
    }

    let client = CodePageClient::new(&config.page_url, config.timeout)?;
    let body = match client.fetch().await {
        Ok(body) => body,
        Err(e) => {
            error!("Failed to connect to the server: {e}");
            desktop.notify(NoticeLevel::Error, CONNECT_FAILED_MESSAGE);
            return Ok(None);
        }
    };

    let parsed = parse_page(&body);
    if !parsed.unpaired_ranges.is_empty() {
        warn!("{} range lines had no code", parsed.unpaired_ranges.len());
    }
    let windows = normalize_entries(&parsed.entries)?;

    if let Err(e) = KeysFile::write_to_file(&windows, &config.keys_path) {
        error!("Failed to write keys to file: {e}");
        desktop.notify(NoticeLevel::Error, WRITE_FAILED_MESSAGE);
    }

    Ok(Some(windows))
}

fn read_cached(config: &RunConfig, desktop: &dyn Desktop) -> Option<Vec<ActivationWindow>> {
    match KeysFile::read_from_file(&config.keys_path) {
        Ok(windows) => Some(windows),
        Err(e) => {
            error!("Failed to read {}: {e}", config.keys_path.display());
            desktop.notify(NoticeLevel::Error, READ_FAILED_MESSAGE);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overwrite_prompt_names_the_configured_file() {
        let prompt = overwrite_prompt(Path::new("cache/codes.json"));
        assert_eq!(prompt, "cache/codes.json already exists. Do you want to overwrite it?");
    }
}
