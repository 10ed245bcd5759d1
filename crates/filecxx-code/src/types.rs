//! Core data types for activation windows.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A `"START - END"` line paired with the code line that followed it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawWindowEntry {
    pub date_range: String,
    pub code: String,
}

/// A normalized activation window, boundaries in UTC.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivationWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub code: String,
}

impl ActivationWindow {
    /// Whether `now` falls inside the window, both ends inclusive.
    ///
    /// An inverted window (`start > end`) never contains anything.
    pub fn contains(&self, now: DateTime<Utc>) -> bool {
        self.start <= now && now <= self.end
    }
}

/// Errors that can occur while producing or delivering an activation code.
#[derive(thiserror::Error, Debug)]
pub enum CodeError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Malformed timestamp '{text}': {reason}")]
    Timestamp { text: String, reason: String },

    #[error("Malformed date range '{0}': missing ' - ' separator")]
    DateRange(String),

    #[error("Clipboard error: {0}")]
    Clipboard(String),

    #[error("Automation error: {0}")]
    Automation(String),
}

/// Convenience result type.
pub type CodeResult<T> = Result<T, CodeError>;
