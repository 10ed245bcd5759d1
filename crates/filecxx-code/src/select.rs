//! Pick the activation window valid at a given instant.

use chrono::{DateTime, Utc};

use crate::types::ActivationWindow;

/// Return the code of the first window containing `now`, in source order.
///
/// Overlapping windows are not ranked: the earlier listing wins.
pub fn select_code(now: DateTime<Utc>, windows: &[ActivationWindow]) -> Option<&str> {
    windows
        .iter()
        .find(|w| w.contains(now))
        .map(|w| w.code.as_str())
}
