//! Turn `"START - END"` wall-clock ranges into UTC activation windows.
//!
//! The code page publishes its times in UTC+8.

use chrono::{DateTime, FixedOffset, NaiveDateTime, Timelike, Utc};

use crate::parser::RANGE_SEPARATOR;
use crate::types::{ActivationWindow, CodeError, CodeResult, RawWindowEntry};

/// Offset of the wall-clock times on the code page.
pub const SOURCE_UTC_OFFSET_HOURS: i32 = 8;

/// Exact timestamp layout used by the code page.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Length of a zero-padded `YYYY-MM-DD HH:MM:SS` timestamp.
const TIMESTAMP_LEN: usize = 19;

/// Non-digit positions of the layout and the byte expected at each.
const TIMESTAMP_PUNCTUATION: [(usize, u8); 5] =
    [(4, b'-'), (7, b'-'), (10, b' '), (13, b':'), (16, b':')];

/// The fixed offset the code page publishes in.
pub fn source_offset() -> FixedOffset {
    FixedOffset::east_opt(SOURCE_UTC_OFFSET_HOURS * 3600).expect("UTC+8 is a valid offset")
}

/// Parse one zero-padded `YYYY-MM-DD HH:MM:SS` timestamp.
pub fn parse_wall_clock(text: &str) -> CodeResult<NaiveDateTime> {
    if text.len() != TIMESTAMP_LEN {
        return Err(CodeError::Timestamp {
            text: text.to_string(),
            reason: format!("expected {TIMESTAMP_LEN} characters, got {}", text.len()),
        });
    }

    if let Some(index) = misplaced_byte(text.as_bytes()) {
        return Err(CodeError::Timestamp {
            text: text.to_string(),
            reason: format!("unexpected character at position {index}"),
        });
    }

    let naive = NaiveDateTime::parse_from_str(text, TIMESTAMP_FORMAT).map_err(|e| {
        CodeError::Timestamp {
            text: text.to_string(),
            reason: e.to_string(),
        }
    })?;

    // chrono keeps a leap second as nanoseconds past 1e9
    if naive.nanosecond() >= 1_000_000_000 {
        return Err(CodeError::Timestamp {
            text: text.to_string(),
            reason: "second out of range".to_string(),
        });
    }

    Ok(naive)
}

/// Index of the first byte that does not fit the zero-padded layout.
fn misplaced_byte(bytes: &[u8]) -> Option<usize> {
    bytes.iter().enumerate().position(|(index, byte)| {
        match TIMESTAMP_PUNCTUATION.iter().find(|(at, _)| *at == index) {
            Some((_, expected)) => byte != expected,
            None => !byte.is_ascii_digit(),
        }
    })
}

/// Attach the source offset to a wall-clock time and convert it to UTC.
pub fn wall_clock_to_utc(naive: NaiveDateTime) -> DateTime<Utc> {
    let offset = source_offset();
    DateTime::<FixedOffset>::from_naive_utc_and_offset(naive - offset, offset).with_timezone(&Utc)
}

/// Inverse of [`wall_clock_to_utc`].
pub fn utc_to_wall_clock(instant: DateTime<Utc>) -> NaiveDateTime {
    instant.with_timezone(&source_offset()).naive_local()
}

/// Split a range line into its two wall-clock boundaries.
pub fn split_range(date_range: &str) -> CodeResult<(NaiveDateTime, NaiveDateTime)> {
    let (start, end) = date_range
        .split_once(RANGE_SEPARATOR)
        .ok_or_else(|| CodeError::DateRange(date_range.to_string()))?;
    Ok((parse_wall_clock(start)?, parse_wall_clock(end)?))
}

/// Normalize one parsed entry.
pub fn normalize_entry(entry: &RawWindowEntry) -> CodeResult<ActivationWindow> {
    let (start, end) = split_range(&entry.date_range)?;
    Ok(ActivationWindow {
        start: wall_clock_to_utc(start),
        end: wall_clock_to_utc(end),
        code: entry.code.clone(),
    })
}

/// Normalize every entry, keeping source order. The first malformed
/// timestamp fails the whole batch.
pub fn normalize_entries(entries: &[RawWindowEntry]) -> CodeResult<Vec<ActivationWindow>> {
    entries.iter().map(normalize_entry).collect()
}
