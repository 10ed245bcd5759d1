//! `keys.json` reader/writer.
//!
//! The file is a pretty-printed JSON array of
//! `{start_date, end_date, activation_code}` records. Dates are written as
//! naive ISO-8601 wall-clock times in the page's UTC+8 offset, exactly as the
//! page lists them, at second precision.

use std::io::{Read, Write};
use std::path::Path;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::normalize::{utc_to_wall_clock, wall_clock_to_utc};
use crate::types::{ActivationWindow, CodeResult};

/// One record of `keys.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedKey {
    pub start_date: NaiveDateTime,
    pub end_date: NaiveDateTime,
    pub activation_code: String,
}

impl CachedKey {
    pub fn from_window(window: &ActivationWindow) -> Self {
        Self {
            start_date: utc_to_wall_clock(window.start),
            end_date: utc_to_wall_clock(window.end),
            activation_code: window.code.clone(),
        }
    }

    pub fn into_window(self) -> ActivationWindow {
        ActivationWindow {
            start: wall_clock_to_utc(self.start_date),
            end: wall_clock_to_utc(self.end_date),
            code: self.activation_code,
        }
    }
}

/// Reader/writer for `keys.json`.
pub struct KeysFile;

impl KeysFile {
    /// Write the windows to a file, replacing any previous content.
    pub fn write_to_file(windows: &[ActivationWindow], path: &Path) -> CodeResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let mut file = std::fs::File::create(path)?;
        Self::write_to(windows, &mut file)
    }

    /// Write the windows to any writer.
    pub fn write_to<W: Write>(windows: &[ActivationWindow], writer: &mut W) -> CodeResult<()> {
        let records: Vec<CachedKey> = windows.iter().map(CachedKey::from_window).collect();
        serde_json::to_writer_pretty(&mut *writer, &records)?;
        writer.flush()?;
        Ok(())
    }

    /// Read windows back from a file.
    pub fn read_from_file(path: &Path) -> CodeResult<Vec<ActivationWindow>> {
        let mut file = std::fs::File::open(path)?;
        Self::read_from(&mut file)
    }

    /// Read windows back from any reader.
    pub fn read_from<R: Read>(reader: &mut R) -> CodeResult<Vec<ActivationWindow>> {
        let records: Vec<CachedKey> = serde_json::from_reader(reader)?;
        Ok(records.into_iter().map(CachedKey::into_window).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize_entry;
    use crate::types::RawWindowEntry;

    fn sample_windows() -> Vec<ActivationWindow> {
        [
            ("2024-01-01 00:00:00 - 2024-01-08 00:00:00", "FIRST"),
            ("2024-01-08 00:00:00 - 2024-01-15 12:30:45", "SECOND"),
        ]
        .iter()
        .map(|(range, code)| {
            normalize_entry(&RawWindowEntry {
                date_range: range.to_string(),
                code: code.to_string(),
            })
            .unwrap()
        })
        .collect()
    }

    #[test]
    fn test_round_trip_preserves_windows() {
        let windows = sample_windows();
        let mut buf = Vec::new();
        KeysFile::write_to(&windows, &mut buf).unwrap();
        let restored = KeysFile::read_from(&mut buf.as_slice()).unwrap();
        assert_eq!(restored, windows);
    }

    #[test]
    fn test_records_hold_page_wall_clock() {
        let mut buf = Vec::new();
        KeysFile::write_to(&sample_windows(), &mut buf).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();

        assert_eq!(value[0]["start_date"], "2024-01-01T00:00:00");
        assert_eq!(value[1]["end_date"], "2024-01-15T12:30:45");
        assert_eq!(value[1]["activation_code"], "SECOND");
    }

    #[test]
    fn test_output_is_two_space_indented() {
        let mut buf = Vec::new();
        KeysFile::write_to(&sample_windows(), &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.starts_with("[\n  {\n    \"start_date\""));
    }

    #[test]
    fn test_write_to_file_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("keys.json");
        KeysFile::write_to_file(&sample_windows(), &path).unwrap();
        assert_eq!(KeysFile::read_from_file(&path).unwrap(), sample_windows());
    }

    #[test]
    fn test_read_rejects_malformed_file() {
        let mut input = br#"[{"start_date": "tomorrow"}]"#.as_slice();
        assert!(KeysFile::read_from(&mut input).is_err());
    }
}
