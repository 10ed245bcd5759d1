//! Extract `(date range, code)` pairs from the activation code page.
//!
//! The page carries a single `<pre id="codes">` block of alternating lines:
//!
//! ```text
//! 2024-01-01 00:00:00 - 2024-01-08 00:00:00
//! ABCDEF...
//! 2024-01-08 00:00:00 - 2024-01-15 00:00:00
//! GHIJKL...
//! ```
//!
//! Parsing is lenient: a range line that never gets a code line is skipped
//! and reported in [`ParsedBlock::unpaired_ranges`] instead of failing the
//! whole block.

use scraper::{Html, Selector};
use tracing::debug;

use crate::types::RawWindowEntry;

/// CSS selector of the block holding the codes.
pub const CODES_SELECTOR: &str = "pre#codes";

/// Separator between the two timestamps of a range line.
pub const RANGE_SEPARATOR: &str = " - ";

/// Result of scanning the code block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedBlock {
    /// Paired entries, in source order.
    pub entries: Vec<RawWindowEntry>,
    /// Range lines dropped because no code line followed them.
    pub unpaired_ranges: Vec<String>,
}

/// Parse a full HTML page. A page without the code block yields an empty
/// result.
pub fn parse_page(html: &str) -> ParsedBlock {
    let document = Html::parse_document(html);
    let sel = Selector::parse(CODES_SELECTOR).unwrap();

    let Some(pre) = document.select(&sel).next() else {
        debug!("No <pre id=\"codes\"> element in page");
        return ParsedBlock::default();
    };

    let text: String = pre.text().collect();
    debug!("Found code block with {} lines", text.lines().count());
    pair_lines(&text)
}

/// Pair each range line with the next non-blank line.
pub fn pair_lines(text: &str) -> ParsedBlock {
    let mut block = ParsedBlock::default();
    let mut pending: Option<&str> = None;

    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if line.contains(RANGE_SEPARATOR) {
            if let Some(stale) = pending.replace(line) {
                skip_unpaired(&mut block, stale);
            }
        } else if let Some(date_range) = pending.take() {
            block.entries.push(RawWindowEntry {
                date_range: date_range.to_string(),
                code: line.to_string(),
            });
        }
    }

    if let Some(stale) = pending {
        skip_unpaired(&mut block, stale);
    }

    block
}

fn skip_unpaired(block: &mut ParsedBlock, range: &str) {
    debug!("Skipping range without a code line: {range}");
    block.unpaired_ranges.push(range.to_string());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(range: &str, code: &str) -> RawWindowEntry {
        RawWindowEntry {
            date_range: range.to_string(),
            code: code.to_string(),
        }
    }

    #[test]
    fn test_pairs_alternating_lines_in_order() {
        let text = "\
2024-01-01 00:00:00 - 2024-01-02 00:00:00
AAAA
2024-01-02 00:00:00 - 2024-01-03 00:00:00
BBBB
";
        let block = pair_lines(text);
        assert_eq!(
            block.entries,
            vec![
                entry("2024-01-01 00:00:00 - 2024-01-02 00:00:00", "AAAA"),
                entry("2024-01-02 00:00:00 - 2024-01-03 00:00:00", "BBBB"),
            ]
        );
        assert!(block.unpaired_ranges.is_empty());
    }

    #[test]
    fn test_consecutive_ranges_drop_the_stale_one() {
        let text = "\
2024-01-01 00:00:00 - 2024-01-02 00:00:00
2024-01-02 00:00:00 - 2024-01-03 00:00:00
BBBB
";
        let block = pair_lines(text);
        assert_eq!(
            block.entries,
            vec![entry("2024-01-02 00:00:00 - 2024-01-03 00:00:00", "BBBB")]
        );
        assert_eq!(
            block.unpaired_ranges,
            vec!["2024-01-01 00:00:00 - 2024-01-02 00:00:00".to_string()]
        );
    }

    #[test]
    fn test_trailing_range_is_dropped() {
        let block = pair_lines("2024-01-01 00:00:00 - 2024-01-02 00:00:00\nAAAA\n2024-01-03 00:00:00 - 2024-01-04 00:00:00\n");
        assert_eq!(block.entries.len(), 1);
        assert_eq!(block.unpaired_ranges.len(), 1);
    }

    #[test]
    fn test_blank_lines_and_padding_are_ignored() {
        let text = "\n   \n  2024-01-01 00:00:00 - 2024-01-02 00:00:00  \r\n\n\t AAAA \r\n\n";
        let block = pair_lines(text);
        assert_eq!(
            block.entries,
            vec![entry("2024-01-01 00:00:00 - 2024-01-02 00:00:00", "AAAA")]
        );
    }

    #[test]
    fn test_lines_before_first_range_are_ignored() {
        let block = pair_lines("Activation codes\nnotice\n2024-01-01 00:00:00 - 2024-01-02 00:00:00\nAAAA");
        assert_eq!(block.entries.len(), 1);
        assert_eq!(block.entries[0].code, "AAAA");
    }

    #[test]
    fn test_parse_page_reads_the_codes_block() {
        let html = r#"
        <html><body>
        <pre id="other">2020-01-01 00:00:00 - 2020-01-02 00:00:00
IGNORED</pre>
        <pre id="codes">
2024-01-01 00:00:00 - 2030-01-01 00:00:00
ABCDEF
</pre>
        </body></html>
        "#;
        let block = parse_page(html);
        assert_eq!(
            block.entries,
            vec![entry("2024-01-01 00:00:00 - 2030-01-01 00:00:00", "ABCDEF")]
        );
    }

    #[test]
    fn test_parse_page_without_block_is_empty() {
        let block = parse_page("<html><body><p>maintenance</p></body></html>");
        assert_eq!(block, ParsedBlock::default());
    }
}
