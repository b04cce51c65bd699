//! Row filtering and batch parsing.
//!
//! Rows arrive from the row source as raw `(tag, description)` pairs. Before
//! a row is parsed it is checked against two skip rules:
//! - a tag that is empty or equal to a null marker is dropped
//! - a tag whose last dot-separated segment is the wildcard `*` is dropped
//!
//! Skipped rows are reported in [`ParseOutput::skipped`], never as errors.

use std::fmt;

use log::{debug, info};

use tagtree_core::record::TagRecord;

use crate::tag::parse_tag;

/// Last tag segment that marks a template row rather than data.
pub const WILDCARD: &str = "*";

/// One row as read from the row source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    tag: String,
    description: String,
}

impl RawRow {
    pub fn new(tag: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            description: description.into(),
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

/// Configuration for [`parse_rows`].
#[derive(Debug, Clone)]
pub struct ParseConfig {
    null_markers: Vec<String>,
}

impl ParseConfig {
    /// Creates a configuration with the given null markers.
    ///
    /// A cell whose trimmed content equals one of the markers is treated as
    /// empty.
    pub fn new(null_markers: Vec<String>) -> Self {
        Self { null_markers }
    }

    fn is_null(&self, cell: &str) -> bool {
        cell.is_empty() || self.null_markers.iter().any(|marker| marker == cell)
    }
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self::new(vec!["N/A".to_string()])
    }
}

/// Why a row produced no record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The tag cell was empty or a null marker.
    NullTag,
    /// The tag ends in the wildcard segment.
    Wildcard,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NullTag => write!(f, "null tag"),
            SkipReason::Wildcard => write!(f, "wildcard tag"),
        }
    }
}

/// A row that was dropped before parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkippedRow {
    /// Zero-based position of the row in the input.
    pub row: usize,
    pub reason: SkipReason,
}

/// Result of [`parse_rows`].
#[derive(Debug, Clone, Default)]
pub struct ParseOutput {
    /// Records in input order.
    pub records: Vec<TagRecord>,
    pub skipped: Vec<SkippedRow>,
}

fn skip_reason(tag: &str, config: &ParseConfig) -> Option<SkipReason> {
    if config.is_null(tag) {
        return Some(SkipReason::NullTag);
    }
    if tag.rsplit('.').next() == Some(WILDCARD) {
        return Some(SkipReason::Wildcard);
    }
    None
}

/// Parse a batch of rows into records.
///
/// Tags and descriptions are trimmed. Null or empty descriptions become
/// `None`. Row order is preserved.
///
/// # Example
///
/// ```
/// use tagtree_parser::{ParseConfig, RawRow, SkipReason, parse_rows};
///
/// let rows = vec![
///     RawRow::new("A.M1.1", "Overload"),
///     RawRow::new("A.M1.*", "template row"),
///     RawRow::new("N/A", ""),
/// ];
///
/// let output = parse_rows(&rows, &ParseConfig::default());
/// assert_eq!(output.records.len(), 1);
/// assert_eq!(output.skipped[0].reason, SkipReason::Wildcard);
/// assert_eq!(output.skipped[1].reason, SkipReason::NullTag);
/// ```
pub fn parse_rows(rows: &[RawRow], config: &ParseConfig) -> ParseOutput {
    let mut output = ParseOutput::default();

    for (row, raw) in rows.iter().enumerate() {
        let tag = raw.tag().trim();

        if let Some(reason) = skip_reason(tag, config) {
            debug!(row, tag, reason:% = reason; "Skipping row");
            output.skipped.push(SkippedRow { row, reason });
            continue;
        }

        let description = raw.description().trim();
        let description = (!config.is_null(description)).then(|| description.to_string());

        output.records.push(parse_tag(tag, description));
    }

    info!(
        rows = rows.len(),
        records = output.records.len(),
        skipped = output.skipped.len();
        "Rows parsed"
    );

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wildcard_rows_dropped() {
        let rows = vec![RawRow::new("Area.Motor.*", "marker")];
        let output = parse_rows(&rows, &ParseConfig::default());

        assert!(output.records.is_empty());
        assert_eq!(
            output.skipped,
            vec![SkippedRow {
                row: 0,
                reason: SkipReason::Wildcard
            }]
        );
    }

    #[test]
    fn test_wildcard_must_be_whole_segment() {
        let rows = vec![RawRow::new("Area.Motor.*1", "x"), RawRow::new("Area.*.1", "y")];
        let output = parse_rows(&rows, &ParseConfig::default());

        assert_eq!(output.records.len(), 2);
        assert!(output.skipped.is_empty());
    }

    #[test]
    fn test_null_tags_dropped() {
        let rows = vec![
            RawRow::new("", "x"),
            RawRow::new("   ", "x"),
            RawRow::new("N/A", "x"),
            RawRow::new("A.M1.1", "kept"),
        ];
        let output = parse_rows(&rows, &ParseConfig::default());

        assert_eq!(output.records.len(), 1);
        let skipped_rows: Vec<_> = output.skipped.iter().map(|s| s.row).collect();
        assert_eq!(skipped_rows, [0, 1, 2]);
        assert!(output.skipped.iter().all(|s| s.reason == SkipReason::NullTag));
    }

    #[test]
    fn test_null_description_becomes_none() {
        let rows = vec![
            RawRow::new("A.M1.1", "N/A"),
            RawRow::new("A.M1.2", "  "),
            RawRow::new(" A.M1.3 ", " Jam "),
        ];
        let output = parse_rows(&rows, &ParseConfig::default());

        assert_eq!(output.records[0].description(), None);
        assert_eq!(output.records[1].description(), None);
        assert_eq!(output.records[2].description(), Some("Jam"));
        assert_eq!(output.records[2].bit(), Some("3"));
    }

    #[test]
    fn test_custom_null_markers() {
        let config = ParseConfig::new(vec!["-".to_string()]);
        let rows = vec![RawRow::new("-", ""), RawRow::new("N/A.X.1", "-")];
        let output = parse_rows(&rows, &config);

        assert_eq!(output.skipped.len(), 1);
        assert_eq!(output.records.len(), 1);
        assert_eq!(output.records[0].description(), None);
    }
}
