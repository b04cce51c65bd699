//! Row sources for two-column tag tables.
//!
//! A table has the tag in its first column and the description in its
//! second. Two formats are read:
//! - CSV, where a row may have fewer or more columns: a missing description is
//!   read as empty and extra columns are ignored
//! - Excel workbooks (`.xlsx`), where the first worksheet is read and only
//!   columns `A` and `B` are used
//!
//! Both sources honor [`InputConfig::has_headers`]. Null markers are applied
//! later, when rows are parsed.

use std::{
    fs::File,
    io::{self, BufReader},
    path::Path,
};

use calamine::{Data, Reader, Xlsx};
use log::{debug, warn};

use tagtree_parser::RawRow;

use crate::{TagTreeError, config::InputConfig};

/// File format of a tag table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    Csv,
    Xlsx,
}

impl TableFormat {
    /// Picks the format from the file extension.
    ///
    /// `.xlsx` and `.xlsm` (any case) are workbooks, everything else is CSV.
    ///
    /// # Examples
    ///
    /// ```
    /// use tagtree::input::TableFormat;
    ///
    /// assert_eq!(TableFormat::from_path("Alarms.XLSX"), TableFormat::Xlsx);
    /// assert_eq!(TableFormat::from_path("alarms.csv"), TableFormat::Csv);
    /// assert_eq!(TableFormat::from_path("alarms"), TableFormat::Csv);
    /// ```
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let extension = path
            .as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("xlsx" | "xlsm") => TableFormat::Xlsx,
            _ => TableFormat::Csv,
        }
    }
}

/// Reads all rows of the tag table at `path`, choosing the reader by
/// [`TableFormat::from_path`].
///
/// # Errors
///
/// Returns [`TagTreeError::Io`] if the file cannot be opened, and
/// [`TagTreeError::Input`] or [`TagTreeError::Workbook`] if its content cannot
/// be read.
pub fn read_table_file(path: &Path, config: &InputConfig) -> Result<Vec<RawRow>, TagTreeError> {
    let format = TableFormat::from_path(path);
    debug!(path = path.display().to_string(), format:?; "Reading tag table");

    let reader = BufReader::new(File::open(path)?);
    match format {
        TableFormat::Csv => read_rows(reader, config),
        TableFormat::Xlsx => read_workbook_rows(reader, config),
    }
}

/// Reads all rows of a CSV tag table.
///
/// # Errors
///
/// Returns [`TagTreeError::Input`] if the CSV cannot be read or decoded.
///
/// # Example
///
/// ```
/// use tagtree::{config::InputConfig, input::read_rows};
///
/// let table = "A.M1.1,Overload\nA.M1.2,\"Jam, left side\"\n";
/// let rows = read_rows(table.as_bytes(), &InputConfig::default()).unwrap();
///
/// assert_eq!(rows.len(), 2);
/// assert_eq!(rows[1].description(), "Jam, left side");
/// ```
pub fn read_rows<R: io::Read>(reader: R, config: &InputConfig) -> Result<Vec<RawRow>, TagTreeError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(config.has_headers())
        .flexible(true)
        .from_reader(reader);

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        let tag = record.get(0).unwrap_or_default();
        let description = record.get(1).unwrap_or_default();
        rows.push(RawRow::new(tag, description));
    }

    debug!(rows = rows.len(); "Tag table read");
    Ok(rows)
}

/// Reads all rows of the first worksheet of an Excel workbook.
///
/// Rows are taken from the used range of the sheet. Column `A` is the tag and
/// column `B` the description; empty cells read as empty strings and numbers
/// are written the way they display, so `42.0` reads as `42`.
///
/// # Errors
///
/// Returns [`TagTreeError::Workbook`] if the workbook or its first sheet
/// cannot be read.
pub fn read_workbook_rows<RS: io::Read + io::Seek>(
    reader: RS,
    config: &InputConfig,
) -> Result<Vec<RawRow>, TagTreeError> {
    let mut workbook = Xlsx::new(reader)?;

    let Some(range) = workbook.worksheet_range_at(0) else {
        warn!("Workbook has no worksheets");
        return Ok(Vec::new());
    };
    let range = range?;

    let (Some((first_row, _)), Some((last_row, _))) = (range.start(), range.end()) else {
        debug!("First worksheet is empty");
        return Ok(Vec::new());
    };
    let first_row = if config.has_headers() {
        first_row + 1
    } else {
        first_row
    };

    let cell = |row: u32, column: u32| -> String {
        match range.get_value((row, column)) {
            Some(Data::String(text)) => text.clone(),
            Some(Data::Empty) | None => String::new(),
            Some(other) => other.to_string(),
        }
    };

    let rows: Vec<_> = (first_row..=last_row)
        .map(|row| RawRow::new(cell(row, 0), cell(row, 1)))
        .collect();

    debug!(rows = rows.len(); "Workbook read");
    Ok(rows)
}
