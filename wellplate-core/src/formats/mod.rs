//! Tracking export readers (CSV, spreadsheets)
//!
//! Each reader opens one export file and iterates over its rows as
//! [`RawRow`]s. The format is picked from the file extension.

use crate::ingest::RawRow;
use crate::types::{PlateError, Result};
use std::path::Path;

pub mod delimited;
pub mod spreadsheet;

pub use delimited::{CsvRowIterator, CsvSource};
pub use spreadsheet::{SpreadsheetRowIterator, SpreadsheetSource};

/// Columns every export must carry
pub const REQUIRED_COLUMNS: [&str; 3] = ["aname", "endreason", "end"];

/// Distance columns; absent columns read as missing values
pub const DISTANCE_COLUMNS: [&str; 3] = ["inadist", "smldist", "lardist"];

/// Common trait for all export readers
///
/// Opening validates the header; iteration yields one row at a time.
pub trait RecordSource: Iterator<Item = Result<RawRow>> + Sized {
    /// Open an export file and return an iterator over its rows
    fn open(path: &Path) -> Result<Self>;
}

/// Input formats recognised by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Csv,
    Spreadsheet,
}

impl InputFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|s| s.to_str())
            .map(|s| s.to_lowercase());

        match extension.as_deref() {
            Some("csv") => Ok(InputFormat::Csv),
            Some("xlsx" | "xlsm" | "xlsb" | "xls" | "ods") => Ok(InputFormat::Spreadsheet),
            _ => Err(PlateError::UnsupportedFormat(format!("{:?}", path))),
        }
    }
}

/// Read every row of an export, picking the reader from the extension
pub fn load_rows(path: &Path) -> Result<Vec<RawRow>> {
    let rows = match InputFormat::from_path(path)? {
        InputFormat::Csv => {
            log::debug!("Detected CSV export");
            CsvRowIterator::open(path)?.collect::<Result<Vec<_>>>()?
        }
        InputFormat::Spreadsheet => {
            log::debug!("Detected spreadsheet export");
            SpreadsheetRowIterator::open(path)?.collect::<Result<Vec<_>>>()?
        }
    };
    log::info!("Loaded {} row(s) from {:?}", rows.len(), path);
    Ok(rows)
}

/// Fail with `MissingColumn` for the first required column not in `headers`
pub(crate) fn check_required(headers: &[&str]) -> Result<()> {
    for required in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h.trim() == required) {
            return Err(PlateError::MissingColumn(required.to_string()));
        }
    }
    Ok(())
}
