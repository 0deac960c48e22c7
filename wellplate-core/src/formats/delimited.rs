//! CSV export reader
//!
//! Rows are deserialized straight into [`RawRow`] by header name, so column
//! order does not matter and extra columns are ignored. Empty or
//! unparseable numeric cells read as missing.

use super::{check_required, RecordSource};
use crate::ingest::RawRow;
use crate::types::{PlateError, Result};
use std::fs::File;
use std::path::Path;

/// CSV reader using the `csv` crate
pub struct CsvSource;

impl CsvSource {
    /// Open a CSV export and return an iterator over its rows
    pub fn parse(path: &Path) -> Result<CsvRowIterator> {
        log::info!("Reading CSV export: {:?}", path);

        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(path)
            .map_err(|e| PlateError::SourceError(format!("Failed to open {:?}: {}", path, e)))?;

        let headers = reader
            .headers()
            .map_err(|e| PlateError::SourceError(format!("Failed to read header of {:?}: {}", path, e)))?
            .clone();
        let header_names: Vec<&str> = headers.iter().collect();
        check_required(&header_names)?;

        Ok(CsvRowIterator {
            rows: reader.into_deserialize(),
            line: 1,
        })
    }
}

/// Iterator over the rows of a CSV export
pub struct CsvRowIterator {
    rows: csv::DeserializeRecordsIntoIter<File, RawRow>,
    line: usize,
}

impl Iterator for CsvRowIterator {
    type Item = Result<RawRow>;

    fn next(&mut self) -> Option<Self::Item> {
        let row = self.rows.next()?;
        self.line += 1;
        Some(row.map_err(|e| PlateError::SourceError(format!("CSV row {}: {}", self.line, e))))
    }
}

impl RecordSource for CsvRowIterator {
    fn open(path: &Path) -> Result<Self> {
        CsvSource::parse(path)
    }
}
