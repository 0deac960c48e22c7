//! Spreadsheet export reader (XLSX, XLS, ODS)
//!
//! Reads the first worksheet with `calamine`. The first row is the header;
//! columns are located by name.

use super::{check_required, RecordSource, DISTANCE_COLUMNS};
use crate::ingest::RawRow;
use crate::types::{PlateError, Result};
use calamine::{open_workbook_auto, Data, Reader};
use std::path::Path;

static EMPTY_CELL: Data = Data::Empty;

/// Spreadsheet reader using the `calamine` crate
pub struct SpreadsheetSource;

impl SpreadsheetSource {
    /// Open a workbook and return an iterator over the rows of its first sheet
    pub fn parse(path: &Path) -> Result<SpreadsheetRowIterator> {
        log::info!("Reading spreadsheet export: {:?}", path);

        let mut workbook = open_workbook_auto(path)
            .map_err(|e| PlateError::SourceError(format!("Failed to open {:?}: {}", path, e)))?;

        let sheet_name = workbook
            .sheet_names()
            .into_iter()
            .next()
            .ok_or_else(|| PlateError::SourceError(format!("No worksheets in {:?}", path)))?;
        log::debug!("Using worksheet '{}'", sheet_name);

        let range = workbook
            .worksheet_range(&sheet_name)
            .map_err(|e| PlateError::SourceError(format!("Failed to read sheet '{}': {}", sheet_name, e)))?;

        let mut rows = range.rows().map(<[Data]>::to_vec);
        let header = rows
            .next()
            .ok_or_else(|| PlateError::MissingColumn("aname".to_string()))?;
        let columns = ColumnMap::from_header(&header)?;

        Ok(SpreadsheetRowIterator {
            rows: rows.collect::<Vec<_>>().into_iter(),
            columns,
        })
    }
}

/// Column positions resolved from the header row
#[derive(Debug, Clone, Copy)]
struct ColumnMap {
    aname: usize,
    endreason: usize,
    end: usize,
    distances: [Option<usize>; 3],
}

impl ColumnMap {
    fn from_header(header: &[Data]) -> Result<Self> {
        let names: Vec<String> = header.iter().map(|c| text_cell(c).unwrap_or_default()).collect();
        let name_refs: Vec<&str> = names.iter().map(String::as_str).collect();
        check_required(&name_refs)?;

        let position = |wanted: &str| names.iter().position(|n| n.trim() == wanted);
        let required = |wanted: &str| position(wanted).ok_or_else(|| PlateError::MissingColumn(wanted.to_string()));

        Ok(Self {
            aname: required("aname")?,
            endreason: required("endreason")?,
            end: required("end")?,
            distances: DISTANCE_COLUMNS.map(|name| position(name)),
        })
    }
}

/// Iterator over the data rows of a worksheet
pub struct SpreadsheetRowIterator {
    rows: std::vec::IntoIter<Vec<Data>>,
    columns: ColumnMap,
}

impl Iterator for SpreadsheetRowIterator {
    type Item = Result<RawRow>;

    fn next(&mut self) -> Option<Self::Item> {
        let row = self.rows.next()?;
        let cell = |idx: usize| row.get(idx).unwrap_or(&EMPTY_CELL);
        let distance = |slot: usize| self.columns.distances[slot].and_then(|idx| number_cell(cell(idx)));

        Some(Ok(RawRow {
            aname: text_cell(cell(self.columns.aname)).unwrap_or_default(),
            endreason: text_cell(cell(self.columns.endreason)),
            end: number_cell(cell(self.columns.end)),
            inadist: distance(0),
            smldist: distance(1),
            lardist: distance(2),
        }))
    }
}

impl RecordSource for SpreadsheetRowIterator {
    fn open(path: &Path) -> Result<Self> {
        SpreadsheetSource::parse(path)
    }
}

/// Cell as text; empty strings and error cells read as missing
fn text_cell(cell: &Data) -> Option<String> {
    match cell {
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Data::Int(i) => Some(i.to_string()),
        Data::Float(f) => Some(f.to_string()),
        Data::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Cell as a number; numeric strings are parsed, anything else is missing
fn number_cell(cell: &Data) -> Option<f64> {
    match cell {
        Data::Float(f) => Some(*f),
        Data::Int(i) => Some(*i as f64),
        Data::DateTime(dt) => Some(dt.as_f64()),
        Data::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(text: &str) -> Data {
        Data::String(text.to_string())
    }

    #[test]
    fn test_cell_conversions() {
        assert_eq!(number_cell(&Data::Float(1.25)), Some(1.25));
        assert_eq!(number_cell(&Data::Int(3)), Some(3.0));
        assert_eq!(number_cell(&s(" 4.5 ")), Some(4.5));
        assert_eq!(number_cell(&s("NaN-ish")), None);
        assert_eq!(number_cell(&Data::Empty), None);

        assert_eq!(text_cell(&s(" End of period ")), Some("End of period".to_string()));
        assert_eq!(text_cell(&s("   ")), None);
        assert_eq!(text_cell(&Data::Empty), None);
    }

    #[test]
    fn test_header_mapping() {
        let header = vec![s("end"), s("lardist"), s("aname"), s("endreason"), s("inadist")];
        let columns = ColumnMap::from_header(&header).unwrap();
        assert_eq!(columns.aname, 2);
        assert_eq!(columns.endreason, 3);
        assert_eq!(columns.end, 0);
        assert_eq!(columns.distances, [Some(4), None, Some(1)]);
    }

    #[test]
    fn test_header_missing_column() {
        let header = vec![s("aname"), s("end")];
        assert!(matches!(
            ColumnMap::from_header(&header),
            Err(PlateError::MissingColumn(_))
        ));
    }

    #[test]
    fn test_row_iteration() {
        let header = vec![s("aname"), s("endreason"), s("end"), s("inadist"), s("smldist"), s("lardist")];
        let columns = ColumnMap::from_header(&header).unwrap();
        let rows = vec![
            vec![s("Fish-A01"), s("SOUND"), Data::Float(60.0), Data::Float(1.0), Data::Empty, Data::Int(2)],
            vec![s("Fish-B02"), s("SOUND")],
        ];
        let iter = SpreadsheetRowIterator {
            rows: rows.into_iter(),
            columns,
        };
        let parsed: Vec<RawRow> = iter.collect::<Result<_>>().unwrap();

        assert_eq!(parsed[0].end, Some(60.0));
        assert_eq!(parsed[0].smldist, None);
        assert_eq!(parsed[0].lardist, Some(2.0));
        assert_eq!(parsed[1].aname, "Fish-B02");
        assert_eq!(parsed[1].end, None);
    }

    #[test]
    fn test_workbook_not_found() {
        assert!(SpreadsheetSource::parse(Path::new("nonexistent.xlsx")).is_err());
    }
}
