//! Well coordinates
//!
//! A well is addressed by a row letter (`A`-`H`) and a two-digit, one-based
//! column number (`01`-`99`). Internally both axes are stored zero-based so
//! they index straight into a plate grid.

use crate::types::{PlateError, Result};
use serde::Serializer;
use std::fmt;
use std::str::FromStr;

/// Row letters a plate can carry
pub const ROW_LETTERS: &str = "ABCDEFGH";

/// Highest column number a well id can spell with two digits
pub const MAX_COLUMN_NUMBER: usize = 99;

/// A parsed well position
///
/// Ordering is by row first, then column, which matches the lexical order
/// of zero-padded well ids (`A01 < A02 < B01`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WellAddress {
    /// Zero-based row index (`A` = 0)
    pub row: usize,
    /// Zero-based column index (`01` = 0)
    pub col: usize,
}

impl WellAddress {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Parse a canonical well id such as `"B07"`
    ///
    /// Accepts exactly one uppercase row letter `A`-`H` followed by exactly
    /// two digits spelling 1-99. Case is not folded here; callers normalise
    /// before parsing.
    pub fn parse(text: &str) -> Result<Self> {
        let bytes = text.as_bytes();
        if bytes.len() != 3 || !bytes[1].is_ascii_digit() || !bytes[2].is_ascii_digit() {
            return Err(PlateError::MalformedWellId(text.to_string()));
        }
        Self::from_parts(text, bytes[0], &text[1..])
    }

    /// Parse a well coordinate as typed in a range expression (`"A1"`, `"H12"`)
    ///
    /// Same as [`WellAddress::parse`] but the column may be one or two digits.
    pub fn parse_coordinate(text: &str) -> Result<Self> {
        let bytes = text.as_bytes();
        let digits_ok = matches!(bytes.len(), 2 | 3) && bytes[1..].iter().all(u8::is_ascii_digit);
        if !digits_ok {
            return Err(PlateError::MalformedWellId(text.to_string()));
        }
        Self::from_parts(text, bytes[0], &text[1..])
    }

    fn from_parts(text: &str, letter: u8, digits: &str) -> Result<Self> {
        let row = ROW_LETTERS
            .bytes()
            .position(|b| b == letter)
            .ok_or_else(|| PlateError::MalformedWellId(text.to_string()))?;
        let column: usize = digits
            .parse()
            .map_err(|_| PlateError::MalformedWellId(text.to_string()))?;
        if !(1..=MAX_COLUMN_NUMBER).contains(&column) {
            return Err(PlateError::MalformedWellId(text.to_string()));
        }
        Ok(Self::new(row, column - 1))
    }

    /// Row letter, or `?` for an index past `H`
    pub fn row_letter(&self) -> char {
        row_label(self.row)
    }

    /// One-based column number as printed on the plate
    pub fn column_number(&self) -> usize {
        self.col + 1
    }
}

impl fmt::Display for WellAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:02}", self.row_letter(), self.column_number())
    }
}

impl FromStr for WellAddress {
    type Err = PlateError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Row label for a zero-based row index
pub fn row_label(row: usize) -> char {
    ROW_LETTERS.chars().nth(row).unwrap_or('?')
}

/// Zero-padded column label for a zero-based column index
pub fn column_label(col: usize) -> String {
    format!("{:02}", col + 1)
}

/// Serialize any `Display` value as its string form
pub(crate) fn serialize_display<T, S>(value: &T, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    T: fmt::Display,
    S: Serializer,
{
    serializer.collect_str(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_well_id() {
        assert_eq!(WellAddress::parse("A01").unwrap(), WellAddress::new(0, 0));
        assert_eq!(WellAddress::parse("H12").unwrap(), WellAddress::new(7, 11));
        assert_eq!(WellAddress::parse("C99").unwrap(), WellAddress::new(2, 98));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for bad in ["", "a01", "A1", "I01", "A00", "A100", "01A", "A0x", " A01"] {
            assert!(
                matches!(WellAddress::parse(bad), Err(PlateError::MalformedWellId(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_parse_coordinate_allows_single_digit() {
        assert_eq!(WellAddress::parse_coordinate("A1").unwrap(), WellAddress::new(0, 0));
        assert_eq!(WellAddress::parse_coordinate("F08").unwrap(), WellAddress::new(5, 7));
        assert!(WellAddress::parse_coordinate("A").is_err());
        assert!(WellAddress::parse_coordinate("A0").is_err());
        assert!(WellAddress::parse_coordinate("J1").is_err());
    }

    #[test]
    fn test_ordering_is_row_major() {
        let mut wells: Vec<WellAddress> = ["B01", "A10", "A02", "H01"]
            .iter()
            .map(|w| w.parse().unwrap())
            .collect();
        wells.sort();
        let ids: Vec<String> = wells.iter().map(ToString::to_string).collect();
        assert_eq!(ids, vec!["A02", "A10", "B01", "H01"]);
    }

    #[test]
    fn test_labels() {
        assert_eq!(row_label(0), 'A');
        assert_eq!(row_label(7), 'H');
        assert_eq!(column_label(0), "01");
        assert_eq!(column_label(11), "12");
    }

    proptest! {
        #[test]
        fn prop_display_round_trips(row in 0usize..8, col in 0usize..99) {
            let text = format!("{}{:02}", ROW_LETTERS.as_bytes()[row] as char, col + 1);
            let well = WellAddress::parse(&text).unwrap();
            prop_assert_eq!(well, WellAddress::new(row, col));
            prop_assert_eq!(well.to_string(), text);
        }
    }
}
