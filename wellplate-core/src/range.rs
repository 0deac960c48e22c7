//! Axis-aligned well ranges
//!
//! A range is written `<WELL>-<WELL>` (for example `A1-H1` for a column or
//! `F6-F8` for part of a row) and always expands in ascending order,
//! whichever endpoint is typed first.

use crate::types::{PlateError, Result};
use crate::well::WellAddress;
use std::str::FromStr;

/// An inclusive run of wells along one row or one column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WellRange {
    start: WellAddress,
    end: WellAddress,
}

impl WellRange {
    /// Build a range, rejecting endpoints that share neither row nor column
    pub fn new(start: WellAddress, end: WellAddress) -> Result<Self> {
        if start.row != end.row && start.col != end.col {
            return Err(PlateError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Parse a `<WELL>-<WELL>` expression
    ///
    /// Each side is trimmed and uppercased before parsing, and may use a one
    /// or two digit column. Anything that does not split into exactly two
    /// well coordinates is a `MalformedRangeExpression`; well-formed but
    /// diagonal endpoints are an `InvalidRange`.
    pub fn parse(expression: &str) -> Result<Self> {
        let malformed = || PlateError::MalformedRangeExpression(expression.to_string());

        let mut parts = expression.split('-');
        let (Some(start), Some(end), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(malformed());
        };

        let start = WellAddress::parse_coordinate(&start.trim().to_uppercase()).map_err(|_| malformed())?;
        let end = WellAddress::parse_coordinate(&end.trim().to_uppercase()).map_err(|_| malformed())?;

        Self::new(start, end)
    }

    /// Every well in the range, in ascending order
    pub fn wells(&self) -> Vec<WellAddress> {
        if self.start.row == self.end.row {
            let (lo, hi) = ordered(self.start.col, self.end.col);
            (lo..=hi).map(|col| WellAddress::new(self.start.row, col)).collect()
        } else {
            let (lo, hi) = ordered(self.start.row, self.end.row);
            (lo..=hi).map(|row| WellAddress::new(row, self.start.col)).collect()
        }
    }
}

impl FromStr for WellRange {
    type Err = PlateError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

fn ordered(a: usize, b: usize) -> (usize, usize) {
    if a <= b { (a, b) } else { (b, a) }
}

/// Expand the range between two wells into the wells it spans
pub fn expand(start: WellAddress, end: WellAddress) -> Result<Vec<WellAddress>> {
    Ok(WellRange::new(start, end)?.wells())
}

/// Parse and expand a `<WELL>-<WELL>` expression in one step
pub fn expand_expression(expression: &str) -> Result<Vec<WellAddress>> {
    Ok(WellRange::parse(expression)?.wells())
}
