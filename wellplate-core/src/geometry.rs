//! Plate geometry inference

use crate::types::{PlateError, Result};
use crate::well::WellAddress;
use serde::Serialize;

/// Rectangular bounds covering every observed well
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlateGeometry {
    pub rows: usize,
    pub cols: usize,
}

impl PlateGeometry {
    /// Smallest grid anchored at `A01` that contains every well
    ///
    /// Feed this the post-aggregation well set so partial runs get a tight
    /// grid rather than the full plate.
    pub fn infer<'a, I>(wells: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a WellAddress>,
    {
        let mut bounds: Option<(usize, usize)> = None;
        for well in wells {
            let (rows, cols) = bounds.unwrap_or((0, 0));
            bounds = Some((rows.max(well.row + 1), cols.max(well.col + 1)));
        }

        let (rows, cols) = bounds.ok_or(PlateError::EmptyWellSet)?;
        log::debug!("Inferred plate geometry: {} row(s) x {} column(s)", rows, cols);
        Ok(Self { rows, cols })
    }

    pub fn contains(&self, well: &WellAddress) -> bool {
        well.row < self.rows && well.col < self.cols
    }
}
