//! Time-series pivot
//!
//! Reshapes event records into a `time × well` table for one metric. Rows are
//! the distinct event end times in ascending order; columns are the wells
//! that recorded at least one event, ordered by group name then well, and
//! labelled `<group>_<well>`.

use crate::groups::GroupAssignment;
use crate::types::{EventRecord, Metric, Timestamp, UNKNOWN_GROUP};
use crate::well::WellAddress;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// One row of a [`TimeSeriesTable`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeSeriesRow {
    pub time: Timestamp,
    /// One cell per table column; `None` where the well has no event at this time
    pub values: Vec<Option<f64>>,
}

/// A per-metric `time × well` table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeSeriesTable {
    pub metric: Metric,
    /// Column labels, `<group>_<well>`
    pub columns: Vec<String>,
    /// Wells behind each column, same order as `columns`
    #[serde(skip)]
    pub wells: Vec<WellAddress>,
    pub rows: Vec<TimeSeriesRow>,
    /// Number of `(well, time)` pairs that occurred more than once
    pub duplicate_cells: usize,
}

impl TimeSeriesTable {
    /// Value at a given time for a given well
    pub fn value(&self, time: Timestamp, well: &WellAddress) -> Option<f64> {
        let col = self.wells.iter().position(|w| w == well)?;
        let row = self.rows.binary_search_by(|r| r.time.cmp(&time)).ok()?;
        self.rows[row].values[col]
    }
}

/// Pivot `records` into a table of `metric` values
///
/// Each well should contribute at most one record per time point. When it
/// does not, the last record seen wins and the collision is counted and
/// logged.
pub fn pivot(records: &[EventRecord], assignment: &GroupAssignment, metric: Metric) -> TimeSeriesTable {
    let mut cells: BTreeMap<Timestamp, BTreeMap<WellAddress, f64>> = BTreeMap::new();
    let mut duplicate_cells = 0usize;

    for record in records {
        let previous = cells
            .entry(record.timestamp)
            .or_default()
            .insert(record.well, metric.of_record(record));
        if previous.is_some() {
            duplicate_cells += 1;
            log::trace!("Duplicate {} cell for {} at {}", metric, record.well, record.timestamp);
        }
    }

    if duplicate_cells > 0 {
        log::warn!(
            "{}: {} duplicate (well, time) pair(s); kept the last value of each",
            metric,
            duplicate_cells
        );
    }

    let wells = ordered_wells(records, assignment);
    let columns = wells
        .iter()
        .map(|well| format!("{}_{}", assignment.group_or(well, UNKNOWN_GROUP), well))
        .collect();

    let rows = cells
        .into_iter()
        .map(|(time, by_well)| TimeSeriesRow {
            time,
            values: wells.iter().map(|well| by_well.get(well).copied()).collect(),
        })
        .collect();

    log::debug!("{}: pivoted {} record(s) into {} column(s)", metric, records.len(), wells.len());

    TimeSeriesTable {
        metric,
        columns,
        wells,
        rows,
        duplicate_cells,
    }
}

/// Wells present in `records`, visited group by group in ascending group
/// name and ascending well order within each group
fn ordered_wells(records: &[EventRecord], assignment: &GroupAssignment) -> Vec<WellAddress> {
    let keyed: BTreeSet<(&str, WellAddress)> = records
        .iter()
        .map(|record| (assignment.group_or(&record.well, UNKNOWN_GROUP), record.well))
        .collect();
    keyed.into_iter().map(|(_, well)| well).collect()
}
