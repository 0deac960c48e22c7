//! Per-well aggregation
//!
//! Sums the distance columns of every event recorded in a well and tags the
//! well with its group.

use crate::groups::GroupAssignment;
use crate::types::{EventRecord, PlateError, Result, WellSummary, UNKNOWN_GROUP};
use crate::well::WellAddress;
use std::collections::BTreeMap;

#[derive(Debug, Default, Clone, Copy)]
struct Totals {
    ina_dist: f64,
    sml_dist: f64,
    lar_dist: f64,
}

impl Totals {
    fn add(&mut self, record: &EventRecord) {
        self.ina_dist += record.ina_dist;
        self.sml_dist += record.sml_dist;
        self.lar_dist += record.lar_dist;
    }
}

/// Sum every record per well and attach the well's group
///
/// `records` must already be restricted to one end reason. Wells no group
/// covers are labelled [`UNKNOWN_GROUP`]. The result is sorted by
/// `(group, well)`.
pub fn aggregate(records: &[EventRecord], assignment: &GroupAssignment) -> Result<Vec<WellSummary>> {
    let Some(first) = records.first() else {
        return Err(PlateError::EmptyFilterResult(String::new()));
    };
    log::trace!("Aggregating records for end reason {:?}", first.end_reason);

    let mut per_well: BTreeMap<WellAddress, Totals> = BTreeMap::new();
    for record in records {
        per_well.entry(record.well).or_default().add(record);
    }

    let mut unassigned = 0usize;
    let mut summary: Vec<WellSummary> = per_well
        .into_iter()
        .map(|(well, totals)| {
            let group = match assignment.get(&well) {
                Some(group) => group.to_string(),
                None => {
                    unassigned += 1;
                    UNKNOWN_GROUP.to_string()
                }
            };
            WellSummary {
                well,
                group,
                ina_dist: totals.ina_dist,
                sml_dist: totals.sml_dist,
                lar_dist: totals.lar_dist,
                total_distance: totals.ina_dist + totals.sml_dist + totals.lar_dist,
            }
        })
        .collect();

    summary.sort_by(|a, b| a.group.cmp(&b.group).then(a.well.cmp(&b.well)));

    if unassigned > 0 {
        log::warn!("{} well(s) with events are not in any group, labelled '{}'", unassigned, UNKNOWN_GROUP);
    }
    log::info!("Aggregated {} record(s) into {} well(s)", records.len(), summary.len());
    Ok(summary)
}
