//! Raw row ingestion
//!
//! Turns loosely-typed tracking rows into [`EventRecord`]s: selects one end
//! reason, pulls the well id out of the animal name and defaults missing
//! distances to zero. Validation happens once here so later stages can rely
//! on fully populated records.

use crate::types::{EndReason, EventRecord, PlateError, Result, Timestamp};
use crate::well::WellAddress;
use regex::Regex;
use serde::Deserialize;
use std::sync::OnceLock;

/// Well ids as they are embedded in animal names, e.g. `"Plate1-B07"`
const WELL_PATTERN: &str = r"[A-H]\d{2}";

static WELL_REGEX: OnceLock<std::result::Result<Regex, regex::Error>> = OnceLock::new();

fn well_regex() -> Result<&'static Regex> {
    WELL_REGEX
        .get_or_init(|| Regex::new(WELL_PATTERN))
        .as_ref()
        .map_err(|e| PlateError::SourceError(format!("invalid well pattern: {}", e)))
}

/// One row of the tracking export, as read from a spreadsheet or CSV
///
/// Only `aname` is required; unparseable cells deserialize to `None`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawRow {
    pub aname: String,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub endreason: Option<String>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub end: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub inadist: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub smldist: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub lardist: Option<f64>,
}

/// Find the first well id inside an animal name
///
/// Returns `Ok(None)` when the name carries no well id or the id spells an
/// impossible column (`A00`).
pub fn extract_well(aname: &str) -> Result<Option<WellAddress>> {
    let Some(found) = well_regex()?.find(aname) else {
        return Ok(None);
    };
    Ok(WellAddress::parse(&found.as_str().to_uppercase()).ok())
}

/// Keep the rows for `reason` and convert them to event records
///
/// Fails with `EmptyFilterResult` when no row carries the reason or none of
/// the matching rows yields a usable record. Rows without a well id or
/// without an `end` time are dropped and counted in the log.
pub fn filter_records(rows: &[RawRow], reason: EndReason) -> Result<Vec<EventRecord>> {
    let label = reason.label();
    let matching: Vec<&RawRow> = rows
        .iter()
        .filter(|row| row.endreason.as_deref() == Some(label))
        .collect();

    if matching.is_empty() {
        return Err(PlateError::EmptyFilterResult(label.to_string()));
    }
    log::info!("{} of {} row(s) have end reason '{}'", matching.len(), rows.len(), label);

    let mut records = Vec::with_capacity(matching.len());
    let mut without_well = 0usize;
    let mut without_time = 0usize;

    for row in matching {
        let Some(well) = extract_well(&row.aname)? else {
            log::trace!("No well id in animal name {:?}", row.aname);
            without_well += 1;
            continue;
        };
        let Some(end) = row.end else {
            without_time += 1;
            continue;
        };

        records.push(EventRecord {
            well,
            end_reason: label.to_string(),
            timestamp: Timestamp(end),
            ina_dist: row.inadist.unwrap_or(0.0),
            sml_dist: row.smldist.unwrap_or(0.0),
            lar_dist: row.lardist.unwrap_or(0.0),
        });
    }

    if without_well > 0 {
        log::debug!("Dropped {} row(s) without a well id", without_well);
    }
    if without_time > 0 {
        log::warn!("Dropped {} row(s) without an end time", without_time);
    }
    if records.is_empty() {
        return Err(PlateError::EmptyFilterResult(label.to_string()));
    }

    Ok(records)
}
