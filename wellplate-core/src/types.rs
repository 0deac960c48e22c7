//! Core types for the well-plate aggregation library
//!
//! This module defines the values that flow between pipeline stages: the
//! error type, per-event records, metric selectors and the per-well summary.
//! Every value here is immutable once produced by its stage.

use crate::well::WellAddress;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Result type for library operations
pub type Result<T> = std::result::Result<T, PlateError>;

/// Group label attached to wells that no group definition covers
pub const UNKNOWN_GROUP: &str = "Unknown";

/// Errors that can occur while assigning, aggregating or loading plate data
#[derive(Debug, thiserror::Error)]
pub enum PlateError {
    #[error("Malformed well id: {0:?}")]
    MalformedWellId(String),

    #[error("Invalid range {start}-{end}: wells share neither row nor column")]
    InvalidRange { start: WellAddress, end: WellAddress },

    #[error("Malformed range expression: {0:?}")]
    MalformedRangeExpression(String),

    #[error("Invalid group name: {0:?}")]
    InvalidGroupName(String),

    #[error("Cannot infer plate geometry from an empty well set")]
    EmptyWellSet,

    #[error("No records match end reason {0:?}")]
    EmptyFilterResult(String),

    #[error("Well {well} assigned to {existing:?} is reassigned to {incoming:?}")]
    ConflictingAssignment {
        well: WellAddress,
        existing: String,
        incoming: String,
    },

    #[error("Missing column: {0}")]
    MissingColumn(String),

    #[error("Failed to read record source: {0}")]
    SourceError(String),

    #[error("Unsupported input format: {0}")]
    UnsupportedFormat(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Why a tracked subject's event ended
///
/// These are the three reasons the tracking software emits that the
/// analysis can be run against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EndReason {
    #[serde(rename = "TOP_LIGHT", alias = "top-light")]
    TopLight,
    #[serde(rename = "End of period", alias = "end-of-period")]
    EndOfPeriod,
    #[serde(rename = "SOUND", alias = "sound")]
    Sound,
}

impl EndReason {
    /// All selectable reasons in menu order
    pub const ALL: [EndReason; 3] = [EndReason::TopLight, EndReason::EndOfPeriod, EndReason::Sound];

    /// The label as it appears in the `endreason` column
    pub fn label(&self) -> &'static str {
        match self {
            EndReason::TopLight => "TOP_LIGHT",
            EndReason::EndOfPeriod => "End of period",
            EndReason::Sound => "SOUND",
        }
    }

    /// Label with spaces replaced, for use inside file names
    pub fn file_suffix(&self) -> String {
        self.label().replace(' ', "_")
    }
}

impl Default for EndReason {
    fn default() -> Self {
        EndReason::TopLight
    }
}

impl fmt::Display for EndReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for EndReason {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim() {
            "TOP_LIGHT" | "top-light" => Ok(EndReason::TopLight),
            "End of period" | "end-of-period" => Ok(EndReason::EndOfPeriod),
            "SOUND" | "sound" => Ok(EndReason::Sound),
            other => Err(format!(
                "unknown end reason {:?} (expected one of: TOP_LIGHT, End of period, SOUND)",
                other
            )),
        }
    }
}

/// The distance columns a run reports on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// Distance travelled while inactive
    InaDist,
    /// Distance travelled in small movements
    SmlDist,
    /// Distance travelled in large movements
    LarDist,
    /// Sum of the three
    TotalDistance,
}

impl Metric {
    /// The four standard metrics in report order
    pub const ALL: [Metric; 4] = [
        Metric::InaDist,
        Metric::SmlDist,
        Metric::LarDist,
        Metric::TotalDistance,
    ];

    /// Column name used in summary tables and output file names
    pub fn name(&self) -> &'static str {
        match self {
            Metric::InaDist => "ina_dist",
            Metric::SmlDist => "sml_dist",
            Metric::LarDist => "lar_dist",
            Metric::TotalDistance => "total_distance",
        }
    }

    /// Read this metric from a single event
    pub fn of_record(&self, record: &EventRecord) -> f64 {
        match self {
            Metric::InaDist => record.ina_dist,
            Metric::SmlDist => record.sml_dist,
            Metric::LarDist => record.lar_dist,
            Metric::TotalDistance => record.total_distance(),
        }
    }

    /// Read this metric from a per-well summary row
    pub fn of_summary(&self, summary: &WellSummary) -> f64 {
        match self {
            Metric::InaDist => summary.ina_dist,
            Metric::SmlDist => summary.sml_dist,
            Metric::LarDist => summary.lar_dist,
            Metric::TotalDistance => summary.total_distance,
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Metric {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Metric::ALL
            .into_iter()
            .find(|m| m.name() == s.trim())
            .ok_or_else(|| format!("unknown metric {:?}", s))
    }
}

/// Event end time as read from the `end` column
///
/// Wraps the raw float so it can key ordered maps; ordering is
/// `f64::total_cmp`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(pub f64);

impl PartialEq for Timestamp {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Timestamp {}

impl PartialOrd for Timestamp {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Timestamp {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One observed measurement for one well, after ingestion
#[derive(Debug, Clone, PartialEq)]
pub struct EventRecord {
    /// Well the tracked subject sits in
    pub well: WellAddress,
    /// Why the event ended (the raw `endreason` label)
    pub end_reason: String,
    /// Event end time
    pub timestamp: Timestamp,
    /// Inactive distance, 0 when missing in the source
    pub ina_dist: f64,
    /// Small-movement distance, 0 when missing in the source
    pub sml_dist: f64,
    /// Large-movement distance, 0 when missing in the source
    pub lar_dist: f64,
}

impl EventRecord {
    pub fn total_distance(&self) -> f64 {
        self.ina_dist + self.sml_dist + self.lar_dist
    }
}

/// Summed distances for one well and its group
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WellSummary {
    #[serde(serialize_with = "crate::well::serialize_display")]
    pub well: WellAddress,
    pub group: String,
    pub ina_dist: f64,
    pub sml_dist: f64,
    pub lar_dist: f64,
    pub total_distance: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_end_reason_labels() {
        assert_eq!(EndReason::EndOfPeriod.label(), "End of period");
        assert_eq!(EndReason::EndOfPeriod.file_suffix(), "End_of_period");
        assert_eq!("SOUND".parse::<EndReason>().unwrap(), EndReason::Sound);
        assert_eq!("top-light".parse::<EndReason>().unwrap(), EndReason::TopLight);
        assert!("sound!".parse::<EndReason>().is_err());
    }

    #[test]
    fn test_metric_names_round_trip() {
        for metric in Metric::ALL {
            assert_eq!(metric.name().parse::<Metric>().unwrap(), metric);
        }
        assert!("inadist".parse::<Metric>().is_err());
    }

    #[test]
    fn test_total_distance() {
        let record = EventRecord {
            well: WellAddress::new(0, 0),
            end_reason: "SOUND".to_string(),
            timestamp: Timestamp(60.0),
            ina_dist: 1.5,
            sml_dist: 2.0,
            lar_dist: 0.5,
        };
        assert_eq!(record.total_distance(), 4.0);
        assert_eq!(Metric::TotalDistance.of_record(&record), 4.0);
        assert_eq!(Metric::SmlDist.of_record(&record), 2.0);
    }

    #[test]
    fn test_timestamp_ordering() {
        let mut stamps = vec![Timestamp(120.0), Timestamp(-1.0), Timestamp(60.5)];
        stamps.sort();
        assert_eq!(stamps, vec![Timestamp(-1.0), Timestamp(60.5), Timestamp(120.0)]);
    }
}
