//! Well-Plate Behavioural Tracking Aggregator
//!
//! A stateless, reusable library that turns per-event tracking rows from a
//! multi-well assay plate into per-well summaries, per-metric time series and
//! plate-shaped heatmap grids.
//!
//! # Architecture
//!
//! The library covers addressing and aggregation:
//! - Parses well ids (`B07`) and axis-aligned well ranges (`A1-H1`)
//! - Builds the well → experimental group lookup
//! - Sums distance metrics per well and pivots them over time
//! - Infers plate geometry and lays metrics out as a grid
//!
//! The library does NOT:
//! - Prompt for group definitions
//! - Write tables or images to disk
//! - Render heatmaps
//!
//! All of that lives in the application layer (wellplate-cli).
//!
//! # Example Usage
//!
//! ```no_run
//! use wellplate_core::{EndReason, GroupDefinition, Pipeline, PipelineConfig};
//! use std::path::Path;
//!
//! let groups = vec![
//!     GroupDefinition::new("Control", ["A1-H1", "A2-H2"]),
//!     GroupDefinition::new("Treated", ["A3-H3"]),
//! ];
//!
//! let config = PipelineConfig::new().with_end_reason(EndReason::TopLight);
//! let report = Pipeline::new(config)
//!     .run_file(Path::new("20250618-121409.xlsx"), &groups)
//!     .unwrap();
//!
//! for well in &report.summary {
//!     println!("{} {} {:.1}", well.group, well.well, well.total_distance);
//! }
//! ```

// Public modules
pub mod aggregate;
pub mod config;
pub mod formats;
pub mod geometry;
pub mod groups;
pub mod heatmap;
pub mod ingest;
pub mod pipeline;
pub mod pivot;
pub mod range;
pub mod types;
pub mod well;

// Re-export main types for convenience
pub use aggregate::aggregate;
pub use config::PipelineConfig;
pub use formats::{load_rows, InputFormat, RecordSource};
pub use geometry::PlateGeometry;
pub use groups::{assign, GroupAssigner, GroupAssignment, GroupDefinition};
pub use heatmap::HeatmapGrid;
pub use ingest::{extract_well, filter_records, RawRow};
pub use pipeline::{Pipeline, PlateReport};
pub use pivot::{pivot, TimeSeriesRow, TimeSeriesTable};
pub use range::{expand, expand_expression, WellRange};
pub use types::{
    EndReason, EventRecord, Metric, PlateError, Result, Timestamp, WellSummary, UNKNOWN_GROUP,
};
pub use well::WellAddress;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_basics() {
        // Smoke test: an empty group list yields an empty assignment
        let assignment = assign(&[]).unwrap();
        assert!(assignment.is_empty());
        assert_eq!(Pipeline::default().config().metrics.len(), 4);
    }
}
