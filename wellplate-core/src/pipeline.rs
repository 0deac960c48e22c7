//! End-to-end analysis
//!
//! The [`Pipeline`] chains the stages in order: reason filter → group
//! assignment → per-well aggregation → geometry → per-metric pivots and
//! heatmap grids. Each stage consumes the complete output of the previous
//! one; the first failing stage stops the run.

use crate::aggregate::aggregate;
use crate::config::PipelineConfig;
use crate::formats::load_rows;
use crate::geometry::PlateGeometry;
use crate::groups::{GroupAssigner, GroupAssignment, GroupDefinition};
use crate::heatmap::HeatmapGrid;
use crate::ingest::{filter_records, RawRow};
use crate::pivot::{pivot, TimeSeriesTable};
use crate::types::{EndReason, EventRecord, Result, WellSummary};
use rayon::prelude::*;
use std::path::Path;

/// Everything one run produces
#[derive(Debug, Clone)]
pub struct PlateReport {
    pub end_reason: EndReason,
    pub assignment: GroupAssignment,
    /// Per-well totals sorted by `(group, well)`
    pub summary: Vec<WellSummary>,
    pub geometry: PlateGeometry,
    /// One table per configured metric, in configured order
    pub time_series: Vec<TimeSeriesTable>,
    /// One grid per configured metric, in configured order
    pub heatmaps: Vec<HeatmapGrid>,
}

/// Entry point for a full analysis run
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Load an export file and analyse it
    pub fn run_file(&self, path: &Path, groups: &[GroupDefinition]) -> Result<PlateReport> {
        let rows = load_rows(path)?;
        self.run(&rows, groups)
    }

    /// Analyse raw rows: filter on the configured end reason, then run every stage
    pub fn run(&self, rows: &[RawRow], groups: &[GroupDefinition]) -> Result<PlateReport> {
        let records = filter_records(rows, self.config.end_reason)?;
        self.run_records(&records, groups)
    }

    /// Analyse records already restricted to the configured end reason
    pub fn run_records(&self, records: &[EventRecord], groups: &[GroupDefinition]) -> Result<PlateReport> {
        log::info!(
            "Analysing {} record(s) for end reason '{}'",
            records.len(),
            self.config.end_reason
        );

        let assignment = GroupAssigner::new()
            .with_strict(self.config.strict_groups)
            .assign(groups)?;

        let summary = aggregate(records, &assignment)?;
        let geometry = PlateGeometry::infer(summary.iter().map(|s| &s.well))?;

        let (time_series, heatmaps): (Vec<_>, Vec<_>) = self
            .config
            .metrics
            .par_iter()
            .map(|&metric| {
                (
                    pivot(records, &assignment, metric),
                    HeatmapGrid::build(&summary, metric, geometry),
                )
            })
            .unzip();

        log::info!(
            "Built {} time series table(s) and {} heatmap grid(s) on a {}x{} plate",
            time_series.len(),
            heatmaps.len(),
            geometry.rows,
            geometry.cols
        );

        Ok(PlateReport {
            end_reason: self.config.end_reason,
            assignment,
            summary,
            geometry,
            time_series,
            heatmaps,
        })
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(PipelineConfig::default())
    }
}
