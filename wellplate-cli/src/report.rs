//! Output writers
//!
//! Writes the per-well summary (CSV or JSON), one time-series CSV per metric
//! and one SVG heatmap per metric into the output directory.

use crate::config::{OutputConfig, SummaryFormat};
use crate::render::render_heatmap_svg;
use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use wellplate_core::{EndReason, HeatmapGrid, PlateReport, TimeSeriesTable, WellSummary};

pub fn summary_file_name(reason: EndReason, format: SummaryFormat) -> String {
    format!("distance_summary_{}.{}", reason.file_suffix(), format.extension())
}

pub fn time_series_file_name(table: &TimeSeriesTable, reason: EndReason) -> String {
    format!("time_{}_{}.csv", table.metric, reason.file_suffix())
}

pub fn heatmap_file_name(grid: &HeatmapGrid, reason: EndReason) -> String {
    format!("heatmap_{}_{}.svg", grid.metric, reason.file_suffix())
}

/// Summary rows with columns `well, group, ina_dist, sml_dist, lar_dist, total_distance`
pub fn write_summary_csv(path: &Path, summary: &[WellSummary]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create {:?}", path))?;
    for row in summary {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_summary_json(path: &Path, summary: &[WellSummary]) -> Result<()> {
    let file = File::create(path).with_context(|| format!("Failed to create {:?}", path))?;
    serde_json::to_writer_pretty(BufWriter::new(file), summary)
        .with_context(|| format!("Failed to write {:?}", path))?;
    Ok(())
}

/// One `time` column followed by the `<group>_<well>` columns; gaps stay empty
pub fn write_time_series_csv(path: &Path, table: &TimeSeriesTable) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create {:?}", path))?;

    let mut header = vec!["time".to_string()];
    header.extend(table.columns.iter().cloned());
    writer.write_record(&header)?;

    for row in &table.rows {
        let mut record = vec![row.time.to_string()];
        record.extend(
            row.values
                .iter()
                .map(|value| value.map(|v| v.to_string()).unwrap_or_default()),
        );
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_heatmap_svg(path: &Path, grid: &HeatmapGrid, reason: EndReason) -> Result<()> {
    let title = format!("{} Heatmap ({})", grid.metric, reason);
    fs::write(path, render_heatmap_svg(grid, &title))
        .with_context(|| format!("Failed to write {:?}", path))
}

/// Write every artifact of a run and return the paths written
pub fn write_report(report: &PlateReport, output: &OutputConfig) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(&output.dir)
        .with_context(|| format!("Failed to create output directory {:?}", output.dir))?;

    let reason = report.end_reason;
    let mut written = Vec::new();

    let summary_path = output.dir.join(summary_file_name(reason, output.summary_format));
    match output.summary_format {
        SummaryFormat::Csv => write_summary_csv(&summary_path, &report.summary)?,
        SummaryFormat::Json => write_summary_json(&summary_path, &report.summary)?,
    }
    log::info!("Per-well summary saved: {:?}", summary_path);
    written.push(summary_path);

    for table in &report.time_series {
        let path = output.dir.join(time_series_file_name(table, reason));
        write_time_series_csv(&path, table)?;
        log::info!("Exported: {:?}", path);
        written.push(path);
    }

    if output.heatmaps {
        for grid in &report.heatmaps {
            let path = output.dir.join(heatmap_file_name(grid, reason));
            write_heatmap_svg(&path, grid, reason)?;
            log::info!("Saved: {:?}", path);
            written.push(path);
        }
    }

    Ok(written)
}
