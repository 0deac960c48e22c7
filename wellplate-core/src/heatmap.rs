//! Heatmap grid construction
//!
//! Places one metric of the per-well summary onto a `rows × cols` grid. The
//! grid and its axis labels are everything a renderer needs.

use crate::geometry::PlateGeometry;
use crate::types::{Metric, WellSummary};
use crate::well::{column_label, row_label};
use serde::Serialize;

/// A plate-shaped grid of one metric; `None` marks wells without data
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatmapGrid {
    pub metric: Metric,
    pub cells: Vec<Vec<Option<f64>>>,
    /// `A`, `B`, ... one per grid row
    pub row_labels: Vec<String>,
    /// `01`, `02`, ... one per grid column
    pub column_labels: Vec<String>,
}

impl HeatmapGrid {
    /// Build the grid for `metric`
    ///
    /// Wells outside `geometry` are skipped with a warning.
    pub fn build(summary: &[WellSummary], metric: Metric, geometry: PlateGeometry) -> Self {
        let mut cells = vec![vec![None; geometry.cols]; geometry.rows];

        for row in summary {
            if geometry.contains(&row.well) {
                cells[row.well.row][row.well.col] = Some(metric.of_summary(row));
            } else {
                log::warn!(
                    "Well {} lies outside the {}x{} grid, left off the {} heatmap",
                    row.well,
                    geometry.rows,
                    geometry.cols,
                    metric
                );
            }
        }

        Self {
            metric,
            cells,
            row_labels: (0..geometry.rows).map(|r| row_label(r).to_string()).collect(),
            column_labels: (0..geometry.cols).map(column_label).collect(),
        }
    }

    pub fn rows(&self) -> usize {
        self.cells.len()
    }

    pub fn cols(&self) -> usize {
        self.cells.first().map_or(0, Vec::len)
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.cells.get(row)?.get(col).copied().flatten()
    }

    /// Smallest and largest present value, if any cell has data
    pub fn value_range(&self) -> Option<(f64, f64)> {
        self.cells
            .iter()
            .flatten()
            .flatten()
            .fold(None, |acc, &v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::well::WellAddress;

    fn summary(well: &str, total: f64) -> WellSummary {
        WellSummary {
            well: WellAddress::parse(well).unwrap(),
            group: "G".to_string(),
            ina_dist: 0.0,
            sml_dist: total,
            lar_dist: 0.0,
            total_distance: total,
        }
    }

    #[test]
    fn test_grid_placement_and_labels() {
        let rows = vec![summary("A01", 0.0), summary("B03", 4.5)];
        let grid = HeatmapGrid::build(&rows, Metric::TotalDistance, PlateGeometry { rows: 2, cols: 3 });

        assert_eq!(grid.rows(), 2);
        assert_eq!(grid.cols(), 3);
        assert_eq!(grid.get(0, 0), Some(0.0));
        assert_eq!(grid.get(1, 2), Some(4.5));
        assert_eq!(grid.get(0, 1), None);
        assert_eq!(grid.row_labels, vec!["A", "B"]);
        assert_eq!(grid.column_labels, vec!["01", "02", "03"]);
        assert_eq!(grid.value_range(), Some((0.0, 4.5)));
    }

    #[test]
    fn test_out_of_bounds_well_is_skipped() {
        let rows = vec![summary("H12", 3.0)];
        let grid = HeatmapGrid::build(&rows, Metric::SmlDist, PlateGeometry { rows: 2, cols: 2 });
        assert!(grid.cells.iter().flatten().all(Option::is_none));
        assert_eq!(grid.value_range(), None);
    }

    #[test]
    fn test_empty_summary_leaves_missing_cells() {
        let grid = HeatmapGrid::build(&[], Metric::InaDist, PlateGeometry { rows: 8, cols: 12 });
        assert_eq!(grid.rows(), 8);
        assert_eq!(grid.get(7, 11), None);
    }
}
