//! Heatmap rendering to SVG
//!
//! Draws a plate grid with a viridis-like colour scale, one annotated cell
//! per well. Wells without data get a hatched fill that no scale value maps
//! to, so they cannot be mistaken for a zero reading.

use svg::node::element::{Definitions, Line, Pattern, Rectangle, Text};
use svg::Document;
use wellplate_core::HeatmapGrid;

const CELL: f32 = 56.0;
const LEFT: f32 = 60.0;
const TOP: f32 = 70.0;
const LEGEND_GAP: f32 = 30.0;
const LEGEND_WIDTH: f32 = 18.0;
const LEGEND_LABEL_SPACE: f32 = 110.0;
const BOTTOM: f32 = 60.0;

/// Viridis anchor colours, low to high
const SCALE: [(u8, u8, u8); 5] = [
    (68, 1, 84),
    (59, 82, 139),
    (33, 145, 140),
    (94, 201, 98),
    (253, 231, 37),
];

const MISSING_FILL: &str = "url(#missing)";

/// Position of `value` on the scale, 0.0 to 1.0
fn normalise(value: f64, lo: f64, hi: f64) -> f64 {
    if hi > lo {
        ((value - lo) / (hi - lo)).clamp(0.0, 1.0)
    } else {
        0.5
    }
}

/// Interpolated scale colour as `#rrggbb`
fn scale_colour(t: f64) -> String {
    let span = (SCALE.len() - 1) as f64;
    let pos = t.clamp(0.0, 1.0) * span;
    let idx = (pos.floor() as usize).min(SCALE.len() - 2);
    let frac = pos - idx as f64;
    let (a, b) = (SCALE[idx], SCALE[idx + 1]);
    let mix = |x: u8, y: u8| (f64::from(x) + (f64::from(y) - f64::from(x)) * frac).round() as u8;
    format!("#{:02x}{:02x}{:02x}", mix(a.0, b.0), mix(a.1, b.1), mix(a.2, b.2))
}

fn label(text: impl Into<String>, x: f32, y: f32, size: u32) -> Text {
    Text::new(text.into())
        .set("x", x)
        .set("y", y)
        .set("text-anchor", "middle")
        .set("font-family", "monospace")
        .set("font-size", size)
        .set("fill", "#111827")
}

/// Render `grid` as an SVG document
pub fn render_heatmap_svg(grid: &HeatmapGrid, title: &str) -> String {
    let rows = grid.rows();
    let cols = grid.cols();
    let plot_width = cols as f32 * CELL;
    let plot_height = rows as f32 * CELL;
    let width = LEFT + plot_width + LEGEND_GAP + LEGEND_WIDTH + LEGEND_LABEL_SPACE;
    let height = TOP + plot_height + BOTTOM;
    let range = grid.value_range();

    let hatch = Pattern::new()
        .set("id", "missing")
        .set("width", 8)
        .set("height", 8)
        .set("patternUnits", "userSpaceOnUse")
        .set("patternTransform", "rotate(45)")
        .add(
            Rectangle::new()
                .set("width", 8)
                .set("height", 8)
                .set("fill", "#f3f4f6"),
        )
        .add(
            Line::new()
                .set("x1", 0)
                .set("y1", 0)
                .set("x2", 0)
                .set("y2", 8)
                .set("stroke", "#9ca3af")
                .set("stroke-width", 2),
        );

    let mut doc = Document::new()
        .set("viewBox", (0, 0, width, height))
        .set("width", width)
        .set("height", height)
        .add(Definitions::new().add(hatch))
        .add(
            Rectangle::new()
                .set("x", 0)
                .set("y", 0)
                .set("width", width)
                .set("height", height)
                .set("fill", "#ffffff"),
        )
        .add(
            Text::new(title.to_string())
                .set("x", LEFT)
                .set("y", 32.0)
                .set("font-family", "monospace")
                .set("font-size", 16)
                .set("fill", "#0f172a"),
        );

    for (r, row) in grid.cells.iter().enumerate() {
        let y = TOP + r as f32 * CELL;
        for (c, cell) in row.iter().enumerate() {
            let x = LEFT + c as f32 * CELL;
            let fill = match (cell, range) {
                (Some(value), Some((lo, hi))) => scale_colour(normalise(*value, lo, hi)),
                _ => MISSING_FILL.to_string(),
            };
            doc = doc.add(
                Rectangle::new()
                    .set("x", x)
                    .set("y", y)
                    .set("width", CELL)
                    .set("height", CELL)
                    .set("fill", fill)
                    .set("stroke", "#ffffff")
                    .set("stroke-width", 1),
            );

            if let (Some(value), Some((lo, hi))) = (cell, range) {
                let ink = if normalise(*value, lo, hi) > 0.6 { "#111827" } else { "#f9fafb" };
                doc = doc.add(
                    label(format!("{:.1}", value), x + CELL / 2.0, y + CELL / 2.0 + 4.0, 12)
                        .set("fill", ink),
                );
            }
        }
    }

    for (r, row_label) in grid.row_labels.iter().enumerate() {
        let y = TOP + r as f32 * CELL + CELL / 2.0 + 4.0;
        doc = doc.add(label(row_label.as_str(), LEFT - 18.0, y, 13));
    }
    for (c, col_label) in grid.column_labels.iter().enumerate() {
        let x = LEFT + c as f32 * CELL + CELL / 2.0;
        doc = doc.add(label(col_label.as_str(), x, TOP + plot_height + 20.0, 13));
    }
    doc = doc
        .add(label("Column", LEFT + plot_width / 2.0, TOP + plot_height + 44.0, 13))
        .add(label("Row", LEFT - 40.0, TOP - 14.0, 13));

    // colour bar
    let bar_x = LEFT + plot_width + LEGEND_GAP;
    let steps = 20;
    let step_height = plot_height / steps as f32;
    for i in 0..steps {
        let t = 1.0 - i as f64 / (steps - 1) as f64;
        doc = doc.add(
            Rectangle::new()
                .set("x", bar_x)
                .set("y", TOP + i as f32 * step_height)
                .set("width", LEGEND_WIDTH)
                .set("height", step_height + 0.5)
                .set("fill", scale_colour(t)),
        );
    }
    let legend_text = |text: String, y: f32| {
        Text::new(text)
            .set("x", bar_x + LEGEND_WIDTH + 6.0)
            .set("y", y)
            .set("font-family", "monospace")
            .set("font-size", 12)
            .set("fill", "#374151")
    };
    match range {
        Some((lo, hi)) => {
            doc = doc
                .add(legend_text(format!("{:.1}", hi), TOP + 10.0))
                .add(legend_text(format!("{:.1}", lo), TOP + plot_height));
        }
        None => {
            doc = doc.add(legend_text("no data".to_string(), TOP + 10.0));
        }
    }
    doc = doc.add(legend_text(grid.metric.name().to_string(), TOP + plot_height + 20.0));

    doc.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use wellplate_core::{Metric, PlateGeometry, WellAddress, WellSummary};

    fn grid() -> HeatmapGrid {
        let summary = vec![
            WellSummary {
                well: WellAddress::new(0, 0),
                group: "Control".to_string(),
                ina_dist: 0.0,
                sml_dist: 0.0,
                lar_dist: 0.0,
                total_distance: 0.0,
            },
            WellSummary {
                well: WellAddress::new(1, 1),
                group: "Control".to_string(),
                ina_dist: 2.0,
                sml_dist: 1.0,
                lar_dist: 0.5,
                total_distance: 3.5,
            },
        ];
        HeatmapGrid::build(&summary, Metric::TotalDistance, PlateGeometry { rows: 2, cols: 2 })
    }

    fn has_text(svg: &str, text: &str) -> bool {
        svg.contains(&format!(">{text}<")) || svg.lines().any(|line| line.trim() == text)
    }

    #[test]
    fn test_scale_endpoints() {
        assert_eq!(scale_colour(0.0), "#440154");
        assert_eq!(scale_colour(1.0), "#fde725");
        assert_eq!(normalise(5.0, 5.0, 5.0), 0.5);
        assert_eq!(normalise(10.0, 0.0, 5.0), 1.0);
    }

    #[test]
    fn test_render_marks_missing_cells() {
        let svg = render_heatmap_svg(&grid(), "total_distance Heatmap (TOP_LIGHT)");

        assert!(svg.contains("total_distance Heatmap (TOP_LIGHT)"));
        assert!(svg.contains("0.0"));
        assert!(has_text(&svg, "3.5"));
        // zero reading uses the low end of the scale, the two empty wells use the hatch
        assert!(svg.contains("#440154"));
        assert_eq!(svg.matches(MISSING_FILL).count(), 2);
        for text in ["A", "B", "01", "02"] {
            assert!(has_text(&svg, text), "missing label {text}");
        }
    }

    #[test]
    fn test_render_empty_grid() {
        let empty = HeatmapGrid::build(&[], Metric::InaDist, PlateGeometry { rows: 1, cols: 1 });
        let svg = render_heatmap_svg(&empty, "empty");
        assert!(svg.contains("no data"));
        assert_eq!(svg.matches(MISSING_FILL).count(), 1);
    }
}
