//! Standalone plate summary tool
//!
//! Reads a tracking export, assigns wells to groups and prints the per-well
//! totals plus a text rendering of one heatmap grid.
//!
//! Usage:
//!   summarize_export <export.xlsx|.csv> [--reason <REASON>] [--group <Name=A1-H1,...>] [--metric <name>]
//!
//! Example:
//!   summarize_export 20250618-121409.xlsx --reason SOUND --group Control=A1-H1,A2-H2 --group Treated=A3-H3

use std::collections::BTreeMap;
use std::env;
use std::path::PathBuf;
use wellplate_core::{EndReason, GroupDefinition, HeatmapGrid, Metric, Pipeline, PipelineConfig};

struct GroupStats {
    wells: usize,
    total_distance: f64,
}

fn print_group_summary(stats: &BTreeMap<String, GroupStats>) {
    println!("\n=== GROUP SUMMARY ===");
    for (group, s) in stats {
        println!(
            "  {}: {} well(s), mean total distance {:.1}",
            group,
            s.wells,
            s.total_distance / s.wells as f64
        );
    }
}

fn print_grid(grid: &HeatmapGrid) {
    print!("    ");
    for label in &grid.column_labels {
        print!("{:>8}", label);
    }
    println!();
    for (r, label) in grid.row_labels.iter().enumerate() {
        print!("{:>4}", label);
        for c in 0..grid.cols() {
            match grid.get(r, c) {
                Some(value) => print!("{:>8.1}", value),
                None => print!("{:>8}", "-"),
            }
        }
        println!();
    }
}

fn parse_group(arg: &str) -> Option<GroupDefinition> {
    let (name, ranges) = arg.split_once('=')?;
    Some(GroupDefinition::new(name, ranges.split(',').map(str::trim)))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <export.xlsx|.csv> [--reason <REASON>] [--group <Name=A1-H1,...>] [--metric <name>]", args[0]);
        eprintln!("\nExample:");
        eprintln!("  {} 20250618-121409.xlsx --reason SOUND --group Control=A1-H1,A2-H2", args[0]);
        std::process::exit(1);
    }

    let input = PathBuf::from(&args[1]);
    let mut reason = EndReason::default();
    let mut groups = Vec::new();
    let mut metric = Metric::TotalDistance;

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--reason" => {
                i += 1;
                if i < args.len() {
                    reason = args[i].parse()?;
                }
            }
            "--group" => {
                i += 1;
                if i < args.len() {
                    match parse_group(&args[i]) {
                        Some(group) => groups.push(group),
                        None => eprintln!("Ignoring group without '=': {}", args[i]),
                    }
                }
            }
            "--metric" => {
                i += 1;
                if i < args.len() {
                    metric = args[i].parse()?;
                }
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
            }
        }
        i += 1;
    }

    println!("=== Plate Summary ===");
    println!("Export: {:?}", input);
    println!("End reason: {}", reason);
    println!("Groups: {} defined", groups.len());
    println!();

    let config = PipelineConfig::new()
        .with_end_reason(reason)
        .with_metrics([metric]);
    let report = Pipeline::new(config).run_file(&input, &groups)?;

    println!("=== WELLS ===");
    let mut stats: BTreeMap<String, GroupStats> = BTreeMap::new();
    for well in &report.summary {
        println!(
            "  {} {:<12} ina {:>8.1}  sml {:>8.1}  lar {:>8.1}  total {:>8.1}",
            well.well, well.group, well.ina_dist, well.sml_dist, well.lar_dist, well.total_distance
        );
        let entry = stats.entry(well.group.clone()).or_insert(GroupStats {
            wells: 0,
            total_distance: 0.0,
        });
        entry.wells += 1;
        entry.total_distance += well.total_distance;
    }
    print_group_summary(&stats);

    println!(
        "\n=== {} ({} x {}) ===",
        metric, report.geometry.rows, report.geometry.cols
    );
    if let Some(grid) = report.heatmaps.first() {
        print_grid(grid);
    }

    Ok(())
}
