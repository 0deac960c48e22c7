//! Well-Plate Aggregator CLI Application
//!
//! This is the command-line interface for the well-plate aggregator.
//! It uses the wellplate-core library and adds:
//! - Group definitions from flags or a TOML run file
//! - Summary and time-series tables (CSV/JSON)
//! - Heatmap rendering (SVG)

use anyhow::{bail, Result};
use clap::Parser;
use std::path::PathBuf;
use wellplate_core::{EndReason, GroupDefinition, Metric, Pipeline, PlateReport};

mod config;
mod group_input;
mod render;
mod report;

use config::{AppConfig, SummaryFormat};

/// Well-Plate Aggregator - Summarise per-well tracking exports
#[derive(Parser, Debug)]
#[command(name = "wellplate")]
#[command(about = "Aggregate well-plate tracking exports (XLSX, CSV)", long_about = None)]
#[command(version)]
struct Args {
    /// Path to the tracking export (.xlsx/.xls/.ods/.csv)
    #[arg(short, long, value_name = "FILE")]
    input: Option<PathBuf>,

    /// Path to configuration file (run.toml)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// End reason to analyse (TOP_LIGHT, "End of period", SOUND)
    #[arg(short, long, value_name = "REASON")]
    reason: Option<EndReason>,

    /// Group definition "Name=col1(A1-H1) col2(A2-H2)" (can be repeated)
    #[arg(short, long, value_name = "GROUP", value_parser = group_input::parse_group_arg)]
    group: Vec<GroupDefinition>,

    /// Metric to report (can be repeated; default: all)
    #[arg(short, long, value_name = "METRIC")]
    metric: Vec<Metric>,

    /// Directory for tables and heatmaps
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Summary table format
    #[arg(long, value_enum)]
    format: Option<SummaryFormat>,

    /// Reject wells that appear in more than one group
    #[arg(long)]
    strict: bool,

    /// Skip heatmap rendering
    #[arg(long)]
    no_heatmaps: bool,

    /// Verbosity level (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose, args.quiet);

    log::info!("Well-Plate Aggregator CLI v{}", env!("CARGO_PKG_VERSION"));
    log::debug!("Using wellplate-core v{}", wellplate_core::VERSION);

    let base = match &args.config {
        Some(path) => {
            log::info!("Loading configuration from: {:?}", path);
            config::load_config(path)?
        }
        None => AppConfig::default(),
    };
    let config = merge_args(base, &args);

    let Some(input) = config.input.file.clone() else {
        println!("Well-Plate Aggregator - No input specified");
        println!("\nQuick Start:");
        println!("  wellplate --input 20250618-121409.xlsx --group \"Control=col1(A1-H1) col2(A2-H2)\"");
        println!("  wellplate --input export.csv --reason SOUND --group \"Treated=A3-H3\"");
        println!("\nWith a run file:");
        println!("  wellplate --config run.toml");
        println!("\nUse --help for more options");
        return Ok(());
    };

    if config.groups.is_empty() {
        bail!("No groups defined; pass --group \"Name=A1-H1\" or add [[groups]] to the config file");
    }

    let pipeline = Pipeline::new(config.pipeline_config());
    log::info!(
        "Analysing {:?} for end reason {}",
        input,
        pipeline.config().end_reason
    );
    let report = pipeline.run_file(&input, &config.groups)?;

    log_assignment(&report, &config.groups);

    let written = report::write_report(&report, &config.output)?;
    log::info!(
        "{} well(s) summarised, {} file(s) written to {:?}",
        report.summary.len(),
        written.len(),
        config.output.dir
    );

    Ok(())
}

/// Apply command-line flags on top of the file configuration
fn merge_args(mut config: AppConfig, args: &Args) -> AppConfig {
    if let Some(input) = &args.input {
        config.input.file = Some(input.clone());
    }
    if let Some(reason) = args.reason {
        config.analysis.end_reason = Some(reason);
    }
    if !args.metric.is_empty() {
        config.analysis.metrics = Some(args.metric.clone());
    }
    if args.strict {
        config.analysis.strict_groups = true;
    }
    if !args.group.is_empty() {
        config.groups = args.group.clone();
    }
    if let Some(dir) = &args.output_dir {
        config.output.dir = dir.clone();
    }
    if let Some(format) = args.format {
        config.output.summary_format = format;
    }
    if args.no_heatmaps {
        config.output.heatmaps = false;
    }
    config
}

/// Echo the expanded wells per group
fn log_assignment(report: &PlateReport, groups: &[GroupDefinition]) {
    for definition in groups {
        let wells = report.assignment.wells_in(&definition.name);
        let listed: Vec<String> = wells.iter().map(|w| w.to_string()).collect();
        log::info!(
            "Group {:?}: {} well(s) [{}]",
            definition.name,
            wells.len(),
            listed.join(", ")
        );
    }
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::Builder;
    use log::LevelFilter;
    use std::io::Write;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_config() {
        let base: AppConfig = toml::from_str(
            r#"
            [input]
            file = "from-config.xlsx"

            [analysis]
            end_reason = "SOUND"

            [[groups]]
            name = "Control"
            ranges = ["A1-H1"]
            "#,
        )
        .unwrap();

        let args = Args::parse_from([
            "wellplate",
            "--input",
            "export.csv",
            "--reason",
            "end-of-period",
            "--group",
            "Treated=col3(A3-H3)",
            "--format",
            "json",
            "--no-heatmaps",
        ]);
        let config = merge_args(base, &args);

        assert_eq!(config.input.file, Some(PathBuf::from("export.csv")));
        assert_eq!(config.analysis.end_reason, Some(EndReason::EndOfPeriod));
        assert_eq!(config.groups.len(), 1);
        assert_eq!(config.groups[0].name, "Treated");
        assert_eq!(config.output.summary_format, SummaryFormat::Json);
        assert!(!config.output.heatmaps);
    }

    #[test]
    fn test_config_kept_without_flags() {
        let mut base = AppConfig::default();
        base.groups.push(GroupDefinition::new("Control", ["A1-A4"]));

        let args = Args::parse_from(["wellplate", "--metric", "total_distance", "--strict"]);
        let config = merge_args(base, &args);

        assert_eq!(config.groups[0].name, "Control");
        assert_eq!(config.analysis.metrics, Some(vec![Metric::TotalDistance]));
        assert!(config.analysis.strict_groups);
        assert!(config.output.heatmaps);
    }
}
