//! Configuration loading and parsing

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use wellplate_core::{EndReason, GroupDefinition, Metric, PipelineConfig};

/// Run configuration (loaded from a TOML file, then overridden by flags)
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub groups: Vec<GroupDefinition>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct InputConfig {
    pub file: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AnalysisConfig {
    pub end_reason: Option<EndReason>,
    pub metrics: Option<Vec<Metric>>,
    #[serde(default)]
    pub strict_groups: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
    #[serde(default)]
    pub summary_format: SummaryFormat,
    #[serde(default = "default_true")]
    pub heatmaps: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            summary_format: SummaryFormat::default(),
            heatmaps: true,
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SummaryFormat {
    #[default]
    Csv,
    Json,
}

impl SummaryFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            SummaryFormat::Csv => "csv",
            SummaryFormat::Json => "json",
        }
    }
}

impl AppConfig {
    /// Library configuration for this run
    pub fn pipeline_config(&self) -> PipelineConfig {
        let mut config = PipelineConfig::new()
            .with_end_reason(self.analysis.end_reason.unwrap_or_default())
            .with_strict_groups(self.analysis.strict_groups);
        if let Some(metrics) = &self.analysis.metrics {
            config = config.with_metrics(metrics.iter().copied());
        }
        config
    }
}

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: AppConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    log::debug!(
        "Config {:?}: {} group(s), input {:?}",
        path,
        config.groups.len(),
        config.input.file
    );
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_deserialization() {
        let toml_content = r#"
            [input]
            file = "20250618-121409.xlsx"

            [analysis]
            end_reason = "End of period"
            metrics = ["total_distance", "ina_dist"]

            [output]
            dir = "results"
            summary_format = "json"

            [[groups]]
            name = "Control"
            ranges = ["A1-H1", "A2-H2"]

            [[groups]]
            name = "Treated"
            ranges = ["F6-F8"]
        "#;

        let config: AppConfig = toml::from_str(toml_content).unwrap();
        assert_eq!(config.input.file, Some(PathBuf::from("20250618-121409.xlsx")));
        assert_eq!(config.analysis.end_reason, Some(EndReason::EndOfPeriod));
        assert_eq!(config.output.summary_format, SummaryFormat::Json);
        assert!(config.output.heatmaps);
        assert_eq!(config.groups.len(), 2);
        assert_eq!(config.groups[0].ranges, vec!["A1-H1", "A2-H2"]);

        let pipeline = config.pipeline_config();
        assert_eq!(pipeline.end_reason, EndReason::EndOfPeriod);
        assert_eq!(pipeline.metrics, vec![Metric::TotalDistance, Metric::InaDist]);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.output.dir, PathBuf::from("."));
        assert_eq!(config.output.summary_format, SummaryFormat::Csv);
        assert!(config.groups.is_empty());
        assert_eq!(config.pipeline_config(), PipelineConfig::default());
    }

    #[test]
    fn test_load_config_missing_file() {
        assert!(load_config(Path::new("does-not-exist.toml")).is_err());
    }
}
