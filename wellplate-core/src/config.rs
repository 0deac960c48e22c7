//! Pipeline configuration types
//!
//! This module defines the minimal configuration needed by the library.
//! Where rows come from and where results go are handled by the application
//! layer.

use crate::types::{EndReason, Metric};
use serde::{Deserialize, Serialize};

/// Configuration for one analysis run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Only events that ended for this reason are analysed
    #[serde(default)]
    pub end_reason: EndReason,

    /// Metrics to build time series and heatmaps for (default: all four)
    #[serde(default = "default_metrics")]
    pub metrics: Vec<Metric>,

    /// Fail on a well claimed by two groups instead of keeping the later one
    #[serde(default)]
    pub strict_groups: bool,
}

fn default_metrics() -> Vec<Metric> {
    Metric::ALL.to_vec()
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            end_reason: EndReason::default(),
            metrics: default_metrics(),
            strict_groups: false,
        }
    }
}

impl PipelineConfig {
    /// Create a new configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: select the end reason to analyse
    pub fn with_end_reason(mut self, reason: EndReason) -> Self {
        self.end_reason = reason;
        self
    }

    /// Builder method: restrict the per-metric outputs
    ///
    /// Duplicates are dropped, first occurrence wins.
    pub fn with_metrics(mut self, metrics: impl IntoIterator<Item = Metric>) -> Self {
        self.metrics.clear();
        for metric in metrics {
            if !self.metrics.contains(&metric) {
                self.metrics.push(metric);
            }
        }
        self
    }

    /// Builder method: enable or disable strict group assignment
    pub fn with_strict_groups(mut self, strict: bool) -> Self {
        self.strict_groups = strict;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::new();
        assert_eq!(config.end_reason, EndReason::TopLight);
        assert_eq!(config.metrics, Metric::ALL.to_vec());
        assert!(!config.strict_groups);
    }

    #[test]
    fn test_builder() {
        let config = PipelineConfig::new()
            .with_end_reason(EndReason::Sound)
            .with_metrics([Metric::TotalDistance, Metric::InaDist, Metric::TotalDistance])
            .with_strict_groups(true);

        assert_eq!(config.end_reason, EndReason::Sound);
        assert_eq!(config.metrics, vec![Metric::TotalDistance, Metric::InaDist]);
        assert!(config.strict_groups);
    }
}
