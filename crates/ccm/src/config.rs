//! Report configuration
//!
//! Loaded from YAML. Every field has a default, so an empty file (or no file
//! at all) yields the standard report.

use std::path::Path;

use ccm_core::histogram::{BinScale, HighlightPreset, HistogramOptions};
use ccm_core::model::Credibility;
use ccm_core::{RiskWeighter, ValuationMetric};
use color_eyre::eyre::WrapErr;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Metrics listed for every sample, in order
    pub metrics: Vec<ValuationMetric>,
    /// Percentile bands highlighted in the histogram
    pub highlight: HighlightPreset,
    pub bin_count: usize,
    /// Space bins evenly on the bi-symmetric log axis
    pub sym_log: bool,
    /// Width of the summary confidence interval
    pub credibility: Credibility,
    /// The single risk-weighted mean shown in the summary
    pub risk_weighter: RiskWeighter,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            metrics: ValuationMetric::ALTERNATIVES.to_vec(),
            highlight: HighlightPreset::default(),
            bin_count: HistogramOptions::default().bin_count,
            sym_log: false,
            credibility: Credibility::default(),
            risk_weighter: RiskWeighter::default(),
        }
    }
}

impl ReportConfig {
    /// Load from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_saphyr::Error> {
        serde_saphyr::from_str(yaml)
    }

    /// Read the config at `path`, or the defaults when no path is given.
    pub fn load(path: Option<&Path>) -> color_eyre::Result<Self> {
        let Some(path) = path else {
            tracing::debug!("no config file given; using defaults");
            return Ok(Self::default());
        };

        let content = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("Failed to read config {}", path.display()))?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config = Self::from_yaml(&content)
            .wrap_err_with(|| format!("Failed to parse config {}", path.display()))?;
        tracing::debug!(metrics = config.metrics.len(), "loaded report config");
        Ok(config)
    }

    #[must_use]
    pub fn histogram_options(&self) -> HistogramOptions {
        HistogramOptions {
            bin_count: self.bin_count,
            scale: if self.sym_log {
                BinScale::SymLog
            } else {
                BinScale::Linear
            },
        }
    }
}
