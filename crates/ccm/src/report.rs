//! Report assembly and rendering

use std::fmt;

use ccm_core::histogram::{
    Bin, BinColor, BinScale, ColorScale, HighlightPreset, Histogram, ValueMasses, ZeroFold,
    display_domain, expected_value_masses, filter_near_zeros, percentage_displayed,
    percentage_negative, should_hide_zeros, should_offer_log_scale,
};
use ccm_core::model::{Credibility, Significance};
use ccm_core::percentiles::PercentileSet;
use ccm_core::valuation::{MetricValue, evaluate_batch};
use ccm_core::{RiskWeighter, SparseSample, StatsError, ValuationMetric};
use serde::Serialize;

use crate::config::ReportConfig;
use crate::format::{format_compact, format_fraction, format_optional, format_percent};
use crate::input::SampleSet;

/// Keep the value of an engine result, logging why there is none.
fn value_or_log<T>(result: ccm_core::Result<T>, what: &str) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) if err.is_degenerate() => {
            tracing::debug!(%err, what, "degenerate aggregate");
            None
        }
        Err(err) => {
            tracing::warn!(%err, what, "aggregate failed");
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub n: usize,
    pub dense_len: usize,
    pub num_zeros: usize,
    pub mean: Option<f64>,
    pub median: Option<f64>,
    pub credibility: Credibility,
    pub confidence_interval: Option<(f64, f64)>,
    pub percentiles: Option<PercentileSet>,
    pub significance: Option<Significance>,
    pub risk_weighter: RiskWeighter,
    pub risk_weighted_mean: Option<f64>,
}

impl Summary {
    fn compute(sample: &SparseSample, config: &ReportConfig) -> Self {
        Self {
            n: sample.len(),
            dense_len: sample.dense_len(),
            num_zeros: sample.num_zeros,
            mean: value_or_log(sample.mean(), "mean"),
            median: value_or_log(sample.median(), "median"),
            credibility: config.credibility,
            confidence_interval: value_or_log(
                sample.confidence_interval(config.credibility.percent()),
                "confidence interval",
            ),
            percentiles: value_or_log(PercentileSet::from_samples(sample), "percentiles"),
            significance: value_or_log(sample.significance(), "significance"),
            risk_weighter: config.risk_weighter,
            risk_weighted_mean: value_or_log(
                config.risk_weighter.apply(sample),
                config.risk_weighter.label(),
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricEntry {
    pub metric: ValuationMetric,
    pub label: String,
    pub short_label: String,
    pub value: Option<f64>,
    /// Why there is no value
    pub error: Option<String>,
}

impl From<&MetricValue> for MetricEntry {
    fn from(result: &MetricValue) -> Self {
        Self {
            metric: result.metric,
            label: result.metric.label(),
            short_label: result.metric.short_label(),
            value: result.ok(),
            error: result.value.as_ref().err().map(StatsError::to_string),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ColoredBin {
    #[serde(flatten)]
    pub bin: Bin,
    pub color: BinColor,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramReport {
    pub domain: (f64, f64),
    pub scale: BinScale,
    pub highlight: HighlightPreset,
    /// Near-zero outcomes are left out of the bins and implicit zeros are
    /// not folded in
    pub hide_zeros: bool,
    pub offer_log_scale: bool,
    pub masses: Option<ValueMasses>,
    pub percentage_negative: Option<f64>,
    pub percentage_displayed: Option<f64>,
    pub bins: Vec<ColoredBin>,
}

impl HistogramReport {
    /// `None` when the sample has no explicit outcomes to draw.
    fn compute(sample: &SparseSample, config: &ReportConfig) -> Option<Self> {
        let domain = value_or_log(display_domain(sample), "display domain")?;

        let filtered = filter_near_zeros(&sample.samples);
        let hide_zeros = should_hide_zeros(sample.len(), filtered.len());
        let (data, zeros) = if hide_zeros {
            (filtered.as_slice(), None)
        } else {
            let fold = ZeroFold {
                num_zeros: sample.num_zeros,
                dense_len: sample.dense_len(),
            };
            (sample.samples.as_slice(), Some(fold))
        };

        let options = config.histogram_options();
        let histogram = value_or_log(Histogram::build(data, domain, &options, zeros), "histogram")?;
        let color_scale = ColorScale::new(&sample.samples, config.highlight.bounds());
        let bins = histogram
            .bins
            .iter()
            .zip(histogram.colors(&color_scale))
            .map(|(&bin, color)| ColoredBin { bin, color })
            .collect();

        Some(Self {
            domain,
            scale: options.scale,
            highlight: config.highlight,
            hide_zeros,
            offer_log_scale: should_offer_log_scale(sample),
            masses: value_or_log(expected_value_masses(sample, domain), "value masses"),
            percentage_negative: value_or_log(percentage_negative(sample), "percentage negative"),
            percentage_displayed: value_or_log(
                percentage_displayed(sample, domain),
                "percentage displayed",
            ),
            bins,
        })
    }

    #[must_use]
    pub fn total_count(&self) -> usize {
        self.bins.iter().map(|colored| colored.bin.count).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SampleReport {
    pub name: String,
    pub summary: Summary,
    pub metrics: Vec<MetricEntry>,
    pub histogram: Option<HistogramReport>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub samples: Vec<SampleReport>,
}

/// Run every configured statistic over every sample in `set`.
#[must_use]
pub fn build_report(set: &SampleSet, config: &ReportConfig) -> Report {
    let metric_values = evaluate_batch(&set.samples, &config.metrics);

    let samples = set
        .iter()
        .zip(metric_values)
        .map(|((name, sample), values)| SampleReport {
            name: name.to_string(),
            summary: Summary::compute(sample, config),
            metrics: values.iter().map(MetricEntry::from).collect(),
            histogram: HistogramReport::compute(sample, config),
        })
        .collect();

    Report { samples }
}

pub fn render_json(report: &Report) -> color_eyre::Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

#[must_use]
pub fn render_text(report: &Report) -> String {
    report.to_string()
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, sample) in self.samples.iter().enumerate() {
            if idx > 0 {
                writeln!(f)?;
            }
            write!(f, "{sample}")?;
        }
        Ok(())
    }
}

impl fmt::Display for SampleReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = &self.summary;
        writeln!(
            f,
            "== {} (n = {}, {} explicit, {} implicit zeros)",
            self.name, s.n, s.dense_len, s.num_zeros
        )?;
        writeln!(f, "  {:<18}{}", "mean", format_optional(s.mean))?;
        writeln!(f, "  {:<18}{}", "median", format_optional(s.median))?;
        let ci = match s.confidence_interval {
            Some((low, high)) => format!("[{}, {}]", format_compact(low), format_compact(high)),
            None => "n/a".to_string(),
        };
        writeln!(f, "  {:<18}{}", format!("{}% CI", s.credibility.percent()), ci)?;
        if let Some(p) = &s.percentiles {
            writeln!(
                f,
                "  {:<18}{} / {} / {}",
                "p5 / p50 / p95",
                format_compact(p.p5),
                format_compact(p.p50),
                format_compact(p.p95)
            )?;
        }
        if let Some(significance) = &s.significance {
            writeln!(
                f,
                "  {:<18}{} of outcomes (mean {})",
                "significant",
                format_fraction(significance.fraction_significant),
                format_optional(significance.mean_significant)
            )?;
        }
        writeln!(
            f,
            "  {:<18}{}",
            s.risk_weighter.label(),
            format_optional(s.risk_weighted_mean)
        )?;

        if !self.metrics.is_empty() {
            writeln!(f, "  metrics:")?;
            for entry in &self.metrics {
                match (&entry.value, &entry.error) {
                    (Some(value), _) => {
                        writeln!(f, "    {:<16}{}", entry.short_label, format_compact(*value))?
                    }
                    (None, Some(error)) => {
                        writeln!(f, "    {:<16}n/a ({error})", entry.short_label)?
                    }
                    (None, None) => writeln!(f, "    {:<16}n/a", entry.short_label)?,
                }
            }
        }

        let Some(histogram) = &self.histogram else {
            return writeln!(f, "  histogram: no explicit outcomes");
        };
        writeln!(
            f,
            "  histogram: [{}, {}], {} bins, {:?} scale",
            format_compact(histogram.domain.0),
            format_compact(histogram.domain.1),
            histogram.bins.len(),
            histogram.scale
        )?;
        if let Some(masses) = &histogram.masses {
            writeln!(
                f,
                "    value mass below / inside / above: {} / {} / {}",
                format_percent(masses.below),
                format_percent(masses.included),
                format_percent(masses.above)
            )?;
        }
        if let Some(negative) = histogram.percentage_negative {
            writeln!(f, "    negative value share: {}", format_percent(negative))?;
        }
        if let Some(displayed) = histogram.percentage_displayed {
            writeln!(f, "    outcomes displayed: {}", format_percent(displayed))?;
        }
        let highlighted = histogram
            .bins
            .iter()
            .filter(|colored| colored.color == BinColor::Highlight)
            .count();
        writeln!(
            f,
            "    highlighted bins: {} ({})",
            highlighted,
            histogram.highlight.label()
        )?;
        writeln!(
            f,
            "    near zeros hidden: {}, log scale suggested: {}",
            if histogram.hide_zeros { "yes" } else { "no" },
            if histogram.offer_log_scale { "yes" } else { "no" }
        )
    }
}
