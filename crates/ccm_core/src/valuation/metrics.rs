//! Named valuation metrics and batch evaluation across samples

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{Result, StatsError};
use crate::model::{Samples, SparseSample};

use super::aversion::RiskAversion;
use super::expected_value::{expected_value, expected_value_99, expected_value_99_9};
use super::reu::risk_weighted_utility;
use super::wlu::weighted_linear_utility;

/// A scalar summary that can be computed from any sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ValuationMetric {
    Mean,
    Median,
    /// Untrimmed expected value
    ExpectedValue,
    /// Expected value of the middle 99%
    ExpectedValue99,
    /// Expected value of the middle 99.9%
    ExpectedValue999,
    RiskWeightedUtility { aversion: RiskAversion },
    WeightedLinearUtility { aversion: RiskAversion },
    /// Interpolated percentile, 0..=100
    Percentile { percentile: u8 },
}

impl ValuationMetric {
    /// The nine alternatives shown side by side when comparing valuations
    pub const ALTERNATIVES: [ValuationMetric; 9] = [
        ValuationMetric::ExpectedValue,
        ValuationMetric::ExpectedValue99,
        ValuationMetric::ExpectedValue999,
        ValuationMetric::RiskWeightedUtility {
            aversion: RiskAversion::Low,
        },
        ValuationMetric::RiskWeightedUtility {
            aversion: RiskAversion::Medium,
        },
        ValuationMetric::RiskWeightedUtility {
            aversion: RiskAversion::High,
        },
        ValuationMetric::WeightedLinearUtility {
            aversion: RiskAversion::Low,
        },
        ValuationMetric::WeightedLinearUtility {
            aversion: RiskAversion::Medium,
        },
        ValuationMetric::WeightedLinearUtility {
            aversion: RiskAversion::High,
        },
    ];

    /// Get a display label for the metric
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::Mean => "Mean".to_string(),
            Self::Median => "Median".to_string(),
            Self::ExpectedValue => "Expected value".to_string(),
            Self::ExpectedValue99 => "Expected value (middle 99%)".to_string(),
            Self::ExpectedValue999 => "Expected value (middle 99.9%)".to_string(),
            Self::RiskWeightedUtility { aversion } => format!(
                "Risk-weighted expected utility ({}% calibration)",
                aversion.percent_label()
            ),
            Self::WeightedLinearUtility { aversion } => format!(
                "Weighted linear utility ({}% calibration)",
                aversion.percent_label()
            ),
            Self::Percentile { percentile } => format!("P{percentile}"),
        }
    }

    /// Get a short label suitable for table headers
    #[must_use]
    pub fn short_label(&self) -> String {
        match self {
            Self::Mean => "Mean".to_string(),
            Self::Median => "Median".to_string(),
            Self::ExpectedValue => "EV".to_string(),
            Self::ExpectedValue99 => "EV99".to_string(),
            Self::ExpectedValue999 => "EV99.9".to_string(),
            Self::RiskWeightedUtility { aversion } => format!("REU{}", aversion.percent_label()),
            Self::WeightedLinearUtility { aversion } => {
                format!("WLU{}", aversion.percent_label())
            }
            Self::Percentile { percentile } => format!("P{percentile}"),
        }
    }

    pub fn compute<'a>(&self, values: impl Into<Samples<'a>>) -> Result<f64> {
        let samples = values.into();
        match *self {
            Self::Mean => samples.mean(),
            Self::Median => samples.median(),
            Self::ExpectedValue => expected_value(samples),
            Self::ExpectedValue99 => expected_value_99(samples),
            Self::ExpectedValue999 => expected_value_99_9(samples),
            Self::RiskWeightedUtility { aversion } => risk_weighted_utility(samples, aversion),
            Self::WeightedLinearUtility { aversion } => weighted_linear_utility(samples, aversion),
            Self::Percentile { percentile } => {
                if percentile > 100 {
                    return Err(StatsError::InvalidArgument("percentile must be within 0..=100"));
                }
                samples.quantile(f64::from(percentile) / 100.0)
            }
        }
    }
}

/// Result of one metric on one sample; degenerate aggregates carry the error.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricValue {
    pub metric: ValuationMetric,
    pub value: Result<f64>,
}

impl MetricValue {
    /// The value, or `None` for degenerate aggregates
    #[must_use]
    pub fn ok(&self) -> Option<f64> {
        self.value.as_ref().ok().copied()
    }
}

/// Compute each metric on one sample, in order.
pub fn compute_metrics<'a>(
    values: impl Into<Samples<'a>>,
    metrics: &[ValuationMetric],
) -> Vec<MetricValue> {
    let samples = values.into();
    metrics
        .iter()
        .map(|&metric| MetricValue {
            metric,
            value: metric.compute(samples),
        })
        .collect()
}

/// Evaluate the same metrics across many independent samples.
pub fn evaluate_batch(samples: &[SparseSample], metrics: &[ValuationMetric]) -> Vec<Vec<MetricValue>> {
    #[cfg(feature = "parallel")]
    let results: Vec<Vec<MetricValue>> = samples
        .par_iter()
        .map(|sample| compute_metrics(sample, metrics))
        .collect();

    #[cfg(not(feature = "parallel"))]
    let results: Vec<Vec<MetricValue>> = samples
        .iter()
        .map(|sample| compute_metrics(sample, metrics))
        .collect();

    results
}

/// The comparison table of alternative valuations for one sample.
///
/// Trimmed EVs are `None` when the sample is too small to leave anything
/// after trimming.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlternativeValuations {
    pub expected_value: f64,
    pub expected_value_99: Option<f64>,
    pub expected_value_99_9: Option<f64>,
    /// Indexed low, medium, high
    pub risk_weighted_utility: [f64; 3],
    /// Indexed low, medium, high
    pub weighted_linear_utility: [f64; 3],
}

impl AlternativeValuations {
    pub fn compute<'a>(values: impl Into<Samples<'a>>) -> Result<Self> {
        let samples = values.into();
        let trimmed = |result: Result<f64>| match result {
            Ok(value) => Ok(Some(value)),
            Err(StatsError::EmptyWindow { .. }) => Ok(None),
            Err(err) => Err(err),
        };

        let mut risk_weighted = [0.0; 3];
        let mut weighted_linear = [0.0; 3];
        for (idx, aversion) in RiskAversion::ALL.into_iter().enumerate() {
            risk_weighted[idx] = risk_weighted_utility(samples, aversion)?;
            weighted_linear[idx] = weighted_linear_utility(samples, aversion)?;
        }

        Ok(Self {
            expected_value: expected_value(samples)?,
            expected_value_99: trimmed(expected_value_99(samples))?,
            expected_value_99_9: trimmed(expected_value_99_9(samples))?,
            risk_weighted_utility: risk_weighted,
            weighted_linear_utility: weighted_linear,
        })
    }

    /// `(metric, value)` pairs in [`ValuationMetric::ALTERNATIVES`] order
    #[must_use]
    pub fn entries(&self) -> Vec<(ValuationMetric, Option<f64>)> {
        let values = [
            Some(self.expected_value),
            self.expected_value_99,
            self.expected_value_99_9,
            Some(self.risk_weighted_utility[0]),
            Some(self.risk_weighted_utility[1]),
            Some(self.risk_weighted_utility[2]),
            Some(self.weighted_linear_utility[0]),
            Some(self.weighted_linear_utility[1]),
            Some(self.weighted_linear_utility[2]),
        ];
        ValuationMetric::ALTERNATIVES.into_iter().zip(values).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_labels() {
        let labels: Vec<String> = ValuationMetric::ALTERNATIVES
            .iter()
            .map(ValuationMetric::short_label)
            .collect();
        assert_eq!(
            labels,
            vec![
                "EV", "EV99", "EV99.9", "REU03", "REU05", "REU10", "WLU03", "WLU05", "WLU10"
            ]
        );
        assert_eq!(
            ValuationMetric::Percentile { percentile: 95 }.label(),
            "P95"
        );
    }

    #[test]
    fn test_compute_matches_free_functions() {
        let sparse = SparseSample::new(vec![-3.0, 1.0, 4.0, 9.0], 6);
        assert_eq!(
            ValuationMetric::ExpectedValue.compute(&sparse),
            expected_value(&sparse)
        );
        assert_eq!(ValuationMetric::Median.compute(&sparse).unwrap(), 0.0);
        assert_eq!(
            ValuationMetric::Percentile { percentile: 100 }
                .compute(&sparse)
                .unwrap(),
            9.0
        );
        assert!(
            ValuationMetric::Percentile { percentile: 101 }
                .compute(&sparse)
                .is_err()
        );
    }

    #[test]
    fn test_alternatives_on_tiny_sample() {
        let alternatives = AlternativeValuations::compute(&[5.0]).unwrap();
        assert_eq!(alternatives.expected_value, 5.0);
        assert_eq!(alternatives.expected_value_99, None);
        assert_eq!(alternatives.risk_weighted_utility, [5.0; 3]);
        assert_eq!(alternatives.weighted_linear_utility, [5.0; 3]);
        assert_eq!(alternatives.entries().len(), 9);
    }

    #[test]
    fn test_alternatives_of_empty_sample_fail() {
        assert_eq!(
            AlternativeValuations::compute(&SparseSample::default()),
            Err(StatsError::EmptySample)
        );
    }

    #[test]
    fn test_evaluate_batch_preserves_order() {
        let samples = vec![
            SparseSample::new(vec![1.0, 2.0, 3.0], 0),
            SparseSample::new(vec![10.0], 9),
            SparseSample::default(),
        ];
        let metrics = [ValuationMetric::Mean, ValuationMetric::Median];
        let results = evaluate_batch(&samples, &metrics);

        assert_eq!(results.len(), 3);
        assert_eq!(results[0][0].ok(), Some(2.0));
        assert_eq!(results[1][0].ok(), Some(1.0));
        assert_eq!(results[1][1].ok(), Some(0.0));
        assert_eq!(results[2][0].value, Err(StatsError::EmptySample));
    }
}
