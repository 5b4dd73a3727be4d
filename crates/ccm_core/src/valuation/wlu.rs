//! Weighted linear utility
//!
//! Each outcome is weighted by a decreasing function of its own magnitude,
//! the weights are normalized to average one over the whole population, and
//! the weighted mean is returned.

use serde::{Deserialize, Serialize};

use crate::error::{Result, StatsError};
use crate::model::Samples;

use super::aversion::RiskAversion;

/// Exponent of the weighting used by the risk weighter presets
const PRESET_EXPONENT: f64 = 0.25;

/// Magnitude weighting applied to each outcome.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum WeightFunction {
    /// Reflected sigmoid with the exponent calibrated for an aversion level
    Calibrated { aversion: RiskAversion },
    /// `ln(1 - v) + 1` for losses, growing without bound
    Aggressive,
    /// Reflected sigmoid with exponent 1/4
    Symmetric,
}

impl WeightFunction {
    #[must_use]
    pub fn weight(self, value: f64) -> f64 {
        match self {
            WeightFunction::Calibrated { aversion } => {
                reflected_sigmoid(value, aversion.wlu_exponent())
            }
            WeightFunction::Aggressive => {
                if value < 0.0 {
                    (1.0 - value).ln() + 1.0
                } else {
                    sigmoid(value, PRESET_EXPONENT)
                }
            }
            WeightFunction::Symmetric => reflected_sigmoid(value, PRESET_EXPONENT),
        }
    }
}

impl From<RiskAversion> for WeightFunction {
    fn from(aversion: RiskAversion) -> Self {
        WeightFunction::Calibrated { aversion }
    }
}

#[inline]
fn sigmoid(value: f64, exponent: f64) -> f64 {
    1.0 / (1.0 + value.powf(exponent))
}

/// `1 / (1 + v^a)` for gains, mirrored about 1 for losses so losses weigh
/// more than one and the curve is continuous at zero.
#[inline]
fn reflected_sigmoid(value: f64, exponent: f64) -> f64 {
    if value < 0.0 {
        2.0 - sigmoid(value.abs(), exponent)
    } else {
        sigmoid(value, exponent)
    }
}

/// WLU calibrated for `aversion`.
pub fn weighted_linear_utility<'a>(
    values: impl Into<Samples<'a>>,
    aversion: RiskAversion,
) -> Result<f64> {
    weighted_linear_utility_with(values, WeightFunction::from(aversion))
}

/// WLU under any [`WeightFunction`].
///
/// Implicit zeros add `weight(0)` each to the weight total and nothing to
/// the weighted sum.
pub fn weighted_linear_utility_with<'a>(
    values: impl Into<Samples<'a>>,
    weight: WeightFunction,
) -> Result<f64> {
    let samples = values.into();
    let total = samples.len();
    if total == 0 {
        return Err(StatsError::EmptySample);
    }

    let sorted = samples.sorted();
    let weight_total = sorted.values.iter().map(|&v| weight.weight(v)).sum::<f64>()
        + weight.weight(0.0) * sorted.num_zeros as f64;
    let average_weight = weight_total / total as f64;

    let weighted_sum: f64 = sorted
        .values
        .iter()
        .map(|&v| v * (weight.weight(v) / average_weight))
        .sum();
    Ok(weighted_sum / total as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SparseSample;

    fn close(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() <= tol * b.abs().max(1.0)
    }

    #[test]
    fn test_certain_outcome_is_unchanged() {
        for level in RiskAversion::ALL {
            assert_eq!(weighted_linear_utility(&[8.0], level).unwrap(), 8.0);
        }
        assert_eq!(
            weighted_linear_utility_with(&[-2.0], WeightFunction::Aggressive).unwrap(),
            -2.0
        );
    }

    #[test]
    fn test_weights_are_continuous_at_zero() {
        for weight in [
            WeightFunction::from(RiskAversion::Low),
            WeightFunction::Symmetric,
            WeightFunction::Aggressive,
        ] {
            let below = weight.weight(-1e-12);
            let at = weight.weight(0.0);
            assert!((below - at).abs() < 0.01, "{weight:?}: {below} vs {at}");
        }
    }

    #[test]
    fn test_losses_weigh_more_than_gains() {
        for weight in [
            WeightFunction::from(RiskAversion::High),
            WeightFunction::Symmetric,
            WeightFunction::Aggressive,
        ] {
            assert!(weight.weight(-50.0) > 1.0);
            assert!(weight.weight(50.0) < weight.weight(0.0));
        }
    }

    #[test]
    fn test_calibration_gamble_is_near_ten() {
        for level in RiskAversion::ALL {
            let n = 1000;
            let winners = (level.calibration_probability() * n as f64).round() as usize;
            let sparse = SparseSample::new(vec![1000.0; winners], n - winners);
            let wlu = weighted_linear_utility(&sparse, level).unwrap();
            assert!((wlu - 10.0).abs() < 0.5, "{level:?}: {wlu}");
        }
    }

    #[test]
    fn test_sparse_matches_dense() {
        let cases = [
            (vec![-4.0, 2.0, 5.0], 2),
            (vec![1.0, 2.0, 3.0], 3),
            (vec![-3.0, -2.0, -1.0], 4),
            (vec![-100.0, 0.0, 7.5, 1e6], 11),
        ];
        for (samples, num_zeros) in cases {
            let sparse = SparseSample::new(samples, num_zeros);
            let dense = sparse.materialize();
            for weight in [
                WeightFunction::from(RiskAversion::Medium),
                WeightFunction::Aggressive,
                WeightFunction::Symmetric,
            ] {
                let a = weighted_linear_utility_with(&sparse, weight).unwrap();
                let b = weighted_linear_utility_with(&dense, weight).unwrap();
                assert!(close(a, b, 1e-9), "{sparse:?} {weight:?}: {a} vs {b}");
            }
        }
    }

    #[test]
    fn test_all_zero_population() {
        let sparse = SparseSample::new(vec![], 10);
        assert_eq!(
            weighted_linear_utility(&sparse, RiskAversion::Low).unwrap(),
            0.0
        );
    }
}
