use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::Samples;

use super::wlu::{WeightFunction, weighted_linear_utility_with};

/// The single "risk-weighted mean" used to summarize an intervention.
///
/// Serialized with the display names used in configuration files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RiskWeighter {
    #[serde(rename = "EU")]
    ExpectedUtility,
    #[serde(rename = "MIN")]
    Min,
    #[serde(rename = "MAX")]
    Max,
    #[default]
    #[serde(rename = "WLU - aggressive")]
    WluAggressive,
    #[serde(rename = "WLU - symmetric")]
    WluSymmetric,
}

impl RiskWeighter {
    pub const ALL: [RiskWeighter; 5] = [
        RiskWeighter::ExpectedUtility,
        RiskWeighter::Min,
        RiskWeighter::Max,
        RiskWeighter::WluAggressive,
        RiskWeighter::WluSymmetric,
    ];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            RiskWeighter::ExpectedUtility => "EU",
            RiskWeighter::Min => "MIN",
            RiskWeighter::Max => "MAX",
            RiskWeighter::WluAggressive => "WLU - aggressive",
            RiskWeighter::WluSymmetric => "WLU - symmetric",
        }
    }

    pub fn apply<'a>(self, values: impl Into<Samples<'a>>) -> Result<f64> {
        let samples = values.into();
        match self {
            RiskWeighter::ExpectedUtility => samples.mean(),
            RiskWeighter::Min => samples.min(),
            RiskWeighter::Max => samples.max(),
            RiskWeighter::WluAggressive => {
                weighted_linear_utility_with(samples, WeightFunction::Aggressive)
            }
            RiskWeighter::WluSymmetric => {
                weighted_linear_utility_with(samples, WeightFunction::Symmetric)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StatsError;
    use crate::model::SparseSample;

    #[test]
    fn test_order_statistics_include_implicit_zeros() {
        let sparse = SparseSample::new(vec![2.0, 5.0], 3);
        assert_eq!(RiskWeighter::Min.apply(&sparse).unwrap(), 0.0);
        assert_eq!(RiskWeighter::Max.apply(&sparse).unwrap(), 5.0);
        assert!((RiskWeighter::ExpectedUtility.apply(&sparse).unwrap() - 1.4).abs() < 1e-12);
    }

    #[test]
    fn test_wlu_presets_sit_below_mean_for_gains() {
        let values = [0.0, 1.0, 10.0, 100.0, 1000.0];
        let mean = RiskWeighter::ExpectedUtility.apply(&values).unwrap();
        for weighter in [RiskWeighter::WluAggressive, RiskWeighter::WluSymmetric] {
            let value = weighter.apply(&values).unwrap();
            assert!(value < mean, "{}: {value} vs {mean}", weighter.label());
        }
    }

    #[test]
    fn test_aggressive_punishes_losses_harder() {
        let values = [-1000.0, 1.0, 2.0, 3.0];
        let aggressive = RiskWeighter::WluAggressive.apply(&values).unwrap();
        let symmetric = RiskWeighter::WluSymmetric.apply(&values).unwrap();
        assert!(aggressive < symmetric);
    }

    #[test]
    fn test_config_names() {
        let parsed: RiskWeighter = serde_json::from_str(r#""WLU - symmetric""#).unwrap();
        assert_eq!(parsed, RiskWeighter::WluSymmetric);
        for weighter in RiskWeighter::ALL {
            let json = serde_json::to_string(&weighter).unwrap();
            assert_eq!(json, format!("\"{}\"", weighter.label()));
        }
        assert_eq!(RiskWeighter::default(), RiskWeighter::WluAggressive);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(
            RiskWeighter::Max.apply(&[] as &[f64]),
            Err(StatsError::EmptySample)
        );
    }
}
