use serde::{Deserialize, Serialize};

/// How strongly a valuation penalizes long-shot outcomes.
///
/// Each level is calibrated against a reference gamble: an `x` chance of
/// 1000 (and nothing otherwise) should be worth 10 for certain, with `x` of
/// 3%, 5% and 10% for low, medium and high aversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskAversion {
    Low,
    #[default]
    Medium,
    High,
}

impl RiskAversion {
    pub const ALL: [RiskAversion; 3] = [RiskAversion::Low, RiskAversion::Medium, RiskAversion::High];

    /// Probability `x` of the calibration gamble
    #[must_use]
    pub fn calibration_probability(self) -> f64 {
        match self {
            RiskAversion::Low => 0.03,
            RiskAversion::Medium => 0.05,
            RiskAversion::High => 0.10,
        }
    }

    /// Exponent `k` of the REU probability weighting `p^k`.
    #[must_use]
    pub fn reu_exponent(self) -> f64 {
        reu_exponent_for(self.calibration_probability())
    }

    /// Exponent `a` of the WLU magnitude weighting `1 / (1 + v^a)`.
    #[must_use]
    pub fn wlu_exponent(self) -> f64 {
        match self {
            RiskAversion::Low => 0.1,
            RiskAversion::Medium => 0.21,
            RiskAversion::High => 0.33,
        }
    }

    /// Calibration probability as a two-digit percent, as used in labels
    #[must_use]
    pub fn percent_label(self) -> &'static str {
        match self {
            RiskAversion::Low => "03",
            RiskAversion::Medium => "05",
            RiskAversion::High => "10",
        }
    }
}

/// Solves `1000 * x^k = 10` for `k`.
fn reu_exponent_for(x: f64) -> f64 {
    -2.0 / x.log10()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reu_exponent_meets_calibration() {
        for level in RiskAversion::ALL {
            let x = level.calibration_probability();
            let certain = 1000.0 * x.powf(level.reu_exponent());
            assert!((certain - 10.0).abs() < 1e-9, "{level:?}: {certain}");
        }
    }

    #[test]
    fn test_higher_aversion_discounts_more() {
        assert!(RiskAversion::Low.reu_exponent() < RiskAversion::Medium.reu_exponent());
        assert!(RiskAversion::Medium.reu_exponent() < RiskAversion::High.reu_exponent());
        assert!((RiskAversion::High.reu_exponent() - 2.0).abs() < 1e-12);
    }
}
