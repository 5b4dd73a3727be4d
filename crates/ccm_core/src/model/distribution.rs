//! Parametric distribution specifications and moment fitting
//!
//! [`DistributionSpec`] mirrors the configuration records the simulation
//! service accepts. The engine never samples from them; it only converts
//! between a spec's parameters and its first two moments, which is what a
//! form needs when the user edits one summary statistic and the other shapes
//! must follow.

use serde::{Deserialize, Serialize};

use crate::error::{Result, StatsError};

/// z-score of the 90% interval used when fitting ranges from moments
const NINETY_PERCENT_Z: f64 = 1.645;

/// Optional truncation bounds `(lower, upper)`
pub type Clip = (Option<f64>, Option<f64>);

/// Width of a confidence range, in percent of probability mass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Credibility {
    Fifty,
    Eighty,
    #[default]
    Ninety,
}

impl Credibility {
    /// Standard normal quantile of the upper bound of the central interval
    #[must_use]
    pub fn z_score(self) -> f64 {
        match self {
            Credibility::Fifty => 0.674,
            Credibility::Eighty => 1.282,
            Credibility::Ninety => NINETY_PERCENT_Z,
        }
    }

    #[must_use]
    pub fn percent(self) -> u8 {
        match self {
            Credibility::Fifty => 50,
            Credibility::Eighty => 80,
            Credibility::Ninety => 90,
        }
    }

    /// Percentile keys of the interval bounds, e.g. `("p5", "p95")`
    #[must_use]
    pub fn bound_keys(self) -> (&'static str, &'static str) {
        match self {
            Credibility::Fifty => ("p25", "p75"),
            Credibility::Eighty => ("p10", "p90"),
            Credibility::Ninety => ("p5", "p95"),
        }
    }
}

impl TryFrom<u8> for Credibility {
    type Error = StatsError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            50 => Ok(Credibility::Fifty),
            80 => Ok(Credibility::Eighty),
            90 => Ok(Credibility::Ninety),
            _ => Err(StatsError::InvalidArgument(
                "credibility must be one of 50, 80, 90",
            )),
        }
    }
}

impl From<Credibility> for u8 {
    fn from(value: Credibility) -> Self {
        value.percent()
    }
}

/// Shape behind a confidence range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceShape {
    Normal,
    Lognormal,
}

impl ConfidenceShape {
    /// Shape implied by a range when none is given: lognormal iff the range
    /// lies strictly above zero.
    #[must_use]
    pub fn infer(range: (f64, f64)) -> Self {
        if range.0 <= 0.0 {
            ConfidenceShape::Normal
        } else {
            ConfidenceShape::Lognormal
        }
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            ConfidenceShape::Normal => "normal",
            ConfidenceShape::Lognormal => "lognormal",
        }
    }
}

/// A distribution as configured for the simulation service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum DistributionSpec {
    Constant {
        value: f64,
    },
    Uniform {
        range: (f64, f64),
        #[serde(default)]
        clip: Option<Clip>,
    },
    /// A normal or lognormal distribution described by a central interval
    Confidence {
        #[serde(default)]
        distribution: Option<ConfidenceShape>,
        range: (f64, f64),
        #[serde(default)]
        credibility: Option<Credibility>,
        #[serde(default)]
        clip: Option<Clip>,
    },
    Beta {
        alpha: f64,
        beta: f64,
        #[serde(default)]
        clip: Option<Clip>,
    },
    Gamma {
        shape: f64,
        scale: f64,
        #[serde(default)]
        clip: Option<Clip>,
    },
    /// `(value, probability)` pairs
    Categorical {
        items: Vec<(f64, f64)>,
    },
}

/// Whether [`DistributionSpec::fit_to_moments`] changed the spec
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FitOutcome {
    Updated,
    /// The requested moments have no representation in this family
    Unchanged,
}

/// Target moments for [`DistributionSpec::fit_to_moments`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MomentTarget {
    pub mean: f64,
    pub stdev: f64,
    /// Fit a lognormal even when the spec is currently normal
    pub positive_everywhere: bool,
    pub significant_figures: u32,
}

impl Default for MomentTarget {
    fn default() -> Self {
        Self {
            mean: 0.0,
            stdev: 0.0,
            positive_everywhere: false,
            significant_figures: 3,
        }
    }
}

impl MomentTarget {
    #[must_use]
    pub fn new(mean: f64, stdev: f64) -> Self {
        Self {
            mean,
            stdev,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn positive_everywhere(mut self, positive: bool) -> Self {
        self.positive_everywhere = positive;
        self
    }

    #[must_use]
    pub fn significant_figures(mut self, figures: u32) -> Self {
        self.significant_figures = figures;
        self
    }
}

/// Round to `figures` significant figures; zero and non-finite values pass
/// through.
#[must_use]
pub fn round_significant(x: f64, figures: u32) -> f64 {
    if x == 0.0 || !x.is_finite() {
        return x;
    }
    let magnitude = x.abs().log10().floor() as i32;
    let scale = 10f64.powi(figures as i32 - magnitude - 1);
    (x * scale).round() / scale
}

impl DistributionSpec {
    /// Set this spec's parameters so it has the target mean and standard
    /// deviation, where the family can express them.
    ///
    /// A zero `stdev` is replaced by 20% of `|mean|` first. Families that
    /// cannot take the moments (beta outside its domain, lognormal or gamma
    /// with a non-positive mean, categorical) are left untouched and report
    /// [`FitOutcome::Unchanged`].
    pub fn fit_to_moments(&mut self, target: &MomentTarget) -> FitOutcome {
        let mean = target.mean;
        let mut stdev = target.stdev;
        if !mean.is_finite() || !stdev.is_finite() {
            tracing::debug!(mean, stdev, "non-finite moments; leaving distribution unchanged");
            return FitOutcome::Unchanged;
        }
        if stdev == 0.0 {
            stdev = 0.2 * mean.abs();
        }
        let round = |x: f64| round_significant(x, target.significant_figures);

        match self {
            DistributionSpec::Constant { value } => {
                *value = round(mean);
                FitOutcome::Updated
            }
            DistributionSpec::Confidence {
                distribution,
                range,
                credibility,
                ..
            } => {
                let lognormal = target.positive_everywhere
                    || *distribution == Some(ConfidenceShape::Lognormal);
                if lognormal {
                    let Some(fitted) = lognormal_range(mean, stdev) else {
                        tracing::debug!(mean, "lognormal fit needs a positive mean");
                        return FitOutcome::Unchanged;
                    };
                    *distribution = Some(ConfidenceShape::Lognormal);
                    *range = fitted;
                } else {
                    *distribution = Some(ConfidenceShape::Normal);
                    *range = (
                        round(mean - NINETY_PERCENT_Z * stdev),
                        round(mean + NINETY_PERCENT_Z * stdev),
                    );
                }
                *credibility = Some(Credibility::Ninety);
                FitOutcome::Updated
            }
            DistributionSpec::Uniform { range, .. } => {
                let half_width = 3f64.sqrt() * stdev;
                *range = (round(mean - half_width), round(mean + half_width));
                FitOutcome::Updated
            }
            DistributionSpec::Beta { alpha, beta, .. } => {
                if mean >= 1.0 || mean <= 0.0 || stdev >= 0.25 {
                    tracing::debug!(mean, stdev, "moments outside the beta domain");
                    return FitOutcome::Unchanged;
                }
                let fitted_alpha = round(mean * (mean * (1.0 - mean) / stdev.powi(2) - 1.0));
                if !(fitted_alpha > 0.0) || !fitted_alpha.is_finite() {
                    tracing::debug!(mean, stdev, "beta fit produced a non-positive alpha");
                    return FitOutcome::Unchanged;
                }
                *alpha = fitted_alpha;
                *beta = round(fitted_alpha * (1.0 - mean) / mean);
                FitOutcome::Updated
            }
            DistributionSpec::Gamma { shape, scale, .. } => {
                if mean <= 0.0 {
                    tracing::debug!(mean, "gamma fit needs a positive mean");
                    return FitOutcome::Unchanged;
                }
                *shape = round(mean.powi(2) / stdev.powi(2));
                *scale = round(stdev.powi(2) / mean);
                FitOutcome::Updated
            }
            DistributionSpec::Categorical { .. } => FitOutcome::Unchanged,
        }
    }

    /// Render as a Squiggle expression, wrapped in a truncation when clipped.
    pub fn to_squiggle(&self) -> Result<String> {
        let (inner, clip) = match self {
            DistributionSpec::Constant { value } => (format!("{value}"), None),
            DistributionSpec::Uniform { range, clip } => {
                (format!("uniform({}, {})", range.0, range.1), *clip)
            }
            DistributionSpec::Confidence {
                distribution,
                range,
                credibility,
                clip,
            } => {
                let shape = distribution.unwrap_or_else(|| ConfidenceShape::infer(*range));
                let (lo_key, hi_key) = credibility.unwrap_or_default().bound_keys();
                (
                    format!(
                        "{}({{{lo_key}: {}, {hi_key}: {}}})",
                        shape.name(),
                        range.0,
                        range.1
                    ),
                    *clip,
                )
            }
            DistributionSpec::Beta { alpha, beta, clip } => {
                (format!("beta({alpha}, {beta})"), *clip)
            }
            DistributionSpec::Gamma { shape, scale, clip } => {
                (format!("gamma({shape}, {scale})"), *clip)
            }
            DistributionSpec::Categorical { .. } => {
                return Err(StatsError::InvalidArgument(
                    "categorical distributions have no squiggle form",
                ));
            }
        };

        Ok(match clip {
            Some((Some(lo), Some(hi))) => format!("truncate({inner}, {lo}, {hi})"),
            Some((Some(lo), None)) => format!("truncateLeft({inner}, {lo})"),
            Some((None, Some(hi))) => format!("truncateRight({inner}, {hi})"),
            _ => inner,
        })
    }
}

/// `exp(mu ± 1.645 sigma)` of the lognormal with the given mean and stdev
fn lognormal_range(mean: f64, stdev: f64) -> Option<(f64, f64)> {
    if mean <= 0.0 {
        return None;
    }
    let sigma_sq = (1.0 + stdev.powi(2) / mean.powi(2)).ln();
    let sigma = sigma_sq.sqrt();
    let mu = mean.ln() - sigma_sq / 2.0;
    Some((
        (mu - NINETY_PERCENT_Z * sigma).exp(),
        (mu + NINETY_PERCENT_Z * sigma).exp(),
    ))
}

/// Log-space `(mu, sigma)` of a lognormal confidence range
fn lognormal_params(range: (f64, f64), credibility: Credibility) -> (f64, f64) {
    let lo = range.0.ln();
    let hi = range.1.ln();
    ((lo + hi) / 2.0, (hi - lo) / 2.0 / credibility.z_score())
}

/// Mean of the distribution, `None` for categorical.
#[must_use]
pub fn distribution_mean(spec: &DistributionSpec) -> Option<f64> {
    match spec {
        DistributionSpec::Constant { value } => Some(*value),
        DistributionSpec::Confidence {
            distribution,
            range,
            credibility,
            ..
        } => match distribution.unwrap_or_else(|| ConfidenceShape::infer(*range)) {
            ConfidenceShape::Lognormal => {
                let (mu, sigma) = lognormal_params(*range, credibility.unwrap_or_default());
                Some((mu + sigma.powi(2) / 2.0).exp())
            }
            ConfidenceShape::Normal => Some((range.0 + range.1) / 2.0),
        },
        DistributionSpec::Uniform { range, .. } => Some((range.0 + range.1) / 2.0),
        DistributionSpec::Beta { alpha, beta, .. } => Some(alpha / (alpha + beta)),
        DistributionSpec::Gamma { shape, scale, .. } => Some(shape * scale),
        DistributionSpec::Categorical { .. } => None,
    }
}

/// Standard deviation of the distribution, `None` for categorical.
#[must_use]
pub fn distribution_stdev(spec: &DistributionSpec) -> Option<f64> {
    match spec {
        DistributionSpec::Constant { .. } => Some(0.0),
        DistributionSpec::Confidence {
            distribution,
            range,
            credibility,
            ..
        } => {
            let credibility = credibility.unwrap_or_default();
            match distribution.unwrap_or_else(|| ConfidenceShape::infer(*range)) {
                ConfidenceShape::Lognormal => {
                    let (mu, sigma) = lognormal_params(*range, credibility);
                    let sigma_sq = sigma.powi(2);
                    Some(((sigma_sq.exp() - 1.0) * (2.0 * mu + sigma_sq).exp()).sqrt())
                }
                ConfidenceShape::Normal => {
                    Some((range.1 - range.0) / 2.0 / credibility.z_score())
                }
            }
        }
        DistributionSpec::Uniform { range, .. } => Some((range.1 - range.0) / 12f64.sqrt()),
        DistributionSpec::Beta { alpha, beta, .. } => {
            let sum = alpha + beta;
            Some((alpha * beta / sum.powi(2) / (sum + 1.0)).sqrt())
        }
        DistributionSpec::Gamma { shape, scale, .. } => Some(shape.sqrt() * scale),
        DistributionSpec::Categorical { .. } => None,
    }
}

/// `mean + 3 * stdev`, a rough upper extent of the distribution's mass.
#[must_use]
pub fn distribution_bulk(spec: &DistributionSpec) -> Option<f64> {
    Some(distribution_mean(spec)? + 3.0 * distribution_stdev(spec)?)
}

/// Build a confidence spec from a range, choosing normal or lognormal the
/// way the simulation service does unless `shape` overrides it.
#[must_use]
pub fn range_to_confidence_model(
    range: (f64, f64),
    credibility: Credibility,
    clip: Option<Clip>,
    shape: Option<ConfidenceShape>,
) -> DistributionSpec {
    DistributionSpec::Confidence {
        distribution: Some(shape.unwrap_or_else(|| ConfidenceShape::infer(range))),
        range,
        credibility: Some(credibility),
        clip,
    }
}
