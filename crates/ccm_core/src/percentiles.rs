//! Percentile tables over sample outcomes
//!
//! Percentiles are carried as `(fraction, value)` pairs, e.g. `(0.05, v)`
//! for the 5th percentile.

use serde::{Deserialize, Serialize};

use crate::error::{Result, StatsError};
use crate::model::Samples;

/// Fractions closer than this name the same percentile
pub const PERCENTILE_TOLERANCE: f64 = 0.001;

/// Percentiles reported for every result, in percent
pub const STANDARD_PERCENTILES: [u8; 15] = [1, 5, 10, 20, 25, 30, 40, 50, 60, 70, 75, 80, 90, 95, 99];

/// Fractions of the [`PercentileSet`] members
pub mod standard {
    pub const P5: f64 = 0.05;
    pub const P50: f64 = 0.50;
    pub const P95: f64 = 0.95;
}

/// Linearly interpolated quantile of an ascending slice, `p` clamped to
/// `[0, 1]`. `None` for an empty slice.
#[must_use]
pub fn quantile_sorted(sorted: &[f64], p: f64) -> Option<f64> {
    let last = sorted.len().checked_sub(1)?;
    let p = p.clamp(0.0, 1.0);
    let rank = last as f64 * p;
    let lo = (rank.floor() as usize).min(last);
    let hi = (lo + 1).min(last);
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * (rank - lo as f64))
}

/// `(fraction, value)` for each requested percent over the logical
/// population, implicit zeros included.
pub fn percentiles<'a>(values: impl Into<Samples<'a>>, percents: &[f64]) -> Result<Vec<(f64, f64)>> {
    if percents.iter().any(|p| !(0.0..=100.0).contains(p)) {
        return Err(StatsError::InvalidArgument("percentiles must be within [0, 100]"));
    }
    let sorted = values.into().non_empty_sorted()?;
    Ok(percents
        .iter()
        .map(|&pct| {
            let fraction = pct / 100.0;
            (fraction, sorted.quantile(fraction))
        })
        .collect())
}

/// [`percentiles`] at [`STANDARD_PERCENTILES`]
pub fn standard_percentiles<'a>(values: impl Into<Samples<'a>>) -> Result<Vec<(f64, f64)>> {
    let percents: Vec<f64> = STANDARD_PERCENTILES.iter().map(|&p| f64::from(p)).collect();
    percentiles(values, &percents)
}

/// Quantiles at every multiple of `density_per_bin` percent from 0 to 100,
/// so that each consecutive pair bounds that share of the outcomes.
pub fn percentogram(sorted: &[f64], density_per_bin: f64) -> Result<Vec<f64>> {
    if !(density_per_bin > 0.0 && density_per_bin <= 100.0) {
        return Err(StatsError::InvalidArgument("bin density must be within (0, 100]"));
    }
    if sorted.is_empty() {
        return Err(StatsError::EmptySample);
    }
    let steps = (100.0 / density_per_bin).round() as usize;
    Ok((0..=steps)
        .filter_map(|q| quantile_sorted(sorted, q as f64 * density_per_bin / 100.0))
        .collect())
}

/// `output_size` quantiles evenly spaced strictly inside the distribution,
/// at `100 * i / (output_size + 1)` percent. Returns the input unchanged
/// when it already has `output_size` outcomes.
pub fn downsample_by_percentiles<'a>(values: impl Into<Samples<'a>>, output_size: usize) -> Result<Vec<f64>> {
    let samples = values.into();
    if let Samples::Dense(dense) = samples {
        if dense.len() == output_size {
            return Ok(dense.to_vec());
        }
    }
    let increment = 100.0 / (output_size + 1) as f64;
    let percents: Vec<f64> = (1..=output_size).map(|i| i as f64 * increment).collect();
    Ok(percentiles(samples, &percents)?
        .into_iter()
        .map(|(_, value)| value)
        .collect())
}

/// Clamp every outcome into the band between the `x` and `100 - x`
/// percentiles, keeping the input order.
pub fn winsorize(values: &[f64], x: f64) -> Result<Vec<f64>> {
    if !(0.0..=50.0).contains(&x) {
        return Err(StatsError::InvalidArgument("cut percent must be within [0, 50]"));
    }
    let cuts = percentiles(values, &[x, 100.0 - x])?;
    let (lower, upper) = (cuts[0].1, cuts[1].1);
    Ok(values.iter().map(|v| v.max(lower).min(upper)).collect())
}

/// Value paired with the fraction `target`, matched within
/// [`PERCENTILE_TOLERANCE`].
#[inline]
#[must_use]
pub fn find_percentile_value(values: &[(f64, f64)], target: f64) -> Option<f64> {
    values
        .iter()
        .find(|&&(fraction, _)| (fraction - target).abs() < PERCENTILE_TOLERANCE)
        .map(|&(_, value)| value)
}

/// The 5th, 50th and 95th percentiles quoted next to a mean
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PercentileSet {
    pub p5: f64,
    pub p50: f64,
    pub p95: f64,
}

impl PercentileSet {
    /// Pick the set out of a table produced by [`percentiles`]; `None` unless
    /// all three are present.
    #[must_use]
    pub fn from_values(values: &[(f64, f64)]) -> Option<Self> {
        let lookup = |target| find_percentile_value(values, target);
        Some(Self {
            p5: lookup(standard::P5)?,
            p50: lookup(standard::P50)?,
            p95: lookup(standard::P95)?,
        })
    }

    pub fn from_samples<'a>(values: impl Into<Samples<'a>>) -> Result<Self> {
        let sorted = values.into().non_empty_sorted()?;
        Ok(Self {
            p5: sorted.quantile(standard::P5),
            p50: sorted.quantile(standard::P50),
            p95: sorted.quantile(standard::P95),
        })
    }

    /// `p95 - p5`
    #[must_use]
    pub fn spread(&self) -> f64 {
        self.p95 - self.p5
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SparseSample;

    #[test]
    fn test_find_percentile_value_within_tolerance() {
        let table = [(0.05, -4.0), (0.5000004, 12.0), (0.95, 80.0)];

        assert_eq!(find_percentile_value(&table, 0.5), Some(12.0));
        assert_eq!(find_percentile_value(&table, 0.95), Some(80.0));
        assert_eq!(find_percentile_value(&table, 0.25), None);
    }

    #[test]
    fn test_quantile_sorted_interpolates_and_clamps() {
        let sorted = [0.0, 10.0, 20.0, 30.0];
        assert_eq!(quantile_sorted(&sorted, 0.5), Some(15.0));
        assert_eq!(quantile_sorted(&sorted, 2.0), Some(30.0));
        assert_eq!(quantile_sorted(&sorted, -1.0), Some(0.0));
        assert_eq!(quantile_sorted(&[], 0.5), None);
    }

    #[test]
    fn test_standard_percentiles_over_sparse_sample() {
        // logical: 51 zeros followed by 51..=100
        let explicit: Vec<f64> = (51..=100).map(f64::from).collect();
        let sparse = SparseSample::new(explicit, 51);
        let pcts = standard_percentiles(&sparse).unwrap();
        assert_eq!(pcts.len(), STANDARD_PERCENTILES.len());
        assert_eq!(find_percentile_value(&pcts, 0.25), Some(0.0));
        assert_eq!(find_percentile_value(&pcts, 0.99), Some(99.0));
    }

    #[test]
    fn test_percentile_set_from_samples() {
        let values: Vec<f64> = (0..=100).map(f64::from).collect();
        let set = PercentileSet::from_samples(&values).unwrap();
        assert!((set.p5 - 5.0).abs() < 1e-9);
        assert!((set.p50 - 50.0).abs() < 1e-9);
        assert!((set.p95 - 95.0).abs() < 1e-9);
        assert!(PercentileSet::from_samples(&SparseSample::default()).is_err());
    }

    #[test]
    fn test_percentile_set_from_table() {
        let values: Vec<f64> = (0..=100).map(f64::from).collect();
        let table = standard_percentiles(&values).unwrap();
        let set = PercentileSet::from_values(&table).unwrap();
        assert_eq!(Some(set), PercentileSet::from_samples(&values).ok());
        assert!((set.spread() - 90.0).abs() < 1e-9);

        let partial = [(0.05, 1.0), (0.5, 2.0)];
        assert!(PercentileSet::from_values(&partial).is_none());
    }

    #[test]
    fn test_percentogram_edges() {
        let sorted: Vec<f64> = (0..=100).map(f64::from).collect();
        let edges = percentogram(&sorted, 25.0).unwrap();
        assert_eq!(edges.len(), 5);
        assert!((edges[1] - 25.0).abs() < 1e-9);
        assert_eq!(edges[4], 100.0);
        assert!(percentogram(&sorted, 0.0).is_err());
    }

    #[test]
    fn test_downsample_by_percentiles() {
        let values: Vec<f64> = (0..=100).map(f64::from).collect();
        let reduced = downsample_by_percentiles(&values, 3).unwrap();
        assert_eq!(reduced.len(), 3);
        assert!((reduced[0] - 25.0).abs() < 1e-9);
        assert!((reduced[1] - 50.0).abs() < 1e-9);
        assert!((reduced[2] - 75.0).abs() < 1e-9);

        let same = downsample_by_percentiles(&[3.0, 1.0], 2).unwrap();
        assert_eq!(same, vec![3.0, 1.0]);
    }

    #[test]
    fn test_winsorize_clamps_tails() {
        let mut values: Vec<f64> = (0..=100).map(f64::from).collect();
        values.swap(0, 100);
        let cut = winsorize(&values, 10.0).unwrap();
        assert!((cut[0] - 90.0).abs() < 1e-9);
        assert!((cut[100] - 10.0).abs() < 1e-9);
        assert_eq!(cut[50], 50.0);
        assert!(winsorize(&values, 60.0).is_err());
    }
}
