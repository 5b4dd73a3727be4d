use crate::error::{Result, StatsError};
use crate::model::Samples;

/// Ratio of the 99th percentile to the median past which a log axis helps
const LOG_SCALE_SPREAD: f64 = 100.0;

/// Explicit outcome at `floor(len * fraction)` of a sorted slice
fn dense_percentile(sorted: &[f64], fraction: f64) -> f64 {
    let idx = (sorted.len() as f64 * fraction).floor() as usize;
    sorted[idx.min(sorted.len() - 1)]
}

/// Chart x-domain for a sample.
///
/// Centred on the median of the whole population and reaching twice as far
/// as the farther of the explicit 1st and 99th percentiles. Falls back to the
/// explicit min and max when that spread is zero.
pub fn display_domain<'a>(values: impl Into<Samples<'a>>) -> Result<(f64, f64)> {
    let samples = values.into();
    let sorted = samples.sorted();
    let dense = &*sorted.values;
    if dense.is_empty() {
        return Err(StatsError::EmptySample);
    }

    let median = sorted.value_at(sorted.zero_index(), sorted.len() / 2);
    let first = dense_percentile(dense, 0.01);
    let ninety_ninth = dense_percentile(dense, 0.99);
    let spread = (median - first).abs().max((ninety_ninth - median).abs());

    if spread > 0.0 {
        Ok((median - 2.0 * spread, median + 2.0 * spread))
    } else {
        Ok((dense[0], dense[dense.len() - 1]))
    }
}

/// Whether the explicit outcomes are skewed enough to offer a log axis.
#[must_use]
pub fn should_offer_log_scale<'a>(values: impl Into<Samples<'a>>) -> bool {
    let sorted = values.into().sorted();
    let dense = &*sorted.values;
    if dense.is_empty() {
        return false;
    }
    let median = dense_percentile(dense, 0.5);
    median == 0.0 || dense_percentile(dense, 0.99) / median > LOG_SCALE_SPREAD
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SparseSample;

    #[test]
    fn test_domain_centres_on_sparse_median() {
        let values: Vec<f64> = (1..=100).map(f64::from).collect();
        // dense p1 = 2, p99 = 100, median of 100 explicit + 0 zeros = 51
        let domain = display_domain(&values).unwrap();
        assert_eq!(domain, (51.0 - 2.0 * 49.0, 51.0 + 2.0 * 49.0));

        // 200 implicit zeros pull the median to zero
        let sparse = SparseSample::new(values, 200);
        let domain = display_domain(&sparse).unwrap();
        assert_eq!(domain, (-200.0, 200.0));
    }

    #[test]
    fn test_domain_falls_back_to_extent() {
        let domain = display_domain(&[4.0, 4.0, 4.0]).unwrap();
        assert_eq!(domain, (4.0, 4.0));
        assert_eq!(
            display_domain(&SparseSample::new(vec![], 5)),
            Err(StatsError::EmptySample)
        );
    }

    #[test]
    fn test_log_scale_offer() {
        let skewed: Vec<f64> = (0..100).map(|i| if i < 98 { 1.0 } else { 1e6 }).collect();
        assert!(should_offer_log_scale(&skewed));

        let even: Vec<f64> = (1..=100).map(f64::from).collect();
        assert!(!should_offer_log_scale(&even));

        assert!(should_offer_log_scale(&[-1.0, 0.0, 1.0]));
        assert!(!should_offer_log_scale(&[] as &[f64]));
    }
}
