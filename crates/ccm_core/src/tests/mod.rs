//! Cross-module tests for the statistics engine
//!
//! Tests are organized by topic:
//! - `sparse_equivalence` - Sparse samples agree with their materialized form
//! - `valuation_properties` - Ordering and calibration laws of the aggregators
//! - `histogram_pipeline` - Histogram statistics computed together on one sample
//! - `moments` - Moment fitting round trips across distribution families

mod moments;

use rand::SeedableRng;
use rand::distr::Distribution;
use rand::rngs::StdRng;
use rand_distr::{LogNormal, Normal};

use crate::model::SparseSample;

/// Heavy-tailed outcomes with a share of losses, as a Monte Carlo run of an
/// intervention with occasional backfire produces.
pub(crate) fn heavy_tailed_sample(seed: u64, dense_len: usize, num_zeros: usize) -> SparseSample {
    let mut rng = StdRng::seed_from_u64(seed);
    let gains = LogNormal::new(2.0, 1.5).unwrap();
    let losses = Normal::new(-5.0, 3.0).unwrap();
    let values: Vec<f64> = (0..dense_len)
        .map(|i| {
            if i % 7 == 0 {
                losses.sample(&mut rng)
            } else {
                gains.sample(&mut rng)
            }
        })
        .collect();
    SparseSample::from_unsorted(values, num_zeros)
}

pub(crate) fn assert_close(actual: f64, expected: f64, rel: f64, context: &str) {
    let tolerance = rel * expected.abs().max(1.0);
    assert!(
        (actual - expected).abs() <= tolerance,
        "{context}: {actual} vs {expected}"
    );
}
