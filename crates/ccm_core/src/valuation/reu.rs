//! Risk-weighted expected utility
//!
//! Outcomes are visited in ascending order. The first contributes its full
//! value; each later one contributes its increment over the previous outcome
//! scaled by `risk(p)`, where `p` is the probability of doing at least that
//! well. A concave `risk` discounts gains that only long shots reach.

use crate::error::{Result, StatsError};
use crate::model::Samples;

use super::aversion::RiskAversion;

/// Where the single representative zero sits in the compressed order.
#[derive(Debug, Clone, Copy)]
struct ZeroBlock {
    /// Position of the representative zero once inserted
    start: usize,
    /// Implicit zeros beyond the representative one
    hidden: usize,
}

/// REU with the `p^k` risk function calibrated for `aversion`.
pub fn risk_weighted_utility<'a>(
    values: impl Into<Samples<'a>>,
    aversion: RiskAversion,
) -> Result<f64> {
    let exponent = aversion.reu_exponent();
    risk_weighted_utility_with(values, |p| p.powf(exponent))
}

/// REU under an arbitrary risk function of the "at least this good"
/// probability.
pub fn risk_weighted_utility_with<'a, F>(values: impl Into<Samples<'a>>, risk: F) -> Result<f64>
where
    F: Fn(f64) -> f64,
{
    let samples = values.into();
    let total = samples.len();
    if total == 0 {
        return Err(StatsError::EmptySample);
    }

    let sorted = samples.sorted();
    let zero_block = (sorted.num_zeros > 0).then(|| ZeroBlock {
        start: sorted.zero_index(),
        hidden: sorted.num_zeros - 1,
    });
    Ok(accumulate(&sorted.values, zero_block, total, risk))
}

/// Walk the sorted outcomes with one zero threaded in at the block start.
fn accumulate<F>(values: &[f64], zero_block: Option<ZeroBlock>, total: usize, risk: F) -> f64
where
    F: Fn(f64) -> f64,
{
    let split = zero_block.map_or(values.len(), |block| block.start);
    let (head, tail) = values.split_at(split);
    let outcomes = head
        .iter()
        .copied()
        .chain(zero_block.map(|_| 0.0))
        .chain(tail.iter().copied());

    let mut utility = 0.0;
    let mut previous: Option<f64> = None;
    for (idx, value) in outcomes.enumerate() {
        match previous {
            None => utility += value,
            Some(prev) => {
                let true_index = match zero_block {
                    Some(block) if idx > block.start => idx + block.hidden,
                    _ => idx,
                };
                let at_least = 1.0 - true_index as f64 / total as f64;
                utility += (value - prev) * risk(at_least);
            }
        }
        previous = Some(value);
    }
    utility
}
