//! Trimmed expected value over a sparse or dense population

use crate::error::{Result, StatsError};
use crate::model::Samples;

/// Proportions kept by EV99: 0.5% trimmed from each tail
pub const EV99_BOUNDS: (f64, f64) = (0.005, 0.995);
/// Proportions kept by EV99.9: 0.05% trimmed from each tail
pub const EV99_9_BOUNDS: (f64, f64) = (0.0005, 0.9995);

/// Mean of the outcomes between two proportions of the sorted population.
///
/// Window bounds are `ceil(lower * n)` and `floor(upper * n)` in logical
/// index space. They are mapped into the compressed array by clamping any
/// bound that lands inside the implicit zero block to the block's start,
/// and the window sum is divided by the logical window width so trimmed
/// zeros are accounted for without being materialized.
pub fn expected_value_with_bounds<'a>(
    values: impl Into<Samples<'a>>,
    lower_proportion: f64,
    upper_proportion: f64,
) -> Result<f64> {
    if !(0.0 <= lower_proportion && lower_proportion <= upper_proportion && upper_proportion <= 1.0)
    {
        return Err(StatsError::InvalidArgument(
            "trim proportions must satisfy 0 <= lower <= upper <= 1",
        ));
    }

    let samples = values.into();
    let total = samples.len();
    if total == 0 {
        return Err(StatsError::EmptySample);
    }

    let lower = (lower_proportion * total as f64).ceil() as usize;
    let upper = ((upper_proportion * total as f64).floor() as usize).min(total);
    if upper <= lower {
        tracing::debug!(lower, upper, total, "trimmed window is empty");
        return Err(StatsError::EmptyWindow { lower, upper });
    }

    let sorted = samples.sorted();
    let zero_index = sorted.zero_index();
    let num_zeros = sorted.num_zeros;
    let compress = |bound: usize| {
        if bound >= zero_index + num_zeros {
            bound - num_zeros
        } else if bound >= zero_index {
            zero_index
        } else {
            bound
        }
    };

    let window = &sorted.values[compress(lower)..compress(upper)];
    Ok(window.iter().sum::<f64>() / (upper - lower) as f64)
}

/// Untrimmed expected value
pub fn expected_value<'a>(values: impl Into<Samples<'a>>) -> Result<f64> {
    expected_value_with_bounds(values, 0.0, 1.0)
}

/// Expected value of the middle 99% of outcomes
pub fn expected_value_99<'a>(values: impl Into<Samples<'a>>) -> Result<f64> {
    expected_value_with_bounds(values, EV99_BOUNDS.0, EV99_BOUNDS.1)
}

/// Expected value of the middle 99.9% of outcomes
pub fn expected_value_99_9<'a>(values: impl Into<Samples<'a>>) -> Result<f64> {
    expected_value_with_bounds(values, EV99_9_BOUNDS.0, EV99_9_BOUNDS.1)
}
