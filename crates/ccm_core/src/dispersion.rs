//! Spread estimates and outlier trimming for dense outcome arrays

use crate::error::{Result, StatsError};

fn mean(values: &[f64]) -> Result<f64> {
    if values.is_empty() {
        return Err(StatsError::EmptySample);
    }
    Ok(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample variance with the `n - 1` denominator; zero for one value.
pub fn variance(values: &[f64]) -> Result<f64> {
    let mean = mean(values)?;
    if values.len() == 1 {
        return Ok(0.0);
    }
    let squares: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
    Ok(squares / (values.len() - 1) as f64)
}

/// Keep the values less than `max_deviations` standard deviations from the
/// mean (Chauvenet's criterion with a caller-chosen cutoff).
///
/// A population with zero spread is returned whole.
pub fn chauvenet_filter(values: &[f64], max_deviations: f64) -> Result<Vec<f64>> {
    let mean = mean(values)?;
    let stdev = variance(values)?.sqrt();
    if stdev == 0.0 {
        return Ok(values.to_vec());
    }
    Ok(values
        .iter()
        .copied()
        .filter(|v| (v - mean).abs() / stdev < max_deviations)
        .collect())
}

/// `(min, max)` of the values surviving [`chauvenet_filter`]
pub fn chauvenet_range(values: &[f64], max_deviations: f64) -> Result<(f64, f64)> {
    let kept = chauvenet_filter(values, max_deviations)?;
    let min = kept.iter().copied().reduce(f64::min).ok_or(StatsError::EmptySample)?;
    let max = kept.iter().copied().reduce(f64::max).ok_or(StatsError::EmptySample)?;
    Ok((min, max))
}

/// `mean ± deviations * stdev`
pub fn std_dev_range(values: &[f64], deviations: f64) -> Result<(f64, f64)> {
    let mean = mean(values)?;
    let stdev = variance(values)?.sqrt();
    Ok((mean - deviations * stdev, mean + deviations * stdev))
}
