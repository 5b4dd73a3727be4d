//! Summary statistics shown alongside an outcome histogram

use serde::{Deserialize, Serialize};

use crate::error::{Result, StatsError};
use crate::model::Samples;

/// Share of outcomes, by count, below which near-zero mass is hidden
const HIDE_ZEROS_THRESHOLD: f64 = 0.1;

/// Mean absolute value of `values` over a population of `count`
fn mean_abs(values: &[f64], count: usize) -> f64 {
    values.iter().map(|v| v.abs()).sum::<f64>() / count as f64
}

/// Drop outcomes that are noise around zero.
///
/// Compares the mean magnitude of the 90% of outcomes closest to zero with
/// that of the closest 99%. When the former is under a tenth of the latter,
/// every outcome whose magnitude does not exceed the 90% mean is dropped.
/// Otherwise the input is returned unchanged. Order is preserved.
#[must_use]
pub fn filter_near_zeros(values: &[f64]) -> Vec<f64> {
    let mut magnitudes: Vec<f64> = values.iter().map(|v| v.abs()).collect();
    magnitudes.sort_unstable_by(f64::total_cmp);

    let middle_len = (magnitudes.len() as f64 * 0.9).floor() as usize;
    let wide_len = (magnitudes.len() as f64 * 0.99).floor() as usize;
    if middle_len == 0 {
        return values.to_vec();
    }
    let middle_mean = mean_abs(&magnitudes[..middle_len], middle_len);
    let wide_mean = mean_abs(&magnitudes[..wide_len], wide_len);

    if 10.0 * middle_mean < wide_mean {
        values
            .iter()
            .copied()
            .filter(|v| v.abs() > middle_mean)
            .collect()
    } else {
        values.to_vec()
    }
}

/// Default for the "hide near zeros" toggle: on when fewer than 10% of all
/// outcomes survive [`filter_near_zeros`].
#[must_use]
pub fn should_hide_zeros(total_len: usize, filtered_len: usize) -> bool {
    total_len > 0 && (filtered_len as f64 / total_len as f64) < HIDE_ZEROS_THRESHOLD
}

/// Shares of total absolute value lying below, inside and above a domain,
/// in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueMasses {
    pub below: f64,
    pub included: f64,
    pub above: f64,
}

/// Split the absolute value mass of the outcomes by `domain`, inclusive on
/// both ends. Implicit zeros carry no mass.
pub fn expected_value_masses<'a>(
    values: impl Into<Samples<'a>>,
    domain: (f64, f64),
) -> Result<ValueMasses> {
    let samples = values.into();
    if samples.is_empty() {
        return Err(StatsError::EmptySample);
    }

    let (mut below, mut included, mut above) = (0.0, 0.0, 0.0);
    for &v in samples.explicit() {
        if v < domain.0 {
            below += v.abs();
        } else if v > domain.1 {
            above += v.abs();
        } else {
            included += v.abs();
        }
    }

    let total = below + included + above;
    if total == 0.0 {
        return Err(StatsError::ZeroMass);
    }
    Ok(ValueMasses {
        below: 100.0 * below / total,
        included: 100.0 * included / total,
        above: 100.0 * above / total,
    })
}

/// Share of total absolute value contributed by losses, in percent.
pub fn percentage_negative<'a>(values: impl Into<Samples<'a>>) -> Result<f64> {
    let samples = values.into();
    if samples.is_empty() {
        return Err(StatsError::EmptySample);
    }
    let (negative, positive) = samples
        .explicit()
        .iter()
        .fold((0.0, 0.0), |(neg, pos), &v| {
            if v < 0.0 {
                (neg - v, pos)
            } else {
                (neg, pos + v)
            }
        });

    if negative + positive == 0.0 {
        return Err(StatsError::ZeroMass);
    }
    Ok(100.0 * negative / (negative + positive))
}

/// Share of explicit outcomes, in percent, that fall in `(domain.0, domain.1]`.
pub fn percentage_displayed<'a>(values: impl Into<Samples<'a>>, domain: (f64, f64)) -> Result<f64> {
    let samples = values.into();
    let sorted = samples.sorted();
    if sorted.values.is_empty() {
        return Err(StatsError::EmptySample);
    }
    let above_low = sorted.values.partition_point(|&v| v <= domain.0);
    let above_high = sorted.values.partition_point(|&v| v <= domain.1);
    Ok(above_high.saturating_sub(above_low) as f64 * 100.0 / sorted.values.len() as f64)
}
