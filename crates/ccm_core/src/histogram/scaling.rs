//! Bi-symmetric log transform
//!
//! `sym_log(x)` behaves like `sign(x) * log10(|x|)` for large magnitudes and
//! passes smoothly through zero, so it can place negative, zero and positive
//! outcomes on one axis.

use std::f64::consts::LN_10;

use crate::error::{Result, StatsError};

#[must_use]
pub fn sym_log(x: f64) -> f64 {
    x.signum() * (1.0 + (x * LN_10).abs()).ln() / LN_10
}

/// Inverse of [`sym_log`]
#[must_use]
pub fn sym_pow(y: f64) -> f64 {
    y.signum() * (10f64.powf(y.abs()) - 1.0) / LN_10
}

/// Axis ticks evenly spaced in sym-log space, padded by one decade beyond
/// each end of `domain`.
pub fn sym_log_ticks(domain: (f64, f64), count: usize) -> Result<Vec<f64>> {
    if count < 2 {
        return Err(StatsError::InvalidArgument("tick count must be at least 2"));
    }
    let lo = sym_log(domain.0);
    let hi = sym_log(domain.1);
    let step = (hi - lo) / (count - 1) as f64;
    if !(step > 0.0) {
        return Err(StatsError::InvalidArgument("domain must have positive width"));
    }

    let start = lo - 1.0;
    let stop = hi + 1.0;
    let steps = ((stop - start) / step).ceil() as usize;
    Ok((0..steps)
        .map(|i| sym_pow(start + i as f64 * step))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sym_log_round_trips() {
        for x in [-1e6, -12.5, -0.3, 0.0, 0.3, 12.5, 1e6] {
            let back = sym_pow(sym_log(x));
            assert!((back - x).abs() <= 1e-9 * x.abs().max(1.0), "{x} -> {back}");
        }
    }

    #[test]
    fn test_sym_log_is_odd_and_monotone() {
        assert_eq!(sym_log(0.0), 0.0);
        assert!((sym_log(-50.0) + sym_log(50.0)).abs() < 1e-12);
        assert!(sym_log(10.0) < sym_log(100.0));
        assert!(sym_log(1e9) > 8.0 && sym_log(1e9) < 10.0);
    }

    #[test]
    fn test_ticks_cover_padded_domain() {
        let ticks = sym_log_ticks((-100.0, 1000.0), 7).unwrap();
        assert!(ticks.windows(2).all(|w| w[0] < w[1]));
        assert!(ticks[0] < -100.0);
        assert!(*ticks.last().unwrap() > 1000.0);
        assert!(sym_log_ticks((1.0, 1.0), 7).is_err());
        assert!(sym_log_ticks((0.0, 1.0), 1).is_err());
    }
}
