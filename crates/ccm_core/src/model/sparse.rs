//! The sparse sample representation of a simulation result set
//!
//! Simulation runs that are known in advance to produce exactly zero are not
//! stored individually; only their count is kept in `num_zeros`. The implicit
//! zeros sit at the point in sort order where `0.0` belongs, between the last
//! negative and the first non-negative entry of `samples`.

use serde::{Deserialize, Serialize};

use super::samples::Samples;
use crate::error::{Result, StatsError};

/// A sorted set of simulation outcomes plus a count of implicit zeros.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SparseSample {
    /// Every explicitly computed outcome, sorted ascending. May contain zeros.
    pub samples: Vec<f64>,
    /// Outcomes known to be exactly zero that were never materialized.
    #[serde(default)]
    pub num_zeros: usize,
}

/// Sign of a single outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sign {
    Negative,
    Zero,
    Positive,
}

impl Sign {
    #[must_use]
    pub fn of(value: f64) -> Self {
        if value > 0.0 {
            Sign::Positive
        } else if value < 0.0 {
            Sign::Negative
        } else {
            Sign::Zero
        }
    }
}

/// Signs of the first and last outcome in one slice of the sorted population
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignBin {
    pub first: Sign,
    pub last: Sign,
}

/// How many outcomes had any effect at all
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Significance {
    /// Outcomes that are not exactly zero
    pub num_significant: usize,
    /// `num_significant` over the logical length
    pub fraction_significant: f64,
    /// Mean over the non-zero outcomes only, `None` when there are none
    pub mean_significant: Option<f64>,
}

impl SparseSample {
    /// Build a sample from outcomes that are already sorted ascending.
    #[must_use]
    pub fn new(samples: Vec<f64>, num_zeros: usize) -> Self {
        Self { samples, num_zeros }
    }

    /// Build a sample from outcomes in arbitrary order.
    #[must_use]
    pub fn from_unsorted(samples: Vec<f64>, num_zeros: usize) -> Self {
        let mut sample = Self { samples, num_zeros };
        sample.sort();
        sample
    }

    /// A fully materialized sample with no implicit zeros.
    #[must_use]
    pub fn dense(values: Vec<f64>) -> Self {
        Self::from_unsorted(values, 0)
    }

    /// Build the "value per unit cost" sample of a project assessment.
    ///
    /// `values` and `costs` must be aligned outcome by outcome, i.e. taken
    /// straight from the simulation response before any sorting. The implicit
    /// zeros stay zero under division and are carried over unchanged.
    pub fn value_per_cost(values: &[f64], costs: &[f64], num_zeros: usize) -> Result<Self> {
        if values.len() != costs.len() {
            return Err(StatsError::LengthMismatch {
                expected: values.len(),
                actual: costs.len(),
            });
        }
        let ratios = values.iter().zip(costs).map(|(v, c)| v / c).collect();
        Ok(Self::from_unsorted(ratios, num_zeros))
    }

    /// Re-establish ascending order after a mutation. Idempotent.
    pub fn sort(&mut self) {
        if !self.is_sorted() {
            self.samples.sort_unstable_by(f64::total_cmp);
        }
    }

    /// Logical number of outcomes, implicit zeros included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len() + self.num_zeros
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of explicitly stored outcomes
    #[must_use]
    pub fn dense_len(&self) -> usize {
        self.samples.len()
    }

    #[must_use]
    pub fn sum(&self) -> f64 {
        self.samples.iter().sum()
    }

    /// Mean over the logical population; implicit zeros count in the
    /// denominator only.
    pub fn mean(&self) -> Result<f64> {
        if self.is_empty() {
            return Err(StatsError::EmptySample);
        }
        Ok(self.sum() / self.len() as f64)
    }

    /// Position in `samples` of the first non-negative value, which is where
    /// the implicit zero block begins in logical order.
    #[must_use]
    pub fn zero_index(&self) -> usize {
        self.samples.partition_point(|&v| v < 0.0)
    }

    #[must_use]
    pub fn is_sorted(&self) -> bool {
        self.samples.windows(2).all(|w| !(w[0] > w[1]))
    }

    /// Fail with [`StatsError::UnsortedInput`] at the first descent.
    pub fn check_sorted(&self) -> Result<()> {
        match self.samples.windows(2).position(|w| w[0] > w[1]) {
            Some(i) => Err(StatsError::UnsortedInput { index: i + 1 }),
            None => Ok(()),
        }
    }

    /// Value at logical position `idx` given a precomputed zero index.
    ///
    /// Callers guarantee `idx < self.len()` and sorted samples.
    #[inline]
    pub(crate) fn value_at(&self, zero_index: usize, idx: usize) -> f64 {
        if idx < zero_index {
            self.samples[idx]
        } else if idx < zero_index + self.num_zeros {
            0.0
        } else {
            self.samples[idx - self.num_zeros]
        }
    }

    /// The outcome at 0-based logical position `idx` of the decompressed
    /// sorted sequence. The zero block is never materialized.
    pub fn nth(&self, idx: usize) -> Result<f64> {
        self.check_sorted()?;
        let len = self.len();
        if idx >= len {
            return Err(StatsError::IndexOutOfRange { index: idx, len });
        }
        Ok(self.value_at(self.zero_index(), idx))
    }

    /// `nth(len / 2)`
    pub fn median(&self) -> Result<f64> {
        if self.is_empty() {
            return Err(StatsError::EmptySample);
        }
        self.nth(self.len() / 2)
    }

    /// Linearly interpolated quantile at `p` (rank `(n - 1) * p`) over the
    /// logical sequence.
    pub fn quantile(&self, p: f64) -> Result<f64> {
        if !(0.0..=1.0).contains(&p) {
            return Err(StatsError::InvalidArgument("quantile must be within [0, 1]"));
        }
        if self.is_empty() {
            return Err(StatsError::EmptySample);
        }
        self.check_sorted()?;
        Ok(Samples::Sparse(self).sorted().quantile(p))
    }

    /// Central interval holding `percent`% of outcomes, as a pair of order
    /// statistics. For 90 this is `(nth(n / 20), nth(19n / 20))`.
    pub fn confidence_interval(&self, percent: u8) -> Result<(f64, f64)> {
        if percent == 0 || percent >= 100 {
            return Err(StatsError::InvalidArgument(
                "confidence percent must be within 1..=99",
            ));
        }
        if self.is_empty() {
            return Err(StatsError::EmptySample);
        }
        self.check_sorted()?;

        let n = self.len();
        let percent = usize::from(percent);
        let lower = n * (100 - percent) / 200;
        let upper = (n * (100 + percent) / 200).min(n - 1);
        let zero_index = self.zero_index();
        Ok((
            self.value_at(zero_index, lower),
            self.value_at(zero_index, upper),
        ))
    }

    /// Smallest logical outcome
    pub fn min(&self) -> Result<f64> {
        if self.is_empty() {
            return Err(StatsError::EmptySample);
        }
        self.nth(0)
    }

    /// Largest logical outcome
    pub fn max(&self) -> Result<f64> {
        if self.is_empty() {
            return Err(StatsError::EmptySample);
        }
        self.nth(self.len() - 1)
    }

    /// Expand the implicit zeros in place, producing the dense equivalent.
    #[must_use]
    pub fn materialize(&self) -> Vec<f64> {
        let zero_index = self.zero_index();
        let mut dense = Vec::with_capacity(self.len());
        dense.extend_from_slice(&self.samples[..zero_index]);
        dense.resize(zero_index + self.num_zeros, 0.0);
        dense.extend_from_slice(&self.samples[zero_index..]);
        dense
    }

    /// Count, share and mean of outcomes that are not exactly zero.
    pub fn significance(&self) -> Result<Significance> {
        if self.is_empty() {
            return Err(StatsError::EmptySample);
        }
        let (count, total) = self
            .samples
            .iter()
            .filter(|&&v| v != 0.0)
            .fold((0usize, 0.0), |(count, total), v| (count + 1, total + v));

        Ok(Significance {
            num_significant: count,
            fraction_significant: count as f64 / self.len() as f64,
            mean_significant: (count > 0).then(|| total / count as f64),
        })
    }

    /// Split the logical population into `num_bins` equal slices and record
    /// the sign of the first and last outcome of each.
    pub fn sign_bins(&self, num_bins: usize) -> Result<Vec<SignBin>> {
        if num_bins == 0 {
            return Err(StatsError::InvalidArgument("bin count must be positive"));
        }
        if self.is_empty() {
            return Err(StatsError::EmptySample);
        }
        self.check_sorted()?;

        let last = self.len() - 1;
        let per_bin = self.len() as f64 / num_bins as f64;
        let zero_index = self.zero_index();
        let at = |position: f64| {
            let idx = (position.floor() as usize).min(last);
            Sign::of(self.value_at(zero_index, idx))
        };

        Ok((0..num_bins)
            .map(|bin| SignBin {
                first: at(bin as f64 * per_bin),
                last: at((bin + 1) as f64 * per_bin),
            })
            .collect())
    }
}

impl From<Vec<f64>> for SparseSample {
    fn from(values: Vec<f64>) -> Self {
        Self::dense(values)
    }
}
