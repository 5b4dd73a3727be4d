use std::borrow::Cow;

use super::sparse::SparseSample;
use crate::error::{Result, StatsError};

/// Borrowed view over either representation accepted by the aggregators.
///
/// Dense slices are plain outcome arrays in any order. Sparse samples carry
/// their implicit zero count.
#[derive(Debug, Clone, Copy)]
pub enum Samples<'a> {
    Dense(&'a [f64]),
    Sparse(&'a SparseSample),
}

impl<'a> Samples<'a> {
    /// Logical number of outcomes
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Samples::Dense(values) => values.len(),
            Samples::Sparse(sample) => sample.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn num_zeros(&self) -> usize {
        match self {
            Samples::Dense(_) => 0,
            Samples::Sparse(sample) => sample.num_zeros,
        }
    }

    /// Explicitly stored outcomes in their stored order
    #[must_use]
    pub fn explicit(&self) -> &'a [f64] {
        match self {
            Samples::Dense(values) => values,
            Samples::Sparse(sample) => &sample.samples,
        }
    }

    /// Mean over the logical population
    pub fn mean(&self) -> Result<f64> {
        if self.is_empty() {
            return Err(StatsError::EmptySample);
        }
        Ok(self.explicit().iter().sum::<f64>() / self.len() as f64)
    }

    /// Logical outcome at `len / 2` of the sorted sequence
    pub fn median(&self) -> Result<f64> {
        let sorted = self.non_empty_sorted()?;
        Ok(sorted.value_at(sorted.zero_index(), sorted.len() / 2))
    }

    /// Linearly interpolated quantile over the logical sequence
    pub fn quantile(&self, p: f64) -> Result<f64> {
        if !(0.0..=1.0).contains(&p) {
            return Err(StatsError::InvalidArgument("quantile must be within [0, 1]"));
        }
        Ok(self.non_empty_sorted()?.quantile(p))
    }

    pub fn min(&self) -> Result<f64> {
        let sorted = self.non_empty_sorted()?;
        Ok(sorted.value_at(sorted.zero_index(), 0))
    }

    pub fn max(&self) -> Result<f64> {
        let sorted = self.non_empty_sorted()?;
        Ok(sorted.value_at(sorted.zero_index(), sorted.len() - 1))
    }

    pub(crate) fn non_empty_sorted(&self) -> Result<SortedSamples<'a>> {
        if self.is_empty() {
            return Err(StatsError::EmptySample);
        }
        Ok(self.sorted())
    }

    /// Sorted explicit outcomes, copying only when the input is out of order.
    pub(crate) fn sorted(&self) -> SortedSamples<'a> {
        let values = self.explicit();
        let values = if values.windows(2).all(|w| !(w[0] > w[1])) {
            Cow::Borrowed(values)
        } else {
            if let Samples::Sparse(_) = self {
                tracing::debug!(len = values.len(), "sparse samples out of order; sorting a copy");
            }
            let mut owned = values.to_vec();
            owned.sort_unstable_by(f64::total_cmp);
            Cow::Owned(owned)
        };
        SortedSamples {
            values,
            num_zeros: self.num_zeros(),
        }
    }
}

impl<'a> From<&'a [f64]> for Samples<'a> {
    fn from(values: &'a [f64]) -> Self {
        Samples::Dense(values)
    }
}

impl<'a, const N: usize> From<&'a [f64; N]> for Samples<'a> {
    fn from(values: &'a [f64; N]) -> Self {
        Samples::Dense(values)
    }
}

impl<'a> From<&'a Vec<f64>> for Samples<'a> {
    fn from(values: &'a Vec<f64>) -> Self {
        Samples::Dense(values)
    }
}

impl<'a> From<&'a SparseSample> for Samples<'a> {
    fn from(sample: &'a SparseSample) -> Self {
        Samples::Sparse(sample)
    }
}

/// Sorted explicit outcomes plus the implicit zero count.
#[derive(Debug, Clone)]
pub(crate) struct SortedSamples<'a> {
    pub values: Cow<'a, [f64]>,
    pub num_zeros: usize,
}

impl SortedSamples<'_> {
    pub fn len(&self) -> usize {
        self.values.len() + self.num_zeros
    }

    pub fn zero_index(&self) -> usize {
        self.values.partition_point(|&v| v < 0.0)
    }

    /// Value at logical position `idx`; callers keep `idx < len()`.
    pub fn value_at(&self, zero_index: usize, idx: usize) -> f64 {
        if idx < zero_index {
            self.values[idx]
        } else if idx < zero_index + self.num_zeros {
            0.0
        } else {
            self.values[idx - self.num_zeros]
        }
    }

    /// Quantile at rank `(len - 1) * p`; callers keep `len() > 0`.
    pub fn quantile(&self, p: f64) -> f64 {
        let last = self.len() - 1;
        let rank = last as f64 * p;
        let lo = (rank.floor() as usize).min(last);
        let hi = (lo + 1).min(last);
        let zero_index = self.zero_index();
        let v0 = self.value_at(zero_index, lo);
        let v1 = self.value_at(zero_index, hi);
        v0 + (v1 - v0) * (rank - lo as f64)
    }
}
