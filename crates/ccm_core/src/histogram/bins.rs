//! Histogram binning with optional folding of implicit zeros

use serde::{Deserialize, Serialize};

use crate::error::{Result, StatsError};

use super::color::{BinColor, ColorScale};
use super::scaling::{sym_log, sym_pow};

/// Spacing of bin edges across the display domain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinScale {
    #[default]
    Linear,
    /// Edges evenly spaced in [`sym_log`] space
    SymLog,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistogramOptions {
    /// Odd counts keep a bin centred on zero for a symmetric domain. With an
    /// even count an edge lands on zero, and folded zeros get an inserted bin
    /// that overlaps both of its neighbours.
    pub bin_count: usize,
    pub scale: BinScale,
}

impl Default for HistogramOptions {
    fn default() -> Self {
        Self {
            bin_count: 99,
            scale: BinScale::Linear,
        }
    }
}

/// Implicit zeros to fold into the bins of a histogram of explicit outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZeroFold {
    pub num_zeros: usize,
    pub dense_len: usize,
}

impl ZeroFold {
    fn total(self) -> usize {
        self.num_zeros + self.dense_len
    }

    /// Explicit share of the population
    fn dense_ratio(self) -> f64 {
        self.dense_len as f64 / self.total() as f64
    }

    /// Zeros rescaled to the same population as the explicit outcomes
    fn scaled_zeros(self) -> usize {
        self.num_zeros * self.dense_len / self.total()
    }
}

/// One histogram bin over `[x0, x1)`, the last bin closed on the right.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bin {
    pub x0: f64,
    pub x1: f64,
    pub count: usize,
    /// Smallest member, `None` for an empty bin
    pub first: Option<f64>,
    /// Largest member, `None` for an empty bin
    pub last: Option<f64>,
}

impl Bin {
    fn empty(x0: f64, x1: f64) -> Self {
        Self {
            x0,
            x1,
            count: 0,
            first: None,
            last: None,
        }
    }

    fn push(&mut self, value: f64) {
        self.count += 1;
        self.first = Some(self.first.map_or(value, |f| f.min(value)));
        self.last = Some(self.last.map_or(value, |l| l.max(value)));
    }

    fn straddles_zero(&self) -> bool {
        self.x0 < 0.0 && self.x1 > 0.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    pub domain: (f64, f64),
    pub scale: BinScale,
    pub bins: Vec<Bin>,
}

impl Histogram {
    /// Bin the outcomes of `data` that fall inside `domain`.
    ///
    /// With `zeros`, the bin straddling zero keeps its count scaled by the
    /// explicit share of the population and gains
    /// `floor(num_zeros * dense_len / total)` zeros, so zeros and explicit
    /// outcomes are drawn at the same scale. When no bin straddles zero a
    /// new bin centred on zero holds them.
    pub fn build(
        data: &[f64],
        domain: (f64, f64),
        options: &HistogramOptions,
        zeros: Option<ZeroFold>,
    ) -> Result<Self> {
        if options.bin_count == 0 {
            return Err(StatsError::InvalidArgument("bin count must be positive"));
        }
        if !(domain.0 <= domain.1) {
            return Err(StatsError::InvalidArgument("domain must be ordered"));
        }

        let edges = bin_edges(domain, options);
        let mut bins: Vec<Bin> = edges.windows(2).map(|w| Bin::empty(w[0], w[1])).collect();
        let last = bins.len() - 1;
        for &value in data.iter().filter(|&&v| v >= domain.0 && v <= domain.1) {
            // partition_point over interior edges yields the bin index
            let idx = edges[1..edges.len() - 1].partition_point(|&edge| edge <= value);
            bins[idx.min(last)].push(value);
        }

        let mut histogram = Self {
            domain,
            scale: options.scale,
            bins,
        };
        if let Some(fold) = zeros.filter(|fold| fold.num_zeros > 0) {
            histogram.fold_zeros(fold);
        }
        Ok(histogram)
    }

    fn fold_zeros(&mut self, fold: ZeroFold) {
        let ratio = fold.dense_ratio();
        let scaled_zeros = fold.scaled_zeros();

        let mut found = false;
        for bin in self.bins.iter_mut().filter(|bin| bin.straddles_zero()) {
            found = true;
            let kept = (bin.count as f64 * ratio).round() as usize;
            bin.count = kept + scaled_zeros;
            if scaled_zeros > 0 {
                bin.last = Some(0.0);
                if kept == 0 {
                    bin.first = Some(0.0);
                }
            }
        }

        if !found {
            let width = self.bins[0].x1 - self.bins[0].x0;
            let mut zero_bin = Bin::empty(-width / 2.0, width / 2.0);
            for _ in 0..scaled_zeros {
                zero_bin.push(0.0);
            }
            let at = self.bins.partition_point(|bin| bin.x0 < zero_bin.x0);
            tracing::debug!(width, scaled_zeros, "no bin straddles zero; inserting one");
            self.bins.insert(at, zero_bin);
        }
    }

    /// Total members across bins
    #[must_use]
    pub fn total_count(&self) -> usize {
        self.bins.iter().map(|bin| bin.count).sum()
    }

    /// Highlight colour of each bin under `scale`
    #[must_use]
    pub fn colors(&self, scale: &ColorScale<'_>) -> Vec<BinColor> {
        self.bins
            .iter()
            .map(|bin| match (bin.first, bin.last) {
                (Some(first), Some(last)) => scale.classify(first, last),
                _ => BinColor::Plain,
            })
            .collect()
    }
}

/// `bin_count + 1` ascending edges spanning `domain`.
fn bin_edges(domain: (f64, f64), options: &HistogramOptions) -> Vec<f64> {
    let n = options.bin_count;
    let (lo, hi) = match options.scale {
        BinScale::Linear => domain,
        BinScale::SymLog => (sym_log(domain.0), sym_log(domain.1)),
    };
    let step = (hi - lo) / n as f64;
    let to_axis = |x: f64| match options.scale {
        BinScale::Linear => x,
        BinScale::SymLog => sym_pow(x),
    };

    let mut edges: Vec<f64> = (0..=n).map(|i| to_axis(lo + i as f64 * step)).collect();
    edges[0] = domain.0;
    edges[n] = domain.1;
    edges
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::histogram::HighlightBounds;

    fn options(bin_count: usize, scale: BinScale) -> HistogramOptions {
        HistogramOptions { bin_count, scale }
    }

    #[test]
    fn test_linear_bins() {
        let data = [0.0, 0.5, 1.0, 2.5, 9.99, 10.0, 11.0];
        let hist = Histogram::build(&data, (0.0, 10.0), &options(10, BinScale::Linear), None).unwrap();

        assert_eq!(hist.bins.len(), 10);
        assert_eq!(hist.bins[0].count, 2);
        assert_eq!(hist.bins[1].count, 1);
        assert_eq!(hist.bins[2].count, 1);
        // right edge is inclusive, 11 is outside the domain
        assert_eq!(hist.bins[9].count, 2);
        assert_eq!(hist.total_count(), 6);
        assert_eq!(hist.bins[9].first, Some(9.99));
        assert_eq!(hist.bins[9].last, Some(10.0));
    }

    #[test]
    fn test_symlog_edges_are_monotone_and_span_domain() {
        let edges = bin_edges((-1000.0, 1e6), &options(20, BinScale::SymLog));
        assert_eq!(edges.len(), 21);
        assert_eq!(edges[0], -1000.0);
        assert_eq!(edges[20], 1e6);
        assert!(edges.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_zero_fold_into_straddling_bin() {
        let data = [-1.5, -0.2, 0.3, 1.2, 1.4, 1.6, 1.8];
        let fold = ZeroFold {
            num_zeros: 7,
            dense_len: 7,
        };
        let hist =
            Histogram::build(&data, (-2.0, 2.0), &options(3, BinScale::Linear), Some(fold)).unwrap();

        // middle bin [-2/3, 2/3) held two values; halved, plus 3 scaled zeros
        let middle = hist.bins[1];
        assert!(middle.straddles_zero());
        assert_eq!(middle.count, 1 + 3);
        assert_eq!(middle.last, Some(0.0));
        assert_eq!(hist.bins[2].count, 4);
    }

    #[test]
    fn test_zero_fold_inserts_centred_bin() {
        let data = [1.0, 2.0, 3.0, 4.0];
        let fold = ZeroFold {
            num_zeros: 4,
            dense_len: 4,
        };
        let hist =
            Histogram::build(&data, (1.0, 4.0), &options(3, BinScale::Linear), Some(fold)).unwrap();

        assert_eq!(hist.bins.len(), 4);
        let zero_bin = hist.bins[0];
        assert_eq!((zero_bin.x0, zero_bin.x1), (-0.5, 0.5));
        assert_eq!(zero_bin.count, 2);
    }

    #[test]
    fn test_default_bins_straddle_zero_on_symmetric_domain() {
        let data = [-3.0, -1.0, 1.0, 3.0];
        let fold = ZeroFold {
            num_zeros: 4,
            dense_len: 4,
        };
        let hist =
            Histogram::build(&data, (-4.0, 4.0), &HistogramOptions::default(), Some(fold)).unwrap();

        assert_eq!(hist.bins.len(), 99);
        let straddling: Vec<&Bin> = hist.bins.iter().filter(|bin| bin.straddles_zero()).collect();
        assert_eq!(straddling.len(), 1);
        assert_eq!(straddling[0].count, 2);
        assert!(hist.bins.windows(2).all(|w| w[0].x1 <= w[1].x0));
    }

    #[test]
    fn test_colors_follow_bin_members() {
        let data: Vec<f64> = (0..100).map(f64::from).collect();
        let hist = Histogram::build(&data, (0.0, 99.0), &options(10, BinScale::Linear), None).unwrap();
        let scale = ColorScale::new(&data, HighlightBounds::tails(0.1));
        let colors = hist.colors(&scale);
        assert_eq!(colors[0], BinColor::Highlight);
        assert_eq!(colors[5], BinColor::Plain);
        assert_eq!(colors[9], BinColor::Highlight);
    }

    #[test]
    fn test_invalid_options() {
        assert!(Histogram::build(&[1.0], (0.0, 1.0), &options(0, BinScale::Linear), None).is_err());
        assert!(Histogram::build(&[1.0], (1.0, 0.0), &options(5, BinScale::Linear), None).is_err());
    }
}
