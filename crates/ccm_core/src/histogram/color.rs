//! Percentile-band highlighting of histogram bins

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Two percentile bands, as fractions, whose bins are highlighted.
///
/// A bin is highlighted when the percentile rank of its midpoint lies in
/// `(bottom.0, bottom.1)` or in `(top.0, top.1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HighlightBounds {
    pub bottom: (f64, f64),
    pub top: (f64, f64),
}

impl HighlightBounds {
    /// Highlight the lowest and highest `fraction` of outcomes.
    #[must_use]
    pub fn tails(fraction: f64) -> Self {
        Self {
            bottom: (0.0, fraction),
            top: (1.0 - fraction, 1.0),
        }
    }
}

impl Default for HighlightBounds {
    fn default() -> Self {
        HighlightPreset::default().bounds()
    }
}

/// The highlight choices offered next to a histogram
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HighlightPreset {
    Quartiles,
    #[default]
    Deciles,
    TwoAndAHalfPercent,
    TenthPercent,
}

impl HighlightPreset {
    pub const ALL: [HighlightPreset; 4] = [
        HighlightPreset::Quartiles,
        HighlightPreset::Deciles,
        HighlightPreset::TwoAndAHalfPercent,
        HighlightPreset::TenthPercent,
    ];

    #[must_use]
    pub fn bounds(self) -> HighlightBounds {
        match self {
            HighlightPreset::Quartiles => HighlightBounds::tails(0.25),
            HighlightPreset::Deciles => HighlightBounds::tails(0.1),
            HighlightPreset::TwoAndAHalfPercent => HighlightBounds {
                bottom: (0.0, 0.025),
                top: (0.975, 1.0),
            },
            HighlightPreset::TenthPercent => HighlightBounds {
                bottom: (0.0, 0.001),
                top: (0.999, 1.0),
            },
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            HighlightPreset::Quartiles => "Top and bottom 25%",
            HighlightPreset::Deciles => "Top and bottom 10%",
            HighlightPreset::TwoAndAHalfPercent => "Top and bottom 2.5%",
            HighlightPreset::TenthPercent => "Top and bottom 0.1%",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BinColor {
    Highlight,
    Plain,
}

/// Classifies bins against the explicit outcomes of a sample.
#[derive(Debug, Clone)]
pub struct ColorScale<'a> {
    sorted: Cow<'a, [f64]>,
    bounds: HighlightBounds,
}

impl<'a> ColorScale<'a> {
    /// `values` are sorted into a copy when they are out of order.
    #[must_use]
    pub fn new(values: &'a [f64], bounds: HighlightBounds) -> Self {
        let sorted = if values.windows(2).all(|w| !(w[0] > w[1])) {
            Cow::Borrowed(values)
        } else {
            let mut owned = values.to_vec();
            owned.sort_unstable_by(f64::total_cmp);
            Cow::Owned(owned)
        };
        Self { sorted, bounds }
    }

    /// Percentile rank, as a fraction, of the midpoint of a bin whose first
    /// and last members are given.
    #[must_use]
    pub fn midpoint_rank(&self, first: f64, last: f64) -> f64 {
        let count_below = self.sorted.partition_point(|&v| v < first) as f64 - 1.0;
        let count_above = self.sorted.partition_point(|&v| v < last) as f64 + 1.0;
        (count_above + count_below) / 2.0 / self.sorted.len() as f64
    }

    #[must_use]
    pub fn classify(&self, first: f64, last: f64) -> BinColor {
        if self.sorted.is_empty() {
            return BinColor::Plain;
        }
        let rank = self.midpoint_rank(first, last);
        let HighlightBounds { bottom, top } = self.bounds;
        if (rank > bottom.0 && rank < bottom.1) || (rank > top.0 && rank <= top.1) {
            BinColor::Highlight
        } else {
            BinColor::Plain
        }
    }
}
