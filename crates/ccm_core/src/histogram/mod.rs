//! Histogram support statistics
//!
//! Everything a chart of a sample's outcomes needs besides the drawing:
//! near-zero filtering, the display domain, value mass shares, bins with
//! folded implicit zeros and percentile highlighting.

mod bins;
mod color;
mod domain;
mod scaling;
mod stats;

pub use bins::{Bin, BinScale, Histogram, HistogramOptions, ZeroFold};
pub use color::{BinColor, ColorScale, HighlightBounds, HighlightPreset};
pub use domain::{display_domain, should_offer_log_scale};
pub use scaling::{sym_log, sym_log_ticks, sym_pow};
pub use stats::{
    ValueMasses, expected_value_masses, filter_near_zeros, percentage_displayed,
    percentage_negative, should_hide_zeros,
};
