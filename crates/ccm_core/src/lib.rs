//! Sparse-sample statistics and risk-weighted valuation
//!
//! This crate turns the Monte Carlo outcome arrays of a cost-effectiveness
//! model into the numbers a report shows:
//! - Order statistics over [`SparseSample`](model::SparseSample)s, which keep
//!   outcomes known to be exactly zero as a bare count
//! - Trimmed expected values (EV, EV99, EV99.9)
//! - Risk-averse valuations: risk-weighted expected utility and weighted
//!   linear utility at three calibrated aversion levels
//! - Histogram support: near-zero filtering, display domains, value mass
//!   shares, bins with folded zeros and percentile highlighting
//! - Moment fitting for the parametric distributions fed to the simulator
//!
//! All computation is pure. Sparse samples never have their zeros
//! materialized, and every aggregator agrees with its result on the
//! materialized dense array.
//!
//! ```ignore
//! use ccm_core::model::SparseSample;
//! use ccm_core::valuation::{RiskAversion, expected_value_99, risk_weighted_utility};
//!
//! let sample = SparseSample::from_unsorted(vec![120.0, -3.0, 45.0, 8000.0], 9_996);
//! let ev99 = expected_value_99(&sample)?;
//! let reu = risk_weighted_utility(&sample, RiskAversion::Medium)?;
//! ```

#![warn(clippy::all)]

// ============================================================================
// Core modules
// ============================================================================

pub mod dispersion;
pub mod error;
pub mod histogram;
pub mod percentiles;
pub mod valuation;

// ============================================================================
// Type definition modules
// ============================================================================

pub mod model;

// ============================================================================
// Test modules
// ============================================================================

#[cfg(test)]
mod tests;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

pub use error::{Result, StatsError};
pub use model::{Samples, SparseSample};
pub use valuation::{RiskAversion, RiskWeighter, ValuationMetric};
