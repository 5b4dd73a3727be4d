//! Report host for Monte Carlo cost-effectiveness results
//!
//! Reads the sample records returned by the simulation service, runs them
//! through `ccm_core` and renders a text or JSON report:
//! - Summary statistics (size, mean, median, confidence interval, share of
//!   outcomes with any effect, the configured risk-weighted mean)
//! - The configured valuation metrics, evaluated across samples in parallel
//! - Histogram support data (display domain, value masses, coloured bins)

// ============================================================================
// Core modules
// ============================================================================

pub mod format;
pub mod logging;
pub mod report;

// ============================================================================
// Type definition modules
// ============================================================================

pub mod config;
pub mod input;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

pub use config::ReportConfig;
pub use input::{InputDocument, ProjectAssessment, SampleSet, load_input};
pub use logging::init_logging;
pub use report::{Report, SampleReport, build_report, render_json, render_text};
