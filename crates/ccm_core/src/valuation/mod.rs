//! Valuation aggregators
//!
//! Every aggregator accepts a dense slice or a [`SparseSample`](crate::model::SparseSample)
//! through [`Samples`](crate::model::Samples) and gives the same answer for a
//! sparse sample and its materialized form.

mod aversion;
mod expected_value;
mod metrics;
mod reu;
mod risk_weighter;
mod wlu;

pub use aversion::RiskAversion;
pub use expected_value::{
    EV99_9_BOUNDS, EV99_BOUNDS, expected_value, expected_value_99, expected_value_99_9,
    expected_value_with_bounds,
};
pub use metrics::{
    AlternativeValuations, MetricValue, ValuationMetric, compute_metrics, evaluate_batch,
};
pub use reu::{risk_weighted_utility, risk_weighted_utility_with};
pub use risk_weighter::RiskWeighter;
pub use wlu::{WeightFunction, weighted_linear_utility, weighted_linear_utility_with};
