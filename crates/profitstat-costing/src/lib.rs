//! Cost-basis estimation for profitstat
//!
//! This crate turns an item's purchase history into an average unit cost
//! and keeps recently computed values in a time-bounded cache.

pub mod cost_estimator;

pub use cost_estimator::{CostEstimator, DEFAULT_COST_CACHE_TTL};
