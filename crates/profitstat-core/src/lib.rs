//! Core types, traits, and utilities for profitstat
//!
//! This crate provides the record types (sales, purchase batches, overhead
//! expenses), the derived summary types, the `RecordStore` trait every
//! storage backend implements, and the time zone and date range helpers
//! used to build query bounds.

pub mod aggregation_types;
pub mod error;
pub mod ranges;
pub mod store;
pub mod timezone;
pub mod types;

#[cfg(test)]
pub mod test_utils;

// Re-export commonly used types
pub use error::{ProfitstatError, Result};
pub use store::{MemoryStore, RecordStore};
pub use types::{DailyDate, ISOTimestamp, ItemId, RecordId};
