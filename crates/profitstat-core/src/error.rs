//! Error types for profitstat
//!
//! This module defines the error types used throughout the profitstat crates.
//! All errors are derived from `thiserror` for convenient error handling
//! and automatic `From` implementations.
//!
//! The analytics layer adds no error semantics of its own: whatever a
//! [`RecordStore`](crate::store::RecordStore) returns is handed back to the
//! caller untouched. Degenerate data (no purchases, zero quantity, no sales)
//! is never an error.
//!
//! # Example
//!
//! ```
//! use profitstat_core::error::{ProfitstatError, Result};
//!
//! fn example_function() -> Result<()> {
//!     // This will automatically convert io::Error to ProfitstatError
//!     let _file = std::fs::read_to_string("nonexistent.json")?;
//!     Ok(())
//! }
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for profitstat operations
#[derive(Error, Debug)]
pub enum ProfitstatError {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Record store read failure reported by a storage backend
    #[error("Record store error: {0}")]
    Store(String),

    /// A record violates its construction rules (non-positive quantity, negative amount, ...)
    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    /// Ledger file could not be parsed
    #[error("Ledger error in {file}: {error}")]
    Ledger {
        /// The ledger file that caused the error
        file: PathBuf,
        /// The error message
        error: String,
    },

    /// Invalid date or timestamp format
    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    /// Invalid timezone
    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Convenience type alias for Results in profitstat
///
/// # Example
///
/// ```
/// use profitstat_core::Result;
///
/// fn process_data() -> Result<f64> {
///     Ok(42.0)
/// }
/// ```
pub type Result<T> = std::result::Result<T, ProfitstatError>;
