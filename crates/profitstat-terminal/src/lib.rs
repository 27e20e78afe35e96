//! Terminal output for profitstat
//!
//! Table and JSON renderings of summaries, bucket statistics, and trends.

pub mod output;

pub use output::{JsonFormatter, OutputFormatter, TableFormatter, get_formatter};
