//! profitstat - Profitability analytics for a small shop's sales ledger
//!
//! This library provides:
//! - Period summaries: revenue, cost of goods sold, overhead, net profit and margin
//! - Hour-of-day and day-of-week breakdowns with best and worst buckets
//! - Daily net-profit trends
//! - A shared, time-bounded average unit cost cache
//!
//! Records come from any [`RecordStore`]; the CLI loads them from a JSON
//! ledger file into a [`MemoryStore`].
//!
//! # Examples
//!
//! ```no_run
//! use profitstat::analytics::ProfitAnalytics;
//! use profitstat_core::ranges::Period;
//! use profitstat_core::timezone::TimezoneConfig;
//! use profitstat_ledger::JsonLedger;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> profitstat::Result<()> {
//!     let store = Arc::new(JsonLedger::discover()?.load().await?);
//!     let tz = TimezoneConfig::default();
//!     let analytics = ProfitAnalytics::new(store, tz.clone());
//!
//!     let week = Period::Week.range(tz.today(), &tz);
//!     let summary = analytics.period_summary(&week.start, &week.end).await?;
//!     println!("Net profit this week: {:.2}", summary.net_profit);
//!
//!     let best_worst = analytics.best_worst_day(&week.start, &week.end).await?;
//!     println!("Best day: {}", best_worst.best_label);
//!     Ok(())
//! }
//! ```

pub mod analytics;
pub mod buckets;
pub mod cli;
pub mod summary;
pub mod trend;

#[cfg(test)]
mod test_utils;

// Re-export commonly used types
pub use profitstat_core::aggregation_types::{
    BestWorst, BucketStat, ItemSummary, PeriodSummary, TrendPoint,
};
pub use profitstat_core::{
    DailyDate, ISOTimestamp, ItemId, MemoryStore, ProfitstatError, RecordId, RecordStore, Result,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
