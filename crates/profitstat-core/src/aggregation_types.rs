//! Aggregation data types for profitstat
//!
//! Pure data structures produced by the analytics. Nothing here is ever
//! persisted; every value is recomputed on demand from the record store.

use crate::types::{DailyDate, ItemId};
use serde::{Deserialize, Serialize};

/// Weekday names in bucket order, Sunday first
pub const WEEKDAY_NAMES: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

/// Label for an hour-of-day bucket, e.g. `"08:00-09:00"`; hour 23 wraps to `"23:00-00:00"`
pub fn hour_bucket_label(hour: u32) -> String {
    let hour = hour % 24;
    format!("{:02}:00-{:02}:00", hour, (hour + 1) % 24)
}

/// Net margin as a percentage of revenue; `None` when there is no revenue
pub fn net_margin_percent(net_profit: f64, revenue: f64) -> Option<f64> {
    if revenue > 0.0 {
        Some(net_profit / revenue * 100.0)
    } else {
        None
    }
}

/// Financial summary of a date range
///
/// # Examples
/// ```
/// use profitstat_core::aggregation_types::PeriodSummary;
///
/// let summary = PeriodSummary::from_totals(100.0, 75.0, 5.0, 1);
/// assert_eq!(summary.gross_profit, 25.0);
/// assert_eq!(summary.net_profit, 20.0);
/// assert_eq!(summary.net_margin_percent, Some(20.0));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PeriodSummary {
    /// Sum of sale revenue
    pub total_revenue: f64,
    /// Estimated cost of goods sold
    pub total_cogs: f64,
    /// `total_revenue - total_cogs`
    pub gross_profit: f64,
    /// Overhead expenses recorded in the range
    pub total_overhead: f64,
    /// `gross_profit - total_overhead`
    pub net_profit: f64,
    /// Net profit over revenue in percent, `None` without revenue
    pub net_margin_percent: Option<f64>,
    /// Number of sales in scope
    pub sale_count: usize,
}

impl PeriodSummary {
    /// Derive a summary from its three base totals
    pub fn from_totals(revenue: f64, cogs: f64, overhead: f64, sale_count: usize) -> Self {
        let gross_profit = revenue - cogs;
        let net_profit = gross_profit - overhead;
        Self {
            total_revenue: revenue,
            total_cogs: cogs,
            gross_profit,
            total_overhead: overhead,
            net_profit,
            net_margin_percent: net_margin_percent(net_profit, revenue),
            sale_count,
        }
    }
}

/// Statistics for one hour-of-day or day-of-week bucket
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BucketStat {
    /// `"HH:00-HH:00"` for hours, weekday name for days
    pub label: String,
    pub total_revenue: f64,
    pub total_cogs: f64,
    pub gross_profit: f64,
    /// Share of period overhead attributed to this bucket (per-sale split)
    pub allocated_overhead: f64,
    pub net_profit: f64,
    pub sale_count: usize,
    /// Net profit over bucket revenue in percent, `None` without revenue
    pub avg_net_margin_percent: Option<f64>,
}

/// Best and worst bucket by net profit
///
/// The all-empty value (`BestWorst::default()`) is the explicit "no data"
/// state: empty labels and zero profits.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BestWorst {
    pub best_label: String,
    pub best_net_profit: f64,
    pub worst_label: String,
    pub worst_net_profit: f64,
}

impl BestWorst {
    /// Whether this is the "no data" sentinel
    pub fn is_empty(&self) -> bool {
        self.best_label.is_empty() && self.worst_label.is_empty()
    }
}

/// One point of the daily net-profit trend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    /// Calendar day of the point
    pub day: DailyDate,
    /// Short display label (`MM/DD`)
    pub label: String,
    pub net_profit: f64,
}

/// Summary of one item over a range, with its current cost basis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemSummary {
    pub item_id: ItemId,
    /// Display name, falling back to the id for unknown items
    pub name: String,
    pub average_unit_cost: f64,
    pub summary: PeriodSummary,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hour_bucket_label() {
        assert_eq!(hour_bucket_label(0), "00:00-01:00");
        assert_eq!(hour_bucket_label(8), "08:00-09:00");
        assert_eq!(hour_bucket_label(23), "23:00-00:00");
    }

    #[test]
    fn test_margin_undefined_without_revenue() {
        let summary = PeriodSummary::from_totals(0.0, 0.0, 50.0, 0);
        assert_eq!(summary.net_profit, -50.0);
        assert_eq!(summary.net_margin_percent, None);
    }

    #[test]
    fn test_negative_margin() {
        let summary = PeriodSummary::from_totals(100.0, 80.0, 40.0, 2);
        assert_eq!(summary.net_profit, -20.0);
        assert_eq!(summary.net_margin_percent, Some(-20.0));
    }

    #[test]
    fn test_best_worst_sentinel() {
        assert!(BestWorst::default().is_empty());
        let bw = BestWorst {
            best_label: "Monday".to_string(),
            best_net_profit: 30.0,
            worst_label: "Friday".to_string(),
            worst_net_profit: -10.0,
        };
        assert!(!bw.is_empty());
    }

    #[test]
    fn test_margin_serializes_as_null() {
        let summary = PeriodSummary::from_totals(0.0, 0.0, 0.0, 0);
        let value = serde_json::to_value(&summary).unwrap();
        assert!(value["net_margin_percent"].is_null());
    }
}
