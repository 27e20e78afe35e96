//! Profit analytics facade
//!
//! [`ProfitAnalytics`] wires one cost estimator into the summary aggregator,
//! the bucket analyzer and the trend sampler, so every report shares the same
//! cost cache. Callers that change purchase history must call
//! [`ProfitAnalytics::invalidate_cost_cache`] afterwards.
//!
//! # Examples
//!
//! ```
//! use profitstat::analytics::ProfitAnalytics;
//! use profitstat_core::store::MemoryStore;
//! use profitstat_core::timezone::TimezoneConfig;
//! use profitstat_core::types::{ISOTimestamp, ItemId, PaymentMethod, Sale};
//! use std::sync::Arc;
//!
//! # tokio_test::block_on(async {
//! let store = Arc::new(MemoryStore::new());
//! let at = ISOTimestamp::parse("2024-01-15T08:30:00Z").unwrap();
//! store
//!     .insert_sale(Sale::new(ItemId::new("tea"), 2.0, 25.0, at, PaymentMethod::PromptPay).unwrap())
//!     .await;
//!
//! let analytics = ProfitAnalytics::new(store, TimezoneConfig::utc());
//! let start = ISOTimestamp::parse("2024-01-15T00:00:00Z").unwrap();
//! let end = ISOTimestamp::parse("2024-01-15T23:59:59.999Z").unwrap();
//!
//! let hours = analytics.hour_of_day_stats(&start, &end).await.unwrap();
//! assert_eq!(hours[0].label, "08:00-09:00");
//! assert_eq!(hours[0].total_revenue, 50.0);
//! # });
//! ```

use crate::buckets::BucketAnalyzer;
use crate::summary::SummaryAggregator;
use crate::trend::TrendSampler;
use chrono::NaiveDate;
use profitstat_core::aggregation_types::{
    BestWorst, BucketStat, ItemSummary, PeriodSummary, TrendPoint,
};
use profitstat_core::error::Result;
use profitstat_core::store::RecordStore;
use profitstat_core::timezone::TimezoneConfig;
use profitstat_core::types::{ISOTimestamp, Item, ItemId};
use profitstat_costing::CostEstimator;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::debug;

/// Entry point for every profitability report
pub struct ProfitAnalytics {
    store: Arc<dyn RecordStore>,
    cost_estimator: Arc<CostEstimator>,
    summary: Arc<SummaryAggregator>,
    buckets: BucketAnalyzer,
    trend: TrendSampler,
}

impl ProfitAnalytics {
    /// Analytics over `store` with a cost estimator using the default TTL
    pub fn new(store: Arc<dyn RecordStore>, timezone_config: TimezoneConfig) -> Self {
        let cost_estimator = Arc::new(CostEstimator::new(store.clone()));
        Self::with_cost_estimator(store, cost_estimator, timezone_config)
    }

    /// Analytics sharing an existing cost estimator
    pub fn with_cost_estimator(
        store: Arc<dyn RecordStore>,
        cost_estimator: Arc<CostEstimator>,
        timezone_config: TimezoneConfig,
    ) -> Self {
        let summary = Arc::new(SummaryAggregator::new(store.clone(), cost_estimator.clone()));
        let buckets = BucketAnalyzer::new(
            store.clone(),
            cost_estimator.clone(),
            timezone_config.clone(),
        );
        let trend = TrendSampler::new(summary.clone(), timezone_config);

        Self {
            store,
            cost_estimator,
            summary,
            buckets,
            trend,
        }
    }

    /// Summary of all sales and overhead in `[start, end]`
    pub async fn period_summary(
        &self,
        start: &ISOTimestamp,
        end: &ISOTimestamp,
    ) -> Result<PeriodSummary> {
        self.summary.period_summary(start, end, None).await
    }

    /// Summary of one item's sales in `[start, end]`, against the full range's overhead
    pub async fn period_summary_for_item(
        &self,
        start: &ISOTimestamp,
        end: &ISOTimestamp,
        item_id: &ItemId,
    ) -> Result<PeriodSummary> {
        self.summary.period_summary(start, end, Some(item_id)).await
    }

    pub async fn hour_of_day_stats(
        &self,
        start: &ISOTimestamp,
        end: &ISOTimestamp,
    ) -> Result<Vec<BucketStat>> {
        self.buckets.hour_of_day_stats(start, end).await
    }

    pub async fn day_of_week_stats(
        &self,
        start: &ISOTimestamp,
        end: &ISOTimestamp,
    ) -> Result<Vec<BucketStat>> {
        self.buckets.day_of_week_stats(start, end).await
    }

    pub async fn best_worst_hour(
        &self,
        start: &ISOTimestamp,
        end: &ISOTimestamp,
    ) -> Result<BestWorst> {
        self.buckets.best_worst_hour(start, end).await
    }

    pub async fn best_worst_day(
        &self,
        start: &ISOTimestamp,
        end: &ISOTimestamp,
    ) -> Result<BestWorst> {
        self.buckets.best_worst_day(start, end).await
    }

    /// Net profit for each of the last `days` days, ending today
    pub async fn daily_net_profit_trend(&self, days: u32) -> Result<Vec<TrendPoint>> {
        self.trend.daily_net_profit_trend(days).await
    }

    /// Net profit for each of the `days` days ending on `today`
    pub async fn daily_net_profit_trend_ending(
        &self,
        days: u32,
        today: NaiveDate,
    ) -> Result<Vec<TrendPoint>> {
        self.trend.daily_net_profit_trend_ending(days, today).await
    }

    /// Current average unit cost of an item
    pub async fn average_unit_cost(&self, item_id: &ItemId) -> Result<f64> {
        self.cost_estimator.average_unit_cost(item_id).await
    }

    /// Drop cached costs for one item, or all items with `None`
    pub async fn invalidate_cost_cache(&self, item_id: Option<&ItemId>) {
        self.cost_estimator.invalidate(item_id).await;
    }

    /// Per-item summaries over `[start, end]`
    ///
    /// Every item in `items` gets a row, in order, followed by any item that
    /// sold in the range without being listed (named by its id). Each row is
    /// identical to [`ProfitAnalytics::period_summary_for_item`] for that item.
    pub async fn item_summaries(
        &self,
        start: &ISOTimestamp,
        end: &ISOTimestamp,
        items: &[Item],
    ) -> Result<Vec<ItemSummary>> {
        let sales = self.store.list_sales_in_range(start, end).await?;
        let overheads = self.store.list_overhead_in_range(start, end).await?;

        let listed: BTreeSet<&ItemId> = items.iter().map(|i| &i.id).collect();
        let unlisted: BTreeSet<&ItemId> = sales
            .iter()
            .map(|s| &s.item_id)
            .filter(|id| !listed.contains(id))
            .collect();

        let rows = items
            .iter()
            .map(|i| (i.id.clone(), i.name.clone()))
            .chain(unlisted.into_iter().map(|id| (id.clone(), id.to_string())));

        let mut summaries = Vec::new();
        for (item_id, name) in rows {
            let item_sales: Vec<_> = sales
                .iter()
                .filter(|s| s.item_id == item_id)
                .cloned()
                .collect();
            let summary = self.summary.summarize_sales(&item_sales, &overheads).await?;
            let average_unit_cost = self.cost_estimator.average_unit_cost(&item_id).await?;
            summaries.push(ItemSummary {
                item_id,
                name,
                average_unit_cost,
                summary,
            });
        }

        debug!("Built {} item summaries", summaries.len());
        Ok(summaries)
    }
}
