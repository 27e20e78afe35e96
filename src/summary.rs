//! Period summaries
//!
//! Turns the sales and overhead recorded in an inclusive range into a
//! [`PeriodSummary`]. Revenue comes straight from the sales, cost of goods
//! sold from the cost estimator, and overhead is always the whole range's
//! total even when the summary is restricted to one item.
//!
//! # Examples
//!
//! ```
//! use profitstat::summary::SummaryAggregator;
//! use profitstat_core::store::MemoryStore;
//! use profitstat_core::types::{ISOTimestamp, ItemId, PaymentMethod, PurchaseBatch, Sale};
//! use profitstat_costing::CostEstimator;
//! use std::sync::Arc;
//!
//! # tokio_test::block_on(async {
//! let store = Arc::new(MemoryStore::new());
//! let at = ISOTimestamp::parse("2024-01-15T10:00:00Z").unwrap();
//! let tea = ItemId::new("tea");
//! store.insert_purchase(PurchaseBatch::new(tea.clone(), 10.0, 150.0, at).unwrap()).await;
//! store.insert_sale(Sale::new(tea, 5.0, 20.0, at, PaymentMethod::Cash).unwrap()).await;
//!
//! let estimator = Arc::new(CostEstimator::new(store.clone()));
//! let aggregator = SummaryAggregator::new(store, estimator);
//!
//! let start = ISOTimestamp::parse("2024-01-15T00:00:00Z").unwrap();
//! let end = ISOTimestamp::parse("2024-01-15T23:59:59Z").unwrap();
//! let summary = aggregator.period_summary(&start, &end, None).await.unwrap();
//! assert_eq!(summary.total_revenue, 100.0);
//! assert_eq!(summary.total_cogs, 75.0);
//! assert_eq!(summary.gross_profit, 25.0);
//! # });
//! ```

use profitstat_core::aggregation_types::PeriodSummary;
use profitstat_core::error::Result;
use profitstat_core::store::RecordStore;
use profitstat_core::types::{ISOTimestamp, ItemId, OverheadExpense, Sale};
use profitstat_costing::CostEstimator;
use std::sync::Arc;
use tracing::debug;

/// Computes period summaries from the record store
pub struct SummaryAggregator {
    store: Arc<dyn RecordStore>,
    cost_estimator: Arc<CostEstimator>,
}

impl SummaryAggregator {
    pub fn new(store: Arc<dyn RecordStore>, cost_estimator: Arc<CostEstimator>) -> Self {
        Self {
            store,
            cost_estimator,
        }
    }

    /// Summary of `[start, end]`, optionally restricted to one item's sales
    ///
    /// The item filter only narrows the sales; overhead for the range is
    /// counted in full either way.
    pub async fn period_summary(
        &self,
        start: &ISOTimestamp,
        end: &ISOTimestamp,
        item_filter: Option<&ItemId>,
    ) -> Result<PeriodSummary> {
        let mut sales = self.store.list_sales_in_range(start, end).await?;
        if let Some(item_id) = item_filter {
            sales.retain(|s| &s.item_id == item_id);
        }
        let overheads = self.store.list_overhead_in_range(start, end).await?;

        debug!(
            "Summarizing {} sales and {} overhead expenses from {} to {}",
            sales.len(),
            overheads.len(),
            start,
            end
        );

        self.summarize_sales(&sales, &overheads).await
    }

    /// Derive a summary from records that were already fetched
    pub async fn summarize_sales(
        &self,
        sales: &[Sale],
        overheads: &[OverheadExpense],
    ) -> Result<PeriodSummary> {
        let mut revenue = 0.0;
        let mut cogs = 0.0;
        for sale in sales {
            revenue += sale.total_revenue;
            cogs += self.cost_estimator.cogs_for_sale(sale).await?;
        }
        let overhead: f64 = overheads.iter().map(|o| o.amount).sum();

        Ok(PeriodSummary::from_totals(revenue, cogs, overhead, sales.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{FailOn, FailingStore, is_store_error, overhead, purchase, sale, ts};
    use profitstat_core::store::MemoryStore;

    fn aggregator_over(store: Arc<dyn RecordStore>) -> SummaryAggregator {
        let estimator = Arc::new(CostEstimator::new(store.clone()));
        SummaryAggregator::new(store, estimator)
    }

    fn aggregator_with(store: MemoryStore) -> SummaryAggregator {
        aggregator_over(Arc::new(store))
    }

    #[tokio::test]
    async fn test_single_sale_summary() {
        let store = MemoryStore::new();
        store.insert_purchase(purchase("tea", 10.0, 100.0, "2024-01-01T08:00:00Z")).await;
        store.insert_purchase(purchase("tea", 10.0, 200.0, "2024-01-02T08:00:00Z")).await;
        store.insert_sale(sale("tea", 5.0, 20.0, "2024-01-15T10:00:00Z")).await;
        let aggregator = aggregator_with(store);

        let summary = aggregator
            .period_summary(&ts("2024-01-15T00:00:00Z"), &ts("2024-01-15T23:59:59.999Z"), None)
            .await
            .unwrap();

        assert_eq!(summary.total_revenue, 100.0);
        assert_eq!(summary.total_cogs, 75.0);
        assert_eq!(summary.gross_profit, 25.0);
        assert_eq!(summary.total_overhead, 0.0);
        assert_eq!(summary.net_profit, 25.0);
        assert_eq!(summary.net_margin_percent, Some(25.0));
        assert_eq!(summary.sale_count, 1);
    }

    #[tokio::test]
    async fn test_overhead_only_has_undefined_margin() {
        let store = MemoryStore::new();
        store.insert_overhead(overhead("rent", 50.0, "2024-01-15T09:00:00Z")).await;
        let aggregator = aggregator_with(store);

        let summary = aggregator
            .period_summary(&ts("2024-01-15T00:00:00Z"), &ts("2024-01-15T23:59:59.999Z"), None)
            .await
            .unwrap();

        assert_eq!(summary.total_revenue, 0.0);
        assert_eq!(summary.net_profit, -50.0);
        assert_eq!(summary.net_margin_percent, None);
    }

    #[tokio::test]
    async fn test_item_filter_keeps_full_overhead() {
        let store = MemoryStore::new();
        store.insert_purchase(purchase("tea", 1.0, 5.0, "2024-01-01T08:00:00Z")).await;
        store.insert_purchase(purchase("rice", 1.0, 10.0, "2024-01-01T08:00:00Z")).await;
        store.insert_sale(sale("tea", 2.0, 20.0, "2024-01-15T10:00:00Z")).await;
        store.insert_sale(sale("rice", 1.0, 40.0, "2024-01-15T11:00:00Z")).await;
        store.insert_overhead(overhead("gas", 12.0, "2024-01-15T07:00:00Z")).await;
        let aggregator = aggregator_with(store);

        let tea = ItemId::new("tea");
        let summary = aggregator
            .period_summary(
                &ts("2024-01-15T00:00:00Z"),
                &ts("2024-01-15T23:59:59.999Z"),
                Some(&tea),
            )
            .await
            .unwrap();

        assert_eq!(summary.sale_count, 1);
        assert_eq!(summary.total_revenue, 40.0);
        assert_eq!(summary.total_cogs, 10.0);
        assert_eq!(summary.total_overhead, 12.0);
        assert_eq!(summary.net_profit, 18.0);
    }

    #[tokio::test]
    async fn test_range_bounds_are_inclusive() {
        let store = MemoryStore::new();
        store.insert_sale(sale("tea", 1.0, 10.0, "2024-01-15T00:00:00Z")).await;
        store.insert_sale(sale("tea", 1.0, 10.0, "2024-01-15T23:59:59.999Z")).await;
        store.insert_sale(sale("tea", 1.0, 10.0, "2024-01-16T00:00:00Z")).await;
        let aggregator = aggregator_with(store);

        let summary = aggregator
            .period_summary(&ts("2024-01-15T00:00:00Z"), &ts("2024-01-15T23:59:59.999Z"), None)
            .await
            .unwrap();
        assert_eq!(summary.sale_count, 2);
        // No purchase history: cost basis is zero
        assert_eq!(summary.total_cogs, 0.0);
    }

    #[tokio::test]
    async fn test_empty_range() {
        let aggregator = aggregator_with(MemoryStore::new());
        let summary = aggregator
            .period_summary(&ts("2024-01-15T00:00:00Z"), &ts("2024-01-15T23:59:59.999Z"), None)
            .await
            .unwrap();
        assert_eq!(summary, PeriodSummary::from_totals(0.0, 0.0, 0.0, 0));
    }

    #[tokio::test]
    async fn test_store_read_failures_propagate() {
        for fail_on in [FailOn::Sales, FailOn::Overhead, FailOn::Purchases] {
            let store = MemoryStore::new();
            store.insert_sale(sale("tea", 1.0, 10.0, "2024-01-15T10:00:00Z")).await;
            let aggregator = aggregator_over(Arc::new(FailingStore::new(store, fail_on)));

            let err = aggregator
                .period_summary(&ts("2024-01-15T00:00:00Z"), &ts("2024-01-15T23:59:59.999Z"), None)
                .await
                .unwrap_err();
            assert!(is_store_error(&err), "{fail_on:?} gave {err}");
        }
    }
}
