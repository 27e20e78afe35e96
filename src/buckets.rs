//! Hour-of-day and day-of-week breakdowns
//!
//! Sales in a range are grouped by their local hour or local weekday, and each
//! group gets its own revenue, cost and profit figures. Overhead carries no
//! time signal of its own, so the range's total overhead is spread evenly
//! over the sales: every sale carries `total_overhead / sale_count`, and a
//! bucket's share is that amount times its number of sales.
//!
//! Hour buckets exist only for hours that had at least one sale. Day buckets
//! are always the full week, Sunday first, so charts get a stable axis.

use profitstat_core::aggregation_types::{
    BestWorst, BucketStat, WEEKDAY_NAMES, hour_bucket_label, net_margin_percent,
};
use profitstat_core::error::Result;
use profitstat_core::store::RecordStore;
use profitstat_core::timezone::TimezoneConfig;
use profitstat_core::types::{ISOTimestamp, Sale};
use profitstat_costing::CostEstimator;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

/// Running totals for one bucket
#[derive(Debug, Default, Clone, Copy)]
struct BucketAccumulator {
    revenue: f64,
    cogs: f64,
    sale_count: usize,
}

impl BucketAccumulator {
    fn add_sale(&mut self, sale: &Sale, cogs: f64) {
        self.revenue += sale.total_revenue;
        self.cogs += cogs;
        self.sale_count += 1;
    }

    fn into_bucket_stat(self, label: String, overhead_per_sale: f64) -> BucketStat {
        let gross_profit = self.revenue - self.cogs;
        let allocated_overhead = overhead_per_sale * self.sale_count as f64;
        let net_profit = gross_profit - allocated_overhead;
        BucketStat {
            label,
            total_revenue: self.revenue,
            total_cogs: self.cogs,
            gross_profit,
            allocated_overhead,
            net_profit,
            sale_count: self.sale_count,
            avg_net_margin_percent: net_margin_percent(net_profit, self.revenue),
        }
    }
}

/// Sales of a range together with the per-sale overhead share
struct BucketInput {
    sales: Vec<Sale>,
    overhead_per_sale: f64,
}

/// Groups a range's sales into time buckets
pub struct BucketAnalyzer {
    store: Arc<dyn RecordStore>,
    cost_estimator: Arc<CostEstimator>,
    timezone_config: TimezoneConfig,
}

impl BucketAnalyzer {
    pub fn new(
        store: Arc<dyn RecordStore>,
        cost_estimator: Arc<CostEstimator>,
        timezone_config: TimezoneConfig,
    ) -> Self {
        Self {
            store,
            cost_estimator,
            timezone_config,
        }
    }

    async fn load(&self, start: &ISOTimestamp, end: &ISOTimestamp) -> Result<BucketInput> {
        let sales = self.store.list_sales_in_range(start, end).await?;
        let overheads = self.store.list_overhead_in_range(start, end).await?;
        let total_overhead: f64 = overheads.iter().map(|o| o.amount).sum();

        let overhead_per_sale = if sales.is_empty() {
            0.0
        } else {
            total_overhead / sales.len() as f64
        };

        debug!(
            "Bucketing {} sales, overhead {:.2} ({:.4} per sale)",
            sales.len(),
            total_overhead,
            overhead_per_sale
        );

        Ok(BucketInput {
            sales,
            overhead_per_sale,
        })
    }

    /// Statistics per local hour, only for hours with sales, ascending
    pub async fn hour_of_day_stats(
        &self,
        start: &ISOTimestamp,
        end: &ISOTimestamp,
    ) -> Result<Vec<BucketStat>> {
        let input = self.load(start, end).await?;

        let mut hours: BTreeMap<u32, BucketAccumulator> = BTreeMap::new();
        for sale in &input.sales {
            let cogs = self.cost_estimator.cogs_for_sale(sale).await?;
            let hour = self.timezone_config.local_hour(&sale.sale_date_time);
            hours.entry(hour).or_default().add_sale(sale, cogs);
        }

        Ok(hours
            .into_iter()
            .map(|(hour, acc)| acc.into_bucket_stat(hour_bucket_label(hour), input.overhead_per_sale))
            .collect())
    }

    /// Statistics for all seven weekdays, Sunday through Saturday
    pub async fn day_of_week_stats(
        &self,
        start: &ISOTimestamp,
        end: &ISOTimestamp,
    ) -> Result<Vec<BucketStat>> {
        let input = self.load(start, end).await?;

        let mut days = [BucketAccumulator::default(); 7];
        for sale in &input.sales {
            let cogs = self.cost_estimator.cogs_for_sale(sale).await?;
            let weekday = self.timezone_config.weekday_index(&sale.sale_date_time);
            days[weekday].add_sale(sale, cogs);
        }

        Ok(days
            .into_iter()
            .zip(WEEKDAY_NAMES)
            .map(|(acc, name)| acc.into_bucket_stat(name.to_string(), input.overhead_per_sale))
            .collect())
    }

    /// Most and least profitable hour
    pub async fn best_worst_hour(
        &self,
        start: &ISOTimestamp,
        end: &ISOTimestamp,
    ) -> Result<BestWorst> {
        let stats = self.hour_of_day_stats(start, end).await?;
        Ok(select_best_worst(&stats))
    }

    /// Most and least profitable weekday, ignoring days without sales
    pub async fn best_worst_day(
        &self,
        start: &ISOTimestamp,
        end: &ISOTimestamp,
    ) -> Result<BestWorst> {
        let stats = self.day_of_week_stats(start, end).await?;
        Ok(select_best_worst(&active_buckets(&stats)))
    }
}

/// Buckets that had at least one sale
pub fn active_buckets(stats: &[BucketStat]) -> Vec<BucketStat> {
    stats.iter().filter(|s| s.sale_count > 0).cloned().collect()
}

/// Pick the highest and lowest net profit bucket
///
/// Ties go to the bucket that comes first. No buckets gives the empty
/// [`BestWorst`].
pub fn select_best_worst(stats: &[BucketStat]) -> BestWorst {
    let Some(first) = stats.first() else {
        return BestWorst::default();
    };

    let mut best = first;
    let mut worst = first;
    for stat in &stats[1..] {
        if stat.net_profit > best.net_profit {
            best = stat;
        }
        if stat.net_profit < worst.net_profit {
            worst = stat;
        }
    }

    BestWorst {
        best_label: best.label.clone(),
        best_net_profit: best.net_profit,
        worst_label: worst.label.clone(),
        worst_net_profit: worst.net_profit,
    }
}
