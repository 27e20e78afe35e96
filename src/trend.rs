//! Daily net-profit trend
//!
//! One point per local calendar day, oldest first, ending on the anchor day.
//! Each day is an independent period summary over that day's bounds; days are
//! evaluated concurrently and reassembled in order.

use crate::summary::SummaryAggregator;
use chrono::NaiveDate;
use futures::future::try_join_all;
use profitstat_core::aggregation_types::TrendPoint;
use profitstat_core::error::Result;
use profitstat_core::ranges::{DateRange, days_back};
use profitstat_core::timezone::TimezoneConfig;
use profitstat_core::types::DailyDate;
use std::sync::Arc;
use tracing::debug;

/// Samples net profit day by day
pub struct TrendSampler {
    aggregator: Arc<SummaryAggregator>,
    timezone_config: TimezoneConfig,
}

impl TrendSampler {
    pub fn new(aggregator: Arc<SummaryAggregator>, timezone_config: TimezoneConfig) -> Self {
        Self {
            aggregator,
            timezone_config,
        }
    }

    /// The last `days` days ending today in the configured time zone
    pub async fn daily_net_profit_trend(&self, days: u32) -> Result<Vec<TrendPoint>> {
        self.daily_net_profit_trend_ending(days, self.timezone_config.today())
            .await
    }

    /// The `days` days ending on `today`; zero days gives an empty series
    ///
    /// Fails without reading the store when the first day would fall before
    /// the earliest representable date.
    pub async fn daily_net_profit_trend_ending(
        &self,
        days: u32,
        today: NaiveDate,
    ) -> Result<Vec<TrendPoint>> {
        debug!("Sampling {} day trend ending {}", days, today);

        if let Some(span) = days.checked_sub(1) {
            days_back(today, span)?;
        }
        let dates = (0..days)
            .rev()
            .map(|offset| days_back(today, offset))
            .collect::<Result<Vec<NaiveDate>>>()?;

        let aggregator = &self.aggregator;
        let timezone_config = &self.timezone_config;
        let summaries = try_join_all(dates.iter().map(|&date| async move {
            let range = DateRange::day(date, timezone_config);
            aggregator
                .period_summary(&range.start, &range.end, None)
                .await
        }))
        .await?;

        Ok(dates
            .into_iter()
            .zip(summaries)
            .map(|(date, summary)| {
                let day = DailyDate::new(date);
                TrendPoint {
                    label: day.short_label(),
                    day,
                    net_profit: summary.net_profit,
                }
            })
            .collect())
    }
}
