//! profitstat - Profitability reports from a shop's JSON ledger

use clap::Parser;
use profitstat::{
    ItemId, Result,
    analytics::ProfitAnalytics,
    buckets::{active_buckets, select_best_worst},
    cli::{Cli, Command},
};
use profitstat_core::timezone::TimezoneConfig;
use profitstat_costing::CostEstimator;
use profitstat_ledger::JsonLedger;
use profitstat_terminal::get_formatter;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // --verbose wins over RUST_LOG; otherwise RUST_LOG, defaulting to warnings only
    let filter = if cli.verbose {
        tracing_subscriber::EnvFilter::new("profitstat=info")
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let ledger = match &cli.data {
        Some(path) => JsonLedger::new(path.clone()),
        None => JsonLedger::discover()?,
    };
    info!("Reading ledger {}", ledger.path().display());
    let store = Arc::new(ledger.load().await?);

    let tz_config = TimezoneConfig::from_cli(cli.timezone.as_deref(), cli.utc)?;
    info!("Using timezone: {}", tz_config.display_name());

    let cost_estimator = Arc::new(
        CostEstimator::new(store.clone()).with_ttl(Duration::from_secs(cli.cost_cache_ttl)),
    );
    info!("Average cost cache TTL: {}s", cost_estimator.ttl().as_secs());
    let analytics = ProfitAnalytics::with_cost_estimator(store.clone(), cost_estimator, tz_config.clone());
    let formatter = get_formatter(cli.json);

    let today = tz_config.today();
    let range = cli.range.resolve(today, &tz_config)?;

    match cli.command.unwrap_or_default() {
        Command::Summary(args) => {
            info!("Running summary report for {}", range);
            let summary = match args.item {
                Some(item) => {
                    analytics
                        .period_summary_for_item(&range.start, &range.end, &ItemId::new(item))
                        .await?
                }
                None => analytics.period_summary(&range.start, &range.end).await?,
            };
            println!("{}", formatter.format_summary(&range, &summary));
        }

        Command::Hours => {
            info!("Running hour-of-day report for {}", range);
            let stats = analytics.hour_of_day_stats(&range.start, &range.end).await?;
            let best_worst = select_best_worst(&stats);
            println!("{}", formatter.format_hour_stats(&stats, &best_worst));
        }

        Command::Days => {
            info!("Running day-of-week report for {}", range);
            let stats = analytics.day_of_week_stats(&range.start, &range.end).await?;
            let best_worst = select_best_worst(&active_buckets(&stats));
            println!("{}", formatter.format_day_stats(&stats, &best_worst));
        }

        Command::Trend(args) => {
            info!("Running {} day trend ending {}", args.days, today);
            let points = analytics.daily_net_profit_trend_ending(args.days, today).await?;
            println!("{}", formatter.format_trend(&points));
        }

        Command::Cost(args) => {
            let item_id = ItemId::new(args.item_id);
            let cost = analytics.average_unit_cost(&item_id).await?;
            println!("{}", formatter.format_cost(&item_id, cost));
        }

        Command::Items => {
            info!("Running item report for {}", range);
            let items = store.items().await;
            let summaries = analytics
                .item_summaries(&range.start, &range.end, &items)
                .await?;
            println!("{}", formatter.format_item_summaries(&range, &summaries));
        }
    }

    Ok(())
}
