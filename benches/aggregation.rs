use chrono::{Duration, NaiveDate, TimeZone, Utc};
use criterion::{Criterion, criterion_group, criterion_main};
use profitstat::analytics::ProfitAnalytics;
use profitstat_core::{
    ranges::DateRange,
    store::MemoryStore,
    timezone::TimezoneConfig,
    types::{ISOTimestamp, ItemId, OverheadExpense, PaymentMethod, PurchaseBatch, Sale},
};
use std::hint::black_box;
use std::sync::Arc;

const ITEMS: [&str; 5] = ["tea", "coffee", "rice", "mango", "noodles"];

fn create_test_store(sale_count: usize) -> Arc<MemoryStore> {
    let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();

    let purchases = ITEMS
        .iter()
        .enumerate()
        .map(|(i, item)| {
            PurchaseBatch::new(
                ItemId::new(*item),
                100.0,
                (i as f64 + 1.0) * 250.0,
                ISOTimestamp::new(base),
            )
            .unwrap()
        })
        .collect();

    // Spread sales over 30 days and every hour of the day
    let sales = (0..sale_count)
        .map(|i| {
            let at = base + Duration::minutes((i as i64 * 37) % (30 * 24 * 60));
            Sale::new(
                ItemId::new(ITEMS[i % ITEMS.len()]),
                (i % 4 + 1) as f64,
                20.0 + (i % 7) as f64,
                ISOTimestamp::new(at),
                if i % 2 == 0 { PaymentMethod::Cash } else { PaymentMethod::PromptPay },
            )
            .unwrap()
        })
        .collect();

    let overheads = (0..30)
        .map(|day| {
            OverheadExpense::new(
                "rent",
                100.0,
                ISOTimestamp::new(base + Duration::days(day)),
            )
            .unwrap()
        })
        .collect();

    Arc::new(MemoryStore::from_records(Vec::new(), sales, purchases, overheads))
}

fn january() -> DateRange {
    let tz = TimezoneConfig::utc();
    DateRange::between_dates(
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
        &tz,
    )
    .unwrap()
}

fn benchmark_period_summary(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();

    let mut group = c.benchmark_group("period_summary");
    group.sample_size(10);

    let range = january();

    for count in [100, 1000, 10000] {
        let analytics = ProfitAnalytics::new(create_test_store(count), TimezoneConfig::utc());

        group.bench_function(format!("summary_{count}_sales"), |b| {
            b.iter(|| {
                runtime.block_on(async {
                    let _summary = analytics
                        .period_summary(black_box(&range.start), black_box(&range.end))
                        .await
                        .unwrap();
                });
            });
        });
    }

    let analytics = ProfitAnalytics::new(create_test_store(1000), TimezoneConfig::utc());
    let tea = ItemId::new("tea");
    group.bench_function("summary_for_item_1000_sales", |b| {
        b.iter(|| {
            runtime.block_on(async {
                let _summary = analytics
                    .period_summary_for_item(&range.start, &range.end, black_box(&tea))
                    .await
                    .unwrap();
            });
        });
    });

    group.finish();
}

fn benchmark_buckets(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();

    let mut group = c.benchmark_group("time_buckets");
    group.sample_size(10);

    let range = january();
    let analytics = ProfitAnalytics::new(
        create_test_store(1000),
        TimezoneConfig::new(chrono_tz::Asia::Bangkok),
    );

    group.bench_function("hour_of_day_1000_sales", |b| {
        b.iter(|| {
            runtime.block_on(async {
                let _stats = analytics
                    .hour_of_day_stats(&range.start, &range.end)
                    .await
                    .unwrap();
            });
        });
    });

    group.bench_function("day_of_week_1000_sales", |b| {
        b.iter(|| {
            runtime.block_on(async {
                let _stats = analytics
                    .day_of_week_stats(&range.start, &range.end)
                    .await
                    .unwrap();
            });
        });
    });

    group.finish();
}

fn benchmark_trend(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();

    let mut group = c.benchmark_group("trend");
    group.sample_size(10);

    let analytics = ProfitAnalytics::new(create_test_store(1000), TimezoneConfig::utc());
    let today = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();

    for days in [7, 30] {
        group.bench_function(format!("trend_{days}_days"), |b| {
            b.iter(|| {
                runtime.block_on(async {
                    let _points = analytics
                        .daily_net_profit_trend_ending(black_box(days), today)
                        .await
                        .unwrap();
                });
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_period_summary,
    benchmark_buckets,
    benchmark_trend
);
criterion_main!(benches);
