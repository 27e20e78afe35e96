//! CLI interface for profitstat
//!
//! `profitstat [flags] <report>`; with no report, the period summary is shown.
//!
//! # Example
//!
//! ```bash
//! # Today's profit and loss
//! profitstat summary
//!
//! # Best and worst hours of the current week, in Bangkok time
//! profitstat hours --period week -z Asia/Bangkok
//!
//! # One item over an explicit range, as JSON
//! profitstat summary --item mango-sticky-rice --since 2024-01-01 --until 2024-01-31 --json
//!
//! # Net profit for the last 14 days
//! profitstat trend --days 14
//! ```

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use profitstat_core::error::Result;
use profitstat_core::ranges::{DateRange, Period, parse_date};
use profitstat_core::timezone::TimezoneConfig;
use std::path::PathBuf;

/// Profitability reports for a small shop's ledger
#[derive(Parser, Debug, Clone)]
#[command(name = "profitstat")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Show informational output (default is quiet mode with only warnings and errors)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Ledger file to read (default: <data dir>/profitstat/ledger.json)
    #[arg(long, env = "PROFITSTAT_DATA", global = true)]
    pub data: Option<PathBuf>,

    /// Timezone for hours, weekdays and day boundaries (e.g. "Asia/Bangkok", "UTC")
    /// If not specified, uses the system's local timezone
    #[arg(long, short = 'z', global = true)]
    pub timezone: Option<String>,

    /// Use UTC (overrides --timezone)
    #[arg(long, global = true)]
    pub utc: bool,

    /// Seconds an item's average cost stays cached
    #[arg(long, default_value_t = 60, global = true)]
    pub cost_cache_ttl: u64,

    #[command(flatten)]
    pub range: RangeArgs,

    /// Report to show
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Date range selection shared by every report
#[derive(Args, Debug, Clone, Default)]
pub struct RangeArgs {
    /// Named period around today: today, week (Sunday to Saturday) or month
    #[arg(long, global = true, conflicts_with_all = ["since", "until", "last"])]
    pub period: Option<Period>,

    /// First day of the range (YYYY-MM-DD)
    #[arg(long, global = true, conflicts_with = "last")]
    pub since: Option<String>,

    /// Last day of the range (YYYY-MM-DD, default: today)
    #[arg(long, global = true, conflicts_with = "last")]
    pub until: Option<String>,

    /// The last N days including today
    #[arg(long, global = true)]
    pub last: Option<u32>,
}

impl RangeArgs {
    /// Resolve the selection to inclusive bounds
    ///
    /// Precedence: `--last`, then `--since`/`--until`, then `--period`
    /// (today when nothing is given). `--until` alone selects that single day.
    pub fn resolve(&self, today: NaiveDate, tz: &TimezoneConfig) -> Result<DateRange> {
        if let Some(days) = self.last {
            return DateRange::last_n_days(days, today, tz);
        }

        if self.since.is_some() || self.until.is_some() {
            let until = self.until.as_deref().map(parse_date).transpose()?;
            let since = self.since.as_deref().map(parse_date).transpose()?;
            let until = until.unwrap_or(today);
            let since = since.unwrap_or(until);
            return DateRange::between_dates(since, until, tz);
        }

        Ok(self.period.unwrap_or_default().range(today, tz))
    }
}

/// Arguments for the summary report
#[derive(Args, Debug, Clone, Default)]
pub struct SummaryArgs {
    /// Only count sales of this item (overhead is still the whole range's)
    #[arg(long)]
    pub item: Option<String>,
}

/// Arguments for the trend report
#[derive(Args, Debug, Clone)]
pub struct TrendArgs {
    /// Number of days, ending today
    #[arg(long, short = 'd', default_value_t = 7)]
    pub days: u32,
}

/// Arguments for the cost lookup
#[derive(Args, Debug, Clone)]
pub struct CostArgs {
    /// Item to look up
    pub item_id: String,
}

/// Available reports
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Revenue, cost of goods, overhead and profit for the range
    Summary(SummaryArgs),
    /// Breakdown by hour of day, with the best and worst hour
    Hours,
    /// Breakdown by day of week, with the best and worst day
    Days,
    /// Daily net profit for the last N days (ignores range flags)
    Trend(TrendArgs),
    /// Weighted average unit cost of an item
    Cost(CostArgs),
    /// Per-item summaries for the range
    Items,
}

impl Default for Command {
    fn default() -> Self {
        Command::Summary(SummaryArgs::default())
    }
}
