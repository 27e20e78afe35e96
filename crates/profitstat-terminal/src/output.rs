//! Output formatting for profitstat reports
//!
//! Two formatters share one trait:
//! - [`TableFormatter`] renders tables for the terminal
//! - [`JsonFormatter`] renders JSON for scripts and other tools
//!
//! # Examples
//!
//! ```
//! use profitstat_core::aggregation_types::PeriodSummary;
//! use profitstat_core::ranges::DateRange;
//! use profitstat_core::timezone::TimezoneConfig;
//! use profitstat_terminal::get_formatter;
//! use chrono::NaiveDate;
//!
//! let tz = TimezoneConfig::utc();
//! let range = DateRange::day(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(), &tz);
//! let summary = PeriodSummary::from_totals(100.0, 75.0, 5.0, 1);
//!
//! let table = get_formatter(false).format_summary(&range, &summary);
//! assert!(table.contains("Net profit"));
//!
//! let json = get_formatter(true).format_summary(&range, &summary);
//! assert!(json.contains("\"net_profit\": 20.0"));
//! ```

use colored::Colorize;
use prettytable::{Cell, Row, Table, format, row};
use profitstat_core::aggregation_types::{
    BestWorst, BucketStat, ItemSummary, PeriodSummary, TrendPoint,
};
use profitstat_core::ranges::DateRange;
use profitstat_core::types::ItemId;
use serde_json::{Value, json};

/// Renders analytics results
pub trait OutputFormatter {
    /// Period summary for a range
    fn format_summary(&self, range: &DateRange, summary: &PeriodSummary) -> String;

    /// Hour-of-day buckets with the best and worst hour
    fn format_hour_stats(&self, stats: &[BucketStat], best_worst: &BestWorst) -> String;

    /// Day-of-week buckets with the best and worst day
    fn format_day_stats(&self, stats: &[BucketStat], best_worst: &BestWorst) -> String;

    /// Daily net-profit trend, oldest first
    fn format_trend(&self, points: &[TrendPoint]) -> String;

    /// Average unit cost of one item
    fn format_cost(&self, item_id: &ItemId, average_unit_cost: f64) -> String;

    /// Per-item summaries
    fn format_item_summaries(&self, range: &DateRange, items: &[ItemSummary]) -> String;
}

/// Human-readable tables
///
/// Amounts use two decimals with thousands separators. Negative amounts are
/// printed in red when stdout is a terminal and `NO_COLOR` is not set.
pub struct TableFormatter {
    colored_output: bool,
}

impl Default for TableFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl TableFormatter {
    /// Formatter colouring only a terminal stdout, honouring `NO_COLOR`
    pub fn new() -> Self {
        Self {
            colored_output: wants_color(
                std::env::var_os("NO_COLOR").is_some(),
                is_terminal::is_terminal(std::io::stdout()),
            ),
        }
    }

    /// Formatter with colours explicitly on or off
    pub fn with_color(colored_output: bool) -> Self {
        Self { colored_output }
    }

    /// Format an amount with two decimals and thousands separators
    fn format_money(amount: f64) -> String {
        let formatted = format!("{:.2}", amount.abs());
        let (whole, fraction) = formatted
            .split_once('.')
            .unwrap_or((formatted.as_str(), "00"));

        let mut grouped = String::new();
        for (count, ch) in whole.chars().rev().enumerate() {
            if count > 0 && count % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }
        let whole: String = grouped.chars().rev().collect();

        // -0.001 rounds to 0.00 and prints unsigned
        let sign = if amount < 0.0 && formatted != "0.00" {
            "-"
        } else {
            ""
        };
        format!("{sign}{whole}.{fraction}")
    }

    fn format_margin(margin: Option<f64>) -> String {
        match margin {
            Some(m) => format!("{m:.1}%"),
            None => "-".to_string(),
        }
    }

    /// Money cell content, red when negative
    fn profit(&self, amount: f64) -> String {
        let text = Self::format_money(amount);
        if self.colored_output && amount < 0.0 {
            text.red().to_string()
        } else {
            text
        }
    }

    fn format_buckets(
        &self,
        key_title: &str,
        stats: &[BucketStat],
        best_worst: &BestWorst,
    ) -> String {
        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_NO_LINESEP_WITH_TITLE);

        table.set_titles(row![
            b -> key_title,
            b -> "Sales",
            b -> "Revenue",
            b -> "COGS",
            b -> "Gross",
            b -> "Overhead",
            b -> "Net",
            b -> "Margin"
        ]);

        for stat in stats {
            table.add_row(row![
                stat.label,
                r -> stat.sale_count,
                r -> Self::format_money(stat.total_revenue),
                r -> Self::format_money(stat.total_cogs),
                r -> self.profit(stat.gross_profit),
                r -> Self::format_money(stat.allocated_overhead),
                r -> self.profit(stat.net_profit),
                r -> Self::format_margin(stat.avg_net_margin_percent)
            ]);
        }

        let mut output = table.to_string();
        output.push('\n');
        output.push_str(&self.format_best_worst(best_worst));
        output
    }

    fn format_best_worst(&self, best_worst: &BestWorst) -> String {
        if best_worst.is_empty() {
            return "No sales in range\n".to_string();
        }
        format!(
            "Best:  {} ({})\nWorst: {} ({})\n",
            best_worst.best_label,
            self.profit(best_worst.best_net_profit),
            best_worst.worst_label,
            self.profit(best_worst.worst_net_profit)
        )
    }
}

impl OutputFormatter for TableFormatter {
    fn format_summary(&self, range: &DateRange, summary: &PeriodSummary) -> String {
        let mut output = format!("Profit summary {range}\n\n");

        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_NO_LINESEP_WITH_TITLE);
        table.set_titles(row![b -> "Metric", b -> "Value"]);

        table.add_row(row!["Sales", r -> summary.sale_count]);
        table.add_row(row!["Revenue", r -> Self::format_money(summary.total_revenue)]);
        table.add_row(row!["COGS", r -> Self::format_money(summary.total_cogs)]);
        table.add_row(row!["Gross profit", r -> self.profit(summary.gross_profit)]);
        table.add_row(row!["Overhead", r -> Self::format_money(summary.total_overhead)]);
        table.add_row(Row::new(vec![Cell::new(""); 2]));
        table.add_row(row![b -> "Net profit", rb -> self.profit(summary.net_profit)]);
        table.add_row(row![
            b -> "Net margin",
            rb -> Self::format_margin(summary.net_margin_percent)
        ]);

        output.push_str(&table.to_string());
        output
    }

    fn format_hour_stats(&self, stats: &[BucketStat], best_worst: &BestWorst) -> String {
        self.format_buckets("Hour", stats, best_worst)
    }

    fn format_day_stats(&self, stats: &[BucketStat], best_worst: &BestWorst) -> String {
        self.format_buckets("Day", stats, best_worst)
    }

    fn format_trend(&self, points: &[TrendPoint]) -> String {
        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_NO_LINESEP_WITH_TITLE);
        table.set_titles(row![b -> "Date", b -> "Net profit"]);

        for point in points {
            table.add_row(row![point.label, r -> self.profit(point.net_profit)]);
        }

        let total: f64 = points.iter().map(|p| p.net_profit).sum();
        table.add_row(Row::new(vec![Cell::new(""); 2]));
        table.add_row(row![b -> "TOTAL", rb -> self.profit(total)]);

        table.to_string()
    }

    fn format_cost(&self, item_id: &ItemId, average_unit_cost: f64) -> String {
        format!(
            "Average unit cost of {}: {}\n",
            item_id,
            Self::format_money(average_unit_cost)
        )
    }

    fn format_item_summaries(&self, range: &DateRange, items: &[ItemSummary]) -> String {
        let mut output = format!("Items {range}\n\n");

        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_NO_LINESEP_WITH_TITLE);
        table.set_titles(row![
            b -> "Item",
            b -> "Unit cost",
            b -> "Sales",
            b -> "Revenue",
            b -> "COGS",
            b -> "Gross"
        ]);

        for item in items {
            table.add_row(row![
                item.name,
                r -> Self::format_money(item.average_unit_cost),
                r -> item.summary.sale_count,
                r -> Self::format_money(item.summary.total_revenue),
                r -> Self::format_money(item.summary.total_cogs),
                r -> self.profit(item.summary.gross_profit)
            ]);
        }

        output.push_str(&table.to_string());
        output
    }
}

/// Machine-readable JSON
///
/// Undefined margins are emitted as `null`.
pub struct JsonFormatter;

impl JsonFormatter {
    fn summary_json(summary: &PeriodSummary) -> Value {
        json!({
            "total_revenue": summary.total_revenue,
            "total_cogs": summary.total_cogs,
            "gross_profit": summary.gross_profit,
            "total_overhead": summary.total_overhead,
            "net_profit": summary.net_profit,
            "net_margin_percent": summary.net_margin_percent,
            "sale_count": summary.sale_count,
        })
    }

    fn range_json(range: &DateRange) -> Value {
        json!({
            "start": range.start.to_rfc3339(),
            "end": range.end.to_rfc3339(),
        })
    }

    fn buckets_json(key: &str, stats: &[BucketStat], best_worst: &BestWorst) -> Value {
        let best_worst = if best_worst.is_empty() {
            Value::Null
        } else {
            json!({
                "best": {
                    "label": best_worst.best_label,
                    "net_profit": best_worst.best_net_profit,
                },
                "worst": {
                    "label": best_worst.worst_label,
                    "net_profit": best_worst.worst_net_profit,
                },
            })
        };

        json!({
            key: stats.iter().map(|s| json!({
                "label": s.label,
                "sale_count": s.sale_count,
                "total_revenue": s.total_revenue,
                "total_cogs": s.total_cogs,
                "gross_profit": s.gross_profit,
                "allocated_overhead": s.allocated_overhead,
                "net_profit": s.net_profit,
                "avg_net_margin_percent": s.avg_net_margin_percent,
            })).collect::<Vec<_>>(),
            "best_worst": best_worst,
        })
    }

    fn render(value: &Value) -> String {
        serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_summary(&self, range: &DateRange, summary: &PeriodSummary) -> String {
        Self::render(&json!({
            "range": Self::range_json(range),
            "summary": Self::summary_json(summary),
        }))
    }

    fn format_hour_stats(&self, stats: &[BucketStat], best_worst: &BestWorst) -> String {
        Self::render(&Self::buckets_json("hours", stats, best_worst))
    }

    fn format_day_stats(&self, stats: &[BucketStat], best_worst: &BestWorst) -> String {
        Self::render(&Self::buckets_json("days", stats, best_worst))
    }

    fn format_trend(&self, points: &[TrendPoint]) -> String {
        Self::render(&json!({
            "trend": points.iter().map(|p| json!({
                "date": p.day.format("%Y-%m-%d"),
                "label": p.label,
                "net_profit": p.net_profit,
            })).collect::<Vec<_>>(),
        }))
    }

    fn format_cost(&self, item_id: &ItemId, average_unit_cost: f64) -> String {
        Self::render(&json!({
            "item_id": item_id.as_str(),
            "average_unit_cost": average_unit_cost,
        }))
    }

    fn format_item_summaries(&self, range: &DateRange, items: &[ItemSummary]) -> String {
        Self::render(&json!({
            "range": Self::range_json(range),
            "items": items.iter().map(|i| json!({
                "item_id": i.item_id.as_str(),
                "name": i.name,
                "average_unit_cost": i.average_unit_cost,
                "summary": Self::summary_json(&i.summary),
            })).collect::<Vec<_>>(),
        }))
    }
}

fn wants_color(no_color: bool, stdout_is_terminal: bool) -> bool {
    !no_color && stdout_is_terminal
}

/// Pick a formatter for the `--json` flag
pub fn get_formatter(json: bool) -> Box<dyn OutputFormatter> {
    if json {
        Box::new(JsonFormatter)
    } else {
        Box::new(TableFormatter::new())
    }
}
