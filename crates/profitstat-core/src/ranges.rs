//! Date range construction
//!
//! The analytics take inclusive `[start, end]` instants and never normalize
//! them. These helpers build those bounds from local calendar dates: a day
//! runs from local midnight to `23:59:59.999`, weeks start on Sunday, months
//! on the 1st.
//!
//! # Examples
//!
//! ```
//! use profitstat_core::ranges::DateRange;
//! use profitstat_core::timezone::TimezoneConfig;
//! use chrono::NaiveDate;
//!
//! let tz = TimezoneConfig::utc();
//! let wednesday = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
//! let week = DateRange::week_of(wednesday, &tz);
//! assert_eq!(week.start.to_rfc3339(), "2024-01-07T00:00:00.000Z");
//! assert_eq!(week.end.to_rfc3339(), "2024-01-13T23:59:59.999Z");
//! ```

use crate::error::{ProfitstatError, Result};
use crate::timezone::TimezoneConfig;
use crate::types::ISOTimestamp;
use chrono::{Datelike, Days, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Inclusive time range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: ISOTimestamp,
    pub end: ISOTimestamp,
}

impl DateRange {
    /// One local calendar day
    pub fn day(date: NaiveDate, tz: &TimezoneConfig) -> Self {
        Self {
            start: tz.start_of_day(date),
            end: tz.end_of_day(date),
        }
    }

    /// Every local day from `since` through `until`
    pub fn between_dates(since: NaiveDate, until: NaiveDate, tz: &TimezoneConfig) -> Result<Self> {
        if since > until {
            return Err(ProfitstatError::InvalidArgument(format!(
                "since date {since} is after until date {until}"
            )));
        }
        Ok(Self {
            start: tz.start_of_day(since),
            end: tz.end_of_day(until),
        })
    }

    /// Sunday-to-Saturday week containing `date`
    pub fn week_of(date: NaiveDate, tz: &TimezoneConfig) -> Self {
        let offset = date.weekday().num_days_from_sunday() as i64;
        let sunday = date - Duration::days(offset);
        let saturday = sunday + Duration::days(6);
        Self {
            start: tz.start_of_day(sunday),
            end: tz.end_of_day(saturday),
        }
    }

    /// Calendar month containing `date`
    pub fn month_of(date: NaiveDate, tz: &TimezoneConfig) -> Self {
        let first = date.with_day(1).unwrap_or(date);
        let next_first = if first.month() == 12 {
            NaiveDate::from_ymd_opt(first.year() + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(first.year(), first.month() + 1, 1)
        };
        let last = next_first.and_then(|d| d.pred_opt()).unwrap_or(first);
        Self {
            start: tz.start_of_day(first),
            end: tz.end_of_day(last),
        }
    }

    /// The `days` local days ending with `today` (at least one day)
    ///
    /// Fails when the first day would fall before the earliest representable date.
    pub fn last_n_days(days: u32, today: NaiveDate, tz: &TimezoneConfig) -> Result<Self> {
        let first = days_back(today, days.max(1) - 1)?;
        Ok(Self {
            start: tz.start_of_day(first),
            end: tz.end_of_day(today),
        })
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} .. {}", self.start, self.end)
    }
}

/// Named reporting periods, relative to today
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    #[default]
    Today,
    Week,
    Month,
}

impl Period {
    /// Bounds of this period around `today`
    pub fn range(&self, today: NaiveDate, tz: &TimezoneConfig) -> DateRange {
        match self {
            Self::Today => DateRange::day(today, tz),
            Self::Week => DateRange::week_of(today, tz),
            Self::Month => DateRange::month_of(today, tz),
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Today => write!(f, "today"),
            Self::Week => write!(f, "week"),
            Self::Month => write!(f, "month"),
        }
    }
}

impl std::str::FromStr for Period {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "today" | "day" => Ok(Self::Today),
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            _ => Err(format!("Invalid period: {s} (expected today, week or month)")),
        }
    }
}

/// The date `days` days before `date`
pub fn days_back(date: NaiveDate, days: u32) -> Result<NaiveDate> {
    date.checked_sub_days(Days::new(u64::from(days))).ok_or_else(|| {
        ProfitstatError::InvalidArgument(format!("{days} days before {date} is out of range"))
    })
}

/// Parse a `YYYY-MM-DD` date argument
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| ProfitstatError::InvalidDate(format!("'{s}', expected YYYY-MM-DD")))
}
