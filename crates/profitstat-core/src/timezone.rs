//! Timezone utilities for bucketing and range construction
//!
//! Stored timestamps are UTC instants. Hour-of-day and weekday buckets, and
//! the start/end-of-day bounds callers hand to the analytics, are all local
//! to the shop, so every conversion goes through a [`TimezoneConfig`].

use crate::error::{ProfitstatError, Result};
use crate::types::ISOTimestamp;
use chrono::{DateTime, Datelike, Duration, LocalResult, NaiveDate, NaiveDateTime, TimeZone, Timelike, Utc};
use chrono_tz::Tz;
use std::str::FromStr;
use tracing::debug;

/// Configuration for timezone handling
#[derive(Debug, Clone)]
pub struct TimezoneConfig {
    /// The timezone local hours, weekdays and day bounds are computed in
    pub tz: Tz,
    /// Whether the timezone is UTC
    pub is_utc: bool,
}

impl Default for TimezoneConfig {
    fn default() -> Self {
        Self::new(get_local_timezone())
    }
}

impl TimezoneConfig {
    /// Wrap an explicit timezone
    pub fn new(tz: Tz) -> Self {
        Self {
            is_utc: tz == Tz::UTC,
            tz,
        }
    }

    /// UTC configuration
    pub fn utc() -> Self {
        Self::new(Tz::UTC)
    }

    /// Create a timezone configuration from CLI arguments
    pub fn from_cli(timezone_str: Option<&str>, use_utc: bool) -> Result<Self> {
        if use_utc {
            return Ok(Self::utc());
        }

        match timezone_str {
            Some(tz_str) => {
                let tz = Tz::from_str(tz_str).map_err(|_| {
                    ProfitstatError::InvalidTimezone(format!(
                        "'{}'. Use format like 'Asia/Bangkok', 'Europe/Berlin', or 'UTC'",
                        tz_str
                    ))
                })?;
                Ok(Self::new(tz))
            }
            None => Ok(Self::default()),
        }
    }

    /// Get the display name for the configured timezone
    pub fn display_name(&self) -> &str {
        if self.is_utc { "UTC" } else { self.tz.name() }
    }

    /// Local hour (0-23) of an instant
    pub fn local_hour(&self, ts: &ISOTimestamp) -> u32 {
        ts.inner().with_timezone(&self.tz).hour()
    }

    /// Local weekday of an instant as an index with Sunday = 0
    pub fn weekday_index(&self, ts: &ISOTimestamp) -> usize {
        ts.inner()
            .with_timezone(&self.tz)
            .weekday()
            .num_days_from_sunday() as usize
    }

    /// Today's date in this timezone
    pub fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.tz).date_naive()
    }

    /// First instant of a local calendar day
    pub fn start_of_day(&self, date: NaiveDate) -> ISOTimestamp {
        let midnight = date.and_hms_opt(0, 0, 0).unwrap_or_default();
        ISOTimestamp::new(self.resolve_local(midnight))
    }

    /// Last millisecond of a local calendar day (`23:59:59.999` on ordinary days)
    pub fn end_of_day(&self, date: NaiveDate) -> ISOTimestamp {
        let next = date.succ_opt().unwrap_or(date);
        let next_start = *self.start_of_day(next).inner();
        ISOTimestamp::new(next_start - Duration::milliseconds(1))
    }

    /// Map a local wall-clock time to an instant.
    ///
    /// Ambiguous times (DST fall-back) take the earlier instant. Times inside a
    /// DST gap are moved forward by the gap, which for midnight transitions
    /// yields the first existing local time of the day.
    fn resolve_local(&self, local: NaiveDateTime) -> DateTime<Utc> {
        match self.tz.from_local_datetime(&local) {
            LocalResult::Single(dt) => dt.with_timezone(&Utc),
            LocalResult::Ambiguous(earliest, _) => earliest.with_timezone(&Utc),
            LocalResult::None => {
                let shifted = local + Duration::hours(1);
                match self.tz.from_local_datetime(&shifted).earliest() {
                    Some(dt) => dt.with_timezone(&Utc),
                    None => Utc.from_utc_datetime(&local),
                }
            }
        }
    }
}

/// Detect the system's local timezone
///
/// Checks the `TZ` environment variable first, then asks the OS through
/// `iana-time-zone`. Falls back to UTC if neither yields a known zone.
pub fn get_local_timezone() -> Tz {
    if let Ok(tz_str) = std::env::var("TZ")
        && let Ok(tz) = Tz::from_str(&tz_str)
    {
        debug!("Using timezone from TZ environment variable: {}", tz_str);
        return tz;
    }

    match iana_time_zone::get_timezone() {
        Ok(tz_str) => match Tz::from_str(&tz_str) {
            Ok(tz) => {
                debug!("Using system timezone from iana-time-zone: {}", tz_str);
                tz
            }
            Err(_) => {
                debug!(
                    "Could not parse timezone from iana-time-zone: '{}', falling back to UTC",
                    tz_str
                );
                Tz::UTC
            }
        },
        Err(e) => {
            debug!(
                "Could not detect local timezone via iana-time-zone: {:?}, falling back to UTC",
                e
            );
            Tz::UTC
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{ENV_MUTEX, EnvVarGuard};

    fn ts(s: &str) -> ISOTimestamp {
        ISOTimestamp::parse(s).unwrap()
    }

    #[test]
    fn test_timezone_config_utc() {
        let config = TimezoneConfig::from_cli(None, true).unwrap();
        assert!(config.is_utc);
        assert_eq!(config.tz, Tz::UTC);
        assert_eq!(config.display_name(), "UTC");
    }

    #[test]
    fn test_timezone_config_explicit() {
        let config = TimezoneConfig::from_cli(Some("Asia/Bangkok"), false).unwrap();
        assert!(!config.is_utc);
        assert_eq!(config.display_name(), "Asia/Bangkok");
    }

    #[test]
    fn test_timezone_config_invalid() {
        let result = TimezoneConfig::from_cli(Some("Invalid/Timezone"), false);
        assert!(matches!(result, Err(ProfitstatError::InvalidTimezone(_))));
    }

    #[test]
    fn test_local_hour_and_weekday() {
        let config = TimezoneConfig::new(chrono_tz::Asia::Bangkok);
        // 2024-01-07 is a Sunday; 18:30 UTC is 01:30 Monday in Bangkok
        let t = ts("2024-01-07T18:30:00Z");
        assert_eq!(config.local_hour(&t), 1);
        assert_eq!(config.weekday_index(&t), 1);

        let utc = TimezoneConfig::utc();
        assert_eq!(utc.local_hour(&t), 18);
        assert_eq!(utc.weekday_index(&t), 0);
    }

    #[test]
    fn test_day_bounds_in_offset_zone() {
        let config = TimezoneConfig::new(chrono_tz::Asia::Bangkok);
        let date = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        assert_eq!(config.start_of_day(date), ts("2024-03-03T17:00:00Z"));
        assert_eq!(config.end_of_day(date), ts("2024-03-04T16:59:59.999Z"));
    }

    #[test]
    fn test_day_bounds_across_dst_change() {
        let config = TimezoneConfig::new(chrono_tz::America::New_York);
        // DST starts 2024-03-10: the day is 23 hours long
        let date = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        let start = config.start_of_day(date);
        let end = config.end_of_day(date);
        assert_eq!(start, ts("2024-03-10T05:00:00Z"));
        assert_eq!(end, ts("2024-03-11T03:59:59.999Z"));
    }

    #[tokio::test]
    async fn test_local_timezone_from_env() {
        let _lock = ENV_MUTEX.lock().await;
        let mut guard = EnvVarGuard::new();
        guard.set("TZ", "Asia/Tokyo");
        assert_eq!(get_local_timezone(), chrono_tz::Asia::Tokyo);
    }
}
