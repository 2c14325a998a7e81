// Intervals and their default lookback windows
// Author: Gabriel Demetrios Lafis

use std::fmt;

use chrono::{DateTime, Datelike, Duration, Months, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::data::Predicate;
use super::Granularity;

/// Requested analytics interval.
///
/// Any string converts; unrecognized values are kept verbatim in `Other`
/// so results echo what the caller sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Interval {
    Day,
    Week,
    Month,
    Year,
    Other(String),
}

impl Interval {
    pub fn as_str(&self) -> &str {
        match self {
            Interval::Day => "day",
            Interval::Week => "week",
            Interval::Month => "month",
            Interval::Year => "year",
            Interval::Other(raw) => raw,
        }
    }

    /// Bucketing granularity; unrecognized intervals bucket by day
    pub fn granularity(&self) -> Granularity {
        match self {
            Interval::Day | Interval::Other(_) => Granularity::Day,
            Interval::Week => Granularity::Week,
            Interval::Month => Granularity::Month,
            Interval::Year => Granularity::Year,
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, Interval::Other(_))
    }
}

impl From<&str> for Interval {
    fn from(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "day" => Interval::Day,
            "week" => Interval::Week,
            "month" => Interval::Month,
            "year" => Interval::Year,
            _ => Interval::Other(s.to_string()),
        }
    }
}

impl From<String> for Interval {
    fn from(s: String) -> Self {
        Interval::from(s.as_str())
    }
}

impl From<Interval> for String {
    fn from(interval: Interval) -> Self {
        interval.as_str().to_string()
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Resolved date window an aggregation reads from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateWindow {
    /// Half-open `[start, end)`
    Bounded {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
    /// No date constraint
    Unbounded,
}

impl DateWindow {
    /// A window that cannot contain any record
    pub fn is_empty(&self) -> bool {
        match self {
            DateWindow::Bounded { start, end } => start > end,
            DateWindow::Unbounded => false,
        }
    }

    pub fn predicate(&self) -> Predicate {
        match self {
            DateWindow::Bounded { start, end } => Predicate::created_between(*start, *end),
            DateWindow::Unbounded => Predicate::Any,
        }
    }
}

/// `now` minus whole calendar months, clamping the day to the target month
pub fn months_before(now: DateTime<Utc>, months: u32) -> DateTime<Utc> {
    now.checked_sub_months(Months::new(months))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Midnight on the first day of the timestamp's month
pub fn start_of_month(ts: DateTime<Utc>) -> DateTime<Utc> {
    ts.date_naive()
        .with_day(1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|t| Utc.from_utc_datetime(&t))
        .unwrap_or(ts)
}

/// Midnight at the start of the timestamp's day
pub fn start_of_day(ts: DateTime<Utc>) -> DateTime<Utc> {
    ts.date_naive()
        .and_hms_opt(0, 0, 0)
        .map(|t| Utc.from_utc_datetime(&t))
        .unwrap_or(ts)
}

/// 23:59:59 on the timestamp's day
pub fn end_of_day(ts: DateTime<Utc>) -> DateTime<Utc> {
    start_of_day(ts) + Duration::seconds(86_399)
}

/// Midnight on the Monday of the timestamp's ISO week
pub fn start_of_week(ts: DateTime<Utc>) -> DateTime<Utc> {
    let days_from_monday = ts.weekday().num_days_from_monday() as i64;
    start_of_day(ts) - Duration::days(days_from_monday)
}

/// Fill missing bounds with the interval's default lookback.
///
/// | interval | default start                   | default end |
/// |----------|---------------------------------|-------------|
/// | day      | 2 months ago, start of month    | now         |
/// | week     | 3 months ago                    | now         |
/// | month    | 8 months ago                    | now         |
/// | year     | unbounded                       | unbounded   |
/// | other    | 2 months ago                    | now         |
///
/// Year ignores supplied bounds entirely.
pub fn resolve_window(
    interval: &Interval,
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> DateWindow {
    let default_start = match interval {
        Interval::Day => start_of_month(months_before(now, 2)),
        Interval::Week => months_before(now, 3),
        Interval::Month => months_before(now, 8),
        Interval::Year => return DateWindow::Unbounded,
        Interval::Other(_) => months_before(now, 2),
    };

    DateWindow::Bounded {
        start: start.unwrap_or(default_start),
        end: end.unwrap_or(now),
    }
}
