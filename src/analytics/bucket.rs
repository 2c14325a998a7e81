// Bucket keys for time-bucketed histograms
// Author: Gabriel Demetrios Lafis

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, Offset, Utc};
use serde::Serialize;

/// Resolved bucketing granularity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Day,
    Week,
    Month,
    Year,
}

impl Granularity {
    /// Bucket a timestamp in UTC
    pub fn bucket_key(&self, ts: DateTime<Utc>) -> BucketKey {
        self.bucket_key_in(ts, &Utc.fix())
    }

    /// Bucket a timestamp in the given time zone
    pub fn bucket_key_in(&self, ts: DateTime<Utc>, offset: &FixedOffset) -> BucketKey {
        let local = ts.with_timezone(offset).date_naive();

        match self {
            Granularity::Day => BucketKey::Day(local),
            Granularity::Week => {
                let iso = local.iso_week();
                BucketKey::Week {
                    year: iso.year(),
                    week: iso.week(),
                }
            }
            Granularity::Month => BucketKey::Month {
                year: local.year(),
                month: local.month(),
            },
            Granularity::Year => BucketKey::Year(local.year()),
        }
    }
}

/// Identifier of one histogram slice.
///
/// Variant order and field order make the derived `Ord` chronological
/// within a granularity; the display label is not sortable for weeks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BucketKey {
    Day(NaiveDate),
    Week { year: i32, week: u32 },
    Month { year: i32, month: u32 },
    Year(i32),
}

impl BucketKey {
    /// Display label: `YYYY-MM-DD`, `Week N`, `YYYY-MM` or `YYYY`
    pub fn label(&self) -> String {
        match self {
            BucketKey::Day(date) => date.format("%Y-%m-%d").to_string(),
            BucketKey::Week { week, .. } => format!("Week {}", week),
            BucketKey::Month { year, month } => format!("{:04}-{:02}", year, month),
            BucketKey::Year(year) => year.to_string(),
        }
    }

    /// Numeric sort value, `(year, week|month, day)`
    pub fn sort_value(&self) -> (i32, u32, u32) {
        match self {
            BucketKey::Day(date) => (date.year(), date.month(), date.day()),
            BucketKey::Week { year, week } => (*year, *week, 0),
            BucketKey::Month { year, month } => (*year, *month, 0),
            BucketKey::Year(year) => (*year, 0, 0),
        }
    }

    /// Year shown alongside labels that do not carry it
    fn display_year(&self) -> Option<i32> {
        match self {
            BucketKey::Week { year, .. } => Some(*year),
            _ => None,
        }
    }
}

impl fmt::Display for BucketKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// One histogram slice with its match count
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bucket {
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    pub count: u64,
}

impl Bucket {
    pub fn new(key: &BucketKey, count: u64) -> Self {
        Bucket {
            key: key.label(),
            year: key.display_year(),
            count,
        }
    }
}

/// Turn grouped counts into buckets sorted chronologically
pub fn into_buckets(groups: HashMap<BucketKey, u64>) -> Vec<Bucket> {
    let mut entries: Vec<(BucketKey, u64)> = groups.into_iter().collect();
    entries.sort_by_key(|(key, _)| key.sort_value());

    entries
        .iter()
        .map(|(key, count)| Bucket::new(key, *count))
        .collect()
}
