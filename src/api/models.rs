// API request and response models
// Author: Gabriel Demetrios Lafis

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::analytics::{FilterSelection, Interval};
use crate::services::GraphQuery;
use super::ApiError;

pub const RETRIEVED: &str = "Retrieved successfully";
pub const CREATED: &str = "Created successfully";
pub const UPDATED: &str = "Updated successfully";

/// Success envelope wrapping every payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub message: String,
    pub data: T,
}

impl<T> Envelope<T> {
    pub fn new(message: &str, data: T) -> Self {
        Envelope {
            message: message.to_string(),
            data,
        }
    }

    pub fn retrieved(data: T) -> Self {
        Envelope::new(RETRIEVED, data)
    }
}

/// Query string of the analytics graph endpoints
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphParams {
    pub interval: Option<String>,
    /// A single tag or a JSON array of tags
    pub filter: Option<String>,
    #[serde(alias = "start_date")]
    pub start_date: Option<String>,
    #[serde(alias = "end_date")]
    pub end_date: Option<String>,
}

impl GraphParams {
    /// Convert into a service query; tags default to `ALL`
    pub fn into_query<F: From<String>>(self) -> Result<GraphQuery<F>, ApiError> {
        let interval = Interval::from(self.interval.as_deref().unwrap_or("day"));
        let filter = parse_filter(self.filter.as_deref())?;
        let start = self.start_date.as_deref().map(parse_date).transpose()?;
        let end = self.end_date.as_deref().map(parse_date).transpose()?;

        Ok(GraphQuery::new(interval, filter).between(start, end))
    }
}

/// Query string of the patient dashboard
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DashboardParams {
    pub duration: Option<String>,
}

impl DashboardParams {
    pub fn interval(&self) -> Interval {
        Interval::from(self.duration.as_deref().unwrap_or("week"))
    }
}

/// Parse a filter given either as `TAG` or as `["TAG", ...]`
pub fn parse_filter<F: From<String>>(raw: Option<&str>) -> Result<FilterSelection<F>, ApiError> {
    let raw = match raw.map(str::trim) {
        Some(r) if !r.is_empty() => r,
        _ => return Ok(FilterSelection::one(F::from("ALL".to_string()))),
    };

    if raw.starts_with('[') {
        let tags: Vec<String> = serde_json::from_str(raw)
            .map_err(|e| ApiError::Validation(format!("filter must be a tag or a JSON array of tags: {}", e)))?;
        Ok(FilterSelection::many(tags.into_iter().map(F::from).collect()))
    } else {
        Ok(FilterSelection::one(F::from(raw.to_string())))
    }
}

/// Parse an RFC 3339 timestamp or a bare `YYYY-MM-DD` date (midnight UTC)
pub fn parse_date(raw: &str) -> Result<DateTime<Utc>, ApiError> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|t| Utc.from_utc_datetime(&t))
        .ok_or_else(|| ApiError::Validation(format!("invalid date '{}'", raw)))
}

/// Reject pages below 1
pub fn check_page(current_page: u64) -> Result<(), ApiError> {
    if current_page < 1 {
        return Err(ApiError::Validation("currentPage must be at least 1".to_string()));
    }
    Ok(())
}
