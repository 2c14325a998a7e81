// Windowed analytics aggregation
// Author: Gabriel Demetrios Lafis

use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures_util::future::try_join_all;
use log::{debug, warn};
use serde::Serialize;

use crate::data::Predicate;
use crate::storage::{SharedStore, StoreError};
use super::{
    into_buckets, resolve_window, AnalyticsFilter, Bucket, DateWindow, FilterSelection,
    Granularity, Interval,
};

/// Source of the current time
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Histogram computed for one filter
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterBuckets<F> {
    pub filter: F,
    pub buckets: Vec<Bucket>,
}

/// Result payload shaped like the filter selection
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AnalyticsData<F> {
    One(FilterBuckets<F>),
    Many(Vec<FilterBuckets<F>>),
}

impl<F> AnalyticsData<F> {
    /// Histograms in selection order
    pub fn series(&self) -> Vec<&FilterBuckets<F>> {
        match self {
            AnalyticsData::One(item) => vec![item],
            AnalyticsData::Many(items) => items.iter().collect(),
        }
    }
}

/// Bucketed analytics for an interval
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsResult<F> {
    pub interval: Interval,
    pub data: AnalyticsData<F>,
}

/// Buckets records of one collection into day/week/month/year histograms
pub struct Aggregator {
    store: SharedStore,
    base: Predicate,
    clock: Clock,
}

impl Aggregator {
    /// Create an aggregator over every record of a store
    pub fn new(store: SharedStore) -> Self {
        Aggregator {
            store,
            base: Predicate::Any,
            clock: Arc::new(Utc::now),
        }
    }

    /// Restrict every histogram to records matching `base`
    pub fn with_base(mut self, base: Predicate) -> Self {
        self.base = base;
        self
    }

    /// Replace the clock used for default windows
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }

    /// Compute one histogram per selected filter.
    ///
    /// A list selection is computed concurrently and reassembled in input
    /// order, duplicates included. Any store error fails the whole request.
    pub async fn aggregate<F: AnalyticsFilter>(
        &self,
        interval: &Interval,
        selection: FilterSelection<F>,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Result<AnalyticsResult<F>, StoreError> {
        if !interval.is_recognized() {
            warn!("Unrecognized analytics interval '{}', using daily buckets", interval);
        }

        let granularity = interval.granularity();
        let window = resolve_window(interval, start, end, self.now());

        debug!("Aggregating {} filter(s) by {:?} over {:?}", selection.len(), granularity, window);

        let data = match selection {
            FilterSelection::One(filter) => {
                let buckets = self.histogram(granularity, &window, &filter).await?;
                AnalyticsData::One(FilterBuckets { filter, buckets })
            }
            FilterSelection::Many(filters) => {
                let results = try_join_all(
                    filters.iter().map(|filter| self.histogram(granularity, &window, filter)),
                )
                .await?;

                AnalyticsData::Many(
                    filters
                        .into_iter()
                        .zip(results)
                        .map(|(filter, buckets)| FilterBuckets { filter, buckets })
                        .collect(),
                )
            }
        };

        Ok(AnalyticsResult {
            interval: interval.clone(),
            data,
        })
    }

    /// Histogram for a single filter within a window
    pub async fn histogram<F: AnalyticsFilter>(
        &self,
        granularity: Granularity,
        window: &DateWindow,
        filter: &F,
    ) -> Result<Vec<Bucket>, StoreError> {
        if window.is_empty() {
            return Ok(Vec::new());
        }

        let predicate = self
            .base
            .clone()
            .and(window.predicate())
            .and(filter.predicate());

        let groups = self.store.group_count(&predicate, granularity).await?;

        Ok(into_buckets(groups))
    }
}
