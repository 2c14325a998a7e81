// Memory storage implementation
// Author: Gabriel Demetrios Lafis

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{FixedOffset, Offset, Utc};
use log::debug;

use crate::analytics::{BucketKey, Granularity};
use crate::data::{Predicate, Record};
use super::{FieldCount, RecordStore, SortOrder, StoreError, TextIndex};

/// In-memory record collection.
///
/// Natural order is insertion order. Bucket keys are computed in the
/// configured time zone (UTC by default).
pub struct MemoryStore {
    records: RwLock<Vec<Record>>,
    text_index: TextIndex,
    time_zone: FixedOffset,
}

impl MemoryStore {
    /// Create a new empty memory store
    pub fn new() -> Self {
        MemoryStore {
            records: RwLock::new(Vec::new()),
            text_index: TextIndex::default(),
            time_zone: Utc.fix(),
        }
    }

    /// Set the fields searched by `ranked_search`
    pub fn with_text_index(mut self, fields: Vec<String>) -> Self {
        self.text_index = TextIndex::new(fields);
        self
    }

    /// Set the time zone used for bucket keys
    pub fn with_time_zone(mut self, offset: FixedOffset) -> Self {
        self.time_zone = offset;
        self
    }

    /// Append a record
    pub fn insert(&self, record: Record) -> Result<(), StoreError> {
        let mut records = self.records.write().map_err(|_| StoreError::Lock("write"))?;
        records.push(record);
        Ok(())
    }

    /// Append many records
    pub fn insert_many<I: IntoIterator<Item = Record>>(&self, items: I) -> Result<usize, StoreError> {
        let mut records = self.records.write().map_err(|_| StoreError::Lock("write"))?;
        let before = records.len();
        records.extend(items);
        Ok(records.len() - before)
    }

    /// Number of stored records
    pub fn len(&self) -> Result<usize, StoreError> {
        let records = self.records.read().map_err(|_| StoreError::Lock("read"))?;
        Ok(records.len())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }

    /// Matching records with their relevance, best first
    fn scored_matches(&self, term: &str, predicate: &Predicate) -> Result<Vec<(f64, Record)>, StoreError> {
        if self.text_index.is_empty() {
            return Err(StoreError::Query("collection has no text index".to_string()));
        }

        let records = self.records.read().map_err(|_| StoreError::Lock("read"))?;

        let mut hits: Vec<(f64, Record)> = records
            .iter()
            .filter(|r| predicate.matches(r))
            .filter_map(|r| {
                let score = self.text_index.score(r, term);
                (score > 0.0).then(|| (score, r.clone()))
            })
            .collect();

        // Stable sort keeps natural order among equal scores
        hits.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));

        Ok(hits)
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn count_matching(&self, predicate: &Predicate) -> Result<u64, StoreError> {
        let records = self.records.read().map_err(|_| StoreError::Lock("read"))?;
        Ok(records.iter().filter(|r| predicate.matches(r)).count() as u64)
    }

    async fn find_matching(
        &self,
        predicate: &Predicate,
        limit: usize,
        offset: usize,
        order: Option<SortOrder>,
    ) -> Result<Vec<Record>, StoreError> {
        let records = self.records.read().map_err(|_| StoreError::Lock("read"))?;

        let mut matching: Vec<&Record> = records.iter().filter(|r| predicate.matches(r)).collect();

        match order {
            Some(SortOrder::CreatedAtAsc) => matching.sort_by_key(|r| r.created_at),
            Some(SortOrder::CreatedAtDesc) => matching.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
            None => {}
        }

        debug!("find_matching: {} matches, offset {} limit {}", matching.len(), offset, limit);

        Ok(matching.into_iter().skip(offset).take(limit).cloned().collect())
    }

    async fn find_one(&self, predicate: &Predicate) -> Result<Option<Record>, StoreError> {
        let records = self.records.read().map_err(|_| StoreError::Lock("read"))?;
        Ok(records.iter().find(|r| predicate.matches(r)).cloned())
    }

    async fn group_count(
        &self,
        predicate: &Predicate,
        granularity: Granularity,
    ) -> Result<HashMap<BucketKey, u64>, StoreError> {
        let records = self.records.read().map_err(|_| StoreError::Lock("read"))?;

        let mut groups: HashMap<BucketKey, u64> = HashMap::new();

        for record in records.iter().filter(|r| predicate.matches(r)) {
            let key = granularity.bucket_key_in(record.created_at, &self.time_zone);
            *groups.entry(key).or_default() += 1;
        }

        Ok(groups)
    }

    async fn count_by_field(
        &self,
        predicate: &Predicate,
        field: &str,
    ) -> Result<Vec<FieldCount>, StoreError> {
        let records = self.records.read().map_err(|_| StoreError::Lock("read"))?;

        let mut groups: BTreeMap<Option<String>, u64> = BTreeMap::new();

        for record in records.iter().filter(|r| predicate.matches(r)) {
            let value = record.get(field).and_then(|v| v.as_label());
            *groups.entry(value).or_default() += 1;
        }

        Ok(groups
            .into_iter()
            .map(|(value, count)| FieldCount { value, count })
            .collect())
    }

    async fn ranked_search(
        &self,
        term: &str,
        predicate: &Predicate,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<Record>, StoreError> {
        let hits = self.scored_matches(term, predicate)?;

        debug!("ranked_search '{}': {} hits", term, hits.len());

        Ok(hits
            .into_iter()
            .skip(offset)
            .take(limit)
            .map(|(_, record)| record)
            .collect())
    }

    async fn count_search_matches(&self, term: &str, predicate: &Predicate) -> Result<u64, StoreError> {
        Ok(self.scored_matches(term, predicate)?.len() as u64)
    }
}
