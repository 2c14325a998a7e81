// Storage module: the record store seam and its in-memory backend
// Author: Gabriel Demetrios Lafis

mod memory;
mod search;
mod seed;

pub use memory::*;
pub use search::*;
pub use seed::*;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::analytics::{BucketKey, Granularity};
use crate::data::{DataError, Predicate, Record};

/// Ordering applied to plain (non-search) queries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    CreatedAtAsc,
    CreatedAtDesc,
}

/// Count of records sharing one field value
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldCount {
    #[serde(rename = "_id")]
    pub value: Option<String>,
    pub count: u64,
}

/// Represents a queryable collection of records.
///
/// Implementations own their connection; nothing here retries.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Count records matching a predicate
    async fn count_matching(&self, predicate: &Predicate) -> Result<u64, StoreError>;

    /// Fetch a page of matching records
    async fn find_matching(
        &self,
        predicate: &Predicate,
        limit: usize,
        offset: usize,
        order: Option<SortOrder>,
    ) -> Result<Vec<Record>, StoreError>;

    /// Fetch the first matching record
    async fn find_one(&self, predicate: &Predicate) -> Result<Option<Record>, StoreError>;

    /// Count matching records per time bucket
    async fn group_count(
        &self,
        predicate: &Predicate,
        granularity: Granularity,
    ) -> Result<HashMap<BucketKey, u64>, StoreError>;

    /// Count matching records per value of a field
    async fn count_by_field(
        &self,
        predicate: &Predicate,
        field: &str,
    ) -> Result<Vec<FieldCount>, StoreError>;

    /// Full-text search ordered by descending relevance
    async fn ranked_search(
        &self,
        term: &str,
        predicate: &Predicate,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<Record>, StoreError>;

    /// Count full-text matches
    async fn count_search_matches(&self, term: &str, predicate: &Predicate) -> Result<u64, StoreError>;
}

/// Shared handle to a store
pub type SharedStore = Arc<dyn RecordStore>;

/// The collections the back office reads from
#[derive(Clone)]
pub struct Collections {
    pub users: SharedStore,
    pub appointments: SharedStore,
    pub lifeguards: SharedStore,
}

impl Collections {
    pub fn new(users: SharedStore, appointments: SharedStore, lifeguards: SharedStore) -> Self {
        Collections {
            users,
            appointments,
            lifeguards,
        }
    }
}

/// Represents an error in the storage module
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),
    #[error("Query failed: {0}")]
    Query(String),
    #[error("Failed to acquire {0} lock")]
    Lock(&'static str),
    #[error("Data error: {0}")]
    Data(#[from] DataError),
}
