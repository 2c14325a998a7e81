// Lifeguard listing and details
// Author: Gabriel Demetrios Lafis

use serde::Deserialize;

use crate::data::{Predicate, PredicateBuilder, Record};
use crate::query::{PageRequest, PageResult, QueryService};
use crate::storage::{Collections, SharedStore};
use super::{ServiceError, LIFEGUARD_HIDDEN_FIELDS};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LifeguardQuery {
    pub current_page: u64,
    pub page_limit: Option<u64>,
    pub search: Option<String>,
    pub status: Option<String>,
}

impl LifeguardQuery {
    pub fn page(&self) -> PageRequest {
        PageRequest {
            current_page: self.current_page,
            page_limit: self.page_limit,
            search: self.search.clone(),
        }
    }

    pub fn predicate(&self) -> Predicate {
        PredicateBuilder::new().eq("status", self.status.as_deref()).build()
    }
}

pub struct LifeguardsService {
    lifeguards: SharedStore,
    query: QueryService,
}

impl LifeguardsService {
    pub fn new(collections: &Collections, default_page_limit: u64) -> Self {
        LifeguardsService {
            lifeguards: collections.lifeguards.clone(),
            query: QueryService::new(collections.lifeguards.clone())
                .with_default_limit(default_page_limit)
                .with_hidden_fields(LIFEGUARD_HIDDEN_FIELDS),
        }
    }

    pub async fn list(&self, query: &LifeguardQuery) -> Result<PageResult<Record>, ServiceError> {
        Ok(self.query.list(&query.predicate(), &query.page()).await?)
    }

    /// One lifeguard, without credentials or card details
    pub async fn get(&self, id: &str) -> Result<Record, ServiceError> {
        self.lifeguards
            .find_one(&Predicate::Id(id.to_string()))
            .await?
            .map(|r| r.without_paths(LIFEGUARD_HIDDEN_FIELDS))
            .ok_or_else(|| ServiceError::NotFound(format!("Lifeguard '{}'", id)))
    }
}
