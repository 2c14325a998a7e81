// Query module for paginated listings and search
// Author: Gabriel Demetrios Lafis

mod paginate;

pub use paginate::*;

use serde::{Deserialize, Serialize};

/// Page size used when a request does not name one
pub const DEFAULT_PAGE_LIMIT: u64 = 10;

/// Requested page of a listing
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRequest {
    pub current_page: u64,
    #[serde(default)]
    pub page_limit: Option<u64>,
    #[serde(default)]
    pub search: Option<String>,
}

impl PageRequest {
    pub fn new(current_page: u64) -> Self {
        PageRequest {
            current_page,
            page_limit: None,
            search: None,
        }
    }

    pub fn with_limit(mut self, page_limit: u64) -> Self {
        self.page_limit = Some(page_limit);
        self
    }

    pub fn with_search<S: Into<String>>(mut self, term: S) -> Self {
        self.search = Some(term.into());
        self
    }

    /// Search term, if a non-blank one was supplied
    pub fn search_term(&self) -> Option<&str> {
        self.search.as_deref().map(str::trim).filter(|t| !t.is_empty())
    }
}

/// Resolved `limit`/`offset` for a page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub limit: u64,
    pub offset: u64,
}

impl Window {
    /// `offset = (currentPage - 1) * limit`; a zero or absent limit uses the default
    pub fn resolve(current_page: u64, page_limit: Option<u64>, default_limit: u64) -> Self {
        let limit = page_limit.filter(|l| *l > 0).unwrap_or(default_limit);

        Window {
            limit,
            offset: current_page.saturating_sub(1).saturating_mul(limit),
        }
    }
}

/// One page of results with pagination metadata
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResult<T> {
    pub items: Vec<T>,
    pub current_page: u64,
    pub page_limit: u64,
    pub total_items: u64,
    pub total_pages: u64,
}

impl<T> PageResult<T> {
    /// Assemble a page; `totalPages = ceil(totalItems / pageLimit)`
    pub fn new(items: Vec<T>, current_page: u64, page_limit: u64, total_items: u64) -> Self {
        let total_pages = if page_limit == 0 {
            0
        } else {
            (total_items + page_limit - 1) / page_limit
        };

        PageResult {
            items,
            current_page,
            page_limit,
            total_items,
            total_pages,
        }
    }
}
