// Paginated listing over a record store
// Author: Gabriel Demetrios Lafis

use futures_util::future::try_join;
use log::debug;

use crate::data::{Predicate, Record};
use crate::storage::{SharedStore, SortOrder, StoreError};
use super::{PageRequest, PageResult, Window, DEFAULT_PAGE_LIMIT};

/// Turns page parameters and an optional search term into a page of records.
///
/// The page and the total are fetched concurrently under the same
/// predicate. Stores without read snapshots may let them skew under
/// concurrent writes; that is not corrected here.
#[derive(Clone)]
pub struct QueryService {
    store: SharedStore,
    default_limit: u64,
    order: Option<SortOrder>,
    hidden: &'static [&'static str],
}

impl QueryService {
    pub fn new(store: SharedStore) -> Self {
        QueryService {
            store,
            default_limit: DEFAULT_PAGE_LIMIT,
            order: None,
            hidden: &[],
        }
    }

    /// Page size used when a request has none
    pub fn with_default_limit(mut self, limit: u64) -> Self {
        if limit > 0 {
            self.default_limit = limit;
        }
        self
    }

    /// Ordering for plain (non-search) listings
    pub fn with_order(mut self, order: SortOrder) -> Self {
        self.order = Some(order);
        self
    }

    /// Dotted paths stripped from every returned record
    pub fn with_hidden_fields(mut self, paths: &'static [&'static str]) -> Self {
        self.hidden = paths;
        self
    }

    pub fn default_limit(&self) -> u64 {
        self.default_limit
    }

    /// List records matching `predicate`
    pub async fn list(&self, predicate: &Predicate, page: &PageRequest) -> Result<PageResult<Record>, StoreError> {
        let window = Window::resolve(page.current_page, page.page_limit, self.default_limit);
        let limit = window.limit as usize;
        let offset = window.offset as usize;

        let (items, total) = match page.search_term() {
            Some(term) => {
                debug!("Searching '{}' (offset {}, limit {})", term, offset, limit);
                try_join(
                    self.store.ranked_search(term, predicate, limit, offset),
                    self.store.count_search_matches(term, predicate),
                )
                .await?
            }
            None => {
                try_join(
                    self.store.find_matching(predicate, limit, offset, self.order),
                    self.store.count_matching(predicate),
                )
                .await?
            }
        };

        let items = items.into_iter().map(|r| r.without_paths(self.hidden)).collect();

        Ok(PageResult::new(items, page.current_page, window.limit, total))
    }
}
