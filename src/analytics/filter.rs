// Analytics filter tags and the scalar-or-sequence selection
// Author: Gabriel Demetrios Lafis

use serde::{Deserialize, Serialize};

use crate::data::Predicate;

/// A closed set of named record subsets.
///
/// `predicate` is total: tags a caller sent that are not part of the set
/// map to `Predicate::Any`.
pub trait AnalyticsFilter: Clone + Serialize + Send + Sync {
    fn predicate(&self) -> Predicate;
}

/// One filter or an ordered list of filters, mirrored in the result shape
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum FilterSelection<F> {
    Many(Vec<F>),
    One(F),
}

impl<F> FilterSelection<F> {
    pub fn one(filter: F) -> Self {
        FilterSelection::One(filter)
    }

    pub fn many(filters: Vec<F>) -> Self {
        FilterSelection::Many(filters)
    }

    /// Number of histograms the selection produces
    pub fn len(&self) -> usize {
        match self {
            FilterSelection::Many(filters) => filters.len(),
            FilterSelection::One(_) => 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
