//! Query
//!
//! Filters, sort order and limit for one collection read.

use serde_json::Value as JsonValue;

use crate::filters::{Filter, FilterSet};
use crate::sorts::{SortCriterion, SortOrder};

/// A collection query built fluently
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    pub filters: FilterSet,
    pub sorts: SortOrder,
    pub limit: Option<usize>,
}

impl Query {
    /// An unfiltered query returning documents in insertion order
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a filter (AND)
    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.add(filter);
        self
    }

    /// Add alternatives of which at least one must match (OR)
    pub fn any_of(mut self, filters: Vec<Filter>) -> Self {
        self.filters = self.filters.with_any(filters);
        self
    }

    pub fn sort_asc(mut self, attribute: impl Into<String>) -> Self {
        self.sorts = self.sorts.then(SortCriterion::asc(attribute));
        self
    }

    pub fn sort_desc(mut self, attribute: impl Into<String>) -> Self {
        self.sorts = self.sorts.then(SortCriterion::desc(attribute));
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Check a single document against the filters
    pub fn matches(&self, doc: &JsonValue) -> bool {
        self.filters.matches(doc)
    }

    /// Filter, sort and truncate documents given in insertion order.
    /// The sort is stable, so ties keep insertion order.
    pub fn apply(&self, docs: Vec<JsonValue>) -> Vec<JsonValue> {
        let mut selected: Vec<JsonValue> = docs.into_iter().filter(|d| self.matches(d)).collect();

        if !self.sorts.is_empty() {
            selected.sort_by(|a, b| self.sorts.compare(a, b));
        }

        if let Some(limit) = self.limit {
            selected.truncate(limit);
        }

        selected
    }
}
