//! # ph-queries
//!
//! Query layer for ProjectHub document collections.
//!
//! A [`Query`] is a set of filters (AND, plus an optional OR group), a sort
//! order and an optional limit. Stores either compile it to SQL or evaluate
//! it directly against JSON documents with [`Query::apply`].
//!
//! ## Example
//!
//! ```
//! use ph_queries::{Filter, FilterValue, Query};
//!
//! let query = Query::new()
//!     .filter(Filter::equals("status", FilterValue::from("done")))
//!     .sort_desc("createdAt")
//!     .limit(20);
//!
//! let docs = vec![
//!     serde_json::json!({"status": "done", "createdAt": "2024-01-01T00:00:00Z"}),
//!     serde_json::json!({"status": "todo", "createdAt": "2024-01-02T00:00:00Z"}),
//! ];
//! assert_eq!(query.apply(docs).len(), 1);
//! ```

pub mod filters;
pub mod query;
pub mod sorts;

pub use filters::{Filter, FilterOperator, FilterSet, FilterValue};
pub use query::Query;
pub use sorts::{SortCriterion, SortDirection, SortOrder};
