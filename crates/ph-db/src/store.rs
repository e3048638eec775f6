//! Document store abstraction

use async_trait::async_trait;
use ph_core::traits::Id;
use ph_queries::Query;
use serde_json::Value as JsonValue;

use crate::error::StoreResult;

/// Storage backend for JSON documents grouped in named collections.
///
/// Documents are returned in insertion order unless the query sorts them.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Short backend name used in logs and health reports
    fn backend(&self) -> &'static str;

    /// Insert a new document; fails with `Duplicate` if the id is taken
    async fn insert(&self, collection: &str, id: Id, doc: JsonValue) -> StoreResult<()>;

    /// Fetch a document by id
    async fn get(&self, collection: &str, id: Id) -> StoreResult<Option<JsonValue>>;

    /// Replace an existing document; returns false when it does not exist
    async fn replace(&self, collection: &str, id: Id, doc: JsonValue) -> StoreResult<bool>;

    /// Delete a document; returns false when it does not exist
    async fn delete(&self, collection: &str, id: Id) -> StoreResult<bool>;

    /// Documents matching the query, sorted and limited as requested
    async fn find(&self, collection: &str, query: &Query) -> StoreResult<Vec<JsonValue>>;

    /// Number of documents matching the query's filters
    async fn count(&self, collection: &str, query: &Query) -> StoreResult<u64>;

    /// Check the backend is reachable
    async fn ping(&self) -> StoreResult<()>;
}
