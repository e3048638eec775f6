//! In-memory document store

use async_trait::async_trait;
use ph_core::traits::Id;
use ph_queries::Query;
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::instrument;

use crate::error::{StoreError, StoreResult};
use crate::store::DocumentStore;

type Collection = Vec<(Id, JsonValue)>;

/// Process-local store; each collection keeps insertion order
#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Collection>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every collection
    pub async fn clear(&self) {
        self.collections.write().await.clear();
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    #[instrument(skip(self, doc), fields(store = "memory"))]
    async fn insert(&self, collection: &str, id: Id, doc: JsonValue) -> StoreResult<()> {
        let mut collections = self.collections.write().await;
        let docs = collections.entry(collection.to_string()).or_default();

        if docs.iter().any(|(existing, _)| *existing == id) {
            return Err(StoreError::Duplicate {
                collection: collection.to_string(),
                id,
            });
        }

        docs.push((id, doc));
        Ok(())
    }

    async fn get(&self, collection: &str, id: Id) -> StoreResult<Option<JsonValue>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.iter().find(|(existing, _)| *existing == id))
            .map(|(_, doc)| doc.clone()))
    }

    #[instrument(skip(self, doc), fields(store = "memory"))]
    async fn replace(&self, collection: &str, id: Id, doc: JsonValue) -> StoreResult<bool> {
        let mut collections = self.collections.write().await;
        let slot = collections
            .get_mut(collection)
            .and_then(|docs| docs.iter_mut().find(|(existing, _)| *existing == id));

        match slot {
            Some((_, stored)) => {
                *stored = doc;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    #[instrument(skip(self), fields(store = "memory"))]
    async fn delete(&self, collection: &str, id: Id) -> StoreResult<bool> {
        let mut collections = self.collections.write().await;
        let Some(docs) = collections.get_mut(collection) else {
            return Ok(false);
        };

        let before = docs.len();
        docs.retain(|(existing, _)| *existing != id);
        Ok(docs.len() != before)
    }

    async fn find(&self, collection: &str, query: &Query) -> StoreResult<Vec<JsonValue>> {
        let collections = self.collections.read().await;
        let docs = collections
            .get(collection)
            .map(|docs| docs.iter().map(|(_, doc)| doc.clone()).collect())
            .unwrap_or_default();
        Ok(query.apply(docs))
    }

    async fn count(&self, collection: &str, query: &Query) -> StoreResult<u64> {
        let collections = self.collections.read().await;
        let count = collections
            .get(collection)
            .map(|docs| docs.iter().filter(|(_, doc)| query.matches(doc)).count())
            .unwrap_or(0);
        Ok(count as u64)
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}
