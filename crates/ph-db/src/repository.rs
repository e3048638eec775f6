//! Typed repository over a document collection
//!
//! Collection specific lookups live in the per-entity modules as inherent
//! impls on `Repository<Entity>`.

use ph_core::traits::{Document, Id};
use ph_queries::{Filter, Query};
use std::marker::PhantomData;
use std::sync::Arc;

use crate::error::{StoreError, StoreResult};
use crate::store::DocumentStore;

/// CRUD access to the collection of `T`
pub struct Repository<T: Document> {
    store: Arc<dyn DocumentStore>,
    _entity: PhantomData<fn() -> T>,
}

impl<T: Document> Clone for Repository<T> {
    fn clone(&self) -> Self {
        Self::new(self.store.clone())
    }
}

impl<T: Document> Repository<T> {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            _entity: PhantomData,
        }
    }

    /// Find an entity by ID
    pub async fn find_by_id(&self, id: Id) -> StoreResult<Option<T>> {
        match self.store.get(T::COLLECTION, id).await? {
            Some(doc) => Ok(Some(serde_json::from_value(doc)?)),
            None => Ok(None),
        }
    }

    /// Fetch an entity, failing with `NotFound` when missing
    pub async fn get(&self, id: Id) -> StoreResult<T> {
        self.find_by_id(id).await?.ok_or(StoreError::NotFound {
            entity: T::TYPE_NAME,
            id,
        })
    }

    /// Check if an entity exists
    pub async fn exists(&self, id: Id) -> StoreResult<bool> {
        Ok(self.store.get(T::COLLECTION, id).await?.is_some())
    }

    /// Entities whose id is in `ids`; unknown ids are skipped
    pub async fn find_by_ids(&self, ids: &[Id]) -> StoreResult<Vec<T>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }
        self.find(&Query::new().filter(Filter::in_ids("id", ids.to_vec())))
            .await
    }

    /// Entities matching a query
    pub async fn find(&self, query: &Query) -> StoreResult<Vec<T>> {
        self.store
            .find(T::COLLECTION, query)
            .await?
            .into_iter()
            .map(|doc| serde_json::from_value(doc).map_err(StoreError::from))
            .collect()
    }

    /// First entity matching a query
    pub async fn find_one(&self, query: Query) -> StoreResult<Option<T>> {
        Ok(self.find(&query.limit(1)).await?.into_iter().next())
    }

    /// All entities in insertion order
    pub async fn all(&self) -> StoreResult<Vec<T>> {
        self.find(&Query::new()).await
    }

    /// Count entities matching a query
    pub async fn count(&self, query: &Query) -> StoreResult<u64> {
        self.store.count(T::COLLECTION, query).await
    }

    /// Persist a new entity
    pub async fn insert(&self, entity: &T) -> StoreResult<()> {
        let doc = serde_json::to_value(entity)?;
        self.store.insert(T::COLLECTION, entity.id(), doc).await
    }

    /// Overwrite an existing entity
    pub async fn save(&self, entity: &T) -> StoreResult<()> {
        let doc = serde_json::to_value(entity)?;
        if self.store.replace(T::COLLECTION, entity.id(), doc).await? {
            Ok(())
        } else {
            Err(StoreError::NotFound {
                entity: T::TYPE_NAME,
                id: entity.id(),
            })
        }
    }

    /// Delete an entity by ID; returns false when it did not exist
    pub async fn delete(&self, id: Id) -> StoreResult<bool> {
        self.store.delete(T::COLLECTION, id).await
    }
}
