//! Core traits shared by models, stores, and services

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};

/// Primary key type
pub type Id = uuid::Uuid;

/// Generate a fresh primary key
pub fn new_id() -> Id {
    uuid::Uuid::new_v4()
}

/// Trait for entities that have a primary key
pub trait Identifiable {
    fn id(&self) -> Id;
}

/// Trait for entities with a creation timestamp
pub trait Timestamped {
    fn created_at(&self) -> DateTime<Utc>;
}

/// An entity persisted as a JSON document in a named collection
pub trait Document:
    Identifiable + Timestamped + Serialize + DeserializeOwned + Clone + Send + Sync + 'static
{
    /// The collection (table) name
    const COLLECTION: &'static str;

    /// Human-readable type name for error messages
    const TYPE_NAME: &'static str;
}

