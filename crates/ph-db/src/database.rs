//! Database handle shared by services

use ph_core::traits::Document;
use ph_models::{
    Discussion, FileRecord, Milestone, Notification, Organization, Project, Task, Timesheet, User,
};
use std::sync::Arc;

use crate::error::StoreResult;
use crate::memory::MemoryStore;
use crate::pool::PoolConfig;
use crate::postgres::PgStore;
use crate::repository::Repository;
use crate::store::DocumentStore;

/// Cheaply cloneable handle to the document store
#[derive(Clone)]
pub struct Database {
    store: Arc<dyn DocumentStore>,
}

impl Database {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Database backed by a fresh in-memory store
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    /// Connect to PostgreSQL and prepare the schema
    pub async fn postgres(config: &PoolConfig) -> StoreResult<Self> {
        let store = PgStore::connect(config).await?;
        Ok(Self::new(Arc::new(store)))
    }

    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.store
    }

    pub fn backend(&self) -> &'static str {
        self.store.backend()
    }

    /// Check if the store is reachable
    pub async fn ping(&self) -> StoreResult<()> {
        self.store.ping().await
    }

    /// Repository for any document type
    pub fn repo<T: Document>(&self) -> Repository<T> {
        Repository::new(self.store.clone())
    }

    pub fn users(&self) -> Repository<User> {
        self.repo()
    }

    pub fn organizations(&self) -> Repository<Organization> {
        self.repo()
    }

    pub fn projects(&self) -> Repository<Project> {
        self.repo()
    }

    pub fn tasks(&self) -> Repository<Task> {
        self.repo()
    }

    pub fn milestones(&self) -> Repository<Milestone> {
        self.repo()
    }

    pub fn timesheets(&self) -> Repository<Timesheet> {
        self.repo()
    }

    pub fn notifications(&self) -> Repository<Notification> {
        self.repo()
    }

    pub fn files(&self) -> Repository<FileRecord> {
        self.repo()
    }

    pub fn discussions(&self) -> Repository<Discussion> {
        self.repo()
    }
}
