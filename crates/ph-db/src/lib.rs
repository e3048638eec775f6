//! # ph-db
//!
//! Document storage for ProjectHub.
//!
//! Every entity lives as a JSON document in a named collection behind the
//! [`DocumentStore`] trait. Two backends are provided:
//!
//! - [`MemoryStore`] keeps collections in process memory (tests, demos)
//! - [`PgStore`] keeps them in a single PostgreSQL `documents` table (JSONB)
//!
//! Typed access goes through [`Repository<T>`], with collection specific
//! lookups implemented per entity module.
//!
//! ## Example
//!
//! ```ignore
//! use ph_db::{Database, PoolConfig};
//!
//! let db = Database::postgres(&PoolConfig::with_url("postgres://localhost/projecthub")).await?;
//! let user = db.users().find_by_email("ada@example.com").await?;
//! ```

pub mod database;
pub mod discussions;
pub mod error;
pub mod files;
pub mod memory;
pub mod milestones;
pub mod notifications;
pub mod pool;
pub mod postgres;
pub mod projects;
pub mod repository;
pub mod store;
pub mod tasks;
pub mod timesheets;
pub mod users;

pub use database::Database;
pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use pool::{PoolConfig, PoolStats};
pub use postgres::PgStore;
pub use repository::Repository;
pub use store::DocumentStore;
