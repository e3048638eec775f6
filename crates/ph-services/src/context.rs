//! Shared service dependencies

use ph_db::Database;
use ph_notifications::Notifier;

/// Storage and notification fan-out, shared by every service
#[derive(Clone)]
pub struct ServiceContext {
    pub db: Database,
    pub notifier: Notifier,
}

impl ServiceContext {
    pub fn new(db: Database) -> Self {
        let notifier = Notifier::new(db.clone());
        Self { db, notifier }
    }

    /// Context over a fresh in-memory store
    pub fn in_memory() -> Self {
        Self::new(Database::in_memory())
    }
}
