//! Notification fan-out

use ph_db::Database;
use ph_models::Notification;
use tracing::{debug, instrument, warn};

use crate::events::NotificationEvent;

/// Persists the notifications produced by domain events
#[derive(Clone)]
pub struct Notifier {
    db: Database,
}

impl Notifier {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Store every notification of an event. Returns how many were stored;
    /// failures are logged and never propagated.
    #[instrument(skip(self, event), fields(event = event.name()))]
    pub async fn dispatch(&self, event: NotificationEvent) -> usize {
        let mut delivered = 0;
        for notification in event.notifications() {
            if self.deliver(&notification).await {
                delivered += 1;
            }
        }
        debug!(delivered, "notifications dispatched");
        delivered
    }

    /// Store a single notification
    pub async fn deliver(&self, notification: &Notification) -> bool {
        match self.db.notifications().insert(notification).await {
            Ok(()) => true,
            Err(e) => {
                warn!(
                    recipient = %notification.recipient,
                    kind = notification.notification_type.as_str(),
                    error = %e,
                    "failed to store notification"
                );
                false
            }
        }
    }
}
