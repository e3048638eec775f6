//! # ph-notifications
//!
//! In-app notifications for ProjectHub.
//!
//! Domain code describes what happened as a [`NotificationEvent`]; the
//! [`Notifier`] turns it into one notification per recipient and persists
//! them. Delivery is best-effort: a failed insert is logged and skipped.

pub mod events;
pub mod mentions;
pub mod notifier;

pub use events::NotificationEvent;
pub use mentions::extract_mentions;
pub use notifier::Notifier;
