pub mod association_tracker;
pub mod notification_emitter;

pub use association_tracker::{AssociationStatus, VulnerabilityAssociationTracker};
pub use notification_emitter::NotificationEmitter;
