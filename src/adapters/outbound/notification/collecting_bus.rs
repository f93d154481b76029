use crate::portfolio_analysis::domain::Notification;
use crate::ports::outbound::NotificationBus;
use async_trait::async_trait;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// CollectingNotificationBus keeps every dispatched notification in memory.
///
/// Clones share the same buffer, so a run can hand one clone to each
/// analyzer and read the combined result afterwards.
#[derive(Clone, Default)]
pub struct CollectingNotificationBus {
    notifications: Arc<Mutex<Vec<Notification>>>,
}

impl CollectingNotificationBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copies of all notifications in dispatch order
    pub fn notifications(&self) -> Vec<Notification> {
        self.buffer().clone()
    }

    pub fn len(&self) -> usize {
        self.buffer().len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer().is_empty()
    }

    /// Removes and returns everything collected so far
    pub fn drain(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.buffer())
    }

    fn buffer(&self) -> MutexGuard<'_, Vec<Notification>> {
        self.notifications
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl NotificationBus for CollectingNotificationBus {
    async fn dispatch(&self, notification: Notification) {
        self.buffer().push(notification);
    }
}
