use crate::portfolio_analysis::domain::Notification;
use async_trait::async_trait;
use std::sync::Arc;

/// NotificationBus port for handing events to the delivery layer
///
/// Dispatch is fire-and-forget from the core's point of view: transport,
/// retries and subscriber lists belong to the implementation.
#[async_trait]
pub trait NotificationBus: Send + Sync {
    async fn dispatch(&self, notification: Notification);
}

/// Shared buses: one bus instance handed to several analyzers
#[async_trait]
impl<B: NotificationBus + ?Sized> NotificationBus for Arc<B> {
    async fn dispatch(&self, notification: Notification) {
        (**self).dispatch(notification).await
    }
}
