use crate::portfolio_analysis::domain::Notification;
use crate::ports::outbound::NotificationBus;
use async_trait::async_trait;

/// TracingNotificationBus wraps another bus and logs every dispatch as a
/// structured `tracing` event before forwarding it.
///
/// Decorator over any [`NotificationBus`]; the wrapped bus still receives
/// each notification exactly once.
pub struct TracingNotificationBus<B> {
    inner: B,
}

impl<B: NotificationBus> TracingNotificationBus<B> {
    pub fn new(inner: B) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &B {
        &self.inner
    }
}

#[async_trait]
impl<B: NotificationBus> NotificationBus for TracingNotificationBus<B> {
    async fn dispatch(&self, notification: Notification) {
        let subject = notification.subject();
        tracing::info!(
            notification_id = %notification.id(),
            vulnerability = %subject.vulnerability.id(),
            component = %subject.component,
            affected_projects = subject.affected_projects.len(),
            "{}",
            notification.title()
        );
        self.inner.dispatch(notification).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::outbound::notification::CollectingNotificationBus;
    use crate::portfolio_analysis::domain::{
        Component, ComponentId, NewVulnerabilityIdentified, Vulnerability, VulnerabilityId,
    };
    use crate::portfolio_analysis::services::NotificationEmitter;

    #[tokio::test]
    async fn test_forwards_to_inner_bus_once() {
        let collecting = CollectingNotificationBus::new();
        let bus = TracingNotificationBus::new(collecting.clone());
        let notification =
            NotificationEmitter::<CollectingNotificationBus>::new_vulnerability_notification(
                NewVulnerabilityIdentified {
                    vulnerability: Vulnerability::new(VulnerabilityId::new("CVE-1"), "NVD"),
                    component: Component::new(ComponentId::new(1), "zlib".to_string(), None, None),
                    affected_projects: vec![],
                },
            );
        let id = notification.id();

        bus.dispatch(notification).await;

        assert_eq!(collecting.len(), 1);
        assert_eq!(bus.inner().notifications()[0].id(), id);
    }
}
