use crate::portfolio_analysis::domain::{
    Component, NewVulnerabilityIdentified, Notification, NotificationGroup, NotificationLevel,
    NotificationScope, Project, Vulnerability,
};
use crate::ports::outbound::NotificationBus;

pub const NEW_VULNERABILITY_TITLE: &str = "New Vulnerability Identified";
pub const NEW_VULNERABILITY_CONTENT: &str =
    "A new vulnerability was discovered in the following component:";

/// NotificationEmitter turns a new association into a notification and
/// dispatches it.
///
/// It does not check whether the association is new; callers only invoke it
/// after the tracker reported [`AssociationStatus::New`](super::AssociationStatus::New).
pub struct NotificationEmitter<B> {
    bus: B,
}

impl<B: NotificationBus> NotificationEmitter<B> {
    pub fn new(bus: B) -> Self {
        Self { bus }
    }

    /// Builds the portfolio-scoped, informational notification and hands it
    /// to the bus exactly once. Returns a copy of what was dispatched.
    pub async fn emit_new_association(
        &self,
        vulnerability: Vulnerability,
        component: Component,
        affected_projects: Vec<Project>,
    ) -> Notification {
        let notification = Self::new_vulnerability_notification(NewVulnerabilityIdentified {
            vulnerability,
            component,
            affected_projects,
        });
        self.bus.dispatch(notification.clone()).await;
        notification
    }

    pub fn new_vulnerability_notification(subject: NewVulnerabilityIdentified) -> Notification {
        Notification::new(
            NotificationScope::Portfolio,
            NotificationGroup::NewVulnerability,
            NotificationLevel::Informational,
            NEW_VULNERABILITY_TITLE.to_string(),
            NEW_VULNERABILITY_CONTENT.to_string(),
            subject,
        )
    }
}
