use super::{Component, Project, Vulnerability};
use serde::Serialize;
use uuid::Uuid;

/// Where the notification applies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationScope {
    Portfolio,
}

/// Category subscribers filter on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationGroup {
    NewVulnerability,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationLevel {
    Informational,
}

/// Payload of a "new vulnerability in inventory" notification.
///
/// `affected_projects` holds each project once, sorted by id, and may be empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewVulnerabilityIdentified {
    pub vulnerability: Vulnerability,
    pub component: Component,
    pub affected_projects: Vec<Project>,
}

/// Structured event handed to the notification bus
#[derive(Debug, Clone, Serialize)]
pub struct Notification {
    id: Uuid,
    timestamp: String,
    scope: NotificationScope,
    group: NotificationGroup,
    level: NotificationLevel,
    title: String,
    content: String,
    subject: NewVulnerabilityIdentified,
}

impl Notification {
    pub fn new(
        scope: NotificationScope,
        group: NotificationGroup,
        level: NotificationLevel,
        title: String,
        content: String,
        subject: NewVulnerabilityIdentified,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            scope,
            group,
            level,
            title,
            content,
            subject,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    pub fn scope(&self) -> NotificationScope {
        self.scope
    }

    pub fn group(&self) -> NotificationGroup {
        self.group
    }

    pub fn level(&self) -> NotificationLevel {
        self.level
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn subject(&self) -> &NewVulnerabilityIdentified {
        &self.subject
    }
}
