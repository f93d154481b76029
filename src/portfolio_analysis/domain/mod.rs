pub mod component;
pub mod notification;
pub mod package_identifier;
pub mod project;
pub mod vulnerability;

pub use component::{Component, ComponentId};
pub use notification::{
    NewVulnerabilityIdentified, Notification, NotificationGroup, NotificationLevel,
    NotificationScope,
};
pub use package_identifier::PackageIdentifier;
pub use project::{Dependency, Project, ProjectId};
pub use vulnerability::{Vulnerability, VulnerabilityId};
