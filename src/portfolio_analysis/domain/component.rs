use super::PackageIdentifier;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable, ordered identity of an inventory component.
///
/// Pages are fetched in ascending `ComponentId` order, so the ordering here is
/// what keeps a scan from revisiting or skipping components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComponentId(u64);

impl ComponentId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Inventory item owned by the inventory repository; the core only reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Component {
    id: ComponentId,
    name: String,
    version: Option<String>,
    package_identifier: Option<PackageIdentifier>,
}

impl Component {
    pub fn new(
        id: ComponentId,
        name: String,
        version: Option<String>,
        package_identifier: Option<PackageIdentifier>,
    ) -> Self {
        Self {
            id,
            name,
            version,
            package_identifier,
        }
    }

    pub fn id(&self) -> ComponentId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn package_identifier(&self) -> Option<&PackageIdentifier> {
        self.package_identifier.as_ref()
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.package_identifier, &self.version) {
            (Some(purl), _) => write!(f, "{} (#{})", purl, self.id),
            (None, Some(version)) => write!(f, "{}@{} (#{})", self.name, version, self.id),
            (None, None) => write!(f, "{} (#{})", self.name, self.id),
        }
    }
}
