use super::ComponentId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of a project; deduplication of affected projects keys on this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(u64);

impl ProjectId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Logical grouping of components (an application, service, or product release)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Project {
    id: ProjectId,
    name: String,
    version: Option<String>,
}

impl Project {
    pub fn new(id: ProjectId, name: String, version: Option<String>) -> Self {
        Self { id, name, version }
    }

    pub fn id(&self) -> ProjectId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }
}

/// Join entity: exactly one project depends on exactly one component.
///
/// Several rows may link the same pair (e.g. direct and transitive use).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependency {
    project: Project,
    component_id: ComponentId,
}

impl Dependency {
    pub fn new(project: Project, component_id: ComponentId) -> Self {
        Self {
            project,
            component_id,
        }
    }

    pub fn project(&self) -> &Project {
        &self.project
    }

    pub fn component_id(&self) -> ComponentId {
        self.component_id
    }
}
