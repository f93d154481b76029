use crate::portfolio_analysis::domain::{
    Component, ComponentId, PackageIdentifier, Project, ProjectId, VulnerabilityId,
};
use crate::shared::error::AnalysisError;
use crate::shared::Result;
use serde::{Deserialize, Serialize};

/// JSON document describing a portfolio: projects, their components and the
/// associations already known from earlier runs.
///
/// ```json
/// {
///   "projects": [{ "id": 1, "name": "web", "version": "2.3.0" }],
///   "components": [{ "id": 10, "name": "lodash", "version": "4.17.20", "purl": "pkg:npm/lodash@4.17.20" }],
///   "dependencies": [{ "project": 1, "component": 10 }],
///   "associations": [{ "vulnerability": "CVE-2021-23337", "component": 10 }]
/// }
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PortfolioSnapshot {
    #[serde(default)]
    pub projects: Vec<ProjectRecord>,
    #[serde(default)]
    pub components: Vec<ComponentRecord>,
    #[serde(default)]
    pub dependencies: Vec<DependencyRecord>,
    #[serde(default)]
    pub associations: Vec<AssociationRecord>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProjectRecord {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub version: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ComponentRecord {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub version: Option<String>,
    /// Package URL; a malformed value is kept as "no identifier"
    #[serde(default)]
    pub purl: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DependencyRecord {
    pub project: u64,
    pub component: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AssociationRecord {
    pub vulnerability: String,
    pub component: u64,
}

impl PortfolioSnapshot {
    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(|e| {
            AnalysisError::Validation {
                message: format!("Invalid portfolio snapshot: {}", e),
            }
            .into()
        })
    }
}

impl ProjectRecord {
    pub fn to_project(&self) -> Project {
        Project::new(ProjectId::new(self.id), self.name.clone(), self.version.clone())
    }
}

impl ComponentRecord {
    pub fn to_component(&self) -> Component {
        let package_identifier = self.purl.as_deref().and_then(|purl| {
            let parsed = PackageIdentifier::parse_lenient(purl);
            if parsed.is_none() {
                tracing::warn!(component = self.id, purl, "Ignoring malformed package URL");
            }
            parsed
        });
        Component::new(
            ComponentId::new(self.id),
            self.name.clone(),
            self.version.clone(),
            package_identifier,
        )
    }
}

impl AssociationRecord {
    pub fn key(&self) -> (VulnerabilityId, ComponentId) {
        (
            VulnerabilityId::new(self.vulnerability.clone()),
            ComponentId::new(self.component),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_snapshot() {
        let json = r#"{
            "projects": [{ "id": 1, "name": "web" }],
            "components": [
                { "id": 10, "name": "lodash", "version": "4.17.20", "purl": "pkg:npm/lodash@4.17.20" },
                { "id": 11, "name": "zlib", "purl": "not a purl" }
            ],
            "dependencies": [{ "project": 1, "component": 10 }],
            "associations": [{ "vulnerability": "CVE-1", "component": 10 }]
        }"#;

        let snapshot = PortfolioSnapshot::from_json(json).unwrap();
        assert_eq!(snapshot.projects.len(), 1);
        assert_eq!(snapshot.components.len(), 2);

        let lodash = snapshot.components[0].to_component();
        assert!(lodash.package_identifier().unwrap().has_ecosystem("npm"));
        let zlib = snapshot.components[1].to_component();
        assert!(zlib.package_identifier().is_none());

        let (vulnerability, component) = snapshot.associations[0].key();
        assert_eq!(vulnerability.as_str(), "CVE-1");
        assert_eq!(component, ComponentId::new(10));
    }

    #[test]
    fn test_sections_are_optional() {
        let snapshot = PortfolioSnapshot::from_json("{}").unwrap();
        assert!(snapshot.components.is_empty());
        assert!(snapshot.associations.is_empty());
    }

    #[test]
    fn test_unknown_section_is_rejected() {
        let result = PortfolioSnapshot::from_json(r#"{ "packages": [] }"#);
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Invalid portfolio snapshot"));
    }
}
