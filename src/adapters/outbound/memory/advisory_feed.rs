use crate::portfolio_analysis::domain::{Component, Vulnerability, VulnerabilityId};
use crate::ports::outbound::VulnerabilityFinder;
use crate::shared::error::AnalysisError;
use crate::shared::Result;
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;

/// Advisory feed document
///
/// ```json
/// {
///   "advisories": [
///     { "id": "GHSA-35jh-r3h4-6jhm", "source": "GITHUB", "ecosystem": "npm",
///       "name": "lodash", "versions": ["4.17.20"] },
///     { "id": "CVE-2022-37434", "source": "NVD", "name": "zlib", "versions": ["1.2.12"] }
///   ]
/// }
/// ```
///
/// An advisory without `ecosystem` matches components by plain name and
/// version, which is how components lacking a package URL get findings.
/// An empty `versions` list matches every version.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AdvisoryFeed {
    #[serde(default)]
    pub advisories: Vec<Advisory>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Advisory {
    pub id: String,
    #[serde(default = "default_source")]
    pub source: String,
    #[serde(default)]
    pub ecosystem: Option<String>,
    #[serde(default)]
    pub namespace: Option<String>,
    pub name: String,
    #[serde(default)]
    pub versions: Vec<String>,
}

fn default_source() -> String {
    "INTERNAL".to_string()
}

impl AdvisoryFeed {
    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(|e| {
            AnalysisError::Validation {
                message: format!("Invalid advisory feed: {}", e),
            }
            .into()
        })
    }
}

impl Advisory {
    fn affects_version(&self, version: Option<&str>) -> bool {
        self.versions.is_empty()
            || version.is_some_and(|v| self.versions.iter().any(|affected| affected == v))
    }
}

/// Lookup key: lowercase ecosystem (or none) and lowercase package name
type FeedKey = (Option<String>, String);

/// AdvisoryFeedFinder is a VulnerabilityFinder over a static advisory feed.
///
/// Matching is exact: ecosystem (case-insensitive), namespace, name and
/// version. It stands in for a real scanning engine in the CLI and in tests.
pub struct AdvisoryFeedFinder {
    index: HashMap<FeedKey, Vec<Advisory>>,
}

impl AdvisoryFeedFinder {
    pub fn new(feed: AdvisoryFeed) -> Self {
        let mut index: HashMap<FeedKey, Vec<Advisory>> = HashMap::new();
        for advisory in feed.advisories {
            let key = (
                advisory.ecosystem.as_deref().map(str::to_ascii_lowercase),
                advisory.name.to_ascii_lowercase(),
            );
            index.entry(key).or_default().push(advisory);
        }
        Self { index }
    }

    pub fn empty() -> Self {
        Self::new(AdvisoryFeed::default())
    }

    pub fn advisory_count(&self) -> usize {
        self.index.values().map(Vec::len).sum()
    }

    fn matches(&self, component: &Component) -> Vec<&Advisory> {
        match component.package_identifier() {
            Some(purl) => {
                let key = (
                    purl.ecosystem().map(str::to_ascii_lowercase),
                    purl.name().to_ascii_lowercase(),
                );
                let version = purl.version().or(component.version());
                self.index
                    .get(&key)
                    .into_iter()
                    .flatten()
                    .filter(|a| a.namespace.as_deref() == purl.namespace())
                    .filter(|a| a.affects_version(version))
                    .collect()
            }
            None => {
                let key = (None, component.name().to_ascii_lowercase());
                self.index
                    .get(&key)
                    .into_iter()
                    .flatten()
                    .filter(|a| a.affects_version(component.version()))
                    .collect()
            }
        }
    }
}

#[async_trait]
impl VulnerabilityFinder for AdvisoryFeedFinder {
    async fn find(&self, component: &Component) -> Result<Vec<Vulnerability>> {
        let found: Vec<Vulnerability> = self
            .matches(component)
            .into_iter()
            .map(|a| Vulnerability::new(VulnerabilityId::new(a.id.clone()), a.source.clone()))
            .collect();
        if !found.is_empty() {
            tracing::debug!(
                component = %component,
                findings = found.len(),
                "Advisory feed matched component"
            );
        }
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::portfolio_analysis::domain::{ComponentId, PackageIdentifier};

    const FEED: &str = r#"{
        "advisories": [
            { "id": "GHSA-1", "source": "GITHUB", "ecosystem": "npm", "name": "lodash", "versions": ["4.17.20"] },
            { "id": "GHSA-2", "ecosystem": "npm", "namespace": "@angular", "name": "core" },
            { "id": "CVE-3", "source": "NVD", "name": "zlib", "versions": ["1.2.12"] }
        ]
    }"#;

    fn finder() -> AdvisoryFeedFinder {
        AdvisoryFeedFinder::new(AdvisoryFeed::from_json(FEED).unwrap())
    }

    fn component(name: &str, version: Option<&str>, purl: Option<&str>) -> Component {
        Component::new(
            ComponentId::new(1),
            name.to_string(),
            version.map(str::to_string),
            purl.and_then(PackageIdentifier::parse_lenient),
        )
    }

    async fn ids(component: Component) -> Vec<String> {
        finder()
            .find(&component)
            .await
            .unwrap()
            .into_iter()
            .map(|v| v.id().to_string())
            .collect()
    }

    #[tokio::test]
    async fn test_matches_by_ecosystem_name_and_version() {
        assert_eq!(
            ids(component("lodash", None, Some("pkg:npm/lodash@4.17.20"))).await,
            vec!["GHSA-1"]
        );
        assert!(ids(component("lodash", None, Some("pkg:npm/lodash@4.17.21")))
            .await
            .is_empty());
        assert!(ids(component("lodash", None, Some("pkg:maven/lodash@4.17.20")))
            .await
            .is_empty());
    }

    #[tokio::test]
    async fn test_namespace_must_match_and_empty_versions_match_all() {
        assert_eq!(
            ids(component("core", None, Some("pkg:npm/%40angular/core@16.0.0"))).await,
            vec!["GHSA-2"]
        );
        assert!(ids(component("core", None, Some("pkg:npm/core@16.0.0")))
            .await
            .is_empty());
    }

    #[tokio::test]
    async fn test_components_without_identifier_match_plain_advisories() {
        assert_eq!(ids(component("zlib", Some("1.2.12"), None)).await, vec!["CVE-3"]);
        assert!(ids(component("zlib", Some("1.3"), None)).await.is_empty());
        assert!(ids(component("lodash", Some("4.17.20"), None)).await.is_empty());
    }

    #[test]
    fn test_feed_defaults_and_rejects_unknown_fields() {
        let finder = finder();
        assert_eq!(finder.advisory_count(), 3);
        assert_eq!(AdvisoryFeedFinder::empty().advisory_count(), 0);

        let bad = AdvisoryFeed::from_json(r#"{ "advisories": [{ "id": "X", "name": "y", "severity": "high" }] }"#);
        assert!(bad.is_err());
    }
}
