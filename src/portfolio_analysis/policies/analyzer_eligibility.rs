use crate::portfolio_analysis::domain::PackageIdentifier;
use crate::shared::error::AnalysisError;
use crate::shared::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Name an analyzer registers under (e.g. `dependency-check`, `npm-audit`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnalyzerIdentity(String);

impl AnalyzerIdentity {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AnalyzerIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What an analyzer declares it is responsible for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClaimRule {
    /// Fallback: components without an identifier, plus every ecosystem no
    /// specialized analyzer has reserved.
    GeneralPurpose,
    /// Exactly one ecosystem tag, compared case-insensitively.
    Ecosystem(String),
}

/// One registry entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzerDefinition {
    pub identity: AnalyzerIdentity,
    pub rule: ClaimRule,
}

impl AnalyzerDefinition {
    pub fn general_purpose(name: impl Into<String>) -> Self {
        Self {
            identity: AnalyzerIdentity::new(name),
            rule: ClaimRule::GeneralPurpose,
        }
    }

    pub fn ecosystem(name: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            identity: AnalyzerIdentity::new(name),
            rule: ClaimRule::Ecosystem(tag.into()),
        }
    }
}

/// Decides which analyzer owns which component.
///
/// Built once from configuration and immutable afterwards. Construction
/// rejects any table that would leave a component with zero or two owners:
///
/// - exactly one general-purpose analyzer
/// - each ecosystem tag reserved by at most one specialized analyzer
/// - unique analyzer names, non-empty tags
///
/// With those checks passed, [`should_analyze`](Self::should_analyze) is a
/// total, pure function and every component is claimed by exactly one analyzer.
#[derive(Debug, Clone)]
pub struct AnalyzerRegistry {
    definitions: Vec<AnalyzerDefinition>,
    rules: HashMap<AnalyzerIdentity, ClaimRule>,
    // lowercase tag -> owning analyzer
    reserved: HashMap<String, AnalyzerIdentity>,
    fallback: AnalyzerIdentity,
}

impl AnalyzerRegistry {
    pub fn new(definitions: Vec<AnalyzerDefinition>) -> Result<Self> {
        let mut rules = HashMap::new();
        let mut reserved: HashMap<String, AnalyzerIdentity> = HashMap::new();
        let mut general_purpose: Vec<AnalyzerIdentity> = Vec::new();

        for definition in &definitions {
            let name = definition.identity.as_str();
            if name.trim().is_empty() {
                return Err(AnalysisError::configuration(
                    "analyzer name must not be empty",
                    "Give every analyzer a unique, non-empty name",
                )
                .into());
            }
            if rules
                .insert(definition.identity.clone(), definition.rule.clone())
                .is_some()
            {
                return Err(AnalysisError::configuration(
                    format!("analyzer '{}' is defined more than once", name),
                    "Remove the duplicate analyzer entry",
                )
                .into());
            }

            match &definition.rule {
                ClaimRule::GeneralPurpose => general_purpose.push(definition.identity.clone()),
                ClaimRule::Ecosystem(tag) => {
                    let key = tag.trim().to_ascii_lowercase();
                    if key.is_empty() {
                        return Err(AnalysisError::configuration(
                            format!("analyzer '{}' reserves an empty ecosystem tag", name),
                            "Set 'ecosystem' to a package-URL type such as \"npm\"",
                        )
                        .into());
                    }
                    if let Some(existing) = reserved.get(&key) {
                        return Err(AnalysisError::configuration(
                            format!(
                                "ecosystem '{}' is claimed by both '{}' and '{}'",
                                key, existing, name
                            ),
                            "Give each ecosystem exactly one specialized analyzer",
                        )
                        .into());
                    }
                    reserved.insert(key, definition.identity.clone());
                }
            }
        }

        let fallback = match general_purpose.as_slice() {
            [single] => single.clone(),
            [] => {
                return Err(AnalysisError::configuration(
                    "no general-purpose analyzer is configured; components without a package URL and unreserved ecosystems would never be analyzed",
                    "Add one analyzer with kind 'general-purpose'",
                )
                .into())
            }
            many => {
                let names: Vec<&str> = many.iter().map(AnalyzerIdentity::as_str).collect();
                return Err(AnalysisError::configuration(
                    format!(
                        "multiple general-purpose analyzers configured: {}",
                        names.join(", ")
                    ),
                    "Keep exactly one general-purpose analyzer; give the others an 'ecosystem'",
                )
                .into());
            }
        };

        Ok(Self {
            definitions,
            rules,
            reserved,
            fallback,
        })
    }

    /// Returns whether `analyzer` should process a component with the given identifier.
    ///
    /// Never fails: an unknown analyzer claims nothing.
    pub fn should_analyze(
        &self,
        analyzer: &AnalyzerIdentity,
        package_identifier: Option<&PackageIdentifier>,
    ) -> bool {
        match self.rules.get(analyzer) {
            Some(ClaimRule::GeneralPurpose) => match package_identifier {
                None => true,
                Some(purl) => !self.is_reserved(purl),
            },
            Some(ClaimRule::Ecosystem(tag)) => {
                package_identifier.is_some_and(|purl| purl.has_ecosystem(tag.trim()))
            }
            None => false,
        }
    }

    /// The single analyzer that owns a component with this identifier
    pub fn owner_of(&self, package_identifier: Option<&PackageIdentifier>) -> &AnalyzerIdentity {
        package_identifier
            .and_then(|purl| purl.ecosystem())
            .and_then(|eco| self.reserved.get(&eco.to_ascii_lowercase()))
            .unwrap_or(&self.fallback)
    }

    pub fn general_purpose(&self) -> &AnalyzerIdentity {
        &self.fallback
    }

    pub fn contains(&self, analyzer: &AnalyzerIdentity) -> bool {
        self.rules.contains_key(analyzer)
    }

    /// Definitions in configuration order
    pub fn definitions(&self) -> &[AnalyzerDefinition] {
        &self.definitions
    }

    fn is_reserved(&self, purl: &PackageIdentifier) -> bool {
        purl.ecosystem()
            .is_some_and(|eco| self.reserved.contains_key(&eco.to_ascii_lowercase()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_registry() -> AnalyzerRegistry {
        AnalyzerRegistry::new(vec![
            AnalyzerDefinition::general_purpose("dependency-check"),
            AnalyzerDefinition::ecosystem("npm-audit", "npm"),
        ])
        .unwrap()
    }

    fn purl(text: &str) -> PackageIdentifier {
        PackageIdentifier::parse(text).unwrap()
    }

    fn general() -> AnalyzerIdentity {
        AnalyzerIdentity::new("dependency-check")
    }

    fn npm() -> AnalyzerIdentity {
        AnalyzerIdentity::new("npm-audit")
    }

    #[test]
    fn test_specialized_claims_its_ecosystem_case_insensitively() {
        let registry = default_registry();
        for text in ["pkg:npm/lodash@4.17.20", "pkg:NPM/lodash@4.17.20", "pkg:Npm/x"] {
            let id = purl(text);
            assert!(registry.should_analyze(&npm(), Some(&id)), "{}", text);
            assert!(!registry.should_analyze(&general(), Some(&id)), "{}", text);
        }
    }

    #[test]
    fn test_absent_identifier_goes_to_general_purpose() {
        let registry = default_registry();
        assert!(registry.should_analyze(&general(), None));
        assert!(!registry.should_analyze(&npm(), None));
    }

    #[test]
    fn test_identifier_without_ecosystem_goes_to_general_purpose() {
        let registry = default_registry();
        let id = PackageIdentifier::new(None, None, "openssl".to_string(), None).unwrap();
        assert!(registry.should_analyze(&general(), Some(&id)));
        assert!(!registry.should_analyze(&npm(), Some(&id)));
    }

    #[test]
    fn test_unreserved_ecosystem_goes_to_general_purpose() {
        let registry = default_registry();
        let id = purl("pkg:maven/org.apache.commons/commons-text@1.9");
        assert!(registry.should_analyze(&general(), Some(&id)));
        assert!(!registry.should_analyze(&npm(), Some(&id)));
    }

    #[test]
    fn test_unknown_analyzer_claims_nothing() {
        let registry = default_registry();
        let stranger = AnalyzerIdentity::new("ossindex");
        assert!(!registry.should_analyze(&stranger, None));
        assert!(!registry.should_analyze(&stranger, Some(&purl("pkg:npm/a@1"))));
    }

    #[test]
    fn test_routing_is_total_and_exclusive() {
        let registry = AnalyzerRegistry::new(vec![
            AnalyzerDefinition::general_purpose("dependency-check"),
            AnalyzerDefinition::ecosystem("npm-audit", "npm"),
            AnalyzerDefinition::ecosystem("cargo-audit", "Cargo"),
        ])
        .unwrap();

        let inputs = vec![
            None,
            Some(purl("pkg:npm/lodash@1")),
            Some(purl("pkg:cargo/serde@1.0.0")),
            Some(purl("pkg:CARGO/tokio@1.0.0")),
            Some(purl("pkg:pypi/requests@2.31.0")),
            Some(PackageIdentifier::new(None, None, "zlib".to_string(), None).unwrap()),
        ];

        for input in &inputs {
            let claimants: Vec<&AnalyzerIdentity> = registry
                .definitions()
                .iter()
                .map(|d| &d.identity)
                .filter(|identity| registry.should_analyze(identity, input.as_ref()))
                .collect();
            assert_eq!(claimants.len(), 1, "input {:?} claimed by {:?}", input, claimants);
            assert_eq!(claimants[0], registry.owner_of(input.as_ref()));
        }
    }

    #[test]
    fn test_owner_of() {
        let registry = default_registry();
        assert_eq!(registry.owner_of(None), &general());
        assert_eq!(registry.owner_of(Some(&purl("pkg:NPM/a@1"))), &npm());
        assert_eq!(registry.owner_of(Some(&purl("pkg:gem/rails@7"))), &general());
    }

    #[test]
    fn test_duplicate_ecosystem_is_configuration_error() {
        let err = AnalyzerRegistry::new(vec![
            AnalyzerDefinition::general_purpose("dependency-check"),
            AnalyzerDefinition::ecosystem("npm-audit", "npm"),
            AnalyzerDefinition::ecosystem("other-npm", "NPM"),
        ])
        .unwrap_err();
        let analysis = err.downcast_ref::<AnalysisError>().unwrap();
        assert!(matches!(analysis, AnalysisError::Configuration { .. }));
        assert!(err.to_string().contains("claimed by both"));
    }

    #[test]
    fn test_missing_general_purpose_is_configuration_error() {
        let err = AnalyzerRegistry::new(vec![AnalyzerDefinition::ecosystem("npm-audit", "npm")])
            .unwrap_err();
        assert!(err.to_string().contains("no general-purpose analyzer"));
    }

    #[test]
    fn test_multiple_general_purpose_is_configuration_error() {
        let err = AnalyzerRegistry::new(vec![
            AnalyzerDefinition::general_purpose("dependency-check"),
            AnalyzerDefinition::general_purpose("ossindex"),
        ])
        .unwrap_err();
        assert!(err.to_string().contains("dependency-check, ossindex"));
    }

    #[test]
    fn test_duplicate_name_is_configuration_error() {
        let err = AnalyzerRegistry::new(vec![
            AnalyzerDefinition::general_purpose("dependency-check"),
            AnalyzerDefinition::ecosystem("dependency-check", "npm"),
        ])
        .unwrap_err();
        assert!(err.to_string().contains("defined more than once"));
    }

    #[test]
    fn test_empty_tag_and_empty_name_are_configuration_errors() {
        assert!(AnalyzerRegistry::new(vec![
            AnalyzerDefinition::general_purpose("dependency-check"),
            AnalyzerDefinition::ecosystem("npm-audit", "  "),
        ])
        .is_err());
        assert!(AnalyzerRegistry::new(vec![AnalyzerDefinition::general_purpose("")]).is_err());
    }
}
