//! Configuration file support for portfolio-analyzer.
//!
//! Provides YAML-based configuration through `portfolio-analyzer.config.yml`
//! files, including data structures, file loading, and validation.

use anyhow::{bail, Context};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

use crate::application::dto::{
    ScanOptions, DEFAULT_FETCH_RETRIES, DEFAULT_PAGE_SIZE, DEFAULT_RETRY_BACKOFF,
};
use crate::portfolio_analysis::policies::{AnalyzerDefinition, AnalyzerRegistry};
use crate::shared::security::read_checked;
use crate::shared::Result;

pub const CONFIG_FILENAME: &str = "portfolio-analyzer.config.yml";

/// Top-level configuration file schema.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    pub page_size: Option<usize>,
    pub fail_fast: Option<bool>,
    /// Retries for a page fetch that failed with a non-fatal error
    pub fetch_retries: Option<u32>,
    pub analyzers: Option<Vec<AnalyzerEntry>>,
    /// Captures unknown fields for warnings.
    #[serde(flatten)]
    pub unknown_fields: HashMap<String, serde_yaml_ng::Value>,
}

/// One analyzer in the `analyzers` list.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnalyzerEntry {
    pub name: String,
    pub kind: AnalyzerKind,
    pub ecosystem: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnalyzerKind {
    GeneralPurpose,
    Ecosystem,
}

impl AnalyzerEntry {
    fn to_definition(&self, index: usize) -> Result<AnalyzerDefinition> {
        match (self.kind, self.ecosystem.as_deref()) {
            (AnalyzerKind::GeneralPurpose, None) => {
                Ok(AnalyzerDefinition::general_purpose(self.name.clone()))
            }
            (AnalyzerKind::GeneralPurpose, Some(_)) => bail!(
                "Invalid config: analyzers[{}] ('{}') is general-purpose but sets 'ecosystem'.\n\n\
                 💡 Hint: Remove 'ecosystem' or change 'kind' to 'ecosystem'.",
                index,
                self.name
            ),
            (AnalyzerKind::Ecosystem, Some(tag)) => {
                Ok(AnalyzerDefinition::ecosystem(self.name.clone(), tag))
            }
            (AnalyzerKind::Ecosystem, None) => bail!(
                "Invalid config: analyzers[{}] ('{}') has kind 'ecosystem' but no 'ecosystem' tag.\n\n\
                 💡 Hint: Add e.g. `ecosystem: npm`.",
                index,
                self.name
            ),
        }
    }
}

/// The analyzers used when no configuration lists any: one general-purpose
/// engine plus a dedicated npm auditor.
pub fn default_analyzers() -> Vec<AnalyzerDefinition> {
    vec![
        AnalyzerDefinition::general_purpose("dependency-check"),
        AnalyzerDefinition::ecosystem("npm-audit", "npm"),
    ]
}

impl ConfigFile {
    /// Builds the analyzer registry, falling back to [`default_analyzers`].
    pub fn registry(&self) -> Result<AnalyzerRegistry> {
        let definitions = match &self.analyzers {
            Some(entries) => entries
                .iter()
                .enumerate()
                .map(|(i, entry)| entry.to_definition(i))
                .collect::<Result<Vec<_>>>()?,
            None => default_analyzers(),
        };
        AnalyzerRegistry::new(definitions)
    }

    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions::new(
            self.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
            self.fail_fast.unwrap_or(false),
        )
        .with_fetch_retries(
            self.fetch_retries.unwrap_or(DEFAULT_FETCH_RETRIES),
            DEFAULT_RETRY_BACKOFF,
        )
    }
}

/// Load config from an explicit path. Returns an error if the file is not found.
pub fn load_config_from_path(path: &Path) -> Result<ConfigFile> {
    let content = read_checked(path, "config file").with_context(|| {
        format!(
            "Failed to read config file: {}\n\n💡 Hint: Check that the file exists and is readable.",
            path.display()
        )
    })?;

    let config: ConfigFile = serde_yaml_ng::from_str(&content).with_context(|| {
        format!(
            "Failed to parse config file: {}\n\n💡 Hint: Ensure the file contains valid YAML syntax.",
            path.display()
        )
    })?;

    validate_config(&config)?;
    warn_unknown_fields(&config);

    Ok(config)
}

/// Auto-discover config in a directory. Returns `None` silently if not found.
pub fn discover_config(dir: &Path) -> Result<Option<ConfigFile>> {
    let config_path = dir.join(CONFIG_FILENAME);

    if !config_path.exists() {
        return Ok(None);
    }

    let config = load_config_from_path(&config_path)?;
    Ok(Some(config))
}

/// Validate the loaded configuration.
fn validate_config(config: &ConfigFile) -> Result<()> {
    if config.page_size == Some(0) {
        bail!(
            "Invalid config: page_size must be greater than 0.\n\n\
             💡 Hint: Omit page_size to use the default of {}.",
            DEFAULT_PAGE_SIZE
        );
    }
    if let Some(entries) = &config.analyzers {
        for (i, entry) in entries.iter().enumerate() {
            if entry.name.trim().is_empty() {
                bail!(
                    "Invalid config: analyzers[{}].name must not be empty.\n\n\
                     💡 Hint: Each analyzer needs a unique name (e.g., \"dependency-check\").",
                    i
                );
            }
        }
    }
    config.registry().map(|_| ())
}

/// Warn about unknown fields in the config file.
fn warn_unknown_fields(config: &ConfigFile) {
    for key in config.unknown_fields.keys() {
        tracing::warn!(field = %key, "Unknown config field will be ignored");
        eprintln!("⚠️  Warning: Unknown config field '{}' will be ignored.", key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::portfolio_analysis::domain::PackageIdentifier;
    use crate::portfolio_analysis::policies::AnalyzerIdentity;
    use crate::shared::error::AnalysisError;
    use std::fs;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, content: &str) -> std::path::PathBuf {
        let path = dir.path().join("config.yml");
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_valid_config() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            r#"
page_size: 250
fail_fast: true
fetch_retries: 5
analyzers:
  - name: dependency-check
    kind: general-purpose
  - name: npm-audit
    kind: ecosystem
    ecosystem: npm
  - name: pip-audit
    kind: ecosystem
    ecosystem: pypi
"#,
        );

        let config = load_config_from_path(&path).unwrap();
        assert_eq!(
            config.scan_options(),
            ScanOptions::new(250, true).with_fetch_retries(5, DEFAULT_RETRY_BACKOFF)
        );

        let registry = config.registry().unwrap();
        assert_eq!(registry.definitions().len(), 3);
        let requests = PackageIdentifier::parse("pkg:pypi/requests@2.31.0").unwrap();
        assert!(registry.should_analyze(&AnalyzerIdentity::new("pip-audit"), Some(&requests)));
        assert!(!registry.should_analyze(
            &AnalyzerIdentity::new("dependency-check"),
            Some(&requests)
        ));
    }

    #[test]
    fn test_defaults_when_sections_are_missing() {
        let config = ConfigFile::default();
        assert_eq!(config.scan_options(), ScanOptions::default());

        let registry = config.registry().unwrap();
        assert_eq!(registry.general_purpose().as_str(), "dependency-check");
        assert!(registry.contains(&AnalyzerIdentity::new("npm-audit")));
    }

    #[test]
    fn test_discover_config_found() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME), "page_size: 10\n").unwrap();

        let config = discover_config(dir.path()).unwrap().unwrap();
        assert_eq!(config.page_size, Some(10));
    }

    #[test]
    fn test_discover_config_not_found() {
        let dir = TempDir::new().unwrap();
        assert!(discover_config(dir.path()).unwrap().is_none());
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config_from_path(Path::new("/nonexistent/config.yml"));
        let err = format!("{}", result.unwrap_err());
        assert!(err.contains("Failed to read config file"));
    }

    #[test]
    fn test_load_config_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "invalid: yaml: [[[broken");

        let err = format!("{}", load_config_from_path(&path).unwrap_err());
        assert!(err.contains("Failed to parse config file"));
    }

    #[test]
    fn test_zero_page_size_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "page_size: 0\n");

        let err = format!("{}", load_config_from_path(&path).unwrap_err());
        assert!(err.contains("page_size must be greater than 0"));
    }

    #[test]
    fn test_ecosystem_kind_requires_tag() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            r#"
analyzers:
  - name: dependency-check
    kind: general-purpose
  - name: npm-audit
    kind: ecosystem
"#,
        );

        let err = format!("{}", load_config_from_path(&path).unwrap_err());
        assert!(err.contains("analyzers[1]"));
        assert!(err.contains("no 'ecosystem' tag"));
    }

    #[test]
    fn test_empty_analyzer_name_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            r#"
analyzers:
  - name: "  "
    kind: general-purpose
"#,
        );

        let err = format!("{}", load_config_from_path(&path).unwrap_err());
        assert!(err.contains("must not be empty"));
    }

    #[test]
    fn test_registry_conflicts_surface_as_configuration_errors() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            r#"
analyzers:
  - name: dependency-check
    kind: general-purpose
  - name: npm-audit
    kind: ecosystem
    ecosystem: npm
  - name: yarn-audit
    kind: ecosystem
    ecosystem: NPM
"#,
        );

        let err = load_config_from_path(&path).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<AnalysisError>(),
            Some(AnalysisError::Configuration { .. })
        ));
    }

    #[test]
    fn test_unknown_kind_is_a_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            r#"
analyzers:
  - name: dependency-check
    kind: fallback
"#,
        );
        assert!(load_config_from_path(&path).is_err());
    }

    #[test]
    fn test_unknown_fields_warning() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            r#"
page_size: 100
unknown_field: true
another_unknown: value
"#,
        );

        let config = load_config_from_path(&path).unwrap();
        assert_eq!(config.unknown_fields.len(), 2);
        assert!(config.unknown_fields.contains_key("unknown_field"));
        assert!(config.unknown_fields.contains_key("another_unknown"));
    }
}
