use crate::shared::error::AnalysisError;
use crate::shared::Result;
use serde::Serialize;
use std::fmt;

/// Maximum length of a package URL accepted for parsing (security limit)
const MAX_PURL_LENGTH: usize = 2048;

const PURL_SCHEME: &str = "pkg:";

/// Canonical package coordinate used as routing input.
///
/// The ecosystem is the package-URL `type` (e.g. `npm`, `maven`, `pypi`).
/// `None` means the origin is unknown, which is not the same as an empty
/// tag: empty tags are rejected at construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct PackageIdentifier {
    ecosystem: Option<String>,
    namespace: Option<String>,
    name: String,
    version: Option<String>,
}

impl PackageIdentifier {
    pub fn new(
        ecosystem: Option<String>,
        namespace: Option<String>,
        name: String,
        version: Option<String>,
    ) -> Result<Self> {
        if let Some(tag) = ecosystem.as_deref() {
            validate_ecosystem(tag)?;
        }
        if name.trim().is_empty() {
            return Err(validation("Package name cannot be empty"));
        }
        Ok(Self {
            ecosystem,
            namespace: namespace.filter(|ns| !ns.is_empty()),
            name,
            version: version.filter(|v| !v.is_empty()),
        })
    }

    /// Parses package-URL text: `pkg:type/namespace/name@version?qualifiers#subpath`.
    ///
    /// Qualifiers and subpath are accepted but dropped; routing never looks at them.
    pub fn parse(purl: &str) -> Result<Self> {
        let invalid = |reason: &str| AnalysisError::InvalidPackageUrl {
            input: purl.to_string(),
            reason: reason.to_string(),
        };

        if purl.len() > MAX_PURL_LENGTH {
            return Err(invalid("package URL is too long").into());
        }

        let scheme = purl
            .get(..PURL_SCHEME.len())
            .filter(|s| s.eq_ignore_ascii_case(PURL_SCHEME))
            .ok_or_else(|| invalid("missing 'pkg:' scheme"))?;
        let rest = &purl[scheme.len()..];

        let rest = rest.split_once('#').map_or(rest, |(before, _)| before);
        let rest = rest.split_once('?').map_or(rest, |(before, _)| before);
        let rest = rest.trim_start_matches('/');

        let (ecosystem, path) = rest
            .split_once('/')
            .ok_or_else(|| invalid("missing package type or name"))?;
        validate_ecosystem(ecosystem).map_err(|e| invalid(&e.to_string()))?;

        // '@' only separates the version inside the last path segment, so npm
        // scopes such as `@angular/core` survive.
        let path = path.trim_end_matches('/');
        let last_slash = path.rfind('/').map_or(0, |i| i + 1);
        let (path, version) = match path[last_slash..].rfind('@') {
            Some(at) => {
                let at = last_slash + at;
                (&path[..at], Some(decode(&path[at + 1..], purl)?))
            }
            None => (path, None),
        };

        let (namespace, name) = match path.rsplit_once('/') {
            Some((namespace, name)) => (Some(decode(namespace, purl)?), decode(name, purl)?),
            None => (None, decode(path, purl)?),
        };
        if name.is_empty() {
            return Err(invalid("package name is empty").into());
        }

        Self::new(Some(ecosystem.to_string()), namespace, name, version)
    }

    /// Like [`parse`](Self::parse), but malformed input yields `None` so the
    /// component is routed as one without an identifier.
    pub fn parse_lenient(purl: &str) -> Option<Self> {
        Self::parse(purl).ok()
    }

    pub fn ecosystem(&self) -> Option<&str> {
        self.ecosystem.as_deref()
    }

    /// Case-insensitive comparison of the ecosystem tag.
    pub fn has_ecosystem(&self, tag: &str) -> bool {
        self.ecosystem
            .as_deref()
            .is_some_and(|eco| eco.eq_ignore_ascii_case(tag))
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }
}

impl fmt::Display for PackageIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ecosystem) = &self.ecosystem {
            write!(f, "{}{}/", PURL_SCHEME, ecosystem)?;
        }
        if let Some(namespace) = &self.namespace {
            write!(f, "{}/", namespace)?;
        }
        write!(f, "{}", self.name)?;
        if let Some(version) = &self.version {
            write!(f, "@{}", version)?;
        }
        Ok(())
    }
}

fn validate_ecosystem(tag: &str) -> Result<()> {
    if tag.is_empty() {
        return Err(validation("Ecosystem tag cannot be empty"));
    }
    let valid = tag
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '+' || c == '-')
        && !tag.starts_with(|c: char| c.is_ascii_digit());
    if !valid {
        return Err(validation(&format!(
            "Ecosystem tag '{}' contains invalid characters",
            tag
        )));
    }
    Ok(())
}

fn decode(segment: &str, purl: &str) -> Result<String> {
    urlencoding::decode(segment)
        .map(|s| s.into_owned())
        .map_err(|e| {
            AnalysisError::InvalidPackageUrl {
                input: purl.to_string(),
                reason: format!("invalid percent-encoding: {}", e),
            }
            .into()
        })
}

fn validation(message: &str) -> anyhow::Error {
    AnalysisError::Validation {
        message: message.to_string(),
    }
    .into()
}
