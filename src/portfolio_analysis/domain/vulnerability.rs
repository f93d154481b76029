use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a known weakness, e.g. `CVE-2021-23337` or `GHSA-35jh-r3h4-6jhm`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VulnerabilityId(String);

impl VulnerabilityId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VulnerabilityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque vulnerability value. The core passes it through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Vulnerability {
    id: VulnerabilityId,
    source: String,
}

impl Vulnerability {
    pub fn new(id: VulnerabilityId, source: impl Into<String>) -> Self {
        Self {
            id,
            source: source.into(),
        }
    }

    pub fn id(&self) -> &VulnerabilityId {
        &self.id
    }

    /// Database the finding came from (NVD, GITHUB, NPM, OSV...)
    pub fn source(&self) -> &str {
        &self.source
    }
}
