use crate::portfolio_analysis::domain::{Component, Vulnerability};
use crate::shared::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// VulnerabilityFinder port: the concrete scanning engine behind an analyzer
///
/// Detection logic (advisory matching, version ranges, remote audit APIs)
/// lives entirely in the implementation.
#[async_trait]
pub trait VulnerabilityFinder: Send + Sync {
    /// Vulnerabilities affecting the component; empty when it is clean
    async fn find(&self, component: &Component) -> Result<Vec<Vulnerability>>;
}

#[async_trait]
impl<F: VulnerabilityFinder + ?Sized> VulnerabilityFinder for Arc<F> {
    async fn find(&self, component: &Component) -> Result<Vec<Vulnerability>> {
        (**self).find(component).await
    }
}
