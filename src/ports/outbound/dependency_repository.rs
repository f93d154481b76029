use crate::portfolio_analysis::domain::{ComponentId, Dependency};
use crate::shared::Result;
use async_trait::async_trait;

/// DependencyRepository port for looking up which projects use a component
#[async_trait]
pub trait DependencyRepository: Send + Sync {
    /// Every dependency row referencing the component.
    ///
    /// The same project may appear in several rows; callers deduplicate.
    async fn dependencies_of(&self, component: ComponentId) -> Result<Vec<Dependency>>;
}
