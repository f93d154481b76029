use crate::portfolio_analysis::domain::{ComponentId, VulnerabilityId};
use crate::shared::Result;
use async_trait::async_trait;

/// AssociationRepository port for recorded (vulnerability, component) pairs
///
/// # Concurrency contract
/// `record` must be an atomic insert-if-absent keyed on the pair (a unique
/// constraint, an upsert with conflict detection, or a key-scoped lock).
/// When several analyzers record the same pair concurrently, exactly one call
/// returns `true`. Notification gating relies on this.
#[async_trait]
pub trait AssociationRepository: Send + Sync {
    /// Whether the pair is already recorded
    async fn contains(
        &self,
        vulnerability: &VulnerabilityId,
        component: ComponentId,
    ) -> Result<bool>;

    /// Records the pair. Returns `true` only if this call created the record.
    async fn record(&self, vulnerability: &VulnerabilityId, component: ComponentId)
        -> Result<bool>;
}
