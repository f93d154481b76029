use crate::portfolio_analysis::domain::{Component, ComponentId};
use crate::shared::Result;
use async_trait::async_trait;

/// One page of the inventory, ordered ascending by [`ComponentId`].
///
/// `after` is a keyset cursor: the page holds components whose id is strictly
/// greater than it. `None` starts at the lowest id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub after: Option<ComponentId>,
    pub limit: usize,
}

impl PageRequest {
    pub fn first(limit: usize) -> Self {
        Self { after: None, limit }
    }

    pub fn after(last_seen: ComponentId, limit: usize) -> Self {
        Self {
            after: Some(last_seen),
            limit,
        }
    }
}

/// InventoryRepository port for paging through every known component
///
/// # Ordering contract
/// Implementations must return components sorted ascending by id, all with an
/// id greater than `request.after`, and at most `request.limit` of them. A
/// page shorter than the limit is allowed; an empty page means the inventory
/// is exhausted.
#[async_trait]
pub trait InventoryRepository: Send + Sync {
    /// Current number of components in the inventory
    async fn count(&self) -> Result<u64>;

    /// Fetches the next page of components
    ///
    /// # Errors
    /// Transient failures should be reported as
    /// [`AnalysisError::Repository`](crate::shared::error::AnalysisError::Repository);
    /// an unreachable store as `RepositoryUnavailable`.
    async fn fetch_page(&self, request: &PageRequest) -> Result<Vec<Component>>;
}
