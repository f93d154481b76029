/// In-memory adapters for the repository and finder ports
mod advisory_feed;
mod portfolio_store;
mod snapshot;

pub use advisory_feed::{Advisory, AdvisoryFeed, AdvisoryFeedFinder};
pub use portfolio_store::InMemoryPortfolioStore;
pub use snapshot::{
    AssociationRecord, ComponentRecord, DependencyRecord, PortfolioSnapshot, ProjectRecord,
};
