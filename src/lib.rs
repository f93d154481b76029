//! portfolio-analyzer - portfolio-wide vulnerability analysis
//!
//! Walks an inventory of software components in bounded pages, routes each
//! component to exactly one analyzer by package ecosystem, records which
//! (vulnerability, component) pairs are new, and emits exactly one
//! notification per new pair listing every affected project.
//!
//! # Architecture
//!
//! The library is organized into the following layers:
//!
//! - **Domain Layer** (`portfolio_analysis`): Domain model, routing policy,
//!   association tracking and notification building
//! - **Application Layer** (`application`): The batch scanner and the
//!   per-analyzer batch routine
//! - **Ports** (`ports`): Interface definitions for infrastructure
//! - **Adapters** (`adapters`): Concrete implementations of ports
//! - **Shared** (`shared`): Common utilities and error types
//!
//! # Example
//!
//! ```no_run
//! use portfolio_analyzer::prelude::*;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<()> {
//! // Create adapters
//! let store = InMemoryPortfolioStore::new();
//! let finder = AdvisoryFeedFinder::empty();
//! let bus = CollectingNotificationBus::new();
//! let registry = Arc::new(AnalyzerRegistry::new(vec![
//!     AnalyzerDefinition::general_purpose("dependency-check"),
//!     AnalyzerDefinition::ecosystem("npm-audit", "npm"),
//! ])?);
//!
//! // Create use cases
//! let analyzer = AnalyzeComponentsUseCase::new(
//!     AnalyzerIdentity::new("npm-audit"),
//!     registry,
//!     finder,
//!     store.clone(),
//!     store.clone(),
//!     bus.clone(),
//! )?;
//! let scanner = PortfolioBatchScanner::new(store, StderrProgressReporter::new(), ScanOptions::default())?;
//!
//! // Execute
//! let summary = scanner.run_full_scan(&analyzer).await?;
//! println!("{} ({} notification(s))", summary, bus.len());
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod application;
pub mod cli;
pub mod config;
pub mod logging;
pub mod portfolio_analysis;
pub mod ports;
pub mod shared;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::adapters::outbound::console::{StderrProgressReporter, TracingProgressReporter};
    pub use crate::adapters::outbound::filesystem::{FileSystemReader, FileSystemWriter};
    pub use crate::adapters::outbound::memory::{
        AdvisoryFeed, AdvisoryFeedFinder, AssociationRecord, InMemoryPortfolioStore,
        PortfolioSnapshot,
    };
    pub use crate::adapters::outbound::notification::{
        CollectingNotificationBus, JsonLinesNotificationBus, TracingNotificationBus,
    };
    pub use crate::application::dto::{
        BatchFailure, FetchFailure, ScanOptions, ScanOutcome, ScanSummary,
    };
    pub use crate::application::use_cases::{
        AnalysisStats, AnalyzeComponentsUseCase, BatchAnalyzer, PortfolioBatchScanner,
    };
    pub use crate::portfolio_analysis::domain::{
        Component, ComponentId, Dependency, NewVulnerabilityIdentified, Notification,
        NotificationGroup, NotificationLevel, NotificationScope, PackageIdentifier, Project,
        ProjectId, Vulnerability, VulnerabilityId,
    };
    pub use crate::portfolio_analysis::policies::{
        AnalyzerDefinition, AnalyzerIdentity, AnalyzerRegistry, ClaimRule,
    };
    pub use crate::portfolio_analysis::services::{
        AssociationStatus, NotificationEmitter, VulnerabilityAssociationTracker,
    };
    pub use crate::ports::outbound::{
        AssociationRepository, DependencyRepository, InventoryRepository, NotificationBus,
        PageRequest, ProgressReporter, VulnerabilityFinder,
    };
    pub use crate::shared::error::{AnalysisError, ExitCode};
    pub use crate::shared::Result;
}
