use super::scan_portfolio::BatchAnalyzer;
use crate::portfolio_analysis::domain::{Component, Notification};
use crate::portfolio_analysis::policies::{AnalyzerIdentity, AnalyzerRegistry};
use crate::portfolio_analysis::services::{
    AssociationStatus, NotificationEmitter, VulnerabilityAssociationTracker,
};
use crate::ports::outbound::{
    AssociationRepository, DependencyRepository, NotificationBus, VulnerabilityFinder,
};
use crate::shared::error::AnalysisError;
use crate::shared::Result;
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Snapshot of what an analyzer has done so far
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnalysisStats {
    /// Components this analyzer owns and ran the finder on
    pub components_analyzed: u64,
    /// Components routed to another analyzer
    pub components_skipped: u64,
    pub findings: u64,
    /// Findings that were new associations (one notification each)
    pub new_associations: u64,
}

#[derive(Default)]
struct Counters {
    analyzed: AtomicU64,
    skipped: AtomicU64,
    findings: AtomicU64,
    new_associations: AtomicU64,
}

/// AnalyzeComponentsUseCase - one analyzer's batch routine
///
/// For each component in a batch:
/// 1. ask the registry whether this analyzer owns it (unowned components cost
///    nothing: no finder call, no association check)
/// 2. run the scanning engine
/// 3. collect affected projects and record each finding through the
///    tracker's check-and-set
/// 4. emit a notification for every association that is new
///
/// # Type Parameters
/// * `F` - VulnerabilityFinder implementation (the scanning engine)
/// * `A` - AssociationRepository implementation
/// * `D` - DependencyRepository implementation
/// * `B` - NotificationBus implementation
pub struct AnalyzeComponentsUseCase<F, A, D, B> {
    identity: AnalyzerIdentity,
    registry: Arc<AnalyzerRegistry>,
    finder: F,
    tracker: VulnerabilityAssociationTracker<A, D>,
    emitter: NotificationEmitter<B>,
    counters: Counters,
}

impl<F, A, D, B> AnalyzeComponentsUseCase<F, A, D, B>
where
    F: VulnerabilityFinder,
    A: AssociationRepository,
    D: DependencyRepository,
    B: NotificationBus,
{
    /// Creates the use case for a registered analyzer.
    ///
    /// # Errors
    /// Returns a configuration error if `identity` is not in the registry.
    pub fn new(
        identity: AnalyzerIdentity,
        registry: Arc<AnalyzerRegistry>,
        finder: F,
        associations: A,
        dependencies: D,
        bus: B,
    ) -> Result<Self> {
        if !registry.contains(&identity) {
            return Err(AnalysisError::configuration(
                format!("analyzer '{}' is not registered", identity),
                "Add the analyzer to the 'analyzers' list in the configuration file",
            )
            .into());
        }
        Ok(Self {
            identity,
            registry,
            finder,
            tracker: VulnerabilityAssociationTracker::new(associations, dependencies),
            emitter: NotificationEmitter::new(bus),
            counters: Counters::default(),
        })
    }

    pub fn identity(&self) -> &AnalyzerIdentity {
        &self.identity
    }

    pub fn stats(&self) -> AnalysisStats {
        AnalysisStats {
            components_analyzed: self.counters.analyzed.load(Ordering::Relaxed),
            components_skipped: self.counters.skipped.load(Ordering::Relaxed),
            findings: self.counters.findings.load(Ordering::Relaxed),
            new_associations: self.counters.new_associations.load(Ordering::Relaxed),
        }
    }

    /// Runs the finder on a single owned component and emits notifications
    /// for new associations. Returns what was dispatched.
    pub async fn analyze_component(&self, component: &Component) -> Result<Vec<Notification>> {
        self.counters.analyzed.fetch_add(1, Ordering::Relaxed);

        let vulnerabilities = self.finder.find(component).await?;
        let mut emitted = Vec::new();

        for vulnerability in vulnerabilities {
            self.counters.findings.fetch_add(1, Ordering::Relaxed);
            match self
                .tracker
                .record_and_collect_affected_projects(&vulnerability, component)
                .await?
            {
                AssociationStatus::New { affected_projects } => {
                    let notification = self
                        .emitter
                        .emit_new_association(vulnerability, component.clone(), affected_projects)
                        .await;
                    self.counters.new_associations.fetch_add(1, Ordering::Relaxed);
                    emitted.push(notification);
                }
                AssociationStatus::AlreadyKnown => {}
            }
        }

        Ok(emitted)
    }
}

#[async_trait]
impl<F, A, D, B> BatchAnalyzer for AnalyzeComponentsUseCase<F, A, D, B>
where
    F: VulnerabilityFinder,
    A: AssociationRepository,
    D: DependencyRepository,
    B: NotificationBus,
{
    /// Analyzes every owned component of the batch.
    ///
    /// A transient failure on one component does not stop the others; the
    /// batch then fails with the first error. A fatal error returns at once.
    async fn analyze_batch(&self, components: &[Component]) -> Result<()> {
        let mut first_error: Option<anyhow::Error> = None;
        let mut failed = 0usize;

        for component in components {
            if !self
                .registry
                .should_analyze(&self.identity, component.package_identifier())
            {
                self.counters.skipped.fetch_add(1, Ordering::Relaxed);
                continue;
            }

            if let Err(e) = self.analyze_component(component).await {
                let e = e.context(format!(
                    "Analyzer '{}' failed on component {}",
                    self.identity, component
                ));
                if AnalysisError::is_fatal_error(&e) {
                    return Err(e);
                }
                failed += 1;
                first_error.get_or_insert(e);
            }
        }

        match first_error {
            None => Ok(()),
            Some(e) => Err(e.context(format!(
                "{} of {} component(s) in batch failed",
                failed,
                components.len()
            ))),
        }
    }
}
