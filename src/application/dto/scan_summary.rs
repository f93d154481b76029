use crate::portfolio_analysis::domain::ComponentId;
use std::fmt;

/// How a scan run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    /// Every page up to the inventory size read at start was handed to the
    /// analyzer, or the inventory ran out early
    Completed,
    /// The cancellation token fired; the last page in flight was finished first
    Cancelled,
    /// A fatal error stopped the run
    Aborted { reason: String },
}

/// A batch whose analysis returned an error
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchFailure {
    /// 1-based page number within the run
    pub page: usize,
    pub first_component: ComponentId,
    pub last_component: ComponentId,
    pub size: usize,
    pub error: String,
}

/// A page fetch that returned an error
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchFailure {
    /// 1-based page number the fetch was for
    pub page: usize,
    /// Cursor of the failed request
    pub after: Option<ComponentId>,
    /// 1-based attempt number for this page
    pub attempt: u32,
    pub error: String,
}

/// ScanSummary - Result of a portfolio scan run
///
/// Reports partial coverage: how many batches succeeded and failed, not just
/// whether the run as a whole succeeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanSummary {
    /// Inventory size read once at scan start
    pub total_components: u64,
    /// Components handed to the analyzer (including those in failed batches)
    pub components_visited: u64,
    pub pages_fetched: usize,
    pub batches_succeeded: usize,
    pub failures: Vec<BatchFailure>,
    /// Failed page fetches, including ones a later retry recovered from
    pub fetch_failures: Vec<FetchFailure>,
    /// True if an empty page ended the scan before `total_components` was reached
    pub inventory_shrank: bool,
    pub outcome: ScanOutcome,
}

impl ScanSummary {
    pub fn new(total_components: u64) -> Self {
        Self {
            total_components,
            components_visited: 0,
            pages_fetched: 0,
            batches_succeeded: 0,
            failures: Vec::new(),
            fetch_failures: Vec::new(),
            inventory_shrank: false,
            outcome: ScanOutcome::Completed,
        }
    }

    pub fn batches_failed(&self) -> usize {
        self.failures.len()
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    /// Completed with every batch succeeding. Fetch retries that recovered do
    /// not count against it.
    pub fn is_clean(&self) -> bool {
        self.outcome == ScanOutcome::Completed && self.failures.is_empty()
    }
}

impl fmt::Display for ScanSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} component(s) visited in {} page(s): {} batch(es) succeeded, {} failed",
            self.components_visited,
            self.total_components,
            self.pages_fetched,
            self.batches_succeeded,
            self.batches_failed()
        )?;
        if !self.fetch_failures.is_empty() {
            write!(f, ", {} page fetch(es) retried", self.fetch_failures.len())?;
        }
        match &self.outcome {
            ScanOutcome::Completed => Ok(()),
            ScanOutcome::Cancelled => write!(f, " (cancelled)"),
            ScanOutcome::Aborted { reason } => write!(f, " (aborted: {})", reason),
        }
    }
}
