use crate::application::dto::{
    BatchFailure, FetchFailure, ScanOptions, ScanOutcome, ScanSummary,
};
use crate::portfolio_analysis::domain::Component;
use crate::ports::outbound::{InventoryRepository, PageRequest, ProgressReporter};
use crate::shared::error::AnalysisError;
use crate::shared::Result;
use anyhow::Context;
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

/// Per-batch analysis routine plugged into [`PortfolioBatchScanner`].
///
/// Any number of analyzer kinds share the same scanning loop by implementing
/// this trait. Plain closures `Fn(&[Component]) -> Result<()>` implement it too.
#[async_trait]
pub trait BatchAnalyzer: Send + Sync {
    async fn analyze_batch(&self, components: &[Component]) -> Result<()>;
}

#[async_trait]
impl<F> BatchAnalyzer for F
where
    F: Fn(&[Component]) -> Result<()> + Send + Sync,
{
    async fn analyze_batch(&self, components: &[Component]) -> Result<()> {
        self(components)
    }
}

/// PortfolioBatchScanner - visits every inventory component once per run
///
/// Memory use is bounded by one page: the scanner reads the inventory size
/// once, then walks pages in ascending id order with a keyset cursor,
/// handing each page to the analyzer before fetching the next.
///
/// # Type Parameters
/// * `I` - InventoryRepository implementation
/// * `PR` - ProgressReporter implementation
pub struct PortfolioBatchScanner<I, PR> {
    inventory: I,
    progress_reporter: PR,
    options: ScanOptions,
    cancellation: Option<CancellationToken>,
}

impl<I, PR> PortfolioBatchScanner<I, PR>
where
    I: InventoryRepository,
    PR: ProgressReporter,
{
    /// Creates a scanner; a page size of zero is a configuration error.
    pub fn new(inventory: I, progress_reporter: PR, options: ScanOptions) -> Result<Self> {
        if options.page_size == 0 {
            return Err(AnalysisError::configuration(
                "page size must be greater than 0",
                "Set 'page_size' to a value such as 1000",
            )
            .into());
        }
        Ok(Self {
            inventory,
            progress_reporter,
            options,
            cancellation: None,
        })
    }

    /// Checked between pages only; a page already handed to the analyzer
    /// always runs to completion.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    pub fn options(&self) -> &ScanOptions {
        &self.options
    }

    /// Runs one full scan.
    ///
    /// # Errors
    /// Returns an error only if the initial inventory count fails. Everything
    /// after that is reported through the returned [`ScanSummary`]:
    /// - a failed batch is recorded and the scan moves on, unless the error is
    ///   fatal or `fail_fast` is set
    /// - a page fetch that fails transiently is retried from the same cursor,
    ///   up to `fetch_retries` more times; the run aborts if the error is fatal
    ///   or the retries run out, since the cursor cannot move past a page that
    ///   was never read
    pub async fn run_full_scan<A>(&self, analyzer: &A) -> Result<ScanSummary>
    where
        A: BatchAnalyzer + ?Sized,
    {
        let total = self
            .inventory
            .count()
            .await
            .context("Failed to count inventory components")?;

        self.progress_reporter.report(&format!(
            "🔍 Analyzing portfolio: {} component(s), {} per page",
            total, self.options.page_size
        ));

        let mut summary = ScanSummary::new(total);
        let mut cursor = None;

        while summary.components_visited < total {
            if self
                .cancellation
                .as_ref()
                .is_some_and(CancellationToken::is_cancelled)
            {
                summary.outcome = ScanOutcome::Cancelled;
                break;
            }

            let request = PageRequest {
                after: cursor,
                limit: self.options.page_size,
            };
            let page = match self.fetch_with_retry(&request, &mut summary).await {
                Ok(page) => page,
                Err(reason) => {
                    self.progress_reporter.report_error(&format!("❌ {}", reason));
                    summary.outcome = ScanOutcome::Aborted { reason };
                    break;
                }
            };

            let (first, last) = match (page.first(), page.last()) {
                (Some(first), Some(last)) => (first.id(), last.id()),
                _ => {
                    summary.inventory_shrank = true;
                    self.progress_reporter.report(&format!(
                        "ℹ️  Inventory exhausted after {} of {} component(s)",
                        summary.components_visited, total
                    ));
                    break;
                }
            };

            if cursor.is_some_and(|seen| last <= seen) {
                let reason = format!(
                    "inventory returned page ending at component {} which does not advance past {}",
                    last,
                    cursor.map_or_else(String::new, |c| c.to_string())
                );
                self.progress_reporter.report_error(&format!("❌ {}", reason));
                summary.outcome = ScanOutcome::Aborted { reason };
                break;
            }

            summary.pages_fetched += 1;
            let page_number = summary.pages_fetched;

            let stop = match analyzer.analyze_batch(&page).await {
                Ok(()) => {
                    summary.batches_succeeded += 1;
                    None
                }
                Err(e) => {
                    let fatal = AnalysisError::is_fatal_error(&e);
                    let error = format!("{:#}", e);
                    self.progress_reporter.report_error(&format!(
                        "⚠️  Batch {} (components {}..={}) failed: {}",
                        page_number, first, last, error
                    ));
                    summary.failures.push(BatchFailure {
                        page: page_number,
                        first_component: first,
                        last_component: last,
                        size: page.len(),
                        error: error.clone(),
                    });
                    if fatal {
                        Some(error)
                    } else if self.options.fail_fast {
                        Some(format!("fail-fast after batch {}: {}", page_number, error))
                    } else {
                        None
                    }
                }
            };

            summary.components_visited += page.len() as u64;
            cursor = Some(last);
            self.progress_reporter.report_progress(
                summary.components_visited.min(total),
                total,
                Some("Analyzing components..."),
            );

            if let Some(reason) = stop {
                summary.outcome = ScanOutcome::Aborted { reason };
                break;
            }
        }

        self.progress_reporter
            .report_completion(&format!("✅ Portfolio analysis finished: {}", summary));

        Ok(summary)
    }

    /// Fetches one page, retrying the same cursor after non-fatal errors.
    /// Every failed attempt is added to `summary.fetch_failures`.
    async fn fetch_with_retry(
        &self,
        request: &PageRequest,
        summary: &mut ScanSummary,
    ) -> std::result::Result<Vec<Component>, String> {
        let page = summary.pages_fetched + 1;
        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            let e = match self.inventory.fetch_page(request).await {
                Ok(components) => return Ok(components),
                Err(e) => e,
            };

            let error = format!("{:#}", e);
            summary.fetch_failures.push(FetchFailure {
                page,
                after: request.after,
                attempt,
                error: error.clone(),
            });
            if AnalysisError::is_fatal_error(&e) {
                return Err(format!("failed to fetch page {}: {}", page, error));
            }
            if attempt > self.options.fetch_retries {
                return Err(format!(
                    "failed to fetch page {} after {} attempt(s): {}",
                    page, attempt, error
                ));
            }

            self.progress_reporter.report_error(&format!(
                "⚠️  Fetching page {} failed (attempt {} of {}), retrying: {}",
                page,
                attempt,
                self.options.fetch_retries + 1,
                error
            ));
            tokio::time::sleep(self.options.retry_backoff * attempt).await;
        }
    }
}
