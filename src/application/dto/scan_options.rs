use std::time::Duration;

/// Default number of components fetched per page
pub const DEFAULT_PAGE_SIZE: usize = 1000;

/// Default number of retries for a page fetch that failed transiently
pub const DEFAULT_FETCH_RETRIES: u32 = 3;

/// Base delay before retrying a page fetch; grows linearly per attempt
pub const DEFAULT_RETRY_BACKOFF: Duration = Duration::from_millis(200);

/// ScanOptions - Settings for one portfolio scan run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanOptions {
    /// Components requested per page
    pub page_size: usize,
    /// Stop at the first failed batch instead of continuing with the next page
    pub fail_fast: bool,
    /// Extra attempts for a page fetch after a non-fatal error
    pub fetch_retries: u32,
    pub retry_backoff: Duration,
}

impl ScanOptions {
    pub fn new(page_size: usize, fail_fast: bool) -> Self {
        Self {
            page_size,
            fail_fast,
            fetch_retries: DEFAULT_FETCH_RETRIES,
            retry_backoff: DEFAULT_RETRY_BACKOFF,
        }
    }

    pub fn with_fetch_retries(mut self, retries: u32, backoff: Duration) -> Self {
        self.fetch_retries = retries;
        self.retry_backoff = backoff;
        self
    }
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE, false)
    }
}
