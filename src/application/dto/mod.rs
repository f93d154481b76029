/// Data Transfer Objects for application layer
///
/// DTOs carry scan settings in and scan results out of the use cases,
/// keeping the domain layer isolated.
mod scan_options;
mod scan_summary;

pub use scan_options::{
    ScanOptions, DEFAULT_FETCH_RETRIES, DEFAULT_PAGE_SIZE, DEFAULT_RETRY_BACKOFF,
};
pub use scan_summary::{BatchFailure, FetchFailure, ScanOutcome, ScanSummary};
