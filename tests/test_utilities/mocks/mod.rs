/// Mock implementations for testing
mod mock_progress_reporter;
mod mock_vulnerability_finder;

pub use mock_progress_reporter::MockProgressReporter;
pub use mock_vulnerability_finder::MockVulnerabilityFinder;
