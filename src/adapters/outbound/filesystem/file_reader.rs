use crate::adapters::outbound::memory::{AdvisoryFeed, PortfolioSnapshot};
use crate::shared::error::AnalysisError;
use crate::shared::security::read_checked;
use crate::shared::Result;
use std::path::Path;

/// FileSystemReader adapter for loading the JSON inputs of a run
///
/// Every read goes through the symlink and size checks in
/// [`shared::security`](crate::shared::security); failures are reported as
/// [`AnalysisError::SnapshotReadError`] carrying the offending path.
pub struct FileSystemReader;

impl FileSystemReader {
    pub fn new() -> Self {
        Self
    }

    /// Reads and parses a portfolio snapshot.
    pub fn read_snapshot(&self, path: &Path) -> Result<PortfolioSnapshot> {
        self.read_json(path, "portfolio snapshot", PortfolioSnapshot::from_json)
    }

    /// Reads and parses an advisory feed.
    pub fn read_advisories(&self, path: &Path) -> Result<AdvisoryFeed> {
        self.read_json(path, "advisory feed", AdvisoryFeed::from_json)
    }

    fn read_json<T>(
        &self,
        path: &Path,
        description: &str,
        parse: impl FnOnce(&str) -> Result<T>,
    ) -> Result<T> {
        let read_error = |details: String| AnalysisError::SnapshotReadError {
            path: path.to_path_buf(),
            description: description.to_string(),
            details,
        };

        if !path.exists() {
            return Err(read_error("file does not exist".to_string()).into());
        }

        let content = read_checked(path, description).map_err(|e| read_error(e.to_string()))?;
        parse(&content).map_err(|e| read_error(e.to_string()).into())
    }
}

impl Default for FileSystemReader {
    fn default() -> Self {
        Self::new()
    }
}
