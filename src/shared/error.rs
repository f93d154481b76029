use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the CLI application.
///
/// These codes allow CI systems to distinguish between different
/// types of failures and successes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success - every scan completed and no new associations were found
    Success = 0,
    /// At least one new vulnerability association was detected
    NewVulnerabilitiesFound = 1,
    /// Invalid command-line arguments (clap parsing errors)
    InvalidArguments = 2,
    /// Application error (configuration, snapshot I/O, aborted scan, etc.)
    ApplicationError = 3,
}

impl ExitCode {
    /// Convert to i32 for use with std::process::exit
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitCode::Success => write!(f, "Success (0)"),
            ExitCode::NewVulnerabilitiesFound => write!(f, "New Vulnerabilities Found (1)"),
            ExitCode::InvalidArguments => write!(f, "Invalid Arguments (2)"),
            ExitCode::ApplicationError => write!(f, "Application Error (3)"),
        }
    }
}

/// Classified failures raised by the analysis core and its adapters.
///
/// Everything travels as `anyhow::Error`; callers that need to tell a
/// transient repository error from a fatal one use
/// `err.downcast_ref::<AnalysisError>()`.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Analyzer registry or scan settings are inconsistent
    #[error("Invalid analyzer configuration: {reason}\n\n💡 Hint: {hint}")]
    Configuration { reason: String, hint: String },

    /// A repository call failed but later calls may succeed
    #[error("Repository operation '{operation}' failed: {details}")]
    Repository { operation: String, details: String },

    /// The repository cannot serve the rest of the run
    #[error("Repository unavailable during '{operation}': {details}")]
    RepositoryUnavailable { operation: String, details: String },

    #[error("Invalid package URL '{input}': {reason}")]
    InvalidPackageUrl { input: String, reason: String },

    #[error("Failed to read {description}: {path}\nDetails: {details}\n\n💡 Hint: Please verify that the file exists and contains valid JSON")]
    SnapshotReadError {
        path: PathBuf,
        description: String,
        details: String,
    },

    #[error("Failed to write to file: {path}\nDetails: {details}\n\n💡 Hint: Please verify that the directory exists and you have write permissions")]
    FileWriteError { path: PathBuf, details: String },

    /// Validation error for value objects
    #[error("Validation error: {message}")]
    Validation { message: String },
}

impl AnalysisError {
    pub fn configuration(reason: impl Into<String>, hint: impl Into<String>) -> Self {
        AnalysisError::Configuration {
            reason: reason.into(),
            hint: hint.into(),
        }
    }

    pub fn repository(operation: impl Into<String>, details: impl fmt::Display) -> Self {
        AnalysisError::Repository {
            operation: operation.into(),
            details: details.to_string(),
        }
    }

    pub fn repository_unavailable(operation: impl Into<String>, details: impl fmt::Display) -> Self {
        AnalysisError::RepositoryUnavailable {
            operation: operation.into(),
            details: details.to_string(),
        }
    }

    /// Fatal errors end a scan run; everything else only fails the current batch.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            AnalysisError::RepositoryUnavailable { .. } | AnalysisError::Configuration { .. }
        )
    }

    /// Returns true if `err` (or anything in its chain) is a fatal [`AnalysisError`].
    pub fn is_fatal_error(err: &anyhow::Error) -> bool {
        err.chain()
            .filter_map(|cause| cause.downcast_ref::<AnalysisError>())
            .any(AnalysisError::is_fatal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_exit_code_values() {
        assert_eq!(ExitCode::Success.as_i32(), 0);
        assert_eq!(ExitCode::NewVulnerabilitiesFound.as_i32(), 1);
        assert_eq!(ExitCode::InvalidArguments.as_i32(), 2);
        assert_eq!(ExitCode::ApplicationError.as_i32(), 3);
    }

    #[test]
    fn test_exit_code_display() {
        assert_eq!(format!("{}", ExitCode::Success), "Success (0)");
        assert_eq!(
            format!("{}", ExitCode::NewVulnerabilitiesFound),
            "New Vulnerabilities Found (1)"
        );
        assert_eq!(
            format!("{}", ExitCode::ApplicationError),
            "Application Error (3)"
        );
    }

    #[test]
    fn test_configuration_error_display() {
        let error = AnalysisError::configuration(
            "ecosystem 'npm' is claimed by both 'a' and 'b'",
            "Give each ecosystem exactly one analyzer",
        );
        let display = format!("{}", error);
        assert!(display.contains("Invalid analyzer configuration"));
        assert!(display.contains("'npm'"));
        assert!(display.contains("💡 Hint:"));
    }

    #[test]
    fn test_repository_error_is_not_fatal() {
        let error = AnalysisError::repository("fetch_page", "connection reset");
        assert!(!error.is_fatal());
        assert!(error.to_string().contains("fetch_page"));
        assert!(error.to_string().contains("connection reset"));
    }

    #[test]
    fn test_repository_unavailable_is_fatal() {
        let error = AnalysisError::repository_unavailable("count", "database is down");
        assert!(error.is_fatal());
    }

    #[test]
    fn test_is_fatal_error_looks_through_context() {
        let err = anyhow::Error::from(AnalysisError::repository_unavailable("contains", "down"))
            .context("Failed to analyze component 42");
        assert!(AnalysisError::is_fatal_error(&err));

        let transient: anyhow::Result<()> =
            Err(AnalysisError::repository("contains", "timeout")).context("batch 3");
        assert!(!AnalysisError::is_fatal_error(&transient.unwrap_err()));
    }

    #[test]
    fn test_is_fatal_error_plain_anyhow() {
        let err = anyhow::anyhow!("something else went wrong");
        assert!(!AnalysisError::is_fatal_error(&err));
    }

    #[test]
    fn test_snapshot_read_error_display() {
        let error = AnalysisError::SnapshotReadError {
            path: PathBuf::from("/tmp/portfolio.json"),
            description: "portfolio snapshot".to_string(),
            details: "expected value at line 1".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("portfolio snapshot"));
        assert!(display.contains("/tmp/portfolio.json"));
        assert!(display.contains("expected value"));
    }
}
