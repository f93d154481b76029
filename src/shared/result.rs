/// Type alias for Result with anyhow::Error as the error type.
/// Ports, services and use cases all return this; classified failures are
/// wrapped as [`AnalysisError`](crate::shared::error::AnalysisError) and
/// recovered with `downcast_ref`.
pub type Result<T> = std::result::Result<T, anyhow::Error>;
