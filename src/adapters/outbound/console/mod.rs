/// Console adapters for progress reporting
mod progress_reporter;

pub use progress_reporter::{StderrProgressReporter, TracingProgressReporter};
