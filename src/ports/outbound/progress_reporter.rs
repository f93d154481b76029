/// ProgressReporter port for reporting progress during a portfolio scan
///
/// The scanner never logs on its own; everything an operator sees goes
/// through this hook, so tests can capture it and the CLI can route it to
/// `tracing` or a progress bar.
pub trait ProgressReporter: Send + Sync {
    /// Reports a progress message
    fn report(&self, message: &str);

    /// Reports how many components of the inventory have been visited
    ///
    /// # Arguments
    /// * `current` - Components visited so far
    /// * `total` - Inventory size read at scan start
    /// * `message` - Optional message to include
    fn report_progress(&self, current: u64, total: u64, message: Option<&str>);

    /// Reports a failed batch or other recoverable problem
    fn report_error(&self, message: &str);

    /// Reports the end of a scan run
    fn report_completion(&self, message: &str);
}

/// Silent reporter
impl ProgressReporter for () {
    fn report(&self, _message: &str) {}

    fn report_progress(&self, _current: u64, _total: u64, _message: Option<&str>) {}

    fn report_error(&self, _message: &str) {}

    fn report_completion(&self, _message: &str) {}
}

impl<P: ProgressReporter + ?Sized> ProgressReporter for Box<P> {
    fn report(&self, message: &str) {
        (**self).report(message)
    }

    fn report_progress(&self, current: u64, total: u64, message: Option<&str>) {
        (**self).report_progress(current, total, message)
    }

    fn report_error(&self, message: &str) {
        (**self).report_error(message)
    }

    fn report_completion(&self, message: &str) {
        (**self).report_completion(message)
    }
}
