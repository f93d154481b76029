use crate::ports::outbound::ProgressReporter;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::sync::{Mutex, MutexGuard, PoisonError};

const BAR_TEMPLATE: &str =
    "   {spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} components ({percent}%) - {msg}";

/// StderrProgressReporter adapter for reporting progress to stderr
///
/// Writes to stderr so it doesn't interfere with the notification stream on
/// stdout. Uses indicatif for the progress bar; the bar is created on the
/// first progress update and cleared on completion.
///
/// Reporters of analyzers running side by side share one [`MultiProgress`]
/// (see [`attached`](Self::attached)) so their bars stack instead of
/// overwriting each other.
pub struct StderrProgressReporter {
    label: String,
    multi: Option<MultiProgress>,
    progress_bar: Mutex<Option<ProgressBar>>,
}

impl StderrProgressReporter {
    pub fn new() -> Self {
        Self::labelled("")
    }

    /// Reporter whose messages are prefixed with an analyzer name
    pub fn labelled(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            multi: None,
            progress_bar: Mutex::new(None),
        }
    }

    /// Labelled reporter drawing its bar inside a shared [`MultiProgress`]
    pub fn attached(multi: MultiProgress, label: impl Into<String>) -> Self {
        Self {
            multi: Some(multi),
            ..Self::labelled(label)
        }
    }

    fn progress_bar(&self) -> MutexGuard<'_, Option<ProgressBar>> {
        self.progress_bar
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn get_or_create_progress_bar(&self, total: u64) -> ProgressBar {
        let mut slot = self.progress_bar();
        if let Some(pb) = slot.as_ref() {
            return pb.clone();
        }
        let pb = match &self.multi {
            Some(multi) => multi.add(ProgressBar::new(total)),
            None => ProgressBar::new(total),
        };
        let style = ProgressStyle::default_bar()
            .template(BAR_TEMPLATE)
            .map(|style| style.progress_chars("=>-"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        pb.set_style(style);
        *slot = Some(pb.clone());
        pb
    }

    fn finish(&self) {
        if let Some(pb) = self.progress_bar().take() {
            pb.finish_and_clear();
        }
    }

    fn print(&self, message: &str) {
        let line = self.prefixed(message);
        match &self.multi {
            Some(multi) if multi.println(&line).is_ok() => {}
            _ => eprintln!("{}", line),
        }
    }

    fn prefixed(&self, message: &str) -> String {
        if self.label.is_empty() {
            message.to_string()
        } else {
            format!("[{}] {}", self.label, message)
        }
    }
}

impl Default for StderrProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressReporter for StderrProgressReporter {
    fn report(&self, message: &str) {
        self.print(message);
    }

    fn report_progress(&self, current: u64, total: u64, message: Option<&str>) {
        let pb = self.get_or_create_progress_bar(total);
        pb.set_length(total);
        pb.set_position(current);
        if let Some(msg) = message {
            pb.set_message(self.prefixed(msg));
        }
    }

    fn report_error(&self, message: &str) {
        self.print(message);
    }

    fn report_completion(&self, message: &str) {
        self.finish();
        self.print(message);
    }
}

/// TracingProgressReporter forwards scan progress as structured `tracing` events
///
/// Used with `--log-format json`, where a progress bar would garble the
/// machine-readable log stream.
pub struct TracingProgressReporter {
    analyzer: String,
}

impl TracingProgressReporter {
    pub fn new(analyzer: impl Into<String>) -> Self {
        Self {
            analyzer: analyzer.into(),
        }
    }
}

impl ProgressReporter for TracingProgressReporter {
    fn report(&self, message: &str) {
        tracing::info!(analyzer = %self.analyzer, "{}", message);
    }

    fn report_progress(&self, current: u64, total: u64, message: Option<&str>) {
        tracing::debug!(
            analyzer = %self.analyzer,
            current,
            total,
            detail = message.unwrap_or_default(),
            "scan progress"
        );
    }

    fn report_error(&self, message: &str) {
        tracing::warn!(analyzer = %self.analyzer, "{}", message);
    }

    fn report_completion(&self, message: &str) {
        tracing::info!(analyzer = %self.analyzer, "{}", message);
    }
}
