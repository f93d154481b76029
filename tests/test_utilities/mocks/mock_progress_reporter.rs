use portfolio_analyzer::prelude::*;
use std::sync::{Arc, Mutex};

/// Mock ProgressReporter that keeps every call, split by kind
///
/// `messages` holds the whole stream in order (errors prefixed `Error:` and
/// completions `Completed:`); `errors` and `completions` hold just those calls.
#[derive(Default, Clone)]
pub struct MockProgressReporter {
    messages: Arc<Mutex<Vec<String>>>,
    errors: Arc<Mutex<Vec<String>>>,
    completions: Arc<Mutex<Vec<String>>>,
}

#[allow(dead_code)]
impl MockProgressReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }

    pub fn get_errors(&self) -> Vec<String> {
        self.errors.lock().unwrap().clone()
    }

    pub fn get_completions(&self) -> Vec<String> {
        self.completions.lock().unwrap().clone()
    }

    fn push(&self, message: String) {
        self.messages.lock().unwrap().push(message);
    }
}

impl ProgressReporter for MockProgressReporter {
    fn report(&self, message: &str) {
        self.push(message.to_string());
    }

    fn report_progress(&self, current: u64, total: u64, message: Option<&str>) {
        self.push(match message {
            Some(m) => format!("Progress: {}/{} - {}", current, total, m),
            None => format!("Progress: {}/{}", current, total),
        });
    }

    fn report_error(&self, message: &str) {
        self.errors.lock().unwrap().push(message.to_string());
        self.push(format!("Error: {}", message));
    }

    fn report_completion(&self, message: &str) {
        self.completions.lock().unwrap().push(message.to_string());
        self.push(format!("Completed: {}", message));
    }
}
