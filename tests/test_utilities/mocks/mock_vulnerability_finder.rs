use async_trait::async_trait;
use portfolio_analyzer::prelude::*;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Mock VulnerabilityFinder returning canned findings per component id
///
/// Findings can be changed between runs, and every call is recorded so tests
/// can assert which components an analyzer actually looked at.
#[derive(Default, Clone)]
pub struct MockVulnerabilityFinder {
    findings: Arc<Mutex<HashMap<u64, Vec<String>>>>,
    calls: Arc<Mutex<Vec<u64>>>,
    delay: Option<Duration>,
}

#[allow(dead_code)]
impl MockVulnerabilityFinder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_finding(self, component: u64, vulnerability: &str) -> Self {
        self.add_finding(component, vulnerability);
        self
    }

    /// Sleeps before answering, so concurrent scans interleave
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn add_finding(&self, component: u64, vulnerability: &str) {
        self.findings
            .lock()
            .unwrap()
            .entry(component)
            .or_default()
            .push(vulnerability.to_string());
    }

    pub fn calls(&self) -> Vec<u64> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl VulnerabilityFinder for MockVulnerabilityFinder {
    async fn find(&self, component: &Component) -> Result<Vec<Vulnerability>> {
        self.calls.lock().unwrap().push(component.id().value());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let ids = self
            .findings
            .lock()
            .unwrap()
            .get(&component.id().value())
            .cloned()
            .unwrap_or_default();
        Ok(ids
            .into_iter()
            .map(|id| Vulnerability::new(VulnerabilityId::new(id), "MOCK"))
            .collect())
    }
}
