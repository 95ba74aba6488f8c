//! Mock aligner for testing

use async_trait::async_trait;
use rxnfinder_core::{RxnFinderError, RxnFinderResult};
use rxnfinder_tools::{Aligner, AlignmentOutput, AlignmentRequest};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Aligner that returns canned tabular text per request label
#[derive(Default)]
pub struct MockAligner {
    outputs: HashMap<String, String>,
    delays: HashMap<String, Duration>,
    failures: HashSet<String>,
    call_count: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    // (label, candidate FASTA text) for every call
    seen: Mutex<Vec<(String, String)>>,
}

impl MockAligner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return `tabular` as the raw output for `label`
    pub fn with_output(mut self, label: &str, tabular: impl Into<String>) -> Self {
        self.outputs.insert(label.to_string(), tabular.into());
        self
    }

    /// Sleep before answering for `label`
    pub fn with_delay(mut self, label: &str, delay: Duration) -> Self {
        self.delays.insert(label.to_string(), delay);
        self
    }

    /// Fail alignment for `label`
    pub fn with_failure(mut self, label: &str) -> Self {
        self.failures.insert(label.to_string());
        self
    }

    /// Get number of times align was called
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Most align calls that were running at the same time
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    /// Candidate FASTA handed over for `label`, if it was aligned
    pub fn query_fasta_for(&self, label: &str) -> Option<String> {
        self.seen
            .lock()
            .unwrap()
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, fasta)| fasta.clone())
    }
}

#[async_trait]
impl Aligner for MockAligner {
    async fn align(&self, request: &AlignmentRequest) -> RxnFinderResult<AlignmentOutput> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(running, Ordering::SeqCst);
        let _in_flight = InFlight(&self.in_flight);

        let fasta = std::fs::read_to_string(&request.query_fasta)?;
        self.seen
            .lock()
            .unwrap()
            .push((request.label.clone(), fasta));

        if let Some(delay) = self.delays.get(&request.label) {
            tokio::time::sleep(*delay).await;
        }

        if self.failures.contains(&request.label) {
            return Err(RxnFinderError::Alignment(format!(
                "mock alignment failure for {}",
                request.label
            )));
        }

        Ok(AlignmentOutput::from_text(
            self.outputs.get(&request.label).cloned().unwrap_or_default(),
        ))
    }

    async fn version(&self) -> RxnFinderResult<String> {
        Ok("mock 1.0".to_string())
    }

    fn name(&self) -> &str {
        "mock"
    }
}

struct InFlight<'a>(&'a AtomicUsize);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}
