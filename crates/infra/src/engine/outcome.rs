//! Result of one batch run.

use serde::{Deserialize, Serialize};

use batchwork_core::{RunId, SinkError, WorkItem, WorkResult};

/// Everything a batch run produced.
///
/// `results` holds one entry per item that eventually succeeded, in
/// completion order (which is nondeterministic). Sink failures are kept here
/// rather than swallowed so the caller can decide whether the run is usable.
#[derive(Debug)]
pub struct BatchOutcome {
    pub run_id: RunId,
    pub submitted: usize,
    pub results: Vec<WorkResult>,
    pub failed: Vec<WorkItem>,
    pub sink_errors: Vec<SinkError>,
    /// Workers that panicked or could not be spawned.
    pub lost_workers: usize,
}

impl BatchOutcome {
    pub(crate) fn empty(run_id: RunId) -> Self {
        Self {
            run_id,
            submitted: 0,
            results: Vec::new(),
            failed: Vec::new(),
            sink_errors: Vec::new(),
            lost_workers: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn contains(&self, value: i64) -> bool {
        self.results.iter().any(|r| r.value() == value)
    }

    /// Results sorted ascending, for stable reporting.
    pub fn sorted_results(&self) -> Vec<WorkResult> {
        let mut sorted = self.results.clone();
        sorted.sort_unstable();
        sorted
    }

    /// `true` when every record of the run reached the log sink.
    pub fn sink_healthy(&self) -> bool {
        self.sink_errors.is_empty()
    }

    pub fn summary(&self) -> BatchSummary {
        BatchSummary {
            run_id: self.run_id,
            submitted: self.submitted,
            succeeded: self.results.len(),
            failed: self.failed.len(),
            sink_errors: self.sink_errors.len(),
            lost_workers: self.lost_workers,
        }
    }
}

/// Serializable counts for reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub run_id: RunId,
    pub submitted: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub sink_errors: usize,
    pub lost_workers: usize,
}
