//! The unit transformation applied to one work item.

use std::thread;
use std::time::Duration;

use batchwork_core::{ProcessingError, SinkError, WorkItem, WorkResult};

use super::retry::{RetryError, RetryPolicy};
use super::sink::SharedSink;

/// Default simulated processing time per successful attempt.
pub const DEFAULT_PROCESSING_DELAY: Duration = Duration::from_millis(10);

/// Squares work items, failing every multiple of 13.
///
/// Stateless apart from its configuration; one instance is shared by all
/// worker threads of a batch.
#[derive(Debug, Clone)]
pub struct WorkItemProcessor {
    sink: SharedSink,
    retry: RetryPolicy,
    processing_delay: Duration,
}

impl WorkItemProcessor {
    pub fn new(sink: SharedSink, retry: RetryPolicy, processing_delay: Duration) -> Self {
        Self {
            sink,
            retry,
            processing_delay,
        }
    }

    /// One attempt: classify, simulate work, square, record the success.
    ///
    /// Unlucky items fail before the simulated delay.
    pub fn transform(&self, item: WorkItem) -> Result<WorkResult, ProcessingError> {
        if item.is_unlucky() {
            return Err(ProcessingError::Permanent { item });
        }
        if !self.processing_delay.is_zero() {
            thread::sleep(self.processing_delay);
        }
        let result = item.square()?;
        self.sink.append(&format!("Processed: {item}"))?;
        Ok(result)
    }

    /// [`transform`](Self::transform) under the processor's retry policy.
    ///
    /// Every success record the sink rejects is pushed onto `rejected`, even
    /// when a later attempt goes on to succeed.
    pub fn process(
        &self,
        item: WorkItem,
        rejected: &mut Vec<SinkError>,
    ) -> Result<WorkResult, RetryError<ProcessingError>> {
        self.retry.execute(|| {
            self.transform(item).inspect_err(|e| {
                if let ProcessingError::Sink(sink_error) = e {
                    rejected.push(sink_error.clone());
                }
            })
        })
    }
}
