//! Thread-per-item batch runner.

use std::sync::{Arc, Mutex, PoisonError};
use std::thread;

use tracing::{debug, error, info, warn};

use batchwork_core::{RunId, SinkError, WorkItem, WorkResult};

use super::outcome::BatchOutcome;
use super::processor::WorkItemProcessor;
use super::retry::RetryError;
use super::sink::SharedSink;

/// Fans a batch out to one thread per item and collects the successes.
///
/// Fan-out is unbounded: a batch of N items spawns N threads. That is fine
/// for the bounded inputs this engine is fed, but there is no pool or cap.
#[derive(Debug, Clone)]
pub struct ConcurrentBatchRunner {
    processor: Arc<WorkItemProcessor>,
    sink: SharedSink,
}

/// Mutable state shared by the workers of one run.
#[derive(Default)]
struct Collected {
    results: Mutex<Vec<WorkResult>>,
    failed: Mutex<Vec<WorkItem>>,
    sink_errors: Mutex<Vec<SinkError>>,
}

impl Collected {
    fn push<T>(slot: &Mutex<Vec<T>>, value: T) {
        slot.lock().unwrap_or_else(PoisonError::into_inner).push(value);
    }

    fn extend<T>(slot: &Mutex<Vec<T>>, values: Vec<T>) {
        slot.lock().unwrap_or_else(PoisonError::into_inner).extend(values);
    }

    fn take<T>(slot: Mutex<Vec<T>>) -> Vec<T> {
        slot.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ConcurrentBatchRunner {
    pub fn new(processor: Arc<WorkItemProcessor>, sink: SharedSink) -> Self {
        Self { processor, sink }
    }

    /// Process every item concurrently and wait for all of them.
    ///
    /// Never fails: items that exhaust their retries are logged and left out
    /// of the results. Sink failures are returned in the outcome.
    pub fn run<I>(&self, items: I) -> BatchOutcome
    where
        I: IntoIterator<Item = WorkItem>,
    {
        let run_id = RunId::new();
        let items: Vec<WorkItem> = items.into_iter().collect();
        if items.is_empty() {
            debug!(%run_id, "empty batch");
            return BatchOutcome::empty(run_id);
        }

        info!(%run_id, items = items.len(), "batch started");
        let collected = Collected::default();
        let mut lost_workers = 0;

        thread::scope(|scope| {
            let mut handles = Vec::with_capacity(items.len());
            for (index, &item) in items.iter().enumerate() {
                let collected = &collected;
                let spawned = thread::Builder::new()
                    .name(format!("work-item-{index}"))
                    .spawn_scoped(scope, move || self.process_one(item, collected));

                match spawned {
                    Ok(handle) => handles.push((item, handle)),
                    Err(e) => {
                        error!(%run_id, %item, error = %e, "failed to spawn worker thread");
                        lost_workers += 1;
                        Collected::push(&collected.failed, item);
                    }
                }
            }

            for (item, handle) in handles {
                if handle.join().is_err() {
                    error!(%run_id, %item, "worker thread panicked");
                    lost_workers += 1;
                    Collected::push(&collected.failed, item);
                }
            }
        });

        let outcome = BatchOutcome {
            run_id,
            submitted: items.len(),
            results: Collected::take(collected.results),
            failed: Collected::take(collected.failed),
            sink_errors: Collected::take(collected.sink_errors),
            lost_workers,
        };

        if !outcome.sink_healthy() {
            warn!(%run_id, sink_errors = outcome.sink_errors.len(), "log sink rejected records");
        }
        info!(
            %run_id,
            succeeded = outcome.results.len(),
            failed = outcome.failed.len(),
            "batch finished"
        );
        outcome
    }

    fn process_one(&self, item: WorkItem, collected: &Collected) {
        let mut rejected = Vec::new();
        match self.processor.process(item, &mut rejected) {
            Ok(result) => Collected::push(&collected.results, result),
            Err(RetryError::Exhausted { attempts, source }) => {
                debug!(%item, attempts, error = %source, "item failed");
                Collected::push(&collected.failed, item);
                if let Err(e) = self
                    .sink
                    .append(&format!("Failed processing {item}: {source}"))
                {
                    rejected.push(e);
                }
            }
            Err(RetryError::Sink(e)) => {
                Collected::push(&collected.failed, item);
                rejected.push(e);
            }
        }
        if !rejected.is_empty() {
            Collected::extend(&collected.sink_errors, rejected);
        }
    }
}
