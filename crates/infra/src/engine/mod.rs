//! Concurrent batch engine with bounded retry and a serialized log sink.
//!
//! ## Design
//!
//! - One OS thread per work item (unbounded fan-out, no pool)
//! - Retry policy with a fixed delay between attempts
//! - Every attempt failure, success and final failure goes to one shared sink
//! - Per-item failures never escape a batch; they only shrink the results
//! - Sink failures are surfaced in the outcome, never swallowed
//!
//! ## Components
//!
//! - `LogSink`: serialized append point (`FileSink`, `MemorySink`)
//! - `RetryPolicy`: runs a closure up to `max_attempts` times
//! - `WorkItemProcessor`: squares an item, failing multiples of 13
//! - `ConcurrentBatchRunner`: fans a batch out and collects a `BatchOutcome`

pub mod outcome;
pub mod processor;
pub mod retry;
pub mod runner;
pub mod sink;

pub use outcome::{BatchOutcome, BatchSummary};
pub use processor::{WorkItemProcessor, DEFAULT_PROCESSING_DELAY};
pub use retry::{RetryError, RetryPolicy};
pub use runner::ConcurrentBatchRunner;
pub use sink::{FileSink, LogSink, MemorySink, SharedSink};
