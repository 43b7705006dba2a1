//! Infrastructure layer: the batch engine and the glue around it.

pub mod config;
pub mod engine;
pub mod sequence;
pub mod timing;


pub use config::{ConfigError, EngineConfig};
pub use engine::{
    BatchOutcome, BatchSummary, ConcurrentBatchRunner, FileSink, LogSink, MemorySink,
    RetryError, RetryPolicy, SharedSink, WorkItemProcessor,
};
pub use sequence::BoundedFibonacci;
pub use timing::ScopedTimer;
