//! `batchwork-core`: domain building blocks for the batch engine.
//!
//! This crate contains **pure domain** primitives (no threads, no I/O).

pub mod error;
pub mod id;
pub mod log_record;
pub mod retry;
pub mod value_object;
pub mod work;

pub use error::{CoreError, CoreResult, ProcessingError, SinkError};
pub use id::RunId;
pub use log_record::LogRecord;
pub use retry::RetryConfiguration;
pub use value_object::ValueObject;
pub use work::{WorkItem, WorkResult, UNLUCKY_MODULUS};
