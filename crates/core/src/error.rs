//! Domain error model.

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

use crate::work::WorkItem;

/// Result type used for domain-level validation.
pub type CoreResult<T> = Result<T, CoreError>;

/// Domain-level error.
///
/// Keep this focused on deterministic validation failures. Runtime failures of
/// work items and of the log sink have their own types below.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A value failed validation (e.g. zero retry attempts).
    #[error("validation failed: {0}")]
    Validation(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),
}

impl CoreError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }
}

/// Failure to append a record to the log sink.
///
/// Cloneable so the same failure can both abort an attempt and be kept in
/// the batch outcome.
#[derive(Debug, Clone, Error)]
pub enum SinkError {
    /// The underlying file could not be opened or written.
    #[error("log sink {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: Arc<std::io::Error>,
    },

    /// The sink refused the record (closed, disconnected, test double).
    #[error("log sink unavailable: {0}")]
    Unavailable(String),
}

impl SinkError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source: Arc::new(source),
        }
    }

    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }
}

/// Failure of a single transformation attempt.
#[derive(Debug, Error)]
pub enum ProcessingError {
    /// Ephemeral fault; a later attempt may succeed.
    #[error("transient failure: {0}")]
    Transient(String),

    /// The item fails on every attempt (unlucky modulus).
    ///
    /// Retrying cannot help, but the retry policy has no way to tell this
    /// apart from a transient fault and still spends every attempt.
    #[error("unlucky number {item}")]
    Permanent { item: WorkItem },

    /// The square does not fit in an `i64`.
    #[error("square of {item} overflows")]
    Overflow { item: WorkItem },

    /// Recording the success in the log sink failed.
    #[error(transparent)]
    Sink(#[from] SinkError),
}

impl ProcessingError {
    pub fn transient(msg: impl Into<String>) -> Self {
        Self::Transient(msg.into())
    }

    /// Whether another attempt could change the outcome.
    pub fn is_permanent(&self) -> bool {
        matches!(self, Self::Permanent { .. } | Self::Overflow { .. })
    }
}
