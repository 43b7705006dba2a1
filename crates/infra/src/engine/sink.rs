//! Serialized, append-only log sinks.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use batchwork_core::{LogRecord, SinkError};

/// Append point shared by every worker thread.
///
/// Implementations guarantee that records never interleave and that a record
/// is fully written before `append` returns.
pub trait LogSink: Send + Sync {
    /// Timestamp `message`, then write it under the sink's exclusive guard.
    fn append(&self, message: &str) -> Result<(), SinkError>;
}

/// The single sink instance handed to every component.
pub type SharedSink = Arc<dyn LogSink>;

impl std::fmt::Debug for dyn LogSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("LogSink")
    }
}

/// Text file sink: one `<timestamp>: <message>` line per record.
///
/// The file is opened once in append mode; every record is written with a
/// single `write_all` while the lock is held.
#[derive(Debug)]
pub struct FileSink {
    path: PathBuf,
    file: Mutex<File>,
}

impl FileSink {
    /// Open (or create) `path` for appending.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SinkError> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| SinkError::io(&path, e))?;
        Ok(Self {
            path,
            file: Mutex::new(file),
        })
    }

    pub fn arc(path: impl AsRef<Path>) -> Result<Arc<Self>, SinkError> {
        Self::open(path).map(Arc::new)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LogSink for FileSink {
    fn append(&self, message: &str) -> Result<(), SinkError> {
        let line = LogRecord::now(message).to_line();
        // Poison is recovered: the guard protects only the file handle.
        let mut file = self.file.lock().unwrap_or_else(PoisonError::into_inner);
        file.write_all(line.as_bytes())
            .and_then(|()| file.flush())
            .map_err(|e| SinkError::io(&self.path, e))
    }
}

/// In-memory sink for tests and embedders that want logs in-process.
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<LogRecord>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arc() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Snapshot of every record appended so far, in arrival order.
    pub fn records(&self) -> Vec<LogRecord> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Snapshot of the messages only.
    pub fn messages(&self) -> Vec<String> {
        self.records().into_iter().map(|r| r.message).collect()
    }

    pub fn len(&self) -> usize {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl LogSink for MemorySink {
    fn append(&self, message: &str) -> Result<(), SinkError> {
        let record = LogRecord::now(message);
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(record);
        Ok(())
    }
}
