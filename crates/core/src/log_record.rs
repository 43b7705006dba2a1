//! Log records written to the serialized sink.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_object::ValueObject;

/// `ctime`-style layout, e.g. `Sat Oct 17 10:04:05 2026`.
const TIMESTAMP_FORMAT: &str = "%a %b %e %H:%M:%S %Y";

/// One event destined for the log sink. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecord {
    pub timestamp: DateTime<Utc>,
    pub message: String,
}

impl LogRecord {
    /// Capture `message` with the current time.
    pub fn now(message: impl Into<String>) -> Self {
        Self::at(Utc::now(), message)
    }

    pub fn at(timestamp: DateTime<Utc>, message: impl Into<String>) -> Self {
        Self {
            timestamp,
            message: message.into(),
        }
    }

    /// Render as `<timestamp>: <message>\n`.
    ///
    /// Embedded newlines are escaped so one record is always one line.
    pub fn to_line(&self) -> String {
        let message = self.message.replace('\r', "\\r").replace('\n', "\\n");
        format!("{}: {}\n", self.timestamp.format(TIMESTAMP_FORMAT), message)
    }
}

impl ValueObject for LogRecord {}

impl core::fmt::Display for LogRecord {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.to_line().trim_end_matches('\n'))
    }
}
