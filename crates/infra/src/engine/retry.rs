//! Bounded retry with a fixed backoff.

use std::fmt::Display;
use std::thread;

use tracing::{debug, warn};

use batchwork_core::{RetryConfiguration, SinkError};

use super::sink::SharedSink;

/// Why [`RetryPolicy::execute`] gave up.
#[derive(Debug, thiserror::Error)]
pub enum RetryError<E> {
    /// Every configured attempt failed; `source` is the last failure.
    #[error("gave up after {attempts} attempt(s): {source}")]
    Exhausted { attempts: u32, source: E },

    /// The failed attempt could not be recorded, so retrying stopped early.
    #[error("retry aborted: {0}")]
    Sink(#[source] SinkError),
}

impl<E> RetryError<E> {
    /// Last operation failure, if the policy got that far.
    pub fn last_failure(&self) -> Option<&E> {
        match self {
            Self::Exhausted { source, .. } => Some(source),
            Self::Sink(_) => None,
        }
    }
}

/// Retries a fallible operation up to `max_attempts` times.
///
/// Every failed attempt is recorded in the shared sink as
/// `Attempt {n} failed: {error}`. Between attempts the *calling* thread
/// sleeps for the configured delay; other workers keep running.
///
/// When the sink itself rejects the attempt record the loop stops with
/// [`RetryError::Sink`] instead of retrying against a dead sink.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    config: RetryConfiguration,
    sink: SharedSink,
}

impl RetryPolicy {
    pub fn new(config: RetryConfiguration, sink: SharedSink) -> Self {
        Self { config, sink }
    }

    /// Run `operation` until it succeeds or attempts run out.
    pub fn execute<T, E, F>(&self, mut operation: F) -> Result<T, RetryError<E>>
    where
        E: Display,
        F: FnMut() -> Result<T, E>,
    {
        let mut attempt = 1;
        loop {
            let error = match operation() {
                Ok(value) => return Ok(value),
                Err(error) => error,
            };

            if let Err(sink_error) = self.sink.append(&format!("Attempt {attempt} failed: {error}")) {
                warn!(attempt, error = %sink_error, "could not record failed attempt; aborting retries");
                return Err(RetryError::Sink(sink_error));
            }

            if !self.config.should_retry(attempt) {
                return Err(RetryError::Exhausted {
                    attempts: attempt,
                    source: error,
                });
            }

            let delay = self.config.delay_between_attempts();
            let delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
            debug!(attempt, delay_ms, "retrying after failure");
            if !delay.is_zero() {
                thread::sleep(delay);
            }
            attempt += 1;
        }
    }
}
