//! Scoped wall-clock timing.

use std::time::{Duration, Instant};

use tracing::info;

type Reporter = Box<dyn FnOnce(&str, Duration) + Send>;

/// Measures from construction to drop.
///
/// The report happens in `Drop`, so it fires on normal exit, on an early `?`
/// return and while unwinding from a panic.
pub struct ScopedTimer {
    label: String,
    started: Instant,
    reporter: Option<Reporter>,
}

impl ScopedTimer {
    /// Start a timer that reports through `tracing` only.
    pub fn start(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            started: Instant::now(),
            reporter: None,
        }
    }

    /// Start a timer that also hands the elapsed time to `reporter`.
    pub fn with_reporter<F>(label: impl Into<String>, reporter: F) -> Self
    where
        F: FnOnce(&str, Duration) + Send + 'static,
    {
        Self {
            label: label.into(),
            started: Instant::now(),
            reporter: Some(Box::new(reporter)),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}

impl std::fmt::Debug for ScopedTimer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScopedTimer")
            .field("label", &self.label)
            .field("started", &self.started)
            .finish_non_exhaustive()
    }
}

impl Drop for ScopedTimer {
    fn drop(&mut self) {
        let elapsed = self.started.elapsed();
        info!(
            label = %self.label,
            elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
            "execution time: {:.4}s",
            elapsed.as_secs_f64()
        );
        if let Some(reporter) = self.reporter.take() {
            reporter(&self.label, elapsed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn capture() -> (Arc<Mutex<Option<Duration>>>, impl FnOnce(&str, Duration) + Send + 'static) {
        let slot = Arc::new(Mutex::new(None));
        let sink = slot.clone();
        (slot, move |_label: &str, elapsed: Duration| {
            *sink.lock().unwrap() = Some(elapsed);
        })
    }

    #[test]
    fn reports_on_scope_exit() {
        let (slot, reporter) = capture();
        {
            let _timer = ScopedTimer::with_reporter("batch", reporter);
            std::thread::sleep(Duration::from_millis(10));
        }
        let elapsed = slot.lock().unwrap().expect("timer did not report");
        assert!(elapsed >= Duration::from_millis(10));
    }

    #[test]
    fn reports_on_early_error_return() {
        fn fallible(reporter: impl FnOnce(&str, Duration) + Send + 'static) -> Result<(), String> {
            let _timer = ScopedTimer::with_reporter("fallible", reporter);
            let _n: i32 = "not a number".parse().map_err(|_| "bail".to_string())?;
            Ok(())
        }

        let (slot, reporter) = capture();
        assert!(fallible(reporter).is_err());
        assert!(slot.lock().unwrap().is_some());
    }

    #[test]
    fn reports_while_unwinding() {
        let (slot, reporter) = capture();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _timer = ScopedTimer::with_reporter("panicking", reporter);
            panic!("boom");
        }));
        assert!(result.is_err());
        assert!(slot.lock().unwrap_or_else(|e| e.into_inner()).is_some());
    }

    #[test]
    fn label_is_passed_to_reporter() {
        let seen = Arc::new(Mutex::new(String::new()));
        let sink = seen.clone();
        drop(ScopedTimer::with_reporter("labelled", move |label, _| {
            *sink.lock().unwrap() = label.to_string();
        }));
        assert_eq!(*seen.lock().unwrap(), "labelled");
    }
}
