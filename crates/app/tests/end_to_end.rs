use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use batchwork_core::{RetryConfiguration, SinkError, WorkItem, WorkResult};
use batchwork_infra::{EngineConfig, LogSink, MemorySink};

fn test_config(log_path: &Path) -> EngineConfig {
    EngineConfig {
        log_path: log_path.to_path_buf(),
        retry: RetryConfiguration::new(2, Duration::from_millis(1)).unwrap(),
        processing_delay: Duration::ZERO,
        sequence_limit: 1000,
        ..EngineConfig::default()
    }
}

fn read_log(path: &Path) -> Vec<String> {
    std::fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

#[test]
fn fibonacci_run_writes_one_line_per_event() {
    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("app.log");
    let config = test_config(&log_path);

    let outcome = batchwork_app::run(&config).unwrap();
    batchwork_app::ensure_sink_healthy(&outcome).unwrap();

    // 0, 13 and 377 are multiples of 13.
    assert_eq!(outcome.submitted, 17);
    assert_eq!(outcome.len(), 14);
    assert_eq!(outcome.summary().failed, 3);

    let lines = read_log(&log_path);
    // 14 successes; 3 failures x (2 attempts + 1 final record).
    assert_eq!(lines.len(), 14 + 3 * 3);
    assert!(lines.iter().all(|l| l.split_once(": ").is_some()));
    assert_eq!(
        lines.iter().filter(|l| l.ends_with(": Processed: 1")).count(),
        2,
        "1 appears twice in the sequence"
    );
    assert!(lines.iter().any(|l| l.ends_with(": Failed processing 377: unlucky number 377")));
}

#[test]
fn consecutive_runs_append_to_the_same_log() {
    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("app.log");
    let config = EngineConfig {
        sequence_limit: 5,
        ..test_config(&log_path)
    };

    batchwork_app::run(&config).unwrap();
    let after_first = read_log(&log_path).len();
    batchwork_app::run(&config).unwrap();

    assert_eq!(read_log(&log_path).len(), after_first * 2);
}

#[test]
fn unopenable_log_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&dir.path().join("missing").join("app.log"));

    let err = batchwork_app::run(&config).unwrap_err();
    assert!(err.to_string().contains("opening log file"));
}

#[test]
fn reference_batch_through_custom_sink() {
    let sink = MemorySink::arc();
    let config = EngineConfig {
        retry: RetryConfiguration::new(2, Duration::ZERO).unwrap(),
        processing_delay: Duration::ZERO,
        ..EngineConfig::default()
    };
    let runner = batchwork_app::build_runner(&config, sink.clone());

    let outcome = runner.run([0, 1, 13, 26, 5].map(WorkItem::new));

    assert_eq!(
        outcome.sorted_results(),
        vec![WorkResult::new(1), WorkResult::new(25)]
    );
    let messages = sink.messages();
    for unlucky in [13, 26] {
        let expected = format!("unlucky number {unlucky}");
        let attempts = messages
            .iter()
            .filter(|m| m.starts_with("Attempt ") && m.ends_with(&expected))
            .count();
        assert_eq!(attempts, 2);
    }
}

struct RefusingSink;

impl LogSink for RefusingSink {
    fn append(&self, _message: &str) -> Result<(), SinkError> {
        Err(SinkError::unavailable("read-only volume"))
    }
}

#[test]
fn dead_sink_fails_the_process() {
    let config = EngineConfig {
        processing_delay: Duration::ZERO,
        ..EngineConfig::default()
    };
    let runner = batchwork_app::build_runner(&config, Arc::new(RefusingSink));

    let outcome = runner.run([1, 2, 3].map(WorkItem::new));

    assert!(outcome.is_empty());
    let err = batchwork_app::ensure_sink_healthy(&outcome).unwrap_err();
    assert!(err.to_string().contains("read-only volume"));
}

struct NoSuccessSink {
    inner: MemorySink,
}

impl LogSink for NoSuccessSink {
    fn append(&self, message: &str) -> Result<(), SinkError> {
        if message.starts_with("Processed:") {
            return Err(SinkError::unavailable("disk full"));
        }
        self.inner.append(message)
    }
}

#[test]
fn lost_success_records_fail_the_process() {
    let config = EngineConfig {
        retry: RetryConfiguration::new(2, Duration::ZERO).unwrap(),
        processing_delay: Duration::ZERO,
        ..EngineConfig::default()
    };
    let sink = Arc::new(NoSuccessSink {
        inner: MemorySink::new(),
    });
    let runner = batchwork_app::build_runner(&config, sink.clone());

    let outcome = runner.run([1, 5].map(WorkItem::new));

    // Attempt and final-failure records still land, so only the success
    // records reveal the fault.
    assert_eq!(sink.inner.len(), 6);
    let err = batchwork_app::ensure_sink_healthy(&outcome).unwrap_err();
    assert!(err.to_string().contains("rejected 4 record(s)"));
}
