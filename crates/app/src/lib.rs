//! Process wiring: configuration → log sink → engine → batch run.

use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use batchwork_infra::{
    BatchOutcome, BoundedFibonacci, ConcurrentBatchRunner, EngineConfig, FileSink, RetryPolicy,
    SharedSink, WorkItemProcessor,
};

/// Build the engine around one shared sink.
pub fn build_runner(config: &EngineConfig, sink: SharedSink) -> ConcurrentBatchRunner {
    let retry = RetryPolicy::new(config.retry, sink.clone());
    let processor = WorkItemProcessor::new(sink.clone(), retry, config.processing_delay);
    ConcurrentBatchRunner::new(Arc::new(processor), sink)
}

/// Open the configured log file and process the Fibonacci input once.
pub fn run(config: &EngineConfig) -> anyhow::Result<BatchOutcome> {
    let sink: SharedSink = FileSink::arc(&config.log_path)
        .with_context(|| format!("opening log file {}", config.log_path.display()))?;
    let runner = build_runner(config, sink);

    let input = BoundedFibonacci::new(config.sequence_limit);
    info!(
        limit = config.sequence_limit,
        max_attempts = config.retry.max_attempts(),
        log_path = %config.log_path.display(),
        "processing fibonacci sequence"
    );
    Ok(runner.run(&input))
}

/// Fail the process when the log sink lost records during the run.
///
/// Per-item failures are expected; an unusable sink is not.
pub fn ensure_sink_healthy(outcome: &BatchOutcome) -> anyhow::Result<()> {
    match outcome.sink_errors.first() {
        None => Ok(()),
        Some(first) => anyhow::bail!(
            "log sink rejected {} record(s) during run {}; first error: {first}",
            outcome.sink_errors.len(),
            outcome.run_id
        ),
    }
}
