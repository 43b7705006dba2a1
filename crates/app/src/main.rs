use batchwork_infra::{EngineConfig, ScopedTimer};

fn main() -> anyhow::Result<()> {
    let config = EngineConfig::load()?;
    batchwork_observability::init_with(config.log_format);

    let mut json = false;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--json" => json = true,
            other => tracing::warn!(arg = other, "ignoring unknown argument"),
        }
    }

    let outcome = {
        let _timer = ScopedTimer::with_reporter("batch", move |_, elapsed| {
            if !json {
                println!("Execution time: {:.4}s", elapsed.as_secs_f64());
            }
        });
        let outcome = batchwork_app::run(&config)?;
        if json {
            println!("{}", serde_json::to_string_pretty(&outcome.summary())?);
        } else {
            println!("Processed {} values.", outcome.len());
        }
        outcome
    };

    batchwork_app::ensure_sink_healthy(&outcome)
}
