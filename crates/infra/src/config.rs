//! Engine configuration: defaults, optional JSON file, environment overrides.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use batchwork_core::{CoreError, RetryConfiguration};
use batchwork_observability::LogFormat;

use crate::engine::DEFAULT_PROCESSING_DELAY;

/// Path of a JSON config file to start from.
pub const ENV_CONFIG_FILE: &str = "BATCHWORK_CONFIG";
pub const ENV_LOG_PATH: &str = "BATCHWORK_LOG_PATH";
pub const ENV_MAX_ATTEMPTS: &str = "BATCHWORK_MAX_ATTEMPTS";
pub const ENV_RETRY_DELAY_MS: &str = "BATCHWORK_RETRY_DELAY_MS";
pub const ENV_PROCESSING_DELAY_MS: &str = "BATCHWORK_PROCESSING_DELAY_MS";
pub const ENV_LIMIT: &str = "BATCHWORK_LIMIT";
pub const ENV_LOG_FORMAT: &str = "BATCHWORK_LOG_FORMAT";

/// Configuration loading error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid value {value:?} for {name}: {reason}")]
    InvalidVar {
        name: &'static str,
        value: String,
        reason: String,
    },
    #[error(transparent)]
    Invalid(#[from] CoreError),
}

/// Everything the process entry point needs to build and run a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Append-only log file shared by every worker.
    pub log_path: PathBuf,
    pub retry: RetryConfiguration,
    /// Simulated work per successful attempt.
    #[serde(rename = "processing_delay_ms", with = "duration_ms")]
    pub processing_delay: Duration,
    /// Upper bound of the Fibonacci input sequence.
    pub sequence_limit: i64,
    pub log_format: LogFormat,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            log_path: PathBuf::from("app.log"),
            retry: RetryConfiguration::default(),
            processing_delay: DEFAULT_PROCESSING_DELAY,
            sequence_limit: 1000,
            log_format: LogFormat::default(),
        }
    }
}

impl EngineConfig {
    /// Load from the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load using `lookup` in place of the environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base = match lookup(ENV_CONFIG_FILE) {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        base.with_overrides(lookup)
    }

    /// Parse a JSON config file; missing fields keep their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "loaded config file");
        Ok(config)
    }

    /// Apply `BATCHWORK_*` overrides on top of `self`.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup(ENV_LOG_PATH) {
            self.log_path = PathBuf::from(path);
        }
        if let Some(value) = lookup(ENV_LIMIT) {
            self.sequence_limit = parse_var(ENV_LIMIT, &value)?;
        }
        if let Some(value) = lookup(ENV_PROCESSING_DELAY_MS) {
            self.processing_delay = Duration::from_millis(parse_var(ENV_PROCESSING_DELAY_MS, &value)?);
        }
        if let Some(value) = lookup(ENV_LOG_FORMAT) {
            self.log_format = value.parse().map_err(|reason| ConfigError::InvalidVar {
                name: ENV_LOG_FORMAT,
                value: value.clone(),
                reason,
            })?;
        }

        let max_attempts = match lookup(ENV_MAX_ATTEMPTS) {
            Some(value) => parse_var(ENV_MAX_ATTEMPTS, &value)?,
            None => self.retry.max_attempts(),
        };
        let delay = match lookup(ENV_RETRY_DELAY_MS) {
            Some(value) => Duration::from_millis(parse_var(ENV_RETRY_DELAY_MS, &value)?),
            None => self.retry.delay_between_attempts(),
        };
        self.retry = RetryConfiguration::new(max_attempts, delay)?;

        Ok(self)
    }
}

fn parse_var<T>(name: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError::InvalidVar {
        name,
        value: value.to_string(),
        reason: e.to_string(),
    })
}

mod duration_ms {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(u64::try_from(value.as_millis()).unwrap_or(u64::MAX))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
