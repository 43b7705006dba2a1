//! Retry configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::value_object::ValueObject;

/// Bounded retry with a fixed delay between attempts.
///
/// `max_attempts` counts every attempt including the first, so `1` means
/// "no retries". Zero is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawRetryConfiguration", into = "RawRetryConfiguration")]
pub struct RetryConfiguration {
    max_attempts: u32,
    delay_between_attempts: Duration,
}

/// Wire shape: `{ "max_attempts": 2, "delay_ms": 1000 }`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct RawRetryConfiguration {
    max_attempts: u32,
    #[serde(default)]
    delay_ms: u64,
}

impl Default for RetryConfiguration {
    fn default() -> Self {
        Self {
            max_attempts: 2,
            delay_between_attempts: Duration::from_secs(1),
        }
    }
}

impl RetryConfiguration {
    pub fn new(max_attempts: u32, delay_between_attempts: Duration) -> CoreResult<Self> {
        if max_attempts == 0 {
            return Err(CoreError::validation("max_attempts must be at least 1"));
        }
        Ok(Self {
            max_attempts,
            delay_between_attempts,
        })
    }

    /// Exactly one attempt.
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            delay_between_attempts: Duration::ZERO,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn delay_between_attempts(&self) -> Duration {
        self.delay_between_attempts
    }

    /// Check if another attempt is allowed after `attempt` (1-indexed) failed.
    pub fn should_retry(&self, attempt: u32) -> bool {
        attempt < self.max_attempts
    }
}

impl ValueObject for RetryConfiguration {}

impl TryFrom<RawRetryConfiguration> for RetryConfiguration {
    type Error = CoreError;

    fn try_from(raw: RawRetryConfiguration) -> Result<Self, Self::Error> {
        Self::new(raw.max_attempts, Duration::from_millis(raw.delay_ms))
    }
}

impl From<RetryConfiguration> for RawRetryConfiguration {
    fn from(config: RetryConfiguration) -> Self {
        Self {
            max_attempts: config.max_attempts,
            delay_ms: u64::try_from(config.delay_between_attempts.as_millis()).unwrap_or(u64::MAX),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_attempts_is_rejected() {
        let err = RetryConfiguration::new(0, Duration::ZERO).unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[test]
    fn should_retry_respects_max_attempts() {
        let config = RetryConfiguration::new(3, Duration::from_millis(5)).unwrap();

        assert!(config.should_retry(1));
        assert!(config.should_retry(2));
        assert!(!config.should_retry(3));
        assert!(!config.should_retry(4));
    }

    #[test]
    fn single_attempt_never_retries() {
        assert!(!RetryConfiguration::no_retry().should_retry(1));
    }

    #[test]
    fn default_matches_reference_behavior() {
        let config = RetryConfiguration::default();
        assert_eq!(config.max_attempts(), 2);
        assert_eq!(config.delay_between_attempts(), Duration::from_secs(1));
    }

    #[test]
    fn deserializes_from_json() {
        let config: RetryConfiguration =
            serde_json::from_str(r#"{ "max_attempts": 4, "delay_ms": 250 }"#).unwrap();
        assert_eq!(config.max_attempts(), 4);
        assert_eq!(config.delay_between_attempts(), Duration::from_millis(250));
    }

    #[test]
    fn deserialization_enforces_validation() {
        let result = serde_json::from_str::<RetryConfiguration>(r#"{ "max_attempts": 0 }"#);
        assert!(result.is_err());
    }
}
