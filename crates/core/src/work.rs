//! Work items and their results.

use serde::{Deserialize, Serialize};

use crate::error::ProcessingError;
use crate::value_object::ValueObject;

/// Items divisible by this value fail on every attempt.
pub const UNLUCKY_MODULUS: i64 = 13;

/// One integer input submitted to a batch. May repeat within a batch.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkItem(i64);

/// The successful output of transforming a [`WorkItem`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkResult(i64);

impl WorkItem {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }

    /// Divisible by [`UNLUCKY_MODULUS`]; negative multiples count too.
    pub fn is_unlucky(&self) -> bool {
        self.0.rem_euclid(UNLUCKY_MODULUS) == 0
    }

    /// The pure part of the transformation: classify, then square.
    pub fn square(&self) -> Result<WorkResult, ProcessingError> {
        if self.is_unlucky() {
            return Err(ProcessingError::Permanent { item: *self });
        }
        self.0
            .checked_mul(self.0)
            .map(WorkResult)
            .ok_or(ProcessingError::Overflow { item: *self })
    }
}

impl WorkResult {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl ValueObject for WorkItem {}
impl ValueObject for WorkResult {}

impl From<i64> for WorkItem {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<WorkResult> for i64 {
    fn from(value: WorkResult) -> Self {
        value.0
    }
}

impl core::fmt::Display for WorkItem {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl core::fmt::Display for WorkResult {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn multiples_of_thirteen_are_unlucky() {
        for v in [0, 13, 26, -13, 1300] {
            assert!(WorkItem::new(v).is_unlucky(), "{v} should be unlucky");
        }
        for v in [1, 5, 12, 14, -1] {
            assert!(!WorkItem::new(v).is_unlucky(), "{v} should not be unlucky");
        }
    }

    #[test]
    fn unlucky_items_fail_permanently() {
        let err = WorkItem::new(26).square().unwrap_err();
        assert!(matches!(err, ProcessingError::Permanent { item } if item.value() == 26));
        assert!(err.is_permanent());
        assert_eq!(err.to_string(), "unlucky number 26");
    }

    #[test]
    fn overflowing_square_is_reported() {
        let err = WorkItem::new(i64::MAX).square().unwrap_err();
        assert!(matches!(err, ProcessingError::Overflow { .. }));
    }

    proptest! {
        #[test]
        fn square_matches_multiplication(v in -3_000_000_000i64..3_000_000_000i64) {
            let item = WorkItem::new(v);
            match item.square() {
                Ok(r) => {
                    prop_assert!(!item.is_unlucky());
                    prop_assert_eq!(r.value(), v * v);
                }
                Err(ProcessingError::Permanent { .. }) => prop_assert_eq!(v % 13, 0),
                Err(other) => prop_assert!(false, "unexpected error: {other}"),
            }
        }
    }
}
