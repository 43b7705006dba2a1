//! Bounded input sequences.

use batchwork_core::WorkItem;

/// Fibonacci numbers `0, 1, 1, 2, 3, 5, ...` up to and including `limit`.
///
/// Iterating borrows the sequence, so the same value can be walked any
/// number of times.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundedFibonacci {
    limit: i64,
}

impl BoundedFibonacci {
    pub fn new(limit: i64) -> Self {
        Self { limit }
    }

    pub fn limit(&self) -> i64 {
        self.limit
    }

    pub fn iter(&self) -> FibonacciIter {
        FibonacciIter {
            current: Some(0),
            next: Some(1),
            limit: self.limit,
        }
    }
}

impl IntoIterator for &BoundedFibonacci {
    type Item = WorkItem;
    type IntoIter = FibonacciIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over a [`BoundedFibonacci`].
#[derive(Debug, Clone)]
pub struct FibonacciIter {
    current: Option<i64>,
    // None once the term would not fit in an i64.
    next: Option<i64>,
    limit: i64,
}

impl Iterator for FibonacciIter {
    type Item = WorkItem;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.current.filter(|&c| c <= self.limit)?;
        self.current = self.next;
        self.next = self.next.and_then(|n| n.checked_add(current));
        Some(WorkItem::new(current))
    }
}

impl std::iter::FusedIterator for FibonacciIter {}
