//! Value object trait: equality by value, not identity.
//!
//! Work items, results, log records and retry settings have **no identity**.
//! Two values with the same attributes are the same value, and none of them
//! change once created, which is what makes them safe to hand to any number
//! of worker threads without locking.

/// Marker trait for value objects.
///
/// ## Design Constraints
///
/// The trait requires:
/// - **Clone**: value objects are copied into worker threads, never shared mutably
/// - **PartialEq**: value objects are compared by their attribute values
/// - **Debug**: value objects show up in logs and test failures
///
/// ## Usage Pattern
///
/// ```ignore
/// #[derive(Debug, Clone, PartialEq, Eq)]
/// struct Threshold(i64);
///
/// impl ValueObject for Threshold {}
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
