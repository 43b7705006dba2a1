//! Tracing/logging setup shared by every binary in the workspace.

/// Initialize process-wide observability with the pretty formatter.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init(LogFormat::default());
}

/// Initialize process-wide observability with an explicit output format.
pub fn init_with(format: LogFormat) {
    tracing::init(format);
}

/// Tracing configuration (filters, formatters).
pub mod tracing;

pub use self::tracing::LogFormat;
