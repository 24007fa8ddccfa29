//! Tracing and logging setup shared by every binary in the workspace.

/// Tracing configuration (filters, formatters).
pub mod tracing;

pub use self::tracing::OutputFormat;

/// Initialize process-wide tracing with the given output format.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init_with(format: OutputFormat) {
    tracing::init(format);
}
