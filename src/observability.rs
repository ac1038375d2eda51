//! Logging infrastructure for pruning decisions.
//!
//! Events go through `tracing` under a single target and always carry an
//! `event` field for filtering.
//!
//! ## Library Integration
//!
//! The crate never initializes a global subscriber. Applications configure
//! tracing via `tracing_subscriber` or similar.
//!
//! ## Conventions
//!
//! - `event`: snake_case event name (required)
//! - `component`: subsystem (e.g., "predicate", "footer")
//! - Use `%` for Display, `?` for Debug formatting
//! - Per-section decisions log at trace level; scan-level summaries at debug

/// Target for all log events of this crate.
pub(crate) const PRUNER_TARGET: &str = "section_pruner";

/// Macro for trace-level log events.
macro_rules! log_trace {
    ($($field:tt)*) => {
        ::tracing::trace!(target: $crate::observability::PRUNER_TARGET, $($field)*)
    };
}

/// Macro for debug-level log events.
///
/// # Example
/// ```ignore
/// log_debug!(
///     component = "predicate",
///     event = "predicate_built",
///     columns = columns.len(),
///     bloom_filters_enabled,
/// );
/// ```
macro_rules! log_debug {
    ($($field:tt)*) => {
        ::tracing::debug!(target: $crate::observability::PRUNER_TARGET, $($field)*)
    };
}

/// Macro for warn-level log events.
macro_rules! log_warn {
    ($($field:tt)*) => {
        ::tracing::warn!(target: $crate::observability::PRUNER_TARGET, $($field)*)
    };
}

pub(crate) use log_debug;
pub(crate) use log_trace;
pub(crate) use log_warn;
