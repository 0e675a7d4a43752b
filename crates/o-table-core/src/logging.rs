//! Logging facilities for o-table.
//!
//! o-table uses the `tracing` crate for instrumentation and never installs a
//! subscriber itself. To see logs, install one in your application:
//!
//! ```ignore
//! fn main() {
//!     tracing_subscriber::fmt::init();
//!
//!     // Build and drive tables...
//! }
//! ```
//!
//! Every subsystem logs under one of the [`targets`], so a directive such as
//! `RUST_LOG=o_table::sort=trace` isolates sort formatting and ordering.

/// Span names used throughout o-table for tracing.
pub mod span_names {
    /// A full sort request (format, compare, reorder).
    pub const SORT: &str = "o_table::sort";
    /// A filter request.
    pub const FILTER: &str = "o_table::filter";
    /// Visibility and row order recomputation.
    pub const VISIBILITY: &str = "o_table::visibility";
    /// A flushed render frame.
    pub const FRAME: &str = "o_table::frame";
}

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Core target.
    pub const CORE: &str = "o_table_core";
    /// Notification dispatch.
    pub const SIGNAL: &str = "o_table_core::signal";
    /// Render scheduling.
    pub const FRAME: &str = "o_table_core::frame";
    /// Sort formatting and row ordering.
    pub const SORT: &str = "o_table::sort";
    /// Cell extraction and type coercion.
    pub const FORMAT: &str = "o_table::format";
    /// Filtering.
    pub const FILTER: &str = "o_table::filter";
    /// Row visibility and expand/contract.
    pub const VISIBILITY: &str = "o_table::visibility";
    /// Markup reading.
    pub const MARKUP: &str = "o_table::markup";
    /// Responsive presentation.
    pub const PRESENTATION: &str = "o_table::presentation";
}

/// A guard that keeps a tracing span entered until it is dropped.
///
/// Used to time sort and filter requests.
#[derive(Debug)]
pub struct PerfSpan {
    #[allow(dead_code)]
    span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Create a new performance span.
    ///
    /// The span will be active until the guard is dropped.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::info_span!(target: "o_table::perf", "perf", operation = name);
        Self {
            span: span.entered(),
        }
    }
}

#[macro_export]
macro_rules! otable_trace {
    ($($arg:tt)*) => {
        tracing::trace!(target: "o_table", $($arg)*)
    };
}

#[macro_export]
macro_rules! otable_debug {
    ($($arg:tt)*) => {
        tracing::debug!(target: "o_table", $($arg)*)
    };
}

#[macro_export]
macro_rules! otable_warn {
    ($($arg:tt)*) => {
        tracing::warn!(target: "o_table", $($arg)*)
    };
}
