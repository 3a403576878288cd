//! Logging facilities for Cascade.
//!
//! Cascade uses the `tracing` crate for instrumentation and never installs a
//! subscriber itself. To see logs, install one in the host application:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("cascade=debug,cascade_core=debug")
//!     .init();
//! ```

/// Span names used throughout Cascade for tracing.
pub mod span_names {
    /// A full placement pass.
    pub const PLACEMENT: &str = "cascade::placement";
    /// Snapshot diffing at the start of a transition.
    pub const DIFF: &str = "cascade::differ";
    /// An asynchronous layout job.
    pub const ASYNC_LAYOUT: &str = "cascade::staging";
}

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Primary-context dispatch queue.
    pub const DISPATCH: &str = "cascade_core::dispatch";
    /// Background worker.
    pub const WORKER: &str = "cascade_core::worker";
    /// Placement engine.
    pub const PLACEMENT: &str = "cascade::placement";
    /// Update batches and transition attribute synthesis.
    pub const TRANSITION: &str = "cascade::transition";
    /// Async staging and adoption.
    pub const STAGING: &str = "cascade::staging";
    /// Scalar animation driver.
    pub const ANIMATION: &str = "cascade::animation";
    /// Performance spans.
    pub const PERF: &str = "cascade::perf";
}

/// A guard that keeps a tracing span entered until dropped.
///
/// Useful for timing an operation with a span-aware subscriber.
#[derive(Debug)]
pub struct PerfSpan {
    #[allow(dead_code)]
    span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Create a new performance span for the named operation.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::info_span!(target: "cascade::perf", "perf", operation = name);
        Self {
            span: span.entered(),
        }
    }
}
