//! Observer hooks for session events.
//!
//! A presentation layer re-renders on successful load, successful clean and reset; it also has to
//! surface failures. [`SessionObserver`] carries exactly those notifications.

use std::fmt;
use std::sync::Arc;

use tracing::{error, info, warn};

use crate::error::CleanerError;
use crate::processing::Strategy;

/// Severity classification used for observer callbacks and alerting thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Informational event.
    Info,
    /// Warning-level event (non-fatal, e.g. user input rejected).
    Warning,
    /// Error-level event (operation failed).
    Error,
    /// Critical error (typically I/O failures).
    Critical,
}

impl Severity {
    /// Severity assigned to a failed operation.
    pub fn for_error(e: &CleanerError) -> Self {
        match e {
            CleanerError::Io(_) => Severity::Critical,
            CleanerError::Csv(err) => match err.kind() {
                ::csv::ErrorKind::Io(_) => Severity::Critical,
                _ => Severity::Error,
            },
            CleanerError::Parse { .. } => Severity::Error,
            CleanerError::UserInput { .. } | CleanerError::Busy => Severity::Warning,
        }
    }
}

/// Context about the session an event belongs to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventContext {
    /// Name of the currently loaded (or attempted) file.
    pub file_name: Option<String>,
}

/// Reported after a dataset was loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadStats {
    pub rows: usize,
    pub columns: usize,
    pub missing: usize,
}

/// Reported after a clean finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CleanStats {
    pub strategy: Strategy,
    pub rows_before: usize,
    pub rows_after: usize,
    pub missing_before: usize,
    pub missing_after: usize,
}

/// Observer interface for session outcomes.
///
/// All methods have no-op defaults; implement only what you need.
pub trait SessionObserver: Send + Sync {
    /// Called when a file was parsed into a new dataset.
    fn on_loaded(&self, _ctx: &EventContext, _stats: LoadStats) {}

    /// Called when a clean produced a new cleaned dataset.
    fn on_cleaned(&self, _ctx: &EventContext, _stats: CleanStats) {}

    /// Called when the cleaned dataset was discarded.
    fn on_reset(&self, _ctx: &EventContext) {}

    /// Called when an operation fails.
    fn on_failure(&self, _ctx: &EventContext, _severity: Severity, _error: &CleanerError) {}

    /// Called when a failure meets the alert threshold.
    ///
    /// Default behavior forwards to [`Self::on_failure`].
    fn on_alert(&self, ctx: &EventContext, severity: Severity, error: &CleanerError) {
        self.on_failure(ctx, severity, error)
    }
}

/// An observer that fans out callbacks to a list of observers.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn SessionObserver>>,
}

impl CompositeObserver {
    pub fn new(observers: Vec<Arc<dyn SessionObserver>>) -> Self {
        Self { observers }
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeObserver")
            .field("observers_len", &self.observers.len())
            .finish()
    }
}

impl SessionObserver for CompositeObserver {
    fn on_loaded(&self, ctx: &EventContext, stats: LoadStats) {
        for o in &self.observers {
            o.on_loaded(ctx, stats);
        }
    }

    fn on_cleaned(&self, ctx: &EventContext, stats: CleanStats) {
        for o in &self.observers {
            o.on_cleaned(ctx, stats);
        }
    }

    fn on_reset(&self, ctx: &EventContext) {
        for o in &self.observers {
            o.on_reset(ctx);
        }
    }

    fn on_failure(&self, ctx: &EventContext, severity: Severity, error: &CleanerError) {
        for o in &self.observers {
            o.on_failure(ctx, severity, error);
        }
    }

    fn on_alert(&self, ctx: &EventContext, severity: Severity, error: &CleanerError) {
        for o in &self.observers {
            o.on_alert(ctx, severity, error);
        }
    }
}

/// Logs session events through `tracing`.
#[derive(Debug, Default)]
pub struct TracingObserver;

impl SessionObserver for TracingObserver {
    fn on_loaded(&self, ctx: &EventContext, stats: LoadStats) {
        info!(
            file = ctx.file_name.as_deref().unwrap_or("-"),
            rows = stats.rows,
            columns = stats.columns,
            missing = stats.missing,
            "dataset loaded"
        );
    }

    fn on_cleaned(&self, ctx: &EventContext, stats: CleanStats) {
        info!(
            file = ctx.file_name.as_deref().unwrap_or("-"),
            strategy = %stats.strategy,
            rows_before = stats.rows_before,
            rows_after = stats.rows_after,
            missing_before = stats.missing_before,
            missing_after = stats.missing_after,
            "dataset cleaned"
        );
    }

    fn on_reset(&self, ctx: &EventContext) {
        info!(file = ctx.file_name.as_deref().unwrap_or("-"), "cleaned dataset discarded");
    }

    fn on_failure(&self, ctx: &EventContext, severity: Severity, error: &CleanerError) {
        warn!(
            file = ctx.file_name.as_deref().unwrap_or("-"),
            ?severity,
            %error,
            "operation failed"
        );
    }

    fn on_alert(&self, ctx: &EventContext, severity: Severity, error: &CleanerError) {
        error!(
            file = ctx.file_name.as_deref().unwrap_or("-"),
            ?severity,
            %error,
            "ALERT"
        );
    }
}
