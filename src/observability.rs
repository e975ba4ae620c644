//! Observer hooks for upload outcomes.
//!
//! [`crate::upload::analyze_upload`] reports every success or failure to the observer set in
//! [`crate::upload::ReportOptions`], and additionally raises an alert when a failure's
//! [`Severity`] reaches the configured threshold.

use std::fmt;
use std::sync::Arc;

use crate::error::{ErrorCategory, ReportError};
use crate::ingestion::TableFormat;

/// Severity classification used for observer callbacks and alerting thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Informational event.
    Info,
    /// Warning-level event (non-fatal).
    Warning,
    /// The upload was rejected (bad file, missing column, ...).
    Error,
    /// Internal failure (typically I/O).
    Critical,
}

impl Severity {
    /// Severity of a failed upload: caller errors are `Error`, internal ones `Critical`.
    pub fn for_error(err: &ReportError) -> Self {
        match err.category() {
            ErrorCategory::Caller => Severity::Error,
            ErrorCategory::Internal => Severity::Critical,
        }
    }
}

/// Context about one upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadContext {
    /// Declared filename of the upload.
    pub filename: String,
    /// Decode path, if one could be inferred.
    pub format: Option<TableFormat>,
}

/// Stats reported on success.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadStats {
    /// Number of decoded rows.
    pub rows: usize,
    /// Rows whose target value was unusable.
    pub invalid_values: usize,
}

/// Observer interface for upload outcomes.
///
/// Implementors can record metrics, logs, or trigger alerts.
pub trait ReportObserver: Send + Sync {
    /// Called when an upload produced statistics.
    fn on_success(&self, _ctx: &UploadContext, _stats: UploadStats) {}

    /// Called when an upload failed.
    fn on_failure(&self, _ctx: &UploadContext, _severity: Severity, _error: &ReportError) {}

    /// Called when a failure meets the alert threshold.
    ///
    /// Default behavior forwards to [`Self::on_failure`].
    fn on_alert(&self, ctx: &UploadContext, severity: Severity, error: &ReportError) {
        self.on_failure(ctx, severity, error)
    }
}

/// An observer that fans out callbacks to a list of observers.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn ReportObserver>>,
}

impl CompositeObserver {
    /// Create a new composite observer from a list of observers.
    pub fn new(observers: Vec<Arc<dyn ReportObserver>>) -> Self {
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

impl ReportObserver for CompositeObserver {
    fn on_success(&self, ctx: &UploadContext, stats: UploadStats) {
        for o in &self.observers {
            o.on_success(ctx, stats);
        }
    }

    fn on_failure(&self, ctx: &UploadContext, severity: Severity, error: &ReportError) {
        for o in &self.observers {
            o.on_failure(ctx, severity, error);
        }
    }

    fn on_alert(&self, ctx: &UploadContext, severity: Severity, error: &ReportError) {
        for o in &self.observers {
            o.on_alert(ctx, severity, error);
        }
    }
}

/// Emits upload events as structured `tracing` events (target `hours_report::upload`).
#[derive(Debug, Default)]
pub struct TracingObserver;

impl ReportObserver for TracingObserver {
    fn on_success(&self, ctx: &UploadContext, stats: UploadStats) {
        tracing::info!(
            target: "hours_report::upload",
            file = %ctx.filename,
            format = ?ctx.format,
            rows = stats.rows,
            invalid = stats.invalid_values,
            "upload aggregated"
        );
    }

    fn on_failure(&self, ctx: &UploadContext, severity: Severity, error: &ReportError) {
        match severity {
            Severity::Critical => tracing::error!(
                target: "hours_report::upload",
                file = %ctx.filename,
                format = ?ctx.format,
                %error,
                "upload failed"
            ),
            _ => tracing::warn!(
                target: "hours_report::upload",
                file = %ctx.filename,
                format = ?ctx.format,
                ?severity,
                %error,
                "upload rejected"
            ),
        }
    }

    fn on_alert(&self, ctx: &UploadContext, severity: Severity, error: &ReportError) {
        tracing::error!(
            target: "hours_report::upload",
            file = %ctx.filename,
            format = ?ctx.format,
            ?severity,
            %error,
            alert = true,
            "upload alert"
        );
    }
}
