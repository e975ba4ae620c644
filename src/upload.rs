//! Upload entrypoint: payload in, statistics out.
//!
//! [`analyze_upload`] runs the whole pipeline for one upload:
//!
//! 1. reject the payload if it exceeds [`ReportOptions::max_payload_bytes`]
//! 2. pick a decode path ([`ReportOptions::format`], else [`crate::ingestion::infer_format`])
//! 3. decode into a [`crate::types::Table`]
//! 4. aggregate the target column
//!
//! Each call is self-contained; nothing is shared between uploads except the (optional)
//! observer.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::{ReportError, ReportResult};
use crate::ingestion::{decode, infer_format, TableFormat};
use crate::observability::{ReportObserver, Severity, UploadContext, UploadStats};
use crate::processing::{aggregate_with, AggregateOptions};
use crate::types::StatisticsResult;

/// Options controlling upload processing.
///
/// Use [`Default`] for the standard `hours` report.
#[derive(Clone)]
pub struct ReportOptions {
    /// If `None`, the format is inferred from extension, content type or payload.
    pub format: Option<TableFormat>,
    /// Column selection, preview size and number parsing.
    pub aggregate: AggregateOptions,
    /// Reject payloads larger than this many bytes before decoding.
    pub max_payload_bytes: Option<usize>,
    /// Optional observer for logging/alerts.
    pub observer: Option<Arc<dyn ReportObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: Severity,
}

impl fmt::Debug for ReportOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReportOptions")
            .field("format", &self.format)
            .field("aggregate", &self.aggregate)
            .field("max_payload_bytes", &self.max_payload_bytes)
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            format: None,
            aggregate: AggregateOptions::default(),
            max_payload_bytes: None,
            observer: None,
            alert_at_or_above: Severity::Critical,
        }
    }
}

/// Decode and aggregate one uploaded file.
///
/// `filename` is used only for its extension; `content_type` is the declared MIME type, if
/// the transport provided one.
///
/// When an observer is configured, this function reports:
///
/// - `on_success` with row and invalid-value counts
/// - `on_failure` on any failure, with a [`Severity`] derived from the error category
/// - `on_alert` when that severity is >= `options.alert_at_or_above`
///
/// # Examples
///
/// ```rust
/// use hours_report::upload::{analyze_upload, ReportOptions};
///
/// # fn main() -> Result<(), hours_report::ReportError> {
/// let csv = "name,hours\nAlice,\"3,5\"\nBob,\nCarol,4.25\n";
/// let stats = analyze_upload("week.csv", None, csv.as_bytes(), &ReportOptions::default())?;
///
/// assert_eq!(stats.rows_count, 3);
/// assert_eq!(stats.sum_hours, 7.75);
/// assert_eq!(stats.average_hours, 2.58);
/// assert_eq!(stats.invalid_values, 1);
/// # Ok(())
/// # }
/// ```
///
/// ## Structured logging through `tracing`
///
/// ```no_run
/// use std::sync::Arc;
///
/// use hours_report::observability::{Severity, TracingObserver};
/// use hours_report::upload::{analyze_upload, ReportOptions};
///
/// # fn main() -> Result<(), hours_report::ReportError> {
/// let opts = ReportOptions {
///     observer: Some(Arc::new(TracingObserver)),
///     alert_at_or_above: Severity::Error,
///     max_payload_bytes: Some(10 * 1024 * 1024),
///     ..Default::default()
/// };
/// let payload = std::fs::read("timesheet.xlsx")?;
/// let stats = analyze_upload("timesheet.xlsx", None, &payload, &opts)?;
/// println!("{}", serde_json::to_string(&stats).unwrap());
/// # Ok(())
/// # }
/// ```
pub fn analyze_upload(
    filename: &str,
    content_type: Option<&str>,
    payload: &[u8],
    options: &ReportOptions,
) -> ReportResult<StatisticsResult> {
    let mut ctx = UploadContext {
        filename: filename.to_string(),
        format: options.format,
    };

    let result = run_pipeline(&mut ctx, content_type, payload, options);

    if let Some(obs) = options.observer.as_ref() {
        match &result {
            Ok(stats) => obs.on_success(
                &ctx,
                UploadStats {
                    rows: stats.rows_count,
                    invalid_values: stats.invalid_values,
                },
            ),
            Err(e) => notify_failure(obs.as_ref(), &ctx, e, options.alert_at_or_above),
        }
    }

    result
}

fn notify_failure(
    obs: &dyn ReportObserver,
    ctx: &UploadContext,
    err: &ReportError,
    alert_at_or_above: Severity,
) {
    let sev = Severity::for_error(err);
    obs.on_failure(ctx, sev, err);
    if sev >= alert_at_or_above {
        obs.on_alert(ctx, sev, err);
    }
}

fn run_pipeline(
    ctx: &mut UploadContext,
    content_type: Option<&str>,
    payload: &[u8],
    options: &ReportOptions,
) -> ReportResult<StatisticsResult> {
    if let Some(max) = options.max_payload_bytes.filter(|&max| payload.len() > max) {
        return Err(ReportError::PayloadTooLarge {
            size: payload.len(),
            max,
        });
    }

    let format = match options.format {
        Some(f) => f,
        None => infer_format(&ctx.filename, content_type, payload)?,
    };
    ctx.format = Some(format);

    let table = decode(payload, format)?;
    aggregate_with(table, &options.aggregate)
}

/// Read a file from disk and run it through [`analyze_upload`].
///
/// The file name doubles as the declared filename; no content type is assumed.
pub fn analyze_path(
    path: impl AsRef<Path>,
    options: &ReportOptions,
) -> ReportResult<StatisticsResult> {
    let path = path.as_ref();
    let filename = file_name_of(path);

    let payload = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            let err = ReportError::Io(e);
            if let Some(obs) = options.observer.as_ref() {
                let ctx = UploadContext {
                    filename,
                    format: options.format,
                };
                notify_failure(obs.as_ref(), &ctx, &err, options.alert_at_or_above);
            }
            return Err(err);
        }
    };

    analyze_upload(&filename, None, &payload, options)
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Owned form of an upload, e.g. for handing work to a job queue.
#[derive(Clone)]
pub struct UploadRequest {
    /// Declared filename (used for its extension).
    pub filename: String,
    /// Declared MIME type, if any.
    pub content_type: Option<String>,
    /// Raw file bytes.
    pub payload: Vec<u8>,
    /// Options controlling processing.
    pub options: ReportOptions,
}

impl fmt::Debug for UploadRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadRequest")
            .field("filename", &self.filename)
            .field("content_type", &self.content_type)
            .field("payload_len", &self.payload.len())
            .field("options", &self.options)
            .finish()
    }
}

impl UploadRequest {
    /// Build a request with default options.
    pub fn new(filename: impl Into<String>, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            filename: filename.into(),
            content_type: None,
            payload: payload.into(),
            options: ReportOptions::default(),
        }
    }

    /// Build a request from a file on disk.
    pub fn from_path(path: impl Into<PathBuf>) -> ReportResult<Self> {
        let path = path.into();
        let payload = std::fs::read(&path)?;
        Ok(Self::new(file_name_of(&path), payload))
    }

    /// Execute the request by calling [`analyze_upload`].
    pub fn run(&self) -> ReportResult<StatisticsResult> {
        analyze_upload(
            &self.filename,
            self.content_type.as_deref(),
            &self.payload,
            &self.options,
        )
    }
}
