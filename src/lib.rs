//! `hours-report` turns an uploaded timesheet into the numbers behind a weekly report.
//!
//! An upload (CSV text or a spreadsheet workbook) is decoded into a [`types::Table`], the
//! `hours` column is located case-insensitively, every cell is coerced into a number
//! (accepting a decimal comma), and the totals come back as a [`types::StatisticsResult`].
//!
//! The primary entrypoint is [`upload::analyze_upload`].
//!
//! ## What you can upload
//!
//! - **CSV**: `.csv`, or content type `text/csv`. UTF-8, header line first.
//! - **Workbooks** (Cargo feature `excel`, on by default): `.xlsx`, `.xlsm`, `.xlsb`, `.xls`,
//!   `.ods`. Only the first sheet is read.
//!
//! Anything else is rejected with [`ReportError::UnsupportedFormat`], unless the payload
//! itself carries a workbook signature.
//!
//! ## What you get back
//!
//! - `rowsCount`: every decoded row, valid or not
//! - `sumHours`: sum of the valid `hours` values, rounded to 2 decimals
//! - `averageHours`: that (unrounded) sum divided by `rowsCount`, rounded to 2 decimals
//! - `invalidValues`: rows whose `hours` cell was missing, empty or not a number
//! - `preview`: the first five raw rows
//!
//! ## Quick example
//!
//! ```rust
//! use hours_report::upload::{analyze_upload, ReportOptions};
//!
//! # fn main() -> Result<(), hours_report::ReportError> {
//! let csv = b"name,Hours\nAda,8\nGrace,\"7,5\"\n";
//! let stats = analyze_upload("week.csv", Some("text/csv"), csv, &ReportOptions::default())?;
//! assert_eq!(stats.sum_hours, 15.5);
//! assert_eq!(stats.average_hours, 7.75);
//!
//! let json = serde_json::to_value(&stats).unwrap();
//! assert_eq!(json["rowsCount"], 2);
//! # Ok(())
//! # }
//! ```
//!
//! Failures map onto a caller/internal split for the transport layer:
//!
//! ```rust
//! use hours_report::upload::{analyze_upload, ReportOptions};
//! use hours_report::{ErrorCategory, ErrorRecord};
//!
//! let err = analyze_upload("week.csv", None, b"name\nAda\n", &ReportOptions::default())
//!     .unwrap_err();
//! let record = ErrorRecord::from(&err);
//! assert_eq!(record.status, ErrorCategory::Caller);
//! ```
//!
//! ## Modules
//!
//! - [`upload`]: end-to-end entrypoints and options
//! - [`ingestion`]: format inference and CSV/workbook decoders
//! - [`processing`]: column resolution, numeric coercion, aggregation
//! - [`observability`]: observer hooks (stderr, `tracing`)
//! - [`types`]: cells, rows, tables and results
//! - [`error`]: the error type and its categories

pub mod error;
pub mod ingestion;
pub mod observability;
pub mod processing;
pub mod types;
pub mod upload;

pub use error::{ErrorCategory, ErrorRecord, ReportError, ReportResult};
