use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Convenience result type for upload/report operations.
pub type ReportResult<T> = Result<T, ReportError>;

/// Error type returned by decoding, column resolution and the upload pipeline.
///
/// A single cell that fails numeric coercion is *not* an error at this level; see
/// [`crate::processing::InvalidCell`].
#[derive(Debug, Error)]
pub enum ReportError {
    /// Underlying I/O error (e.g. the uploaded file could not be read from disk).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The payload is not valid delimited text.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[cfg(feature = "excel")]
    /// The payload is not a readable workbook (feature-gated behind `excel`).
    #[error("excel error: {0}")]
    Excel(#[from] calamine::Error),

    /// The workbook parsed but declares no sheets.
    #[error("workbook has no sheets")]
    EmptyWorkbook,

    /// The upload is neither delimited text nor a recognised spreadsheet container.
    #[error("unsupported format for '{name}': {reason}")]
    UnsupportedFormat { name: String, reason: String },

    /// The payload exceeds the configured size limit.
    #[error("payload of {size} bytes exceeds the limit of {max} bytes")]
    PayloadTooLarge { size: usize, max: usize },

    /// The decoded table has no column matching the target name.
    #[error("the table has no column '{column}'. headers={headers:?}")]
    ColumnNotFound { column: String, headers: Vec<String> },
}

/// Coarse classification of a [`ReportError`] for the transport layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCategory {
    /// The upload itself is at fault (bad file, missing column, ...).
    Caller,
    /// Something went wrong on our side (I/O, resource failures).
    Internal,
}

impl ReportError {
    /// Classifies the error as a caller error or an internal error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            ReportError::Io(_) => ErrorCategory::Internal,
            ReportError::Csv(err) => match err.kind() {
                csv::ErrorKind::Io(_) => ErrorCategory::Internal,
                _ => ErrorCategory::Caller,
            },
            #[cfg(feature = "excel")]
            ReportError::Excel(err) => {
                // calamine wraps zip/xml I/O failures in format-specific variants.
                if error_chain_contains_io(err) {
                    ErrorCategory::Internal
                } else {
                    ErrorCategory::Caller
                }
            }
            ReportError::EmptyWorkbook
            | ReportError::UnsupportedFormat { .. }
            | ReportError::PayloadTooLarge { .. }
            | ReportError::ColumnNotFound { .. } => ErrorCategory::Caller,
        }
    }

    /// Returns `true` if the payload could not be parsed under its inferred format.
    pub fn is_decode_error(&self) -> bool {
        match self {
            ReportError::Csv(_) | ReportError::EmptyWorkbook => true,
            #[cfg(feature = "excel")]
            ReportError::Excel(_) => true,
            _ => false,
        }
    }
}

#[cfg(feature = "excel")]
fn error_chain_contains_io(e: &(dyn std::error::Error + 'static)) -> bool {
    let mut cur: Option<&(dyn std::error::Error + 'static)> = Some(e);
    while let Some(err) = cur {
        if err.is::<std::io::Error>() {
            return true;
        }
        cur = err.source();
    }
    false
}

/// Structured failure record handed back to the caller instead of a statistics result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorRecord {
    /// Human-readable message.
    pub error: String,
    /// Whether the caller or the service is at fault.
    pub status: ErrorCategory,
}

impl From<&ReportError> for ErrorRecord {
    fn from(err: &ReportError) -> Self {
        Self {
            error: err.to_string(),
            status: err.category(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_not_found_is_a_caller_error() {
        let err = ReportError::ColumnNotFound {
            column: "hours".to_string(),
            headers: vec!["name".to_string()],
        };
        assert_eq!(err.category(), ErrorCategory::Caller);
        assert!(!err.is_decode_error());
        assert!(err.to_string().contains("no column 'hours'"));
    }

    #[test]
    fn io_is_an_internal_error() {
        let err = ReportError::from(std::io::Error::other("disk gone"));
        assert_eq!(err.category(), ErrorCategory::Internal);
    }

    #[test]
    fn error_record_serializes_lowercase_status() {
        let err = ReportError::PayloadTooLarge { size: 10, max: 5 };
        let record = ErrorRecord::from(&err);
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["status"], "caller");
        assert_eq!(json["error"], "payload of 10 bytes exceeds the limit of 5 bytes");
    }
}
