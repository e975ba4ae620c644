//! Format selection and the single decode entrypoint.
//!
//! An upload is decoded as exactly one of two encodings, [`TableFormat::Csv`] or
//! [`TableFormat::Excel`]. [`infer_format`] picks one from the filename extension, the
//! declared content type or the payload's magic bytes, and fails with
//! [`ReportError::UnsupportedFormat`] when none of those identify the upload.

use std::fmt;

use crate::error::{ReportError, ReportResult};
use crate::types::Table;

use super::csv;

const ZIP_MAGIC: &[u8] = b"PK\x03\x04";
const CFB_MAGIC: &[u8] = b"\xD0\xCF\x11\xE0\xA1\xB1\x1A\xE1";

/// Supported upload encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableFormat {
    /// Comma-separated values with a header line.
    Csv,
    /// Spreadsheet/workbook container, first sheet only (feature-gated behind `excel`).
    Excel,
}

impl TableFormat {
    /// Parse a format from a file extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Some(Self::Excel),
            _ => None,
        }
    }

    /// Parse a format from a MIME content type. Parameters (`; charset=...`) are ignored.
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        match essence.as_str() {
            "text/csv" | "application/csv" | "text/comma-separated-values" => Some(Self::Csv),
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            | "application/vnd.oasis.opendocument.spreadsheet" => Some(Self::Excel),
            s if s.starts_with("application/vnd.ms-excel") => Some(Self::Excel),
            _ => None,
        }
    }

    /// Recognise spreadsheet containers by their leading bytes (ZIP or OLE compound file).
    ///
    /// Delimited text has no signature, so this never returns [`TableFormat::Csv`].
    pub fn sniff(payload: &[u8]) -> Option<Self> {
        if payload.starts_with(ZIP_MAGIC) || payload.starts_with(CFB_MAGIC) {
            Some(Self::Excel)
        } else {
            None
        }
    }
}

impl fmt::Display for TableFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableFormat::Csv => f.write_str("csv"),
            TableFormat::Excel => f.write_str("excel"),
        }
    }
}

/// Choose the decode path for an upload.
///
/// Checked in order: the filename extension, the declared content type, then the payload's
/// magic bytes. The first one that identifies a format wins, so a `.csv` upload declared as
/// `application/vnd.ms-excel` (as some browsers do) is still decoded as CSV.
pub fn infer_format(
    filename: &str,
    content_type: Option<&str>,
    payload: &[u8],
) -> ReportResult<TableFormat> {
    let ext = extension_of(filename);
    if let Some(fmt) = ext.and_then(TableFormat::from_extension) {
        return Ok(fmt);
    }

    if let Some(fmt) = content_type.and_then(TableFormat::from_content_type) {
        return Ok(fmt);
    }

    if let Some(fmt) = TableFormat::sniff(payload) {
        tracing::debug!(filename, %fmt, "format inferred from payload signature");
        return Ok(fmt);
    }

    let reason = match (ext, content_type) {
        (Some(ext), _) => format!("extension '{ext}' is neither csv nor a spreadsheet"),
        (None, Some(ct)) => format!("content type '{ct}' is neither csv nor a spreadsheet"),
        (None, None) => "no extension and the content is not a spreadsheet".to_string(),
    };
    Err(ReportError::UnsupportedFormat {
        name: filename.to_string(),
        reason,
    })
}

/// Text after the last `.`, if non-empty. A bare `.csv` yields `csv`.
fn extension_of(filename: &str) -> Option<&str> {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ext)
        .filter(|ext| !ext.is_empty() && !ext.contains(['/', '\\']))
}

/// Decode `payload` as `format` into a [`Table`].
///
/// Fails if the payload is malformed for that format; there is no partial recovery.
pub fn decode(payload: &[u8], format: TableFormat) -> ReportResult<Table> {
    let table = match format {
        TableFormat::Csv => csv::decode_csv_from_bytes(payload)?,
        TableFormat::Excel => decode_excel_dispatch(payload)?,
    };
    tracing::debug!(%format, rows = table.row_count(), "decoded table");
    Ok(table)
}

fn decode_excel_dispatch(payload: &[u8]) -> ReportResult<Table> {
    // Avoid unused warnings when the feature is off.
    let _ = payload;

    #[cfg(feature = "excel")]
    {
        super::excel::decode_excel_from_bytes(payload)
    }

    #[cfg(not(feature = "excel"))]
    {
        Err(ReportError::UnsupportedFormat {
            name: "workbook".to_string(),
            reason: "excel decoding not enabled (enable cargo feature 'excel')".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_is_case_insensitive() {
        assert_eq!(TableFormat::from_extension("CSV"), Some(TableFormat::Csv));
        assert_eq!(TableFormat::from_extension("Xlsx"), Some(TableFormat::Excel));
        assert_eq!(TableFormat::from_extension("txt"), None);
    }

    #[test]
    fn content_type_ignores_parameters() {
        assert_eq!(
            TableFormat::from_content_type("Text/CSV; charset=utf-8"),
            Some(TableFormat::Csv)
        );
        assert_eq!(
            TableFormat::from_content_type("application/vnd.ms-excel.sheet.macroEnabled.12"),
            Some(TableFormat::Excel)
        );
        assert_eq!(TableFormat::from_content_type("application/octet-stream"), None);
    }

    #[test]
    fn extension_wins_over_content_type() {
        let fmt =
            infer_format("week.csv", Some("application/vnd.ms-excel"), b"hours\n1\n").unwrap();
        assert_eq!(fmt, TableFormat::Csv);
        let fmt = infer_format("report.xlsx", Some("text/csv"), b"PK\x03\x04").unwrap();
        assert_eq!(fmt, TableFormat::Excel);
    }

    #[test]
    fn content_type_used_when_extension_is_unknown() {
        let fmt = infer_format("upload", Some("text/csv"), b"hours\n1\n").unwrap();
        assert_eq!(fmt, TableFormat::Csv);
        let fmt = infer_format("upload.dat", Some("text/csv"), b"hours\n1\n").unwrap();
        assert_eq!(fmt, TableFormat::Csv);
    }

    #[test]
    fn bare_dot_csv_name_has_an_extension() {
        assert_eq!(extension_of(".csv"), Some("csv"));
        assert_eq!(extension_of("week."), None);
        assert_eq!(extension_of("dir.v2/upload"), None);
        let fmt = infer_format(".csv", None, b"hours\n2\n").unwrap();
        assert_eq!(fmt, TableFormat::Csv);
    }

    #[test]
    fn sniffs_zip_container_without_extension() {
        let fmt = infer_format("upload", None, b"PK\x03\x04rest-of-zip").unwrap();
        assert_eq!(fmt, TableFormat::Excel);
    }

    #[test]
    fn unknown_text_upload_is_unsupported() {
        let err = infer_format("notes.txt", None, b"hours\n1\n").unwrap_err();
        assert!(matches!(err, ReportError::UnsupportedFormat { .. }));
        assert!(err.to_string().contains("extension 'txt'"));
    }
}
