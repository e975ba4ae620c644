//! Delimited-text (CSV) decoding.

use crate::error::ReportResult;
use crate::types::{Cell, Row, Table};

use super::header::unique_headers;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Decode an uploaded CSV payload into a [`Table`].
///
/// Rules:
///
/// - The payload must be UTF-8; a leading byte-order mark is ignored.
/// - The first record is the header row; blank lines are skipped.
/// - Quoted fields and doubled-quote escapes follow RFC 4180.
/// - Every value is kept as [`Cell::Text`]; nothing is typed or coerced here.
/// - Short records yield sparse rows; fields beyond the header are dropped.
pub fn decode_csv_from_bytes(bytes: &[u8]) -> ReportResult<Table> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);
    decode_csv_from_reader(&mut rdr)
}

/// Decode CSV data from an existing CSV reader.
///
/// The reader should be configured with `has_headers(true)`; use `flexible(true)` to accept
/// ragged records.
pub fn decode_csv_from_reader<R: std::io::Read>(rdr: &mut csv::Reader<R>) -> ReportResult<Table> {
    let headers = unique_headers(rdr.headers()?.iter());

    let mut rows: Vec<Row> = Vec::new();
    for (row_idx0, result) in rdr.records().enumerate() {
        let record = result?;

        if record.len() > headers.len() {
            // 1-based line for users; +1 again because the header is line 1.
            tracing::debug!(
                row = row_idx0 + 2,
                fields = record.len(),
                columns = headers.len(),
                "dropping csv fields beyond the header row"
            );
        }

        let row: Row = headers
            .iter()
            .zip(record.iter())
            .map(|(name, raw)| (name.clone(), Cell::text(raw)))
            .collect();
        rows.push(row);
    }

    Ok(Table::new(rows))
}
