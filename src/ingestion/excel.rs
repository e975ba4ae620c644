#![cfg(feature = "excel")]

use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, Range, Reader};

use crate::error::{ReportError, ReportResult};
use crate::types::{Cell, Row, Table};

use super::header::unique_headers;

/// Decode an uploaded workbook (`.xlsx`, `.xlsm`, `.xlsb`, `.xls`, `.ods`) into a [`Table`].
///
/// Behavior:
/// - The container type is detected from the payload itself
/// - Only the first sheet in workbook order is read
/// - The first row of the sheet's used range supplies the column names
/// - Remaining rows keep the sheet's cell typing (see [`convert_cell`]); empty cells are left
///   out of the row and rows without any value are skipped
pub fn decode_excel_from_bytes(bytes: &[u8]) -> ReportResult<Table> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;

    let sheet = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or(ReportError::EmptyWorkbook)?;
    let range = workbook.worksheet_range(&sheet)?;

    let table = table_from_range(&range);
    tracing::debug!(sheet = %sheet, rows = table.row_count(), "decoded first worksheet");
    Ok(table)
}

fn table_from_range(range: &Range<Data>) -> Table {
    let mut sheet_rows = range.rows();
    let Some(header_cells) = sheet_rows.next() else {
        return Table::default();
    };
    let headers = unique_headers(header_cells.iter().map(cell_to_header_string));

    let mut rows: Vec<Row> = Vec::new();
    for sheet_row in sheet_rows {
        let row: Row = headers
            .iter()
            .zip(sheet_row.iter())
            .filter_map(|(name, c)| convert_cell(c).map(|cell| (name.clone(), cell)))
            .collect();
        if row.is_empty() {
            continue;
        }
        rows.push(row);
    }

    Table::new(rows)
}

fn cell_to_header_string(c: &Data) -> String {
    match c {
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => {
            if f.fract() == 0.0 {
                (*f as i64).to_string()
            } else {
                f.to_string()
            }
        }
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}

/// Map a worksheet cell onto a raw [`Cell`]; `None` for empty cells.
///
/// - integers and floats become [`Cell::Number`]
/// - date-times become [`Cell::Number`] holding the spreadsheet serial value
/// - ISO dates/durations and error cells (`#DIV/0!`, ...) become [`Cell::Text`]
fn convert_cell(c: &Data) -> Option<Cell> {
    match c {
        Data::Empty => None,
        Data::Int(i) => Some(Cell::Number(*i as f64)),
        Data::Float(f) => Some(Cell::Number(*f)),
        Data::DateTime(dt) => Some(Cell::Number(dt.as_f64())),
        Data::Bool(b) => Some(Cell::Bool(*b)),
        Data::String(s) => Some(Cell::Text(s.clone())),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Some(Cell::Text(s.clone())),
        Data::Error(e) => Some(Cell::Text(e.to_string())),
    }
}
