//! Core data model: raw cells, decoded rows/tables and the statistics produced from them.
//!
//! Decoders produce a [`Table`] of [`Row`]s whose [`Cell`]s keep the source's own typing
//! (CSV cells are always text, spreadsheet cells may be numbers). The aggregator consumes the
//! table and returns a [`StatisticsResult`].

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A single raw cell value, as decoded.
///
/// Serializes untagged: `null`, a JSON number, a bool or a string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    /// Absent/null value.
    Null,
    /// Boolean cell (spreadsheets only).
    Bool(bool),
    /// Numeric cell (spreadsheets only).
    Number(f64),
    /// Text, possibly empty.
    Text(String),
}

impl Cell {
    /// Shorthand for a text cell.
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    /// `true` for `Null` and empty text.
    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Null => true,
            Cell::Text(s) => s.is_empty(),
            _ => false,
        }
    }
}

impl From<f64> for Cell {
    fn from(v: f64) -> Self {
        Cell::Number(v)
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_owned())
    }
}

/// One decoded record: column name -> raw cell, in source column order.
///
/// Rows may be sparse: a column present in one row can be missing from another.
pub type Row = IndexMap<String, Cell>;

/// An ordered sequence of decoded rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    /// Row-major storage in source order.
    pub rows: Vec<Row>,
}

impl Table {
    /// Create a table from rows.
    pub fn new(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    /// Number of rows in the table.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Column names of the first row, in order. Empty for an empty table.
    pub fn first_row_columns(&self) -> Vec<String> {
        self.rows
            .first()
            .map(|row| row.keys().cloned().collect())
            .unwrap_or_default()
    }
}

/// Aggregate statistics over the target column of one uploaded table.
///
/// Invariant: `invalid_values <= rows_count`; when `rows_count == 0` every other field is
/// zero and `preview` is empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsResult {
    /// Total rows decoded, including rows with an invalid or missing target value.
    pub rows_count: usize,
    /// Sum of all valid target values, rounded to 2 decimal places.
    pub sum_hours: f64,
    /// Unrounded sum divided by `rows_count`, rounded to 2 decimal places.
    pub average_hours: f64,
    /// Rows whose target value was absent, empty or not numeric.
    pub invalid_values: usize,
    /// The first few raw rows, for user feedback only.
    pub preview: Vec<Row>,
}

impl StatisticsResult {
    /// The all-zero result returned for an empty table.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The record handed to the report renderer.
    pub fn summary(&self) -> ReportSummary {
        ReportSummary {
            rows_count: self.rows_count,
            sum_hours: self.sum_hours,
            average_hours: self.average_hours,
            invalid_values: self.invalid_values,
        }
    }
}

/// Input record of the report renderer: the statistics without the preview rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub rows_count: usize,
    pub sum_hours: f64,
    pub average_hours: f64,
    pub invalid_values: usize,
}

impl ReportSummary {
    /// `false` when there is nothing to report; renderers emit a placeholder body instead.
    pub fn has_entries(&self) -> bool {
        self.rows_count > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cells_serialize_untagged() {
        let mut row = Row::new();
        row.insert("name".to_string(), Cell::text("Ada"));
        row.insert("hours".to_string(), Cell::Number(2.5));
        row.insert("note".to_string(), Cell::Null);
        row.insert("billable".to_string(), Cell::Bool(true));

        let json = serde_json::to_string(&row).unwrap();
        assert_eq!(
            json,
            r#"{"name":"Ada","hours":2.5,"note":null,"billable":true}"#
        );
    }

    #[test]
    fn statistics_serialize_camel_case() {
        let stats = StatisticsResult {
            rows_count: 3,
            sum_hours: 7.75,
            average_hours: 2.58,
            invalid_values: 1,
            preview: Vec::new(),
        };
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["rowsCount"], 3);
        assert_eq!(json["sumHours"], 7.75);
        assert_eq!(json["averageHours"], 2.58);
        assert_eq!(json["invalidValues"], 1);
        assert!(json["preview"].as_array().unwrap().is_empty());
    }

    #[test]
    fn summary_drops_preview_and_guards_empty() {
        let summary = StatisticsResult::empty().summary();
        assert!(!summary.has_entries());
        let json = serde_json::to_value(summary).unwrap();
        assert_eq!(json.as_object().unwrap().len(), 4);
    }

    #[test]
    fn blank_cells() {
        assert!(Cell::Null.is_blank());
        assert!(Cell::text("").is_blank());
        assert!(!Cell::text(" ").is_blank());
        assert!(!Cell::Number(0.0).is_blank());
    }
}
