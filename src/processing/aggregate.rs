//! Sum/average/invalid-count aggregation over the target column of a [`Table`].

use crate::error::ReportResult;
use crate::types::{StatisticsResult, Table};

use super::coerce::{coerce_with, InvalidCell, NumberParsing};
use super::resolve::resolve_column;

/// Name of the column aggregated by default.
pub const DEFAULT_TARGET_COLUMN: &str = "hours";

/// Number of raw rows echoed back in [`StatisticsResult::preview`] by default.
pub const DEFAULT_PREVIEW_ROWS: usize = 5;

/// Options controlling aggregation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateOptions {
    /// Target column, matched case-insensitively.
    pub target_column: String,
    /// Maximum number of rows kept in the preview.
    pub preview_rows: usize,
    /// How text cells are turned into numbers.
    pub number_parsing: NumberParsing,
}

impl Default for AggregateOptions {
    fn default() -> Self {
        Self {
            target_column: DEFAULT_TARGET_COLUMN.to_string(),
            preview_rows: DEFAULT_PREVIEW_ROWS,
            number_parsing: NumberParsing::default(),
        }
    }
}

/// Running totals; values are kept unrounded until [`HoursAccumulator::finish`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HoursAccumulator {
    sum: f64,
    rows: usize,
    invalid: usize,
}

impl HoursAccumulator {
    /// Record one row's coercion outcome.
    pub fn push(&mut self, value: Result<f64, InvalidCell>) {
        self.rows += 1;
        match value {
            Ok(v) => self.sum += v,
            Err(_) => self.invalid += 1,
        }
    }

    /// `(rows_count, sum_hours, average_hours, invalid_values)`, rounded to 2 decimals.
    ///
    /// The average divides by every row, valid or not.
    pub fn finish(self) -> (usize, f64, f64, usize) {
        let average = if self.rows > 0 {
            self.sum / self.rows as f64
        } else {
            0.0
        };
        (self.rows, round2(self.sum), round2(average), self.invalid)
    }
}

/// Round half away from zero to 2 decimal places.
pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Aggregate the `hours` column with default options.
pub fn aggregate(table: Table) -> ReportResult<StatisticsResult> {
    aggregate_with(table, &AggregateOptions::default())
}

/// Aggregate the target column of `table`.
///
/// - An empty table yields [`StatisticsResult::empty`] without looking for the column.
/// - Otherwise the column is resolved from the first row; a missing column is an error.
/// - Every row counts towards `rows_count`. Rows whose cell is absent, empty or not numeric
///   count as invalid and contribute nothing to the sum.
/// - The first `options.preview_rows` rows are moved into the result unchanged.
pub fn aggregate_with(table: Table, options: &AggregateOptions) -> ReportResult<StatisticsResult> {
    if table.is_empty() {
        return Ok(StatisticsResult::empty());
    }

    let column = resolve_column(&table, &options.target_column)?;

    let mut acc = HoursAccumulator::default();
    for (idx, row) in table.rows.iter().enumerate() {
        let value = coerce_with(row.get(&column), options.number_parsing);
        if let Err(reason) = &value {
            tracing::debug!(row = idx, column = %column, %reason, "invalid cell counted");
        }
        acc.push(value);
    }

    let (rows_count, sum_hours, average_hours, invalid_values) = acc.finish();
    let mut preview = table.rows;
    preview.truncate(options.preview_rows);

    Ok(StatisticsResult {
        rows_count,
        sum_hours,
        average_hours,
        invalid_values,
        preview,
    })
}
