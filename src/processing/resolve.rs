//! Locating the target column by a case-insensitive name.

use crate::error::{ReportError, ReportResult};
use crate::types::Table;

/// Find the column whose name matches `target` case-insensitively.
///
/// Only the first row's keys are inspected. If several keys match (`"Hours"` and `"HOURS"`),
/// the first one in column order wins. An empty table has no row to inspect and fails like a
/// table without the column.
pub fn resolve_column(table: &Table, target: &str) -> ReportResult<String> {
    let wanted = target.to_lowercase();

    table
        .rows
        .first()
        .and_then(|row| row.keys().find(|k| k.to_lowercase() == wanted))
        .cloned()
        .ok_or_else(|| ReportError::ColumnNotFound {
            column: target.to_string(),
            headers: table.first_row_columns(),
        })
}

#[cfg(test)]
mod tests {
    use super::resolve_column;
    use crate::error::ReportError;
    use crate::types::{Cell, Row, Table};

    fn table_with_columns(cols: &[&str]) -> Table {
        let row: Row = cols
            .iter()
            .map(|c| (c.to_string(), Cell::text("1")))
            .collect();
        Table::new(vec![row])
    }

    #[test]
    fn matches_any_case() {
        for header in ["hours", "Hours", "HOURS"] {
            let table = table_with_columns(&["name", header]);
            assert_eq!(resolve_column(&table, "hours").unwrap(), header);
        }
    }

    #[test]
    fn first_match_wins_on_ties() {
        let table = table_with_columns(&["HOURS", "Hours", "hours"]);
        assert_eq!(resolve_column(&table, "Hours").unwrap(), "HOURS");
    }

    #[test]
    fn missing_column_reports_headers() {
        let table = table_with_columns(&["name", "minutes"]);
        match resolve_column(&table, "hours").unwrap_err() {
            ReportError::ColumnNotFound { column, headers } => {
                assert_eq!(column, "hours");
                assert_eq!(headers, vec!["name", "minutes"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn empty_table_cannot_resolve() {
        assert!(resolve_column(&Table::default(), "hours").is_err());
    }
}
