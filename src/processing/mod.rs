//! Turning a decoded [`crate::types::Table`] into a [`crate::types::StatisticsResult`].
//!
//! - [`resolve_column()`]: find the target column by case-insensitive name
//! - [`coerce()`]: raw cell -> number, or an [`InvalidCell`] reason
//! - [`aggregate()`]: sum/average/invalid counts with rounding at the end
//!
//! ## Example
//!
//! ```rust
//! use hours_report::processing::aggregate;
//! use hours_report::types::{Cell, Row, Table};
//!
//! let rows = ["3,5", "", "4.25"]
//!     .into_iter()
//!     .map(|v| Row::from([("HOURS".to_string(), Cell::text(v))]))
//!     .collect();
//!
//! let stats = aggregate(Table::new(rows)).unwrap();
//! assert_eq!(stats.rows_count, 3);
//! assert_eq!(stats.sum_hours, 7.75);
//! assert_eq!(stats.average_hours, 2.58);
//! assert_eq!(stats.invalid_values, 1);
//! ```

pub mod aggregate;
pub mod coerce;
pub mod resolve;

pub use aggregate::{aggregate, aggregate_with, round2, AggregateOptions, HoursAccumulator};
pub use coerce::{coerce, coerce_with, InvalidCell, NumberParsing};
pub use resolve::resolve_column;
