//! Header row normalisation shared by the CSV and workbook decoders.

use std::collections::HashSet;

/// Column name given to a blank header cell.
pub const EMPTY_HEADER: &str = "__EMPTY";

/// Turn raw header cells into unique column names.
///
/// - Blank cells become [`EMPTY_HEADER`].
/// - Repeated names get `_1`, `_2`, ... appended in order of appearance, so later columns never
///   overwrite earlier ones in a [`crate::types::Row`].
///
/// Names are otherwise kept exactly as decoded (no trimming, no case folding).
pub fn unique_headers<I, S>(raw: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut seen: HashSet<String> = HashSet::new();
    let mut out = Vec::new();

    for cell in raw {
        let cell: String = cell.into();
        let base = if cell.is_empty() { EMPTY_HEADER.to_string() } else { cell };

        let mut name = base.clone();
        let mut n = 1usize;
        while seen.contains(&name) {
            name = format!("{base}_{n}");
            n += 1;
        }
        seen.insert(name.clone());
        out.push(name);
    }

    out
}
