//! Numeric coercion of raw cells.
//!
//! Text is normalised for a decimal comma (`"2,5"` -> `2.5`) before parsing. Thousands
//! separators are not understood: `"1.234,56"` becomes `"1.234.56"` and parses as `1.234`.

use thiserror::Error;

use crate::types::Cell;

/// How text cells are parsed after decimal-comma normalisation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NumberParsing {
    /// Parse the longest numeric prefix and ignore the rest (`"12xyz"` -> `12`).
    #[default]
    Prefix,
    /// The whole trimmed text must be a number (`"12xyz"` is invalid).
    Strict,
}

/// Why a cell did not yield a number. Counted, never propagated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidCell {
    #[error("value is missing")]
    Missing,
    #[error("value is empty")]
    Empty,
    #[error("'{raw}' is not a number")]
    NotNumeric { raw: String },
    #[error("value is not a finite number")]
    NonFinite,
}

/// Coerce a cell using [`NumberParsing::Prefix`]. `None` means the row lacks the column.
pub fn coerce(cell: Option<&Cell>) -> Result<f64, InvalidCell> {
    coerce_with(cell, NumberParsing::Prefix)
}

/// Coerce a cell into a finite number.
pub fn coerce_with(cell: Option<&Cell>, parsing: NumberParsing) -> Result<f64, InvalidCell> {
    let value = match cell {
        None | Some(Cell::Null) => return Err(InvalidCell::Missing),
        Some(Cell::Text(s)) if s.is_empty() => return Err(InvalidCell::Empty),
        Some(Cell::Number(n)) => *n,
        Some(Cell::Bool(b)) => {
            return Err(InvalidCell::NotNumeric { raw: b.to_string() });
        }
        Some(Cell::Text(s)) => {
            let normalized = s.replace(',', ".");
            let parsed = match parsing {
                NumberParsing::Prefix => parse_number_prefix(&normalized),
                NumberParsing::Strict => normalized.trim().parse::<f64>().ok(),
            };
            parsed.ok_or_else(|| InvalidCell::NotNumeric { raw: s.clone() })?
        }
    };

    if value.is_finite() {
        Ok(value)
    } else {
        Err(InvalidCell::NonFinite)
    }
}

/// Parse as much of a decimal number as `text` starts with (after leading whitespace).
///
/// Accepts an optional sign, digits with an optional fraction, and an optional exponent.
/// Returns `None` if no digits lead the text.
fn parse_number_prefix(text: &str) -> Option<f64> {
    let bytes = text.trim_start().as_bytes();
    let mut pos = 0;
    let mut literal = String::new();

    if let Some(&sign @ (b'+' | b'-')) = bytes.first() {
        literal.push(sign as char);
        pos += 1;
    }

    let int_digits = count_digits(&bytes[pos..]);
    let int_part = &bytes[pos..pos + int_digits];
    pos += int_digits;

    let mut frac_part: &[u8] = &[];
    if bytes.get(pos) == Some(&b'.') {
        let n = count_digits(&bytes[pos + 1..]);
        if n > 0 {
            frac_part = &bytes[pos + 1..pos + 1 + n];
            pos += 1 + n;
        } else if int_digits > 0 {
            // "1.e2": the dot belongs to the number, the exponent may still follow.
            pos += 1;
        }
    }

    if int_part.is_empty() && frac_part.is_empty() {
        return None;
    }

    push_ascii(&mut literal, if int_part.is_empty() { b"0" } else { int_part });
    if !frac_part.is_empty() {
        literal.push('.');
        push_ascii(&mut literal, frac_part);
    }

    if let Some(b'e' | b'E') = bytes.get(pos) {
        let mut exp_pos = pos + 1;
        let exp_sign = match bytes.get(exp_pos) {
            Some(&s @ (b'+' | b'-')) => {
                exp_pos += 1;
                Some(s)
            }
            _ => None,
        };
        let n = count_digits(&bytes[exp_pos.min(bytes.len())..]);
        if n > 0 {
            literal.push('e');
            if let Some(s) = exp_sign {
                literal.push(s as char);
            }
            push_ascii(&mut literal, &bytes[exp_pos..exp_pos + n]);
        }
    }

    literal.parse::<f64>().ok()
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

fn push_ascii(out: &mut String, digits: &[u8]) {
    out.extend(digits.iter().map(|&b| b as char));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Result<f64, InvalidCell> {
        coerce(Some(&Cell::text(s)))
    }

    #[test]
    fn decimal_comma_and_point_agree() {
        assert_eq!(text("2,5"), Ok(2.5));
        assert_eq!(text("2.5"), Ok(2.5));
    }

    #[test]
    fn missing_and_empty_are_invalid() {
        assert_eq!(coerce(None), Err(InvalidCell::Missing));
        assert_eq!(coerce(Some(&Cell::Null)), Err(InvalidCell::Missing));
        assert_eq!(text(""), Err(InvalidCell::Empty));
    }

    #[test]
    fn non_numeric_text_is_invalid() {
        assert_eq!(
            text("abc"),
            Err(InvalidCell::NotNumeric { raw: "abc".to_string() })
        );
        assert!(text("   ").is_err());
        assert!(text(".").is_err());
        assert!(text("-").is_err());
    }

    #[test]
    fn numeric_cells_pass_through() {
        assert_eq!(coerce(Some(&Cell::Number(3.0))), Ok(3.0));
        assert_eq!(coerce(Some(&Cell::Number(f64::NAN))), Err(InvalidCell::NonFinite));
        assert!(coerce(Some(&Cell::Bool(true))).is_err());
    }

    #[test]
    fn prefix_parsing_ignores_trailing_content() {
        assert_eq!(text("12xyz"), Ok(12.0));
        assert_eq!(text("  7.5 h"), Ok(7.5));
        assert_eq!(text(",5"), Ok(0.5));
        assert_eq!(text("-1,25"), Ok(-1.25));
        assert_eq!(text("3."), Ok(3.0));
        assert_eq!(text("1e2x"), Ok(100.0));
        assert_eq!(text("1.e2"), Ok(100.0));
        assert_eq!(text("1,e2"), Ok(100.0));
        assert_eq!(text("2e"), Ok(2.0));
        assert_eq!(text("2e+"), Ok(2.0));
    }

    #[test]
    fn overflowing_exponent_is_non_finite() {
        assert_eq!(text("1e400"), Err(InvalidCell::NonFinite));
    }

    #[test]
    fn thousands_separators_are_not_understood() {
        assert_eq!(text("1.234,56"), Ok(1.234));
    }

    #[test]
    fn strict_parsing_rejects_trailing_content() {
        let cell = Cell::text("12xyz");
        assert!(coerce_with(Some(&cell), NumberParsing::Strict).is_err());
        let cell = Cell::text(" 4,75 ");
        assert_eq!(coerce_with(Some(&cell), NumberParsing::Strict), Ok(4.75));
        let cell = Cell::text("inf");
        assert_eq!(
            coerce_with(Some(&cell), NumberParsing::Strict),
            Err(InvalidCell::NonFinite)
        );
    }
}
