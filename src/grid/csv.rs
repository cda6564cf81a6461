//! CSV text → RawGrid.
//!
//! Worksheet exports quote any cell containing a comma — which includes
//! every history cell ("22, 25, 28, 19") — so quote handling here is
//! load-bearing, not a nicety. The parser is total: malformed input
//! degrades to odd-looking cells rather than an error, matching the
//! tolerance of everything downstream.

use crate::types::RawGrid;

/// Parse CSV text into a grid.
///
/// Handles quoted fields (embedded commas and newlines, doubled quotes for
/// a literal quote), CRLF and LF row terminators, and an unterminated
/// quote (the rest of the input becomes one field).
pub fn parse_csv(text: &str) -> RawGrid {
    let mut grid = RawGrid::default();
    let mut row: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;

    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' => {
                    if chars.peek() == Some(&'"') {
                        field.push('"');
                        chars.next();
                    } else {
                        in_quotes = false;
                    }
                }
                _ => field.push(c),
            }
            continue;
        }

        match c {
            '"' => in_quotes = true,
            ',' => row.push(std::mem::take(&mut field)),
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                row.push(std::mem::take(&mut field));
                grid.push_row(std::mem::take(&mut row));
            }
            '\n' => {
                row.push(std::mem::take(&mut field));
                grid.push_row(std::mem::take(&mut row));
            }
            _ => field.push(c),
        }
    }

    // Input not terminated by a newline still carries a final row
    if !field.is_empty() || !row.is_empty() {
        row.push(field);
        grid.push_row(row);
    }

    grid
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
