//! Row scanner.
//!
//! Locates stat-label/history pairs inside the untyped grid and turns each
//! matching row into a `StatRow`. Hand-maintained sheets shift columns
//! around freely, so the scanner searches the first few cells for a label
//! instead of assuming a fixed layout, and any row it cannot make sense of
//! is silently skipped.

use tracing::debug;

use crate::types::{RawGrid, StatRow};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Stat-name substrings the scanner recognizes in a label cell.
const STAT_KEYWORDS: &[&str] = &["Points", "Rebounds", "Assists", "3 Pointer", "Pts+"];

/// How many leading cells of each row are searched for a label.
const LABEL_SEARCH_WIDTH: usize = 5;

/// A label cell longer than this is treated as prose, not a label.
const MAX_LABEL_LEN: usize = 20;

// ---------------------------------------------------------------------------
// Scanner
// ---------------------------------------------------------------------------

/// Scan a grid for stat rows.
///
/// Pure function of its input: the returned iterator is finite, lazy, and a
/// fresh call restarts from the top. Rows that don't match the expected
/// shape yield nothing — there is no partial `StatRow` and no error.
pub fn scan(grid: &RawGrid) -> impl Iterator<Item = StatRow> + '_ {
    grid.rows().iter().filter_map(|row| scan_row(row))
}

/// Extract a `StatRow` from a single grid row, if it has one.
///
/// The first cell among the leading `LABEL_SEARCH_WIDTH` whose trimmed text
/// contains a recognized stat keyword (and is short enough to be a label)
/// wins; the cell immediately after it must be a comma-separated history,
/// and everything after that becomes candidate cells.
pub fn scan_row(row: &[String]) -> Option<StatRow> {
    let label_idx = row
        .iter()
        .take(LABEL_SEARCH_WIDTH)
        .position(|cell| is_stat_label(cell))?;

    let history_cell = row.get(label_idx + 1)?;
    // A single-game history has no comma and is treated as absent.
    if !history_cell.contains(',') {
        return None;
    }

    let history = parse_history(history_cell);
    if history.is_empty() {
        debug!(label = %row[label_idx].trim(), "History cell yielded no numeric tokens");
        return None;
    }

    Some(StatRow {
        label: row[label_idx].trim().to_string(),
        history,
        candidates: row[label_idx + 2..].to_vec(),
    })
}

/// Whether a cell looks like a stat label.
fn is_stat_label(cell: &str) -> bool {
    let trimmed = cell.trim();
    trimmed.len() < MAX_LABEL_LEN && STAT_KEYWORDS.iter().any(|kw| trimmed.contains(kw))
}

/// Parse a comma-separated history cell into per-game values.
///
/// Tokens survive only if, after removing at most one `.`, they are all
/// digits. Negatives and anything malformed are dropped: stat lines are
/// never negative, and a stray character usually means the cell isn't a
/// history at all.
fn parse_history(cell: &str) -> Vec<f64> {
    cell.split(',')
        .map(str::trim)
        .filter(|tok| is_plain_number(tok))
        .filter_map(|tok| tok.parse::<f64>().ok())
        .collect()
}

/// Non-empty, all digits after removing at most one decimal point.
fn is_plain_number(tok: &str) -> bool {
    if tok.is_empty() {
        return false;
    }
    let stripped = tok.replacen('.', "", 1);
    !stripped.is_empty() && stripped.chars().all(|c| c.is_ascii_digit())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
