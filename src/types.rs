//! Shared types for the PROP HAMMER engine.
//!
//! These types form the data model used across all modules.
//! They are designed to be stable so that the grid loader, engine,
//! ticket, and dashboard modules can depend on them without circular
//! references.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// RawGrid
// ---------------------------------------------------------------------------

/// An untyped, irregularly-shaped grid of text cells (rows × columns).
///
/// No schema is assumed: the stat label, history field, and betting lines
/// can appear at varying column offsets per row, rows may have different
/// widths, and cells may be empty. The scanner is responsible for finding
/// structure inside it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawGrid {
    rows: Vec<Vec<String>>,
}

impl RawGrid {
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    /// All rows, in sheet order.
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn push_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    /// Append all rows of another grid (used when several worksheets are
    /// merged into one snapshot — scanning is per-row, so concatenation
    /// is safe).
    pub fn extend(&mut self, other: RawGrid) {
        self.rows.extend(other.rows);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The first `n` rows — the raw-data preview surfaced for debugging
    /// when the engine finds nothing in a hand-maintained sheet.
    pub fn preview(&self, n: usize) -> &[Vec<String>] {
        &self.rows[..self.rows.len().min(n)]
    }

    /// Helper to build a small test grid with one valid stat row.
    #[cfg(test)]
    pub fn sample() -> Self {
        RawGrid::new(vec![
            vec!["Player".into(), "Stat".into(), "Last Games".into(), "Line".into()],
            vec![
                "ignore".into(),
                "Points".into(),
                "22, 25, 28, 19".into(),
                "27.5/-110".into(),
            ],
        ])
    }
}

impl fmt::Display for RawGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let widest = self.rows.iter().map(Vec::len).max().unwrap_or(0);
        write!(f, "{} rows × up to {} cols", self.rows.len(), widest)
    }
}

// ---------------------------------------------------------------------------
// StatRow
// ---------------------------------------------------------------------------

/// A recognized stat row extracted from the grid: one stat label, its
/// parsed per-game history, and every remaining cell as an odds candidate.
///
/// Constructed once per matching grid row and never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct StatRow {
    /// Trimmed text of the matched label cell ("Points", "Rebounds", ...).
    pub label: String,
    /// Per-game values parsed from the comma-separated history cell.
    /// Guaranteed non-empty by the scanner.
    pub history: Vec<f64>,
    /// All cells after the history field, positionally ordered, unfiltered.
    pub candidates: Vec<String>,
}

impl fmt::Display for StatRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} games, {} candidate cells)",
            self.label,
            self.history.len(),
            self.candidates.len(),
        )
    }
}

// ---------------------------------------------------------------------------
// LineQuote
// ---------------------------------------------------------------------------

/// A bookmaker quotation parsed from a candidate cell of the form
/// `<line>/<odds>`, e.g. `27.5/-110`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineQuote {
    pub line: f64,
    pub american_odds: f64,
}

impl fmt::Display for LineQuote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.line, self.american_odds)
    }
}

// ---------------------------------------------------------------------------
// Verdict
// ---------------------------------------------------------------------------

/// Confidence tier for a surfaced opportunity, keyed to edge magnitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verdict {
    Pass,
    Bet,
    Hammer,
}

impl Verdict {
    /// All tiers, weakest first (useful for iteration).
    pub const ALL: &'static [Verdict] = &[Verdict::Pass, Verdict::Bet, Verdict::Hammer];
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Pass => write!(f, "PASS"),
            Verdict::Bet => write!(f, "BET"),
            Verdict::Hammer => write!(f, "HAMMER"),
        }
    }
}

impl std::str::FromStr for Verdict {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pass" => Ok(Verdict::Pass),
            "bet" => Ok(Verdict::Bet),
            "hammer" => Ok(Verdict::Hammer),
            _ => Err(anyhow::anyhow!("Unknown verdict: {s}")),
        }
    }
}

// ---------------------------------------------------------------------------
// Matchup
// ---------------------------------------------------------------------------

/// Opponent-strength category, selected manually by the caller.
///
/// The category→multiplier mapping lives in configuration; the engine only
/// ever sees the resulting positive multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Matchup {
    Neutral,
    Soft,
    Tough,
}

impl Matchup {
    pub const ALL: &'static [Matchup] = &[Matchup::Neutral, Matchup::Soft, Matchup::Tough];
}

impl fmt::Display for Matchup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Matchup::Neutral => write!(f, "neutral"),
            Matchup::Soft => write!(f, "soft"),
            Matchup::Tough => write!(f, "tough"),
        }
    }
}

/// Attempt to parse a string into a Matchup (case-insensitive).
impl std::str::FromStr for Matchup {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "neutral" => Ok(Matchup::Neutral),
            "soft" | "soft-matchup" => Ok(Matchup::Soft),
            "tough" | "tough-matchup" => Ok(Matchup::Tough),
            _ => Err(anyhow::anyhow!("Unknown matchup category: {s}")),
        }
    }
}

// ---------------------------------------------------------------------------
// Opportunity
// ---------------------------------------------------------------------------

/// A scored betting opportunity, ready for display.
///
/// All formatted fields are fixed at construction: projection rounded to one
/// decimal, probability and edge truncated to integer percentages. The
/// untruncated `raw_edge` is retained for sort ordering only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Opportunity {
    pub stat: String,
    pub line: f64,
    pub american_odds: i64,
    pub projection: f64,
    pub win_pct: i64,
    pub edge_pct: i64,
    pub verdict: Verdict,
    pub raw_edge: f64,
}

impl Opportunity {
    /// Build a display-ready record from raw engine outputs.
    ///
    /// Probability and edge percentages are truncated, not rounded (a cast,
    /// floor toward zero for positive values) to stay bit-compatible with
    /// historically displayed values.
    pub fn new(
        stat: &str,
        quote: LineQuote,
        projection: f64,
        win_probability: f64,
        raw_edge: f64,
        verdict: Verdict,
    ) -> Self {
        Self {
            stat: stat.to_string(),
            line: quote.line,
            american_odds: quote.american_odds as i64,
            projection: (projection * 10.0).round() / 10.0,
            win_pct: (win_probability * 100.0) as i64,
            edge_pct: (raw_edge * 100.0) as i64,
            verdict,
            raw_edge,
        }
    }
}

impl fmt::Display for Opportunity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} @ {:+} | proj={:.1} win={}% edge={}% [{}]",
            self.stat,
            self.line,
            self.american_odds,
            self.projection,
            self.win_pct,
            self.edge_pct,
            self.verdict,
        )
    }
}

// ---------------------------------------------------------------------------
// Ticket types
// ---------------------------------------------------------------------------

/// One staged leg of a parlay ticket.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketLeg {
    pub id: uuid::Uuid,
    pub stat: String,
    pub line: f64,
    pub american_odds: i64,
    pub verdict: Verdict,
    pub staged_at: DateTime<Utc>,
}

impl TicketLeg {
    /// Stage an opportunity as a ticket leg.
    pub fn from_opportunity(opp: &Opportunity) -> Self {
        Self {
            id: uuid::Uuid::new_v4(),
            stat: opp.stat.clone(),
            line: opp.line,
            american_odds: opp.american_odds,
            verdict: opp.verdict,
            staged_at: Utc::now(),
        }
    }
}

impl fmt::Display for TicketLeg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} @ {:+} [{}] ({})",
            self.stat, self.line, self.american_odds, self.verdict, self.id,
        )
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Domain-specific error types for the collaborator layers.
///
/// The engine itself never surfaces an error: malformed rows and cells are
/// silently excluded and arithmetic failures collapse to a zero-edge
/// sentinel. These variants cover the layers around it.
#[derive(Debug, thiserror::Error)]
pub enum PropError {
    #[error("Sheet fetch failed ({worksheet}): {message}")]
    Sheet { worksheet: String, message: String },

    #[error("Configuration error: {0}")]
    Config(String),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
