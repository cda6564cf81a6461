//! Edge evaluator.
//!
//! Converts an odds quotation and a candidate line into implied and true
//! probability, scores the gap between them, and classifies the result
//! into a verdict tier. All functions are pure; arithmetic failures
//! collapse to a zero-probability, zero-edge sentinel that falls below the
//! inclusion threshold instead of surfacing an error.

use serde::{Deserialize, Serialize};

use crate::types::{LineQuote, Verdict};

// ---------------------------------------------------------------------------
// Configuration (defaults — overridden by config.toml at runtime)
// ---------------------------------------------------------------------------

/// Evaluator constants. All overridable from config.toml.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Standard deviation as a fraction of the projection. The model's
    /// central simplifying assumption: performance is normally distributed
    /// around the projection with σ = projection × this.
    pub sd_coefficient: f64,
    /// Minimum edge to surface an opportunity at all (exclusive).
    pub min_edge: f64,
    /// Edge above this is a BET (exclusive).
    pub bet_threshold: f64,
    /// Edge above this is a HAMMER (exclusive).
    pub hammer_threshold: f64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            sd_coefficient: 0.20,
            min_edge: 0.02,
            bet_threshold: 0.05,
            hammer_threshold: 0.15,
        }
    }
}

// ---------------------------------------------------------------------------
// Odds conversion
// ---------------------------------------------------------------------------

/// Convert American odds to decimal odds.
///
/// Positive odds are the amount won on a 100 risk; negative odds are the
/// amount risked to win 100. Zero or non-finite input returns 1.0 — a
/// defensive default, not a real price.
pub fn american_to_decimal(odds: f64) -> f64 {
    if !odds.is_finite() || odds == 0.0 {
        return 1.0;
    }
    if odds > 0.0 {
        odds / 100.0 + 1.0
    } else {
        100.0 / odds.abs() + 1.0
    }
}

/// Standard normal CDF approximation (Abramowitz-Stegun).
/// Accurate to ~7 decimal places.
pub fn normal_cdf(x: f64) -> f64 {
    let a1 = 0.254829592;
    let a2 = -0.284496736;
    let a3 = 1.421413741;
    let a4 = -1.453152027;
    let a5 = 1.061405429;
    let p = 0.3275911;

    let sign = if x < 0.0 { -1.0 } else { 1.0 };
    let z = x.abs() / std::f64::consts::SQRT_2;

    let t = 1.0 / (1.0 + p * z);
    let y = 1.0 - (((((a5 * t + a4) * t) + a3) * t + a2) * t + a1) * t * (-z * z).exp();

    0.5 * (1.0 + sign * y)
}

// ---------------------------------------------------------------------------
// Edge computation
// ---------------------------------------------------------------------------

/// Compute (true probability of clearing the line, edge over the book).
///
/// σ = projection × sd_coefficient; z = (line − projection) / σ;
/// true probability = 1 − Φ(z); edge = true probability − implied
/// probability. A zero or negative projection makes σ unusable, and any
/// non-finite intermediate result is equally meaningless — both cases
/// return the (0.0, 0.0) sentinel, which the inclusion threshold then
/// drops silently.
pub fn compute_edge(
    projection: f64,
    line: f64,
    american_odds: f64,
    config: &ModelConfig,
) -> (f64, f64) {
    let std_dev = projection * config.sd_coefficient;
    if !std_dev.is_finite() || std_dev <= 0.0 {
        return (0.0, 0.0);
    }

    let z = (line - projection) / std_dev;
    let true_probability = 1.0 - normal_cdf(z);

    let decimal_odds = american_to_decimal(american_odds);
    let implied_probability = if decimal_odds > 0.0 {
        1.0 / decimal_odds
    } else {
        0.0
    };

    let edge = true_probability - implied_probability;
    if !true_probability.is_finite() || !edge.is_finite() {
        return (0.0, 0.0);
    }

    (true_probability, edge)
}

/// Classify an edge into a verdict tier.
///
/// Returns `None` at or below the inclusion threshold — such cells are
/// discarded entirely, not merely marked PASS. All cutoffs are exclusive.
pub fn classify(edge: f64, config: &ModelConfig) -> Option<Verdict> {
    if !(edge > config.min_edge) {
        return None;
    }
    Some(if edge > config.hammer_threshold {
        Verdict::Hammer
    } else if edge > config.bet_threshold {
        Verdict::Bet
    } else {
        Verdict::Pass
    })
}

// ---------------------------------------------------------------------------
// Quote parsing
// ---------------------------------------------------------------------------

/// Parse a candidate cell of the form `<line>/<odds>` into a quote.
///
/// The cell must contain a `/`; each side must yield a signed-decimal
/// numeric token. Anything else is not a quote and is skipped.
pub fn parse_quote(cell: &str) -> Option<LineQuote> {
    let (line_part, odds_part) = cell.split_once('/')?;
    let line = first_number(line_part)?;
    let american_odds = first_number(odds_part)?;
    Some(LineQuote { line, american_odds })
}

/// Extract the first numeric token: optional leading minus, digits,
/// optional decimal point and digits.
fn first_number(s: &str) -> Option<f64> {
    let bytes = s.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i].is_ascii_digit() {
            let start = if i > 0 && bytes[i - 1] == b'-' { i - 1 } else { i };
            let mut end = i;
            while end < bytes.len() && bytes[end].is_ascii_digit() {
                end += 1;
            }
            if end + 1 < bytes.len() && bytes[end] == b'.' && bytes[end + 1].is_ascii_digit() {
                end += 1;
                while end < bytes.len() && bytes[end].is_ascii_digit() {
                    end += 1;
                }
            }
            return s[start..end].parse::<f64>().ok();
        }
        i += 1;
    }
    None
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
