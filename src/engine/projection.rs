//! Projection model.
//!
//! A stat projection is the plain arithmetic mean of the per-game history,
//! scaled by the caller-supplied matchup multiplier. Every game counts
//! equally: no recency weighting, no smoothing, no outlier rejection.

/// Project a stat value from its history.
///
/// `multiplier` comes from the caller's matchup selection (soft defenses
/// inflate the projection, tough ones deflate it); any positive real is
/// accepted without validating where it came from. An empty history
/// projects to 0.0, which downstream evaluation collapses to zero edge.
pub fn project(history: &[f64], multiplier: f64) -> f64 {
    if history.is_empty() {
        return 0.0;
    }
    let mean = history.iter().sum::<f64>() / history.len() as f64;
    mean * multiplier
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
