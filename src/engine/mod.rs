//! Core engine — the scan → project → evaluate pipeline.
//!
//! Pure per invocation: each run recomputes from the supplied grid snapshot
//! and multiplier with no memory of prior runs. Safe to call concurrently
//! over independent grids.

pub mod evaluator;
pub mod projection;
pub mod scanner;

use tracing::{debug, info};

use crate::types::{Opportunity, RawGrid};
use evaluator::ModelConfig;

/// Runs the full edge-detection pipeline over a grid snapshot.
pub struct EdgeEngine {
    config: ModelConfig,
}

impl EdgeEngine {
    pub fn new(config: ModelConfig) -> Self {
        Self { config }
    }

    /// Access the model configuration.
    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    /// Scan the grid and score every candidate quote against its row's
    /// projection.
    ///
    /// Returns the surfaced opportunities sorted by raw edge descending.
    /// Rows and cells that don't parse are skipped silently; a run over a
    /// messy grid degrades to fewer (or zero) opportunities, never an
    /// error.
    pub fn analyze(&self, grid: &RawGrid, defense_multiplier: f64) -> Vec<Opportunity> {
        let mut opportunities = Vec::new();
        let mut rows_matched = 0usize;

        for stat_row in scanner::scan(grid) {
            rows_matched += 1;
            let projection = projection::project(&stat_row.history, defense_multiplier);

            for cell in &stat_row.candidates {
                let Some(quote) = evaluator::parse_quote(cell) else {
                    continue;
                };

                let (win_probability, raw_edge) = evaluator::compute_edge(
                    projection,
                    quote.line,
                    quote.american_odds,
                    &self.config,
                );

                let Some(verdict) = evaluator::classify(raw_edge, &self.config) else {
                    continue;
                };

                debug!(
                    stat = %stat_row.label,
                    line = quote.line,
                    odds = quote.american_odds,
                    projection = format!("{projection:.1}"),
                    edge = format!("{:.1}%", raw_edge * 100.0),
                    verdict = %verdict,
                    "Edge found"
                );

                opportunities.push(Opportunity::new(
                    &stat_row.label,
                    quote,
                    projection,
                    win_probability,
                    raw_edge,
                    verdict,
                ));
            }
        }

        // Best opportunities first
        opportunities.sort_by(|a, b| {
            b.raw_edge
                .partial_cmp(&a.raw_edge)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        info!(
            grid_rows = grid.len(),
            stat_rows = rows_matched,
            opportunities = opportunities.len(),
            multiplier = defense_multiplier,
            "Analysis pass complete"
        );

        opportunities
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
