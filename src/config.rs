//! Configuration loading from TOML.
//!
//! Reads `config.toml` and deserializes into strongly-typed structs.
//! Everything outside the sheet source has sensible defaults, so a minimal
//! config only needs a `[sheet]` section.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;

use crate::engine::evaluator::ModelConfig;
use crate::types::{Matchup, PropError};

/// Top-level application configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub sheet: SheetConfig,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub matchups: MatchupConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SheetConfig {
    /// Base URL of the published spreadsheet (CSV export endpoint is
    /// derived from it per worksheet).
    pub source_url: String,
    /// Worksheet tabs to fetch and merge into one grid snapshot.
    pub worksheets: Vec<String>,
    /// How long a fetched snapshot stays fresh.
    #[serde(default = "default_refresh_secs")]
    pub refresh_secs: u64,
}

fn default_refresh_secs() -> u64 {
    300
}

/// Matchup-category multipliers applied to the projection.
///
/// This mapping is caller-side configuration: the engine itself accepts any
/// positive multiplier without caring where it came from.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct MatchupConfig {
    pub neutral: f64,
    pub soft: f64,
    pub tough: f64,
    /// Category used by the analysis loop when none is selected.
    #[serde(rename = "default")]
    pub default_category: String,
}

impl Default for MatchupConfig {
    fn default() -> Self {
        Self {
            neutral: 1.00,
            soft: 1.08,
            tough: 0.92,
            default_category: "neutral".to_string(),
        }
    }
}

impl MatchupConfig {
    /// The multiplier for a given matchup category.
    pub fn multiplier_for(&self, matchup: Matchup) -> f64 {
        match matchup {
            Matchup::Neutral => self.neutral,
            Matchup::Soft => self.soft,
            Matchup::Tough => self.tough,
        }
    }

    /// The configured default category, parsed.
    pub fn default_matchup(&self) -> Result<Matchup> {
        self.default_category.parse()
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Interval between analysis passes in the main loop.
    pub scan_interval_secs: u64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            scan_interval_secs: 600,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DashboardConfig {
    pub enabled: bool,
    pub port: u16,
    /// Rows exposed by the raw-grid preview endpoint.
    pub preview_rows: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            port: 8080,
            preview_rows: 10,
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;
        let config: AppConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {path}"))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the engine would silently misbehave on.
    fn validate(&self) -> Result<(), PropError> {
        for m in Matchup::ALL {
            let mult = self.matchups.multiplier_for(*m);
            if !mult.is_finite() || mult <= 0.0 {
                return Err(PropError::Config(format!(
                    "matchup multiplier for '{m}' must be a positive number, got {mult}"
                )));
            }
        }
        if self.matchups.default_matchup().is_err() {
            return Err(PropError::Config(format!(
                "unknown default matchup category: {}",
                self.matchups.default_category
            )));
        }
        if self.sheet.worksheets.is_empty() {
            return Err(PropError::Config(
                "at least one worksheet must be configured".to_string(),
            ));
        }
        Ok(())
    }
}
