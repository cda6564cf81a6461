//! Published-sheet client.
//!
//! Fetches each configured worksheet through the spreadsheet's CSV export
//! endpoint (`<base>/gviz/tq?tqx=out:csv&sheet=<name>`) and merges the
//! results into one grid snapshot. A worksheet that fails to fetch is
//! logged and skipped; the run only fails if every worksheet does.

use anyhow::{Context, Result};
use async_trait::async_trait;
use futures::future::join_all;
use reqwest::Client;
use tracing::{debug, info, warn};

use super::csv::parse_csv;
use super::GridSource;
use crate::config::SheetConfig;
use crate::types::{PropError, RawGrid};

pub struct SheetClient {
    http: Client,
    source_url: String,
    worksheets: Vec<String>,
}

impl SheetClient {
    pub fn new(config: &SheetConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(15))
            .user_agent("prophammer/0.1.0")
            .build()
            .context("Failed to build sheet HTTP client")?;
        Ok(Self {
            http,
            source_url: config.source_url.trim_end_matches('/').to_string(),
            worksheets: config.worksheets.clone(),
        })
    }

    /// CSV export URL for a worksheet tab.
    fn export_url(&self, worksheet: &str) -> String {
        format!(
            "{}/gviz/tq?tqx=out:csv&sheet={}",
            self.source_url,
            urlencoding::encode(worksheet),
        )
    }

    async fn fetch_worksheet(&self, worksheet: &str) -> Result<RawGrid> {
        let url = self.export_url(worksheet);
        debug!(worksheet, %url, "Fetching worksheet");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .with_context(|| format!("Request failed for worksheet '{worksheet}'"))?;

        if !response.status().is_success() {
            return Err(PropError::Sheet {
                worksheet: worksheet.to_string(),
                message: format!("HTTP {}", response.status()),
            }
            .into());
        }

        let body = response
            .text()
            .await
            .with_context(|| format!("Failed to read body for worksheet '{worksheet}'"))?;

        let grid = parse_csv(&body);
        debug!(worksheet, rows = grid.len(), "Worksheet parsed");
        Ok(grid)
    }
}

#[async_trait]
impl GridSource for SheetClient {
    async fn fetch_grid(&self) -> Result<RawGrid> {
        let fetches = self.worksheets.iter().map(|ws| self.fetch_worksheet(ws));
        let results = join_all(fetches).await;

        let mut grid = RawGrid::default();
        let mut fetched = 0usize;
        for (worksheet, result) in self.worksheets.iter().zip(results) {
            match result {
                Ok(part) => {
                    fetched += 1;
                    grid.extend(part);
                }
                Err(e) => {
                    warn!(worksheet, error = %e, "Worksheet fetch failed, continuing without");
                }
            }
        }

        if fetched == 0 {
            anyhow::bail!("All {} worksheets failed to fetch", self.worksheets.len());
        }

        info!(
            worksheets = fetched,
            rows = grid.len(),
            "Grid snapshot fetched"
        );
        Ok(grid)
    }

    fn describe(&self) -> String {
        format!("{} ({} worksheets)", self.source_url, self.worksheets.len())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
