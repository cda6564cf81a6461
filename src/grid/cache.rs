//! Time-based grid snapshot cache.
//!
//! Wraps a `GridSource` with a refresh policy: serve the cached snapshot
//! while it is fresh, refetch when stale, and fall back to the stale
//! snapshot (with a warning) if a refresh fails. The engine downstream is
//! pure, so serving a slightly old snapshot only means slightly old
//! opportunities.

use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info, warn};

use super::GridSource;
use crate::types::RawGrid;

struct Snapshot {
    grid: RawGrid,
    fetched_at: DateTime<Utc>,
}

pub struct CachedLoader {
    source: Box<dyn GridSource>,
    refresh: Duration,
    snapshot: Option<Snapshot>,
}

impl CachedLoader {
    pub fn new(source: Box<dyn GridSource>, refresh_secs: u64) -> Self {
        Self {
            source,
            refresh: Duration::seconds(refresh_secs as i64),
            snapshot: None,
        }
    }

    /// The current grid, refetching if the snapshot is stale or missing.
    pub async fn grid(&mut self) -> Result<RawGrid> {
        if let Some(snap) = &self.snapshot {
            if Utc::now() - snap.fetched_at < self.refresh {
                debug!(rows = snap.grid.len(), "Serving cached grid");
                return Ok(snap.grid.clone());
            }
        }

        match self.source.fetch_grid().await {
            Ok(grid) => {
                info!(rows = grid.len(), source = %self.source.describe(), "Grid refreshed");
                self.snapshot = Some(Snapshot {
                    grid: grid.clone(),
                    fetched_at: Utc::now(),
                });
                Ok(grid)
            }
            Err(e) => match &self.snapshot {
                Some(snap) => {
                    warn!(error = %e, "Grid refresh failed, serving stale snapshot");
                    Ok(snap.grid.clone())
                }
                None => Err(e),
            },
        }
    }

    /// Mark the snapshot stale so the next call refetches. The data is
    /// kept as a fallback in case that refetch fails.
    pub fn invalidate(&mut self) {
        if let Some(snap) = &mut self.snapshot {
            snap.fetched_at = DateTime::<Utc>::MIN_UTC;
        }
    }

    /// When the snapshot was last fetched, if ever.
    pub fn last_fetched(&self) -> Option<DateTime<Utc>> {
        self.snapshot.as_ref().map(|s| s.fetched_at)
    }

    /// Source label, for logging and the status endpoint.
    pub fn describe(&self) -> String {
        self.source.describe()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
