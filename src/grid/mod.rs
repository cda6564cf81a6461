//! Grid loading.
//!
//! The engine never performs I/O; these collaborators fetch the raw grid
//! from the published spreadsheet, parse it, and cache it behind a
//! time-based refresh policy.

pub mod cache;
pub mod csv;
pub mod sheet;

use anyhow::Result;
use async_trait::async_trait;

use crate::types::RawGrid;

/// Abstraction over whatever supplies the raw grid.
///
/// Production uses `SheetClient`; tests substitute deterministic mocks.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GridSource: Send + Sync {
    /// Fetch a fresh grid snapshot.
    async fn fetch_grid(&self) -> Result<RawGrid>;

    /// Human-readable source label for logging and the status endpoint.
    fn describe(&self) -> String;
}
