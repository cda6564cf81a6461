//! Dashboard API route handlers.
//!
//! All endpoints return JSON. State is shared via `Arc<DashboardState>`.
//! The engine is invoked per request against the cached grid — it holds no
//! state of its own between calls.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::warn;

use crate::config::MatchupConfig;
use crate::engine::evaluator::ModelConfig;
use crate::engine::EdgeEngine;
use crate::grid::cache::CachedLoader;
use crate::ticket::TicketBook;
use crate::types::{Matchup, Opportunity, TicketLeg};

// ---------------------------------------------------------------------------
// Shared state
// ---------------------------------------------------------------------------

/// Shared state accessible by all route handlers.
pub struct DashboardState {
    pub engine: EdgeEngine,
    pub loader: Mutex<CachedLoader>,
    pub matchups: MatchupConfig,
    pub tickets: RwLock<TicketBook>,
    pub preview_rows: usize,
}

impl DashboardState {
    pub fn new(
        engine: EdgeEngine,
        loader: CachedLoader,
        matchups: MatchupConfig,
        preview_rows: usize,
    ) -> Self {
        Self {
            engine,
            loader: Mutex::new(loader),
            matchups,
            tickets: RwLock::new(TicketBook::new()),
            preview_rows,
        }
    }
}

pub type AppState = Arc<DashboardState>;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct OpportunityQuery {
    /// Matchup category; falls back to the configured default.
    pub matchup: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OpportunitiesResponse {
    pub matchup: Matchup,
    pub multiplier: f64,
    pub count: usize,
    pub opportunities: Vec<Opportunity>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GridPreviewResponse {
    pub source: String,
    pub total_rows: usize,
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusResponse {
    pub source: String,
    pub last_fetched: Option<String>,
    pub staged_legs: usize,
    pub default_matchup: String,
    pub model: ModelConfig,
}

// ---------------------------------------------------------------------------
// Route handlers
// ---------------------------------------------------------------------------

/// GET /api/opportunities?matchup=soft
pub async fn get_opportunities(
    State(state): State<AppState>,
    Query(query): Query<OpportunityQuery>,
) -> Result<Json<OpportunitiesResponse>, StatusCode> {
    let matchup = match &query.matchup {
        Some(raw) => raw.parse::<Matchup>().map_err(|_| StatusCode::BAD_REQUEST)?,
        None => state
            .matchups
            .default_matchup()
            .unwrap_or(Matchup::Neutral),
    };
    let multiplier = state.matchups.multiplier_for(matchup);

    let grid = {
        let mut loader = state.loader.lock().await;
        loader.grid().await.map_err(|e| {
            warn!(error = %e, "Grid unavailable for opportunities request");
            StatusCode::BAD_GATEWAY
        })?
    };

    let opportunities = state.engine.analyze(&grid, multiplier);
    Ok(Json(OpportunitiesResponse {
        matchup,
        multiplier,
        count: opportunities.len(),
        opportunities,
    }))
}

/// GET /api/grid — raw-data preview, the debugging aid for sheets that
/// silently produce zero opportunities.
pub async fn get_grid(
    State(state): State<AppState>,
) -> Result<Json<GridPreviewResponse>, StatusCode> {
    let mut loader = state.loader.lock().await;
    let grid = loader.grid().await.map_err(|e| {
        warn!(error = %e, "Grid unavailable for preview request");
        StatusCode::BAD_GATEWAY
    })?;

    Ok(Json(GridPreviewResponse {
        source: loader.describe(),
        total_rows: grid.len(),
        rows: grid.preview(state.preview_rows).to_vec(),
    }))
}

/// GET /api/ticket
pub async fn get_ticket(State(state): State<AppState>) -> Json<Vec<TicketLeg>> {
    let tickets = state.tickets.read().await;
    Json(tickets.legs().to_vec())
}

/// POST /api/ticket — stage an opportunity (the UI posts back a row it
/// received from /api/opportunities).
pub async fn post_ticket(
    State(state): State<AppState>,
    Json(opportunity): Json<Opportunity>,
) -> Json<TicketLeg> {
    let mut tickets = state.tickets.write().await;
    Json(tickets.stage(&opportunity))
}

/// GET /api/status
pub async fn get_status(State(state): State<AppState>) -> Json<StatusResponse> {
    let loader = state.loader.lock().await;
    let tickets = state.tickets.read().await;
    Json(StatusResponse {
        source: loader.describe(),
        last_fetched: loader.last_fetched().map(|t| t.to_rfc3339()),
        staged_legs: tickets.len(),
        default_matchup: state.matchups.default_category.clone(),
        model: state.engine.config().clone(),
    })
}

/// GET /health
pub async fn health() -> StatusCode {
    StatusCode::OK
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
