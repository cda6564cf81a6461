//! PROP HAMMER — Automated edge-finder for NBA player props
//!
//! Entry point. Loads configuration, initialises structured logging,
//! wires the sheet loader and engine together, and runs the periodic
//! analysis loop with graceful shutdown. The dashboard serves the same
//! pipeline on demand.

use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

use prophammer::config::AppConfig;
use prophammer::dashboard;
use prophammer::dashboard::routes::DashboardState;
use prophammer::engine::EdgeEngine;
use prophammer::grid::cache::CachedLoader;
use prophammer::grid::sheet::SheetClient;
use prophammer::types::Matchup;

const BANNER: &str = r#"
 ____  ____   ___  ____    _   _    _    __  __ __  __ _____ ____
|  _ \|  _ \ / _ \|  _ \  | | | |  / \  |  \/  |  \/  | ____|  _ \
| |_) | |_) | | | | |_) | | |_| | / _ \ | |\/| | |\/| |  _| | |_) |
|  __/|  _ <| |_| |  __/  |  _  |/ ___ \| |  | | |  | | |___|  _ <
|_|   |_| \_\\___/|_|     |_| |_/_/   \_\_|  |_|_|  |_|_____|_| \_\

  The automated edge-finder for player props
  v0.1.0
"#;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    // Load configuration from TOML
    let cfg = AppConfig::load("config.toml")?;

    // Initialise structured logging
    init_logging();

    // Print startup banner
    println!("{BANNER}");
    info!(
        source = %cfg.sheet.source_url,
        worksheets = cfg.sheet.worksheets.len(),
        refresh_secs = cfg.sheet.refresh_secs,
        scan_interval_secs = cfg.analysis.scan_interval_secs,
        "PROP HAMMER starting up"
    );

    // -- Initialise components -------------------------------------------

    let sheet = SheetClient::new(&cfg.sheet)?;
    let loader = CachedLoader::new(Box::new(sheet), cfg.sheet.refresh_secs);
    let engine = EdgeEngine::new(cfg.model.clone());

    let default_matchup = cfg.matchups.default_matchup().unwrap_or(Matchup::Neutral);
    let default_multiplier = cfg.matchups.multiplier_for(default_matchup);

    let state = Arc::new(DashboardState::new(
        engine,
        loader,
        cfg.matchups.clone(),
        cfg.dashboard.preview_rows,
    ));

    if cfg.dashboard.enabled {
        dashboard::spawn_dashboard(state.clone(), cfg.dashboard.port)?;
    }

    // -- Main loop -------------------------------------------------------

    let scan_interval = Duration::from_secs(cfg.analysis.scan_interval_secs);
    let mut interval = tokio::time::interval(scan_interval);
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    info!(
        interval_secs = cfg.analysis.scan_interval_secs,
        matchup = %default_matchup,
        "Entering analysis loop. Press Ctrl+C to stop."
    );

    loop {
        tokio::select! {
            _ = interval.tick() => {
                if let Err(e) = run_pass(&state, default_matchup, default_multiplier).await {
                    error!(error = %e, "Analysis pass failed — continuing to next");
                }
            }
            _ = &mut shutdown => {
                info!("Shutdown signal received.");
                break;
            }
        }
    }

    info!("PROP HAMMER shut down cleanly.");
    Ok(())
}

/// Run a single fetch → scan → project → evaluate pass and log the result.
async fn run_pass(
    state: &Arc<DashboardState>,
    matchup: Matchup,
    multiplier: f64,
) -> Result<()> {
    let grid = {
        let mut loader = state.loader.lock().await;
        loader.grid().await?
    };

    let opportunities = state.engine.analyze(&grid, multiplier);

    match opportunities.first() {
        Some(best) => info!(
            matchup = %matchup,
            found = opportunities.len(),
            best = %best,
            "Analysis pass"
        ),
        None => info!(
            matchup = %matchup,
            grid_rows = grid.len(),
            "Analysis pass found no edges — check /api/grid for the raw preview"
        ),
    }

    Ok(())
}

/// Initialise the `tracing` subscriber.
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("prophammer=info"));

    let json_logging = std::env::var("PROPHAMMER_LOG_JSON").is_ok();

    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_thread_ids(true)
            .init();
    } else {
        fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .init();
    }
}
