//! Dashboard — Axum web server for the edge finder.
//!
//! Serves a REST API and a self-contained HTML front end.
//! CORS enabled for local development.

pub mod routes;

use anyhow::Result;
use axum::{
    http::{header, HeaderValue, Method},
    response::Html,
    routing::get,
    Router,
};
use tower_http::cors::CorsLayer;
use tracing::info;

use routes::AppState;

/// The embedded dashboard HTML (compiled into the binary).
const DASHBOARD_HTML: &str = include_str!("templates/index.html");

/// Start the dashboard web server.
///
/// This spawns a background task — it doesn't block.
pub fn spawn_dashboard(state: AppState, port: u16) -> Result<()> {
    let app = build_router(state);

    tokio::spawn(async move {
        let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
        info!(port, "Dashboard server starting on http://localhost:{port}");

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .expect("Failed to bind dashboard port");

        axum::serve(listener, app)
            .await
            .expect("Dashboard server error");
    });

    Ok(())
}

/// Build the Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin("*".parse::<HeaderValue>().unwrap())
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        // API routes
        .route("/api/opportunities", get(routes::get_opportunities))
        .route("/api/grid", get(routes::get_grid))
        .route("/api/ticket", get(routes::get_ticket).post(routes::post_ticket))
        .route("/api/status", get(routes::get_status))
        .route("/health", get(routes::health))
        // Dashboard HTML
        .route("/", get(serve_dashboard))
        .layer(cors)
        .with_state(state)
}

/// Serve the embedded HTML dashboard.
async fn serve_dashboard() -> Html<&'static str> {
    Html(DASHBOARD_HTML)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use std::sync::Arc;
    use tower::ServiceExt;

    use crate::config::MatchupConfig;
    use crate::engine::evaluator::ModelConfig;
    use crate::engine::EdgeEngine;
    use crate::grid::cache::CachedLoader;
    use crate::grid::MockGridSource;
    use crate::types::RawGrid;
    use super::routes::DashboardState;

    fn test_state() -> AppState {
        let mut source = MockGridSource::new();
        source.expect_fetch_grid().returning(|| {
            Ok(RawGrid::new(vec![vec![
                "ignore".into(),
                "Points".into(),
                "22, 25, 28, 19".into(),
                "18.5/+100".into(),
            ]]))
        });
        source.expect_describe().return_const("mock sheet".to_string());

        Arc::new(DashboardState::new(
            EdgeEngine::new(ModelConfig::default()),
            CachedLoader::new(Box::new(source), 3600),
            MatchupConfig::default(),
            10,
        ))
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let app = build_router(test_state());
        let resp = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_opportunities_endpoint() {
        let app = build_router(test_state());
        let resp = app
            .oneshot(
                Request::builder()
                    .uri("/api/opportunities?matchup=neutral")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let body = axum::body::to_bytes(resp.into_body(), 100_000).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["count"].as_u64().unwrap(), 1);
        assert_eq!(json["opportunities"][0]["verdict"], "HAMMER");
    }

    #[tokio::test]
    async fn test_opportunities_bad_matchup_is_400() {
        let app = build_router(test_state());
        let resp = app
            .oneshot(
                Request::builder()
                    .uri("/api/opportunities?matchup=bogus")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_grid_endpoint() {
        let app = build_router(test_state());
        let resp = app
            .oneshot(Request::builder().uri("/api/grid").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let body = axum::body::to_bytes(resp.into_body(), 100_000).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["total_rows"].as_u64().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_ticket_post_then_get() {
        let state = test_state();

        let app = build_router(state.clone());
        let post_body = serde_json::json!({
            "stat": "Points",
            "line": 18.5,
            "american_odds": 100,
            "projection": 23.5,
            "win_pct": 85,
            "edge_pct": 35,
            "verdict": "HAMMER",
            "raw_edge": 0.356
        });
        let resp = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/ticket")
                    .header("content-type", "application/json")
                    .body(Body::from(post_body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let app = build_router(state);
        let resp = app
            .oneshot(Request::builder().uri("/api/ticket").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let body = axum::body::to_bytes(resp.into_body(), 100_000).await.unwrap();
        let legs: Vec<serde_json::Value> = serde_json::from_slice(&body).unwrap();
        assert_eq!(legs.len(), 1);
        assert_eq!(legs[0]["stat"], "Points");
    }

    #[tokio::test]
    async fn test_status_endpoint() {
        let app = build_router(test_state());
        let resp = app
            .oneshot(Request::builder().uri("/api/status").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let body = axum::body::to_bytes(resp.into_body(), 100_000).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["source"], "mock sheet");
        assert_eq!(json["staged_legs"].as_u64().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_dashboard_html() {
        let app = build_router(test_state());
        let resp = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let body = axum::body::to_bytes(resp.into_body(), 1_000_000).await.unwrap();
        let html = String::from_utf8(body.to_vec()).unwrap();
        assert!(html.contains("PROP HAMMER"));
    }
}
