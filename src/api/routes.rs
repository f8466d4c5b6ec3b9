//! Router assembly and the server entry point.

use std::sync::Arc;

use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::dialogue::DialogueEngine;
use crate::market::YahooFinanceClient;

use super::{dialogue, market};

/// Shared state handed to every handler.
pub struct AppState {
    pub engine: DialogueEngine,
    pub market: YahooFinanceClient,
}

fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/dialogue", post(dialogue::generate))
        .route("/api/usage", get(dialogue::usage))
        .route("/api/quote/:symbol", get(market::quote))
        .route("/api/quote/:symbol/history", get(market::history))
        .route("/api/search", get(market::search))
        .route("/api/fx", get(market::fx))
        .route("/api/market/summary", get(market::summary))
        .route("/api/health", get(health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Binds `addr` and serves the API until the process exits.
pub async fn serve(addr: &str, state: AppState) -> anyhow::Result<()> {
    let app = router(Arc::new(state));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "smartstocks API listening");
    axum::serve(listener, app).await?;
    Ok(())
}
