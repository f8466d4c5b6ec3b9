//! Market data endpoints, thin passthroughs to the Yahoo Finance client.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::market::{HistoricalSeries, HistoryRange, IndexSnapshot, MarketError, Quote, SymbolMatch};

use super::routes::AppState;

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub range: Option<HistoryRange>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: String,
}

#[derive(Debug, Deserialize)]
pub struct FxQuery {
    pub from: String,
    pub to: String,
}

fn upstream_error(err: MarketError) -> (StatusCode, String) {
    (StatusCode::BAD_GATEWAY, err.to_string())
}

fn unknown_symbol(symbol: &str) -> (StatusCode, String) {
    (StatusCode::NOT_FOUND, format!("no data for symbol {symbol}"))
}

pub async fn quote(
    State(state): State<Arc<AppState>>,
    Path(symbol): Path<String>,
) -> Result<Json<Quote>, (StatusCode, String)> {
    let quote = state.market.quote(&symbol).await.map_err(upstream_error)?;
    quote.map(Json).ok_or_else(|| unknown_symbol(&symbol))
}

pub async fn history(
    State(state): State<Arc<AppState>>,
    Path(symbol): Path<String>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<HistoricalSeries>, (StatusCode, String)> {
    let range = query.range.unwrap_or_default();
    let series = state
        .market
        .historical(&symbol, range)
        .await
        .map_err(upstream_error)?;
    series.map(Json).ok_or_else(|| unknown_symbol(&symbol))
}

pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<SymbolMatch>>, (StatusCode, String)> {
    let matches = state.market.search(&query.q).await.map_err(upstream_error)?;
    Ok(Json(matches))
}

pub async fn fx(
    State(state): State<Arc<AppState>>,
    Query(query): Query<FxQuery>,
) -> Result<Json<serde_json::Value>, (StatusCode, String)> {
    let rate = state
        .market
        .exchange_rate(&query.from, &query.to)
        .await
        .map_err(upstream_error)?;
    match rate {
        Some(rate) => Ok(Json(serde_json::json!({
            "from": query.from,
            "to": query.to,
            "rate": rate,
        }))),
        None => Err((
            StatusCode::NOT_FOUND,
            format!("no rate for {}/{}", query.from, query.to),
        )),
    }
}

pub async fn summary(State(state): State<Arc<AppState>>) -> Json<Vec<IndexSnapshot>> {
    Json(state.market.market_summary().await)
}
