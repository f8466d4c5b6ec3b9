//! HTTP API for the SmartStocks assistant.
//!
//! ## Endpoints
//!
//! - `POST /api/dialogue` - Generate a character reaction to market context
//! - `GET /api/usage` - Today's recorded token usage per model
//! - `GET /api/quote/{symbol}` - Latest quote snapshot
//! - `GET /api/quote/{symbol}/history` - Daily candles (`?range=1y`)
//! - `GET /api/search` - Equity symbol search (`?q=`)
//! - `GET /api/fx` - Spot exchange rate (`?from=USD&to=JPY`)
//! - `GET /api/market/summary` - Major index snapshots
//! - `GET /api/health` - Health check

mod dialogue;
mod market;
mod routes;

pub use routes::{serve, AppState};
