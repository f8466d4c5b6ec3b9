//! SmartStocks: a market-reactive dialogue engine.
//!
//! The crate pairs a tiered completion-provider pipeline (pick a model by
//! importance and availability, guard it with a daily token quota, fall
//! back to canned templates when a live completion is not possible) with
//! a thin Yahoo Finance client and a small HTTP API serving both.

pub mod api;
pub mod config;
pub mod dialogue;
pub mod llm;
pub mod market;
pub mod store;
