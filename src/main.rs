use std::sync::Arc;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use smartstocks::api::{self, AppState};
use smartstocks::config::Config;
use smartstocks::dialogue::{DialogueEngine, ModelRegistry, UsageTracker};
use smartstocks::llm::OpenAiClient;
use smartstocks::market::YahooFinanceClient;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env();
    info!(
        gpt5_enabled = config.gpt5_enabled,
        daily_ceiling = config.daily_ceiling,
        bind_addr = %config.bind_addr,
        "starting smartstocks"
    );

    let client = Arc::new(OpenAiClient::from_env()?);
    let usage = Arc::new(UsageTracker::new(config.daily_ceiling));
    let engine = DialogueEngine::new(
        client,
        ModelRegistry::standard(),
        usage,
        config.gpt5_enabled,
    );

    let state = AppState {
        engine,
        market: YahooFinanceClient::new(),
    };
    api::serve(&config.bind_addr, state).await
}
