//! Dialogue generation endpoints.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use tracing::info;
use uuid::Uuid;

use crate::dialogue::{DialogueRequest, DialogueResult};

use super::routes::AppState;

/// Generates a character reaction to the posted market context. The
/// pipeline degrades to a canned template internally, so this always
/// answers 200.
pub async fn generate(
    State(state): State<Arc<AppState>>,
    Json(request): Json<DialogueRequest>,
) -> Json<DialogueResult> {
    let request_id = Uuid::new_v4();
    info!(
        %request_id,
        importance = request.importance.as_str(),
        context_chars = request.context.chars().count(),
        "dialogue request received"
    );

    let result = state
        .engine
        .generate_dialogue(&request.context, request.importance)
        .await;

    info!(
        %request_id,
        model = %result.model,
        tokens = result.tokens,
        "dialogue request served"
    );
    Json(result)
}

/// Today's recorded token usage, keyed by model id.
pub async fn usage(State(state): State<Arc<AppState>>) -> Json<HashMap<String, u64>> {
    Json(state.engine.usage_stats())
}
