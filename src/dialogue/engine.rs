//! The dialogue generation pipeline.
//!
//! One request flows tier selection → quota gate → prompt build →
//! completion call → parse → usage recording. Every failure path lands on
//! a canned template instead of surfacing an error to the caller.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::llm::{ChatMessage, ChatOptions, CompletionClient, ResponseFormat};

use super::prompt;
use super::registry::ModelRegistry;
use super::selector::{self, AvailabilityProbe};
use super::templates;
use super::types::{Animation, DialogueResult, Emotion, Importance};
use super::usage::UsageTracker;

/// Sampling temperature for every live call.
const TEMPERATURE: f64 = 0.7;
/// Line used when the provider's JSON carries no usable `dialogue`.
const DEFAULT_DIALOGUE: &str = "えーっと...";

/// Orchestrates one dialogue generation cycle end to end.
pub struct DialogueEngine {
    client: Arc<dyn CompletionClient>,
    registry: ModelRegistry,
    probe: AvailabilityProbe,
    usage: Arc<UsageTracker>,
}

impl DialogueEngine {
    pub fn new(
        client: Arc<dyn CompletionClient>,
        registry: ModelRegistry,
        usage: Arc<UsageTracker>,
        premium_enabled: bool,
    ) -> Self {
        let probe = AvailabilityProbe::new(Arc::clone(&client), premium_enabled);
        Self {
            client,
            registry,
            probe,
            usage,
        }
    }

    /// Generate one in-character line for `context`.
    ///
    /// Never fails: quota exhaustion, provider errors, and unparseable
    /// payloads all degrade to a canned template result.
    pub async fn generate_dialogue(
        &self,
        context: &str,
        importance: Importance,
    ) -> DialogueResult {
        let top_tier_live = self.probe.top_tier_available().await;
        let tier = selector::select_tier(&self.registry, importance, top_tier_live);
        debug!(tier, importance = importance.as_str(), "tier selected");

        if !self.usage.is_under_quota(tier) {
            warn!(tier, "daily usage ceiling reached, serving canned dialogue");
            return templates::fallback_dialogue();
        }

        match self.complete(tier, context, importance).await {
            Ok(result) => result,
            Err(err) => {
                warn!(tier, error = %err, "dialogue generation failed, serving canned dialogue");
                templates::fallback_dialogue()
            }
        }
    }

    /// Today's per-tier usage counts.
    pub fn usage_stats(&self) -> HashMap<String, u64> {
        self.usage.todays_stats()
    }

    async fn complete(
        &self,
        tier: &'static str,
        context: &str,
        importance: Importance,
    ) -> anyhow::Result<DialogueResult> {
        let messages = [
            ChatMessage::system(prompt::system_prompt(tier)),
            ChatMessage::user(prompt::user_prompt(context, importance)),
        ];
        let options = ChatOptions {
            temperature: Some(TEMPERATURE),
            max_tokens: self.registry.get(tier).map(|t| t.max_output_tokens),
            response_format: Some(ResponseFormat::JsonObject),
        };

        let response = self.client.chat_completion(tier, &messages, options).await?;
        if let Some(reason) = &response.finish_reason {
            debug!(tier, finish_reason = %reason, "completion finished");
        }

        let content = match response.content.as_deref() {
            Some(c) if !c.is_empty() => c,
            _ => "{}",
        };
        let (dialogue, emotion, animation) = parse_dialogue_payload(content)?;

        let tokens = response.usage.map(|u| u.total_tokens).unwrap_or(0);
        self.usage.record_usage(tier, tokens);
        if let Some(cfg) = self.registry.get(tier) {
            debug!(
                tier,
                tokens,
                cost_usd = tokens as f64 / 1000.0 * cfg.cost_per_1k_tokens,
                "usage recorded"
            );
        }

        Ok(DialogueResult {
            dialogue,
            emotion,
            animation,
            model: tier.to_string(),
            tokens,
        })
    }
}

/// Extract the dialogue fields from the provider's JSON payload.
///
/// Any well-formed JSON is accepted: fields that are missing, empty, or of
/// the wrong type fall back to their defaults. Only unparseable text is an
/// error.
fn parse_dialogue_payload(
    content: &str,
) -> serde_json::Result<(String, Emotion, Animation)> {
    let value: serde_json::Value = serde_json::from_str(content)?;
    let dialogue = value
        .get("dialogue")
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_DIALOGUE)
        .to_string();
    let emotion = Emotion::parse_or_default(value.get("emotion").and_then(|v| v.as_str()));
    let animation = Animation::parse_or_default(value.get("animation").and_then(|v| v.as_str()));
    Ok((dialogue, emotion, animation))
}
