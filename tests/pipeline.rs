//! End-to-end tests for the dialogue pipeline against a scripted
//! in-process completion provider. No network anywhere.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use smartstocks::dialogue::{
    Animation, DialogueEngine, Emotion, Importance, ModelRegistry, ModelTier, UsageTracker,
    TEMPLATE_MODEL_TAG,
};
use smartstocks::llm::{
    ChatMessage, ChatOptions, ChatResponse, CompletionClient, ResponseFormat, TokenUsage,
};

/// What the scripted provider should do when asked for a completion.
#[derive(Clone)]
enum ChatScript {
    Respond(ChatResponse),
    Fail(String),
}

struct ScriptedClient {
    chat: ChatScript,
    models: Result<Vec<String>, String>,
    chat_calls: AtomicUsize,
    list_calls: AtomicUsize,
    last_call: Mutex<Option<(String, ChatOptions)>>,
}

impl ScriptedClient {
    fn new(chat: ChatScript, models: Result<Vec<String>, String>) -> Arc<Self> {
        Arc::new(Self {
            chat,
            models,
            chat_calls: AtomicUsize::new(0),
            list_calls: AtomicUsize::new(0),
            last_call: Mutex::new(None),
        })
    }

    fn chat_calls(&self) -> usize {
        self.chat_calls.load(Ordering::SeqCst)
    }

    fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    fn last_call(&self) -> Option<(String, ChatOptions)> {
        self.last_call.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionClient for ScriptedClient {
    async fn chat_completion(
        &self,
        model: &str,
        _messages: &[ChatMessage],
        options: ChatOptions,
    ) -> anyhow::Result<ChatResponse> {
        self.chat_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_call.lock().unwrap() = Some((model.to_string(), options));
        match &self.chat {
            ChatScript::Respond(response) => Ok(response.clone()),
            ChatScript::Fail(message) => Err(anyhow::anyhow!("{message}")),
        }
    }

    async fn list_models(&self) -> anyhow::Result<Vec<String>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        match &self.models {
            Ok(ids) => Ok(ids.clone()),
            Err(message) => Err(anyhow::anyhow!("{message}")),
        }
    }
}

fn json_response(content: &str, total_tokens: u64) -> ChatResponse {
    ChatResponse {
        content: Some(content.to_string()),
        finish_reason: Some("stop".to_string()),
        usage: Some(TokenUsage {
            prompt_tokens: 0,
            completion_tokens: 0,
            total_tokens,
        }),
        model: None,
    }
}

/// Tier table where the premium tier is switched on, as a deployment with
/// provider access to it would configure.
fn premium_registry() -> ModelRegistry {
    ModelRegistry::new(vec![
        ModelTier {
            id: "gpt-5",
            max_output_tokens: 300,
            cost_per_1k_tokens: 0.01,
            available: true,
        },
        ModelTier {
            id: "gpt-4o",
            max_output_tokens: 250,
            cost_per_1k_tokens: 0.015,
            available: true,
        },
        ModelTier {
            id: "gpt-4-turbo",
            max_output_tokens: 200,
            cost_per_1k_tokens: 0.03,
            available: true,
        },
    ])
}

fn engine_with(
    client: Arc<ScriptedClient>,
    registry: ModelRegistry,
    ceiling: u64,
    premium_enabled: bool,
) -> (DialogueEngine, Arc<UsageTracker>) {
    let usage = Arc::new(UsageTracker::new(ceiling));
    let engine = DialogueEngine::new(client, registry, Arc::clone(&usage), premium_enabled);
    (engine, usage)
}

#[tokio::test]
async fn quota_exhaustion_skips_the_provider_entirely() {
    let client = ScriptedClient::new(
        ChatScript::Respond(json_response(r#"{"dialogue":"x"}"#, 5)),
        Ok(vec![]),
    );
    let (engine, usage) = engine_with(Arc::clone(&client), ModelRegistry::standard(), 1, false);
    usage.record_usage("gpt-4o", 1);

    let result = engine.generate_dialogue("日経平均が上昇", Importance::Medium).await;

    assert_eq!(result.model, TEMPLATE_MODEL_TAG);
    assert_eq!(result.tokens, 0);
    assert!(!result.dialogue.is_empty());
    assert_eq!(client.chat_calls(), 0);
    assert_eq!(client.list_calls(), 0);
    assert_eq!(usage.todays_stats().get("gpt-4o"), Some(&1));
}

#[tokio::test]
async fn high_importance_full_success_lands_on_the_premium_tier() {
    let client = ScriptedClient::new(
        ChatScript::Respond(json_response(
            r#"{"dialogue":"X","emotion":"happy","animation":"wave"}"#,
            42,
        )),
        Ok(vec!["gpt-4o".to_string(), "gpt-5".to_string()]),
    );
    let (engine, usage) = engine_with(Arc::clone(&client), premium_registry(), 200, true);

    let result = engine.generate_dialogue("大幅な市場変動", Importance::High).await;

    assert_eq!(result.dialogue, "X");
    assert_eq!(result.emotion, Emotion::Happy);
    assert_eq!(result.animation, Animation::Wave);
    assert_eq!(result.model, "gpt-5");
    assert_eq!(result.tokens, 42);
    assert_eq!(client.list_calls(), 1);
    assert_eq!(client.chat_calls(), 1);
    assert_eq!(usage.todays_stats().get("gpt-5"), Some(&42));
}

#[tokio::test]
async fn provider_failure_falls_back_to_a_template() {
    let client = ScriptedClient::new(ChatScript::Fail("connection reset".to_string()), Ok(vec![]));
    let (engine, usage) = engine_with(Arc::clone(&client), ModelRegistry::standard(), 200, false);

    let result = engine.generate_dialogue("決算発表", Importance::Medium).await;

    assert_eq!(result.model, TEMPLATE_MODEL_TAG);
    assert_eq!(result.tokens, 0);
    assert_eq!(client.chat_calls(), 1);
    assert!(usage.todays_stats().is_empty());
}

#[tokio::test]
async fn unparseable_payload_falls_back_without_recording_usage() {
    let client = ScriptedClient::new(
        ChatScript::Respond(json_response("plain prose, not json", 99)),
        Ok(vec![]),
    );
    let (engine, usage) = engine_with(Arc::clone(&client), ModelRegistry::standard(), 200, false);

    let result = engine.generate_dialogue("決算発表", Importance::Low).await;

    assert_eq!(result.model, TEMPLATE_MODEL_TAG);
    assert_eq!(result.tokens, 0);
    assert!(usage.todays_stats().is_empty());
}

#[tokio::test]
async fn missing_fields_default_individually() {
    let client = ScriptedClient::new(
        ChatScript::Respond(json_response(r#"{"dialogue":"株価が上がってますね！"}"#, 10)),
        Ok(vec![]),
    );
    let (engine, usage) = engine_with(Arc::clone(&client), ModelRegistry::standard(), 200, false);

    let result = engine.generate_dialogue("上昇トレンド", Importance::Medium).await;

    assert_eq!(result.dialogue, "株価が上がってますね！");
    assert_eq!(result.emotion, Emotion::Normal);
    assert_eq!(result.animation, Animation::Idle);
    assert_eq!(result.model, "gpt-4o");
    assert_eq!(result.tokens, 10);
    assert_eq!(usage.todays_stats().get("gpt-4o"), Some(&10));
}

#[tokio::test]
async fn absent_content_yields_the_stock_line_not_a_template() {
    let client = ScriptedClient::new(
        ChatScript::Respond(ChatResponse {
            content: None,
            finish_reason: Some("stop".to_string()),
            usage: None,
            model: None,
        }),
        Ok(vec![]),
    );
    let (engine, usage) = engine_with(Arc::clone(&client), ModelRegistry::standard(), 200, false);

    let result = engine.generate_dialogue("静かな相場", Importance::Medium).await;

    assert_eq!(result.dialogue, "えーっと...");
    assert_eq!(result.emotion, Emotion::Normal);
    assert_eq!(result.animation, Animation::Idle);
    assert_eq!(result.model, "gpt-4o");
    assert_eq!(result.tokens, 0);
    assert_eq!(usage.todays_stats().get("gpt-4o"), Some(&0));
}

#[tokio::test]
async fn empty_dialogue_string_defaults_but_keeps_other_fields() {
    let client = ScriptedClient::new(
        ChatScript::Respond(json_response(
            r#"{"dialogue":"","emotion":"worried","animation":"point"}"#,
            7,
        )),
        Ok(vec![]),
    );
    let (engine, _usage) = engine_with(Arc::clone(&client), ModelRegistry::standard(), 200, false);

    let result = engine.generate_dialogue("急落", Importance::Medium).await;

    assert_eq!(result.dialogue, "えーっと...");
    assert_eq!(result.emotion, Emotion::Worried);
    assert_eq!(result.animation, Animation::Point);
    assert_eq!(result.tokens, 7);
}

#[tokio::test]
async fn probe_failure_downgrades_high_importance_requests() {
    let client = ScriptedClient::new(
        ChatScript::Respond(json_response(r#"{"dialogue":"ok"}"#, 5)),
        Err("model listing down".to_string()),
    );
    let (engine, _usage) = engine_with(Arc::clone(&client), premium_registry(), 200, true);

    let result = engine.generate_dialogue("重大ニュース", Importance::High).await;

    assert_eq!(result.model, "gpt-4o");
    assert_eq!(client.list_calls(), 1);
}

#[tokio::test]
async fn disabled_premium_flag_never_probes_the_provider() {
    let client = ScriptedClient::new(
        ChatScript::Respond(json_response(r#"{"dialogue":"ok"}"#, 5)),
        Ok(vec!["gpt-5".to_string()]),
    );
    let (engine, _usage) = engine_with(Arc::clone(&client), premium_registry(), 200, false);

    let result = engine.generate_dialogue("重大ニュース", Importance::High).await;

    assert_eq!(result.model, "gpt-4o");
    assert_eq!(client.list_calls(), 0);
    assert_eq!(client.chat_calls(), 1);
}

#[tokio::test]
async fn request_options_follow_the_selected_tier() {
    let client = ScriptedClient::new(
        ChatScript::Respond(json_response(r#"{"dialogue":"ok"}"#, 5)),
        Ok(vec![]),
    );
    let (engine, _usage) = engine_with(Arc::clone(&client), ModelRegistry::standard(), 200, false);

    engine.generate_dialogue("日銀会合", Importance::Medium).await;

    let (model, options) = client.last_call().expect("provider was called");
    assert_eq!(model, "gpt-4o");
    assert_eq!(options.temperature, Some(0.7));
    assert_eq!(options.max_tokens, Some(250));
    assert_eq!(options.response_format, Some(ResponseFormat::JsonObject));
}

#[tokio::test]
async fn usage_stats_report_per_model_totals_for_today() {
    let client = ScriptedClient::new(
        ChatScript::Respond(json_response(r#"{"dialogue":"ok"}"#, 30)),
        Ok(vec![]),
    );
    let (engine, _usage) = engine_with(Arc::clone(&client), ModelRegistry::standard(), 200, false);

    engine.generate_dialogue("第一報", Importance::Medium).await;
    engine.generate_dialogue("続報", Importance::Medium).await;

    let stats = engine.usage_stats();
    assert_eq!(stats.get("gpt-4o"), Some(&60));
    assert_eq!(stats.len(), 1);
}
