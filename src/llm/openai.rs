//! OpenAI REST client implementing [`CompletionClient`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{
    ChatMessage, ChatOptions, ChatResponse, CompletionClient, LlmError, ResponseFormat, TokenUsage,
};

const ENV_API_KEY: &str = "OPENAI_API_KEY";
const ENV_ORG_ID: &str = "OPENAI_ORG_ID";
const ENV_BASE_URL: &str = "OPENAI_BASE_URL";

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Client for the OpenAI chat-completions and model-listing endpoints.
pub struct OpenAiClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    organization: Option<String>,
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Deserialize)]
struct ChatCompletionBody {
    #[serde(default)]
    choices: Vec<ChoiceBody>,
    #[serde(default)]
    usage: Option<UsageBody>,
    #[serde(default)]
    model: Option<String>,
}

#[derive(Deserialize)]
struct ChoiceBody {
    message: MessageBody,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct MessageBody {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct UsageBody {
    #[serde(default)]
    prompt_tokens: u64,
    #[serde(default)]
    completion_tokens: u64,
    #[serde(default)]
    total_tokens: u64,
}

#[derive(Deserialize)]
struct ModelListBody {
    #[serde(default)]
    data: Vec<ModelEntry>,
}

#[derive(Deserialize)]
struct ModelEntry {
    id: String,
}

impl OpenAiClient {
    /// Build a client from `OPENAI_API_KEY`, `OPENAI_ORG_ID` and
    /// `OPENAI_BASE_URL`. Fails when the API key is unset or blank; the
    /// organization id and base URL are optional.
    pub fn from_env() -> Result<Self, LlmError> {
        let api_key = std::env::var(ENV_API_KEY)
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or(LlmError::MissingCredentials(ENV_API_KEY))?;
        let organization = std::env::var(ENV_ORG_ID).ok().filter(|s| !s.is_empty());
        let base_url =
            std::env::var(ENV_BASE_URL).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Ok(Self::new(api_key, organization, base_url))
    }

    pub fn new(
        api_key: impl Into<String>,
        organization: Option<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            organization,
        }
    }

    /// Attach bearer auth and the optional organization header.
    fn authorize(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let builder = builder.bearer_auth(&self.api_key);
        match &self.organization {
            Some(org) => builder.header("OpenAI-Organization", org),
            None => builder,
        }
    }

    /// Return the body text of a successful response, mapping non-success
    /// statuses to [`LlmError::Http`].
    async fn read_body(response: reqwest::Response) -> Result<String, LlmError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(LlmError::Http {
                status: status.as_u16(),
                body,
            });
        }
        response.text().await.map_err(LlmError::Transport)
    }
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn chat_completion(
        &self,
        model: &str,
        messages: &[ChatMessage],
        options: ChatOptions,
    ) -> anyhow::Result<ChatResponse> {
        let request = ChatCompletionRequest {
            model,
            messages,
            temperature: options.temperature,
            max_tokens: options.max_tokens,
            response_format: options.response_format,
        };

        debug!(model, messages = messages.len(), "dispatching chat completion");
        let response = self
            .authorize(self.client.post(format!("{}/chat/completions", self.base_url)))
            .json(&request)
            .send()
            .await
            .map_err(LlmError::Transport)?;

        let text = Self::read_body(response).await?;
        let body: ChatCompletionBody =
            serde_json::from_str(&text).map_err(|e| LlmError::Malformed(e.to_string()))?;

        let choice = body.choices.into_iter().next();
        Ok(ChatResponse {
            content: choice.as_ref().and_then(|c| c.message.content.clone()),
            finish_reason: choice.and_then(|c| c.finish_reason),
            usage: body.usage.map(|u| TokenUsage {
                prompt_tokens: u.prompt_tokens,
                completion_tokens: u.completion_tokens,
                total_tokens: u.total_tokens,
            }),
            model: body.model,
        })
    }

    async fn list_models(&self) -> anyhow::Result<Vec<String>> {
        let response = self
            .authorize(self.client.get(format!("{}/models", self.base_url)))
            .send()
            .await
            .map_err(LlmError::Transport)?;

        let text = Self::read_body(response).await?;
        let body: ModelListBody =
            serde_json::from_str(&text).map_err(|e| LlmError::Malformed(e.to_string()))?;
        Ok(body.data.into_iter().map(|m| m.id).collect())
    }
}
