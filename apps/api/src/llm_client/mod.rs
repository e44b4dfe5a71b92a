//! LLM Client — the single point of entry for all model provider calls.
//!
//! Speaks the OpenAI-compatible Chat Completions API. The handle is built once at
//! startup by [`OpenAiClient::initialize`] and shared read-only by every request.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Substituted once at startup when the configured model is refused by the provider.
pub const FALLBACK_MODEL: &str = "gpt-3.5-turbo";
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Could not decode provider response: {0}")]
    Decode(String),

    #[error("LLM response contained no choices")]
    NoChoices,
}

/// Raw textual output of one model call.
///
/// Completion-style wrappers report `text`, chat-style ones `content`; both are kept
/// so the caller can pick.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelOutput {
    pub text: Option<String>,
    pub content: Option<String>,
}

impl ModelOutput {
    /// The payload, preferring `text` over `content`.
    pub fn body(&self) -> Option<&str> {
        self.text.as_deref().or(self.content.as_deref())
    }
}

/// A configured language model. Carried in `AppState` as `Arc<dyn CompletionModel>`.
#[async_trait]
pub trait CompletionModel: Send + Sync {
    fn model_name(&self) -> &str;

    async fn complete(&self, prompt: &str) -> Result<ModelOutput, LlmError>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    text: Option<String>,
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ProviderError {
    error: ProviderErrorBody,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    message: String,
}

/// Model handle bound to one model name on an OpenAI-compatible endpoint.
#[derive(Clone)]
pub struct OpenAiClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenAiClient {
    /// Builds the process-wide model handle.
    ///
    /// The configured model is checked first. If the provider refuses it, the
    /// handle falls back to [`FALLBACK_MODEL`] exactly once. Transport failures and
    /// a refused fallback are returned as errors.
    pub async fn initialize(base_url: &str, api_key: &str, model: &str) -> Result<Self, LlmError> {
        let client = Client::builder().connect_timeout(CONNECT_TIMEOUT).build()?;
        let handle = Self {
            client,
            api_key: api_key.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        };

        let checked = handle.check_model().await;
        match checked {
            Ok(()) => Ok(handle),
            Err(LlmError::Api { status, message }) => {
                warn!(
                    "Model '{model}' unavailable (status {status}: {message}), falling back to '{FALLBACK_MODEL}'"
                );
                let fallback = Self {
                    model: FALLBACK_MODEL.to_string(),
                    ..handle
                };
                fallback.check_model().await?;
                Ok(fallback)
            }
            Err(e) => Err(e),
        }
    }

    /// Checks that the provider knows the model and accepts the credential.
    async fn check_model(&self) -> Result<(), LlmError> {
        let response = self
            .client
            .get(format!("{}/models/{}", self.base_url, self.model))
            .bearer_auth(&self.api_key)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(api_error(status.as_u16(), body));
        }

        info!("Model '{}' is available", self.model);
        Ok(())
    }
}

#[async_trait]
impl CompletionModel for OpenAiClient {
    fn model_name(&self) -> &str {
        &self.model
    }

    /// One Chat Completions call at temperature 0. No retry.
    async fn complete(&self, prompt: &str) -> Result<ModelOutput, LlmError> {
        let request_body = ChatRequest {
            model: &self.model,
            temperature: 0.0,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(api_error(status.as_u16(), body));
        }

        let chat: ChatResponse =
            serde_json::from_str(&body).map_err(|e| LlmError::Decode(e.to_string()))?;

        if let Some(usage) = &chat.usage {
            debug!(
                "LLM call succeeded: prompt_tokens={}, completion_tokens={}",
                usage.prompt_tokens, usage.completion_tokens
            );
        }

        // Neither field may be set; an empty payload is judged by the caller.
        let choice = chat.choices.into_iter().next().ok_or(LlmError::NoChoices)?;
        Ok(ModelOutput {
            text: choice.text,
            content: choice.message.and_then(|m| m.content),
        })
    }
}

fn api_error(status: u16, body: String) -> LlmError {
    let message = serde_json::from_str::<ProviderError>(&body)
        .map(|e| e.error.message)
        .unwrap_or(body);
    LlmError::Api { status, message }
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
pub fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    let inner = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"));

    match inner {
        Some(stripped) => {
            let stripped = stripped.trim();
            stripped
                .strip_suffix("```")
                .map(|s| s.trim())
                .unwrap_or(stripped)
        }
        None => text.strip_suffix("```").map(|s| s.trim()).unwrap_or(text),
    }
}
