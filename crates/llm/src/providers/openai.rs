//! OpenAI-compatible chat completions provider.
//!
//! API: `POST {base}/chat/completions` with a `[system, user]` message pair.

use crate::client::{LlmClient, LlmRequest, LlmResponse, LlmUsage};
use crate::transport::{json_headers, parse_json, HttpTransport};
use crate::types::OPENAI_DEFAULT_ENDPOINT;
use sentra_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// System message used when the request carries none.
pub const DEFAULT_SYSTEM_MESSAGE: &str = "You are a helpful assistant.";

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Option<LlmUsage>,
    #[serde(default)]
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    message: String,
}

/// OpenAI chat client.
pub struct OpenAiClient {
    base_url: String,
    api_key: String,
    transport: Arc<dyn HttpTransport>,
    debug: bool,
}

impl OpenAiClient {
    /// Create a client for the public OpenAI endpoint.
    pub fn new(api_key: impl Into<String>, transport: Arc<dyn HttpTransport>) -> Self {
        Self::with_base_url(OPENAI_DEFAULT_ENDPOINT, api_key, transport)
    }

    /// Create a client for a custom OpenAI-compatible base URL.
    pub fn with_base_url(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        transport: Arc<dyn HttpTransport>,
    ) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            transport,
            debug: false,
        }
    }

    /// Log raw responses at info level.
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    fn to_chat_request<'a>(&self, request: &'a LlmRequest) -> ChatRequest<'a> {
        let system = request.system.as_deref().unwrap_or(DEFAULT_SYSTEM_MESSAGE);
        ChatRequest {
            model: &request.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: &request.prompt,
                },
            ],
            temperature: request.temperature,
        }
    }
}

#[async_trait::async_trait]
impl LlmClient for OpenAiClient {
    fn provider_name(&self) -> &str {
        "openai"
    }

    async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse> {
        tracing::info!("Sending chat completion request to OpenAI ({})", request.model);

        let body = serde_json::to_value(self.to_chat_request(request))?;
        let url = format!("{}/chat/completions", self.base_url);
        let bytes = self
            .transport
            .post(&url, &json_headers(Some(&self.api_key)), &body)
            .await?;

        if self.debug {
            tracing::info!("Raw chat response: {}", String::from_utf8_lossy(&bytes));
        }

        let response: ChatResponse = parse_json(&bytes, "chat")?;

        if let Some(error) = response.error {
            return Err(AppError::Llm(format!("OpenAI API error: {}", error.message)));
        }

        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                AppError::Llm(format!(
                    "Unexpected chat response: {}",
                    String::from_utf8_lossy(&bytes)
                ))
            })?;

        tracing::info!("Received completion from OpenAI");

        Ok(LlmResponse {
            content,
            model: response.model.unwrap_or_else(|| request.model.clone()),
            usage: response.usage.unwrap_or_default(),
        })
    }
}
