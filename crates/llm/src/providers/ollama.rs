//! Ollama LLM provider implementation.
//!
//! This module provides integration with Ollama, a local LLM runtime.
//! Ollama API: https://github.com/ollama/ollama/blob/main/docs/api.md

use crate::client::{LlmClient, LlmRequest, LlmResponse, LlmUsage};
use crate::transport::{json_headers, parse_json, HttpTransport};
use crate::types::OLLAMA_DEFAULT_ENDPOINT;
use sentra_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Ollama API request format.
#[derive(Debug, Serialize)]
struct OllamaRequest {
    model: String,
    prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<OllamaOptions>,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct OllamaOptions {
    temperature: f32,
}

/// Ollama API response format.
#[derive(Debug, Deserialize)]
struct OllamaResponse {
    #[serde(default)]
    model: String,
    #[serde(default)]
    response: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    prompt_eval_count: Option<u32>,
    #[serde(default)]
    eval_count: Option<u32>,
}

/// Ollama LLM client.
pub struct OllamaClient {
    /// Base URL for Ollama API
    base_url: String,

    transport: Arc<dyn HttpTransport>,

    debug: bool,
}

impl OllamaClient {
    /// Create a new Ollama client for http://localhost:11434.
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self::with_base_url(OLLAMA_DEFAULT_ENDPOINT, transport)
    }

    /// Create a new Ollama client with a custom base URL.
    pub fn with_base_url(base_url: impl Into<String>, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            transport,
            debug: false,
        }
    }

    /// Log raw responses at info level.
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Convert LlmRequest to Ollama format.
    fn to_ollama_request(&self, request: &LlmRequest) -> OllamaRequest {
        OllamaRequest {
            model: request.model.clone(),
            prompt: request.prompt.clone(),
            system: request.system.clone(),
            options: request
                .temperature
                .map(|temperature| OllamaOptions { temperature }),
            stream: false,
        }
    }
}

#[async_trait::async_trait]
impl LlmClient for OllamaClient {
    fn provider_name(&self) -> &str {
        "ollama"
    }

    async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse> {
        tracing::info!("Sending completion request to Ollama");
        tracing::debug!("Request: {:?}", request);

        let body = serde_json::to_value(self.to_ollama_request(request))?;
        let url = format!("{}/api/generate", self.base_url);
        let bytes = self.transport.post(&url, &json_headers(None), &body).await?;

        if self.debug {
            tracing::info!("Raw Ollama response: {}", String::from_utf8_lossy(&bytes));
        }

        let response: OllamaResponse = parse_json(&bytes, "Ollama")?;

        if let Some(error) = response.error {
            return Err(AppError::Llm(format!("Ollama API error: {}", error)));
        }

        let content = response.response.ok_or_else(|| {
            AppError::Llm("Ollama response has no 'response' field".to_string())
        })?;

        tracing::info!("Received completion from Ollama");

        Ok(LlmResponse {
            content,
            model: if response.model.is_empty() {
                request.model.clone()
            } else {
                response.model
            },
            usage: LlmUsage::new(
                response.prompt_eval_count.unwrap_or(0),
                response.eval_count.unwrap_or(0),
            ),
        })
    }
}
