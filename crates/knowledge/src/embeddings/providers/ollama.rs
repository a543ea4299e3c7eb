//! Ollama embedding provider.
//!
//! Provides embeddings via Ollama's local API using models like
//! nomic-embed-text. Ollama has no batch endpoint, so texts are embedded one
//! request at a time.

use crate::embeddings::provider::EmbeddingProvider;
use sentra_core::{AppError, AppResult};
use sentra_llm::transport::{json_headers, parse_json};
use sentra_llm::HttpTransport;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const EMBEDDING_ENDPOINT: &str = "/api/embeddings";

/// Request payload for Ollama embeddings API
#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

/// Response from Ollama embeddings API
#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    #[serde(default)]
    embedding: Option<Vec<f32>>,
    #[serde(default)]
    error: Option<String>,
}

/// Ollama embedding provider using the local API
pub struct OllamaEmbeddingProvider {
    base_url: String,
    model: String,
    transport: Arc<dyn HttpTransport>,
    debug: bool,
}

impl std::fmt::Debug for OllamaEmbeddingProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OllamaEmbeddingProvider")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl OllamaEmbeddingProvider {
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        transport: Arc<dyn HttpTransport>,
    ) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            transport,
            debug: false,
        }
    }

    /// Log raw responses at info level.
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }
}

#[async_trait::async_trait]
impl EmbeddingProvider for OllamaEmbeddingProvider {
    fn provider_name(&self) -> &str {
        "ollama"
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    async fn embed(&self, text: &str) -> AppResult<Vec<f32>> {
        let url = format!("{}{}", self.base_url, EMBEDDING_ENDPOINT);
        let body = serde_json::to_value(EmbeddingRequest {
            model: &self.model,
            prompt: text,
        })?;

        tracing::debug!("Sending embedding request to {}", url);

        let bytes = self.transport.post(&url, &json_headers(None), &body).await?;

        if self.debug {
            tracing::info!("Raw Ollama embedding response: {}", String::from_utf8_lossy(&bytes));
        }

        let response: EmbeddingResponse = parse_json(&bytes, "Ollama embedding")?;

        if let Some(error) = response.error {
            return Err(AppError::Llm(format!(
                "Ollama embedding error: {}. Is model '{}' pulled?",
                error, self.model
            )));
        }

        response
            .embedding
            .ok_or_else(|| AppError::Llm("Ollama response has no 'embedding' field".to_string()))
    }
}
