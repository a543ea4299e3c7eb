//! OpenAI-compatible embedding provider.
//!
//! API: `POST {base}/embeddings` with `{model, input}`; the vector is read
//! from `data[0].embedding`.

use crate::embeddings::provider::EmbeddingProvider;
use sentra_core::{AppError, AppResult};
use sentra_llm::transport::{json_headers, parse_json};
use sentra_llm::HttpTransport;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    #[serde(default)]
    data: Vec<EmbeddingData>,
    #[serde(default)]
    error: Option<ErrorBody>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

/// OpenAI embedding provider.
pub struct OpenAiEmbeddingProvider {
    base_url: String,
    api_key: String,
    model: String,
    transport: Arc<dyn HttpTransport>,
    debug: bool,
}

impl std::fmt::Debug for OpenAiEmbeddingProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiEmbeddingProvider")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl OpenAiEmbeddingProvider {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
        transport: Arc<dyn HttpTransport>,
    ) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
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
impl EmbeddingProvider for OpenAiEmbeddingProvider {
    fn provider_name(&self) -> &str {
        "openai"
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    async fn embed(&self, text: &str) -> AppResult<Vec<f32>> {
        let url = format!("{}/embeddings", self.base_url);
        let body = serde_json::to_value(EmbeddingRequest {
            model: &self.model,
            input: text,
        })?;

        tracing::debug!("Embedding {} bytes with {}", text.len(), self.model);

        let bytes = self
            .transport
            .post(&url, &json_headers(Some(&self.api_key)), &body)
            .await?;

        if self.debug {
            tracing::info!("Raw embedding response: {}", String::from_utf8_lossy(&bytes));
        }

        let response: EmbeddingResponse = parse_json(&bytes, "embedding")?;

        if let Some(error) = response.error {
            return Err(AppError::Llm(format!(
                "OpenAI embedding error: {}",
                error.message
            )));
        }

        response
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| AppError::Llm("Embedding response contains no data".to_string()))
    }
}
