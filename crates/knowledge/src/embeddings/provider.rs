//! Embedding provider trait and factory.

use crate::embeddings::config::EmbeddingConfig;
use crate::embeddings::providers::{
    HashingProvider, OllamaEmbeddingProvider, OpenAiEmbeddingProvider,
};
use sentra_core::{AppError, AppResult};
use sentra_llm::{HttpTransport, ProviderType};
use std::sync::Arc;

/// Trait for embedding providers.
#[async_trait::async_trait]
pub trait EmbeddingProvider: Send + Sync + std::fmt::Debug {
    /// Get provider name (e.g., "openai", "ollama", "hashing")
    fn provider_name(&self) -> &str;

    /// Get model identifier
    fn model_name(&self) -> &str;

    /// Generate the embedding for a single text.
    async fn embed(&self, text: &str) -> AppResult<Vec<f32>>;

    /// Generate embeddings for several texts, one request at a time.
    async fn embed_batch(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>> {
        let mut embeddings = Vec::with_capacity(texts.len());
        for text in texts {
            embeddings.push(self.embed(text).await?);
        }
        Ok(embeddings)
    }
}

/// Create an embedding provider based on configuration.
pub fn create_provider(
    config: &EmbeddingConfig,
    transport: Arc<dyn HttpTransport>,
) -> AppResult<Arc<dyn EmbeddingProvider>> {
    let provider_type = ProviderType::parse(&config.provider).ok_or_else(|| {
        AppError::Knowledge(format!(
            "Unknown embedding provider: '{}'. Supported providers: openai, ollama, hashing",
            config.provider
        ))
    })?;

    let base_url = config
        .base_url
        .clone()
        .or_else(|| provider_type.default_endpoint().map(str::to_string));

    tracing::debug!(
        "Creating embedding provider: provider={}, model={}",
        provider_type,
        config.model
    );

    match (provider_type, base_url) {
        (ProviderType::Hashing, _) => Ok(Arc::new(HashingProvider::new(config.dimensions))),
        (ProviderType::OpenAI, Some(base_url)) => {
            let api_key = config.api_key.clone().ok_or_else(|| {
                AppError::Knowledge("OpenAI embedding provider requires API key".to_string())
            })?;
            Ok(Arc::new(
                OpenAiEmbeddingProvider::new(base_url, api_key, &config.model, transport)
                    .with_debug(config.debug),
            ))
        }
        (ProviderType::Ollama, Some(base_url)) => Ok(Arc::new(
            OllamaEmbeddingProvider::new(base_url, &config.model, transport)
                .with_debug(config.debug),
        )),
        (provider_type, None) => Err(AppError::Knowledge(format!(
            "No endpoint configured for embedding provider '{}'",
            provider_type
        ))),
    }
}
