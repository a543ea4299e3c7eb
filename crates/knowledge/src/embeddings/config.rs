//! Embedding configuration.

use sentra_core::{AppConfig, AppResult};
use serde::{Deserialize, Serialize};

/// Default dimension of the offline hashing provider.
pub const DEFAULT_HASHING_DIMENSIONS: usize = 384;

/// Settings needed to construct an embedding provider.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmbeddingConfig {
    /// Provider name: "openai", "ollama", "hashing"
    pub provider: String,

    /// Model identifier (provider-specific)
    pub model: String,

    /// Base URL; `None` selects the provider default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// API key for providers that require one
    #[serde(skip)]
    pub api_key: Option<String>,

    /// Vector dimension for the hashing provider
    #[serde(default = "default_dimensions")]
    pub dimensions: usize,

    /// Log raw provider responses at info level
    #[serde(default)]
    pub debug: bool,
}

fn default_dimensions() -> usize {
    DEFAULT_HASHING_DIMENSIONS
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: "hashing".to_string(),
            model: "hashing-v1".to_string(),
            base_url: None,
            api_key: None,
            dimensions: DEFAULT_HASHING_DIMENSIONS,
            debug: false,
        }
    }
}

impl EmbeddingConfig {
    /// Derive the embedding settings from the application configuration.
    pub fn from_app_config(config: &AppConfig) -> AppResult<Self> {
        Ok(Self {
            provider: config.provider.name.clone(),
            model: config.provider.embedding_model.clone(),
            base_url: config.provider.base_url.clone(),
            api_key: config.resolve_api_key()?,
            dimensions: DEFAULT_HASHING_DIMENSIONS,
            debug: config.debug,
        })
    }
}
