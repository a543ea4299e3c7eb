//! Embedding providers.
//!
//! Turns text into vectors through a provider-agnostic trait. Remote
//! providers share the HTTP transport of the chat client.

pub mod config;
pub mod provider;
pub mod providers;

pub use config::EmbeddingConfig;
pub use provider::{create_provider, EmbeddingProvider};
pub use providers::{HashingProvider, OllamaEmbeddingProvider, OpenAiEmbeddingProvider};
