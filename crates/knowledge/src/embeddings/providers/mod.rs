//! Embedding provider implementations.

pub mod hashing;
pub mod ollama;
pub mod openai;

pub use hashing::HashingProvider;
pub use ollama::OllamaEmbeddingProvider;
pub use openai::OpenAiEmbeddingProvider;
