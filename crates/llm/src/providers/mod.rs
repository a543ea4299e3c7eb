//! Chat provider implementations.

pub mod ollama;
pub mod openai;

pub use ollama::OllamaClient;
pub use openai::{OpenAiClient, DEFAULT_SYSTEM_MESSAGE};
