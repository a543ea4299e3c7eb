//! LLM integration crate for Sentra.
//!
//! This crate provides a provider-agnostic abstraction for chat completions
//! and the HTTP transport shared by every remote provider.
//!
//! # Providers
//! - **OpenAI**: OpenAI or any OpenAI-compatible server (default)
//! - **Ollama**: Local LLM runtime
//!
//! # Example
//! ```no_run
//! use std::sync::Arc;
//! use sentra_llm::{LlmClient, LlmRequest, OpenAiClient, ReqwestTransport};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = OpenAiClient::new("sk-...", Arc::new(ReqwestTransport::default()));
//! let request = LlmRequest::new("Hello, world!", "gpt-5-nano");
//! let response = client.complete(&request).await?;
//! println!("{}", response.content);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod factory;
pub mod providers;
pub mod transport;
pub mod types;

// Re-export main types
pub use client::{LlmClient, LlmRequest, LlmResponse, LlmUsage};
pub use factory::create_client;
pub use providers::{OllamaClient, OpenAiClient};
pub use transport::{HttpTransport, ReqwestTransport, TransportError};
pub use types::ProviderType;
