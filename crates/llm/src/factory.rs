//! LLM provider factory.
//!
//! Creates chat clients from the configured provider name, resolving the
//! default endpoint and checking required secrets.

use crate::client::LlmClient;
use crate::providers::{OllamaClient, OpenAiClient};
use crate::transport::HttpTransport;
use crate::types::ProviderType;
use std::sync::Arc;

/// Create an LLM client based on the provider name.
///
/// # Arguments
/// * `provider` - Provider identifier ("openai", "ollama")
/// * `endpoint` - Optional custom endpoint URL
/// * `api_key` - Optional API key (for providers that require it)
/// * `transport` - HTTP transport shared with the embedding provider
/// * `debug` - Log raw provider responses
///
/// # Errors
/// Returns error if:
/// - Provider is unknown or has no chat capability
/// - Required secrets are missing
pub fn create_client(
    provider: &str,
    endpoint: Option<&str>,
    api_key: Option<&str>,
    transport: Arc<dyn HttpTransport>,
    debug: bool,
) -> Result<Arc<dyn LlmClient>, String> {
    let provider_type =
        ProviderType::parse(provider).ok_or_else(|| format!("Unknown provider: {}", provider))?;

    match provider_type {
        ProviderType::Ollama => {
            let client = match endpoint {
                Some(base_url) => OllamaClient::with_base_url(base_url, transport),
                None => OllamaClient::new(transport),
            };
            Ok(Arc::new(client.with_debug(debug)))
        }
        ProviderType::OpenAI => {
            let api_key = api_key.ok_or_else(|| "OpenAI provider requires API key".to_string())?;
            let client = match endpoint {
                Some(base_url) => OpenAiClient::with_base_url(base_url, api_key, transport),
                None => OpenAiClient::new(api_key, transport),
            };
            Ok(Arc::new(client.with_debug(debug)))
        }
        ProviderType::Hashing => Err(format!(
            "Provider '{}' has no chat capability",
            provider_type
        )),
    }
}
