//! HTTP transport abstraction.
//!
//! Providers talk to remote APIs through [`HttpTransport`] so they can be
//! exercised against a mock server or swapped for another HTTP stack.

use sentra_core::AppError;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Errors produced by an HTTP transport.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Connection, TLS or timeout failure
    #[error("request to {url} failed: {message}")]
    Request { url: String, message: String },

    /// Non-2xx response
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// 2xx response without a body
    #[error("empty response body from {url}")]
    EmptyBody { url: String },
}

impl From<TransportError> for AppError {
    fn from(err: TransportError) -> Self {
        AppError::Llm(err.to_string())
    }
}

/// Sends a JSON body with a POST request and returns the raw response body.
#[async_trait::async_trait]
pub trait HttpTransport: Send + Sync {
    async fn post(
        &self,
        url: &str,
        headers: &[(String, String)],
        body: &serde_json::Value,
    ) -> Result<Vec<u8>, TransportError>;
}

/// `reqwest`-backed transport.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Create a transport with an optional request timeout.
    pub fn new(timeout: Option<Duration>) -> Result<Self, TransportError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder.build().map_err(|e| TransportError::Request {
            url: String::new(),
            message: format!("failed to build HTTP client: {}", e),
        })?;

        Ok(Self { client })
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait::async_trait]
impl HttpTransport for ReqwestTransport {
    async fn post(
        &self,
        url: &str,
        headers: &[(String, String)],
        body: &serde_json::Value,
    ) -> Result<Vec<u8>, TransportError> {
        tracing::debug!("POST {}", url);

        let mut request = self.client.post(url).json(body);
        for (name, value) in headers {
            request = request.header(name.as_str(), value.as_str());
        }

        let response = request.send().await.map_err(|e| TransportError::Request {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(|e| TransportError::Request {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&bytes).into_owned(),
            });
        }

        if bytes.is_empty() {
            return Err(TransportError::EmptyBody {
                url: url.to_string(),
            });
        }

        Ok(bytes.to_vec())
    }
}

/// Headers for a JSON request, with bearer auth when a key is given.
pub fn json_headers(api_key: Option<&str>) -> Vec<(String, String)> {
    let mut headers = vec![("Content-Type".to_string(), "application/json".to_string())];
    if let Some(key) = api_key {
        headers.push(("Authorization".to_string(), format!("Bearer {}", key)));
    }
    headers
}

/// Decode a response body, naming the provider in the error.
pub fn parse_json<T: DeserializeOwned>(bytes: &[u8], provider: &str) -> Result<T, AppError> {
    serde_json::from_slice(bytes).map_err(|e| {
        AppError::Llm(format!(
            "Failed to parse {} response: {} (body: {})",
            provider,
            e,
            String::from_utf8_lossy(bytes)
        ))
    })
}
