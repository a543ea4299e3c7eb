//! Provider identification.

/// Default OpenAI-compatible endpoint.
pub const OPENAI_DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1";

/// Default local Ollama endpoint.
pub const OLLAMA_DEFAULT_ENDPOINT: &str = "http://localhost:11434";

/// Provider type enum for matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderType {
    /// OpenAI or any OpenAI-compatible server
    OpenAI,
    /// Local Ollama runtime
    Ollama,
    /// Offline feature hashing, embeddings only
    Hashing,
}

impl ProviderType {
    /// Parse provider type from string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "openai" => Some(Self::OpenAI),
            "ollama" => Some(Self::Ollama),
            "hashing" | "offline" => Some(Self::Hashing),
            _ => None,
        }
    }

    /// Get the canonical provider name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpenAI => "openai",
            Self::Ollama => "ollama",
            Self::Hashing => "hashing",
        }
    }

    /// Endpoint used when none is configured.
    pub fn default_endpoint(&self) -> Option<&'static str> {
        match self {
            Self::OpenAI => Some(OPENAI_DEFAULT_ENDPOINT),
            Self::Ollama => Some(OLLAMA_DEFAULT_ENDPOINT),
            Self::Hashing => None,
        }
    }

    pub fn requires_api_key(&self) -> bool {
        matches!(self, Self::OpenAI)
    }

    /// Whether the provider can generate chat completions.
    pub fn supports_chat(&self) -> bool {
        !matches!(self, Self::Hashing)
    }
}

impl std::fmt::Display for ProviderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_type_parsing() {
        assert_eq!(ProviderType::parse("openai"), Some(ProviderType::OpenAI));
        assert_eq!(ProviderType::parse("OpenAI"), Some(ProviderType::OpenAI));
        assert_eq!(ProviderType::parse("ollama"), Some(ProviderType::Ollama));
        assert_eq!(ProviderType::parse("hashing"), Some(ProviderType::Hashing));
        assert_eq!(ProviderType::parse("unknown"), None);
    }

    #[test]
    fn test_provider_capabilities() {
        assert_eq!(
            ProviderType::OpenAI.default_endpoint(),
            Some("https://api.openai.com/v1")
        );
        assert!(ProviderType::OpenAI.requires_api_key());
        assert!(!ProviderType::Ollama.requires_api_key());
        assert!(!ProviderType::Hashing.supports_chat());
        assert_eq!(ProviderType::Ollama.to_string(), "ollama");
    }
}
