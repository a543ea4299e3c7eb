//! Configuration management for Sentra.
//!
//! Configuration is layered, later sources winning:
//! - Built-in defaults
//! - Config file (`sentra.yaml` in the workspace, or an explicit path)
//! - Environment variables
//! - Command-line flags
//!
//! Paths in the configuration are relative to the workspace root.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};
use crate::logging::LogFormat;

/// Default config file name, looked up in the workspace root.
pub const CONFIG_FILE_NAME: &str = "sentra.yaml";

/// Providers the CLI knows how to construct.
pub const KNOWN_PROVIDERS: [&str; 3] = ["openai", "ollama", "hashing"];

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to the workspace root
    pub workspace: PathBuf,

    /// Config file that was merged, if any
    pub config_file: Option<PathBuf>,

    /// Embedding and chat provider settings
    pub provider: ProviderSettings,

    /// Data and artifact locations
    pub paths: PathSettings,

    /// Retrieval and context budget settings
    pub retrieval: RetrievalSettings,

    /// Log level override
    pub log_level: Option<String>,

    /// Log line format
    pub log_format: LogFormat,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,

    /// Emit raw provider responses and context sizes at info level
    pub debug: bool,
}

/// Provider settings shared by the embedding and chat capabilities.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderSettings {
    /// Provider name ("openai", "ollama", "hashing")
    pub name: String,

    /// Base URL; `None` means the provider's default endpoint
    pub base_url: Option<String>,

    /// Model used for embeddings
    pub embedding_model: String,

    /// Model used for chat completions
    pub chat_model: String,

    /// Explicit API key (never written back to disk)
    #[serde(skip_serializing)]
    pub api_key: Option<String>,

    /// Environment variable holding the API key
    pub api_key_env: String,

    /// File whose first line holds the API key
    pub api_key_file: PathBuf,

    /// Optional request timeout in seconds
    pub timeout_secs: Option<u64>,

    /// Sampling temperature for answers; `None` leaves the model default
    pub temperature: Option<f32>,
}

/// Data and artifact locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathSettings {
    /// Directory holding the source text files
    pub data_dir: PathBuf,

    /// Directory holding the persisted index
    pub artifacts_dir: PathBuf,

    /// Binary vector file name inside the artifacts directory
    pub index_file: String,

    /// Metadata file name inside the artifacts directory
    pub metadata_file: String,
}

/// Retrieval and context budget settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetrievalSettings {
    /// Number of chunks retrieved per question
    pub top_k: usize,

    /// Per-chunk content cap in bytes
    pub max_chars_per_chunk: usize,

    /// Cap on the total decorated context in bytes
    pub max_total_chars: usize,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            name: "openai".to_string(),
            base_url: None,
            embedding_model: "text-embedding-3-small".to_string(),
            chat_model: "gpt-5-nano".to_string(),
            api_key: None,
            api_key_env: "OPENAI_API_KEY".to_string(),
            api_key_file: PathBuf::from("api_key.txt"),
            timeout_secs: None,
            temperature: None,
        }
    }
}

impl Default for PathSettings {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            artifacts_dir: PathBuf::from("artifacts"),
            index_file: "index.bin".to_string(),
            metadata_file: "metadata.json".to_string(),
        }
    }
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        Self {
            top_k: 3,
            max_chars_per_chunk: 800,
            max_total_chars: 3000,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            workspace: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            config_file: None,
            provider: ProviderSettings::default(),
            paths: PathSettings::default(),
            retrieval: RetrievalSettings::default(),
            log_level: None,
            log_format: LogFormat::default(),
            verbose: false,
            no_color: false,
            debug: false,
        }
    }
}

/// Config file structure; every section is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    provider: Option<ProviderSection>,
    paths: Option<PathsSection>,
    retrieval: Option<RetrievalSection>,
    logging: Option<LoggingSection>,
    debug: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProviderSection {
    name: Option<String>,
    base_url: Option<String>,
    embedding_model: Option<String>,
    chat_model: Option<String>,
    api_key_env: Option<String>,
    api_key_file: Option<PathBuf>,
    timeout_secs: Option<u64>,
    temperature: Option<f32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PathsSection {
    data_dir: Option<PathBuf>,
    artifacts_dir: Option<PathBuf>,
    index_file: Option<String>,
    metadata_file: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RetrievalSection {
    top_k: Option<usize>,
    max_chars_per_chunk: Option<usize>,
    max_total_chars: Option<usize>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct LoggingSection {
    level: Option<String>,
    color: Option<bool>,
    format: Option<String>,
}

/// Command-line overrides applied on top of the loaded configuration.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub provider: Option<String>,
    pub chat_model: Option<String>,
    pub embedding_model: Option<String>,
    pub top_k: Option<usize>,
    pub log_level: Option<String>,
    pub verbose: bool,
    pub no_color: bool,
    pub debug: bool,
}

impl AppConfig {
    /// Load configuration from the process environment.
    ///
    /// Environment variables:
    /// - `SENTRA_PROVIDER`: Provider name
    /// - `SENTRA_BASE_URL`: Provider base URL
    /// - `SENTRA_CHAT_MODEL`: Chat model identifier
    /// - `SENTRA_EMBEDDING_MODEL`: Embedding model identifier
    /// - `SENTRA_API_KEY`: API key
    /// - `RUST_LOG`: Log level
    /// - `NO_COLOR`: Disable colored output
    ///
    /// # Example
    /// ```no_run
    /// use sentra_core::config::AppConfig;
    ///
    /// let config = AppConfig::load(None, None).expect("Failed to load config");
    /// println!("Workspace: {:?}", config.workspace);
    /// ```
    pub fn load(workspace: Option<PathBuf>, config_file: Option<PathBuf>) -> AppResult<Self> {
        Self::load_with(workspace, config_file, |key| std::env::var(key).ok())
    }

    /// Load configuration with an explicit environment lookup.
    pub fn load_with<F>(
        workspace: Option<PathBuf>,
        config_file: Option<PathBuf>,
        env: F,
    ) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(workspace) = workspace {
            config.workspace = workspace;
        }

        if !config.workspace.exists() {
            return Err(AppError::Config(format!(
                "Workspace directory does not exist: {:?}",
                config.workspace
            )));
        }

        match config_file {
            Some(path) => {
                if !path.exists() {
                    return Err(AppError::Config(format!(
                        "Config file does not exist: {:?}",
                        path
                    )));
                }
                config.merge_yaml(&path)?;
            }
            None => {
                let default_path = config.workspace.join(CONFIG_FILE_NAME);
                if default_path.exists() {
                    config.merge_yaml(&default_path)?;
                }
            }
        }

        // Environment variables override the config file
        if let Some(provider) = env("SENTRA_PROVIDER") {
            config.provider.name = provider;
        }
        if let Some(base_url) = env("SENTRA_BASE_URL") {
            config.provider.base_url = Some(base_url);
        }
        if let Some(model) = env("SENTRA_CHAT_MODEL") {
            config.provider.chat_model = model;
        }
        if let Some(model) = env("SENTRA_EMBEDDING_MODEL") {
            config.provider.embedding_model = model;
        }
        if let Some(key) = env("SENTRA_API_KEY") {
            config.provider.api_key = Some(key);
        }
        if let Some(level) = env("RUST_LOG") {
            config.log_level = Some(level);
        }
        if env("NO_COLOR").is_some() {
            config.no_color = true;
        }

        Ok(config)
    }

    /// Merge a YAML configuration file into this config.
    fn merge_yaml(&mut self, path: &Path) -> AppResult<()> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let file: ConfigFile = serde_yaml::from_str(&contents).map_err(|e| {
            AppError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })?;

        self.merge_file(file)?;
        self.config_file = Some(path.to_path_buf());

        tracing::debug!("Merged config file {:?}", path);
        Ok(())
    }

    fn merge_file(&mut self, file: ConfigFile) -> AppResult<()> {
        if let Some(provider) = file.provider {
            let target = &mut self.provider;
            if let Some(name) = provider.name {
                target.name = name;
            }
            if provider.base_url.is_some() {
                target.base_url = provider.base_url;
            }
            if let Some(model) = provider.embedding_model {
                target.embedding_model = model;
            }
            if let Some(model) = provider.chat_model {
                target.chat_model = model;
            }
            if let Some(env) = provider.api_key_env {
                target.api_key_env = env;
            }
            if let Some(file) = provider.api_key_file {
                target.api_key_file = file;
            }
            if provider.timeout_secs.is_some() {
                target.timeout_secs = provider.timeout_secs;
            }
            if provider.temperature.is_some() {
                target.temperature = provider.temperature;
            }
        }

        if let Some(paths) = file.paths {
            if let Some(dir) = paths.data_dir {
                self.paths.data_dir = dir;
            }
            if let Some(dir) = paths.artifacts_dir {
                self.paths.artifacts_dir = dir;
            }
            if let Some(name) = paths.index_file {
                self.paths.index_file = name;
            }
            if let Some(name) = paths.metadata_file {
                self.paths.metadata_file = name;
            }
        }

        if let Some(retrieval) = file.retrieval {
            if let Some(top_k) = retrieval.top_k {
                self.retrieval.top_k = top_k;
            }
            if let Some(cap) = retrieval.max_chars_per_chunk {
                self.retrieval.max_chars_per_chunk = cap;
            }
            if let Some(cap) = retrieval.max_total_chars {
                self.retrieval.max_total_chars = cap;
            }
        }

        if let Some(logging) = file.logging {
            if let Some(level) = logging.level {
                self.log_level = Some(level);
            }
            if let Some(color) = logging.color {
                self.no_color = !color;
            }
            if let Some(format) = logging.format {
                self.log_format = LogFormat::parse(&format).ok_or_else(|| {
                    AppError::Config(format!("Unknown log format: {}", format))
                })?;
            }
        }

        if let Some(debug) = file.debug {
            self.debug = debug;
        }

        Ok(())
    }

    /// Apply CLI overrides to the configuration.
    ///
    /// Command-line flags take precedence over environment variables
    /// and the config file.
    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(provider) = overrides.provider {
            self.provider.name = provider;
        }

        if let Some(model) = overrides.chat_model {
            self.provider.chat_model = model;
        }

        if let Some(model) = overrides.embedding_model {
            self.provider.embedding_model = model;
        }

        if let Some(top_k) = overrides.top_k {
            self.retrieval.top_k = top_k;
        }

        if let Some(log_level) = overrides.log_level {
            self.log_level = Some(log_level);
        }

        if overrides.verbose {
            self.verbose = true;
            // Verbose mode implies debug logging
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if overrides.no_color {
            self.no_color = true;
        }

        if overrides.debug {
            self.debug = true;
        }

        self
    }

    /// Directory holding the source documents.
    pub fn data_dir(&self) -> PathBuf {
        self.workspace.join(&self.paths.data_dir)
    }

    /// Directory holding the persisted index.
    pub fn artifacts_dir(&self) -> PathBuf {
        self.workspace.join(&self.paths.artifacts_dir)
    }

    /// Path of the binary vector file.
    pub fn index_path(&self) -> PathBuf {
        self.artifacts_dir().join(&self.paths.index_file)
    }

    /// Path of the metadata file.
    pub fn metadata_path(&self) -> PathBuf {
        self.artifacts_dir().join(&self.paths.metadata_file)
    }

    /// Directory searched for prompt overrides.
    pub fn prompts_dir(&self) -> PathBuf {
        self.workspace.join(".sentra").join("prompts")
    }

    /// Resolve the API key.
    ///
    /// Lookup order: explicit key, the configured environment variable,
    /// then the first line of the key file.
    pub fn resolve_api_key(&self) -> AppResult<Option<String>> {
        if let Some(ref key) = self.provider.api_key {
            return Ok(Some(key.clone()));
        }

        if let Ok(key) = std::env::var(&self.provider.api_key_env) {
            if !key.trim().is_empty() {
                return Ok(Some(key.trim().to_string()));
            }
        }

        let key_file = self.workspace.join(&self.provider.api_key_file);
        if key_file.exists() {
            let contents = std::fs::read_to_string(&key_file).map_err(|e| {
                AppError::Config(format!("Failed to read API key file {:?}: {}", key_file, e))
            })?;
            let key = contents.lines().next().unwrap_or("").trim();
            if key.is_empty() {
                return Err(AppError::Config(format!(
                    "API key file {:?} is empty",
                    key_file
                )));
            }
            return Ok(Some(key.to_string()));
        }

        Ok(None)
    }

    /// Validate configuration for the active provider.
    pub fn validate(&self) -> AppResult<()> {
        let provider = self.provider.name.as_str();

        if !KNOWN_PROVIDERS.contains(&provider) {
            return Err(AppError::Config(format!(
                "Unknown provider: {}. Supported: {}",
                provider,
                KNOWN_PROVIDERS.join(", ")
            )));
        }

        if provider == "openai" && self.resolve_api_key()?.is_none() {
            return Err(AppError::Config(format!(
                "No API key found. Set SENTRA_API_KEY or {}, or create {:?}",
                self.provider.api_key_env, self.provider.api_key_file
            )));
        }

        if self.retrieval.max_chars_per_chunk == 0 || self.retrieval.max_total_chars == 0 {
            return Err(AppError::Config(
                "Context caps must be greater than zero".to_string(),
            ));
        }

        if let Some(temperature) = self.provider.temperature {
            if !(0.0..=2.0).contains(&temperature) {
                return Err(AppError::Config(format!(
                    "Temperature must be between 0 and 2, got {}",
                    temperature
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.provider.name, "openai");
        assert_eq!(config.provider.chat_model, "gpt-5-nano");
        assert_eq!(config.provider.embedding_model, "text-embedding-3-small");
        assert_eq!(config.retrieval.top_k, 3);
        assert_eq!(config.retrieval.max_chars_per_chunk, 800);
        assert_eq!(config.retrieval.max_total_chars, 3000);
        assert!(!config.debug);
    }

    #[test]
    fn test_artifact_paths() {
        let config = AppConfig {
            workspace: PathBuf::from("/srv/sentra"),
            ..Default::default()
        };
        assert_eq!(
            config.index_path(),
            PathBuf::from("/srv/sentra/artifacts/index.bin")
        );
        assert_eq!(
            config.metadata_path(),
            PathBuf::from("/srv/sentra/artifacts/metadata.json")
        );
        assert_eq!(config.data_dir(), PathBuf::from("/srv/sentra/data"));
    }

    #[test]
    fn test_load_missing_workspace() {
        let result = AppConfig::load_with(Some(PathBuf::from("/definitely/not/here")), None, no_env);
        assert!(result.is_err());
    }

    #[test]
    fn test_load_merges_yaml_and_env() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join(CONFIG_FILE_NAME),
            r#"
provider:
  name: ollama
  chatModel: llama3.2
  embeddingModel: nomic-embed-text
  temperature: 0.2
paths:
  dataDir: corpus
retrieval:
  topK: 5
  maxTotalChars: 1200
logging:
  level: warn
  color: false
  format: json
debug: true
"#,
        )
        .unwrap();

        let env: HashMap<&str, &str> = [("SENTRA_CHAT_MODEL", "mistral")].into_iter().collect();
        let config = AppConfig::load_with(Some(temp.path().to_path_buf()), None, |k| {
            env.get(k).map(|v| v.to_string())
        })
        .unwrap();

        assert_eq!(config.provider.name, "ollama");
        assert_eq!(config.provider.chat_model, "mistral");
        assert_eq!(config.provider.embedding_model, "nomic-embed-text");
        assert_eq!(config.provider.temperature, Some(0.2));
        assert_eq!(config.data_dir(), temp.path().join("corpus"));
        assert_eq!(config.retrieval.top_k, 5);
        assert_eq!(config.retrieval.max_chars_per_chunk, 800);
        assert_eq!(config.retrieval.max_total_chars, 1200);
        assert_eq!(config.log_level.as_deref(), Some("warn"));
        assert_eq!(config.log_format, LogFormat::Json);
        assert!(config.no_color);
        assert!(config.debug);
        assert_eq!(
            config.config_file,
            Some(temp.path().join(CONFIG_FILE_NAME))
        );
    }

    #[test]
    fn test_explicit_config_file_must_exist() {
        let temp = TempDir::new().unwrap();
        let result = AppConfig::load_with(
            Some(temp.path().to_path_buf()),
            Some(temp.path().join("missing.yaml")),
            no_env,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_with_overrides() {
        let config = AppConfig::default().with_overrides(ConfigOverrides {
            provider: Some("ollama".to_string()),
            chat_model: Some("llama3.2".to_string()),
            top_k: Some(7),
            verbose: true,
            debug: true,
            ..Default::default()
        });

        assert_eq!(config.provider.name, "ollama");
        assert_eq!(config.provider.chat_model, "llama3.2");
        assert_eq!(config.retrieval.top_k, 7);
        assert!(config.verbose);
        assert!(config.debug);
        assert_eq!(config.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_api_key_from_file() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("api_key.txt"), "sk-test\nignored\n").unwrap();

        let mut config = AppConfig {
            workspace: temp.path().to_path_buf(),
            ..Default::default()
        };
        config.provider.api_key_env = "SENTRA_TEST_UNSET_KEY_VAR".to_string();

        assert_eq!(config.resolve_api_key().unwrap(), Some("sk-test".to_string()));
    }

    #[test]
    fn test_empty_api_key_file_is_error() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("api_key.txt"), "\n").unwrap();

        let mut config = AppConfig {
            workspace: temp.path().to_path_buf(),
            ..Default::default()
        };
        config.provider.api_key_env = "SENTRA_TEST_UNSET_KEY_VAR".to_string();

        assert!(config.resolve_api_key().is_err());
    }

    #[test]
    fn test_explicit_api_key_wins() {
        let mut config = AppConfig::default();
        config.provider.api_key = Some("explicit".to_string());
        assert_eq!(config.resolve_api_key().unwrap(), Some("explicit".to_string()));
    }

    #[test]
    fn test_validate_unknown_provider() {
        let mut config = AppConfig::default();
        config.provider.name = "unknown".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_openai_requires_key() {
        let temp = TempDir::new().unwrap();
        let mut config = AppConfig {
            workspace: temp.path().to_path_buf(),
            ..Default::default()
        };
        config.provider.api_key_env = "SENTRA_TEST_UNSET_KEY_VAR".to_string();
        assert!(config.validate().is_err());

        config.provider.api_key = Some("sk-test".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_ollama_and_caps() {
        let mut config = AppConfig::default();
        config.provider.name = "ollama".to_string();
        assert!(config.validate().is_ok());

        config.retrieval.max_total_chars = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_temperature_range() {
        let mut config = AppConfig::default();
        config.provider.name = "ollama".to_string();
        assert!(config.provider.temperature.is_none());

        config.provider.temperature = Some(0.7);
        assert!(config.validate().is_ok());

        config.provider.temperature = Some(2.5);
        assert!(config.validate().is_err());
    }
}
