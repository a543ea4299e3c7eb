//! Command handlers for the Sentra CLI.
//!
//! Every command shares the same bootstrap: one HTTP transport, the
//! configured embedding provider, and (for question answering) a generator
//! plus the built or loaded index.

pub mod ask;
pub mod chat;
pub mod index;

// Re-export command types for convenience
pub use ask::AskCommand;
pub use chat::ChatCommand;
pub use index::IndexCommand;

use sentra_core::config::AppConfig;
use sentra_core::{AppError, AppResult};
use sentra_knowledge::{
    create_provider, AnswerGenerator, DirectoryIngestor, EmbeddingConfig, EmbeddingProvider,
    ExtractiveAnswerGenerator, IndexBuildCoordinator, IndexOrigin, IndexPaths,
    LlmAnswerGenerator, RetrievalEngine, RetrievalOptions, VectorIndex,
};
use sentra_llm::{create_client, HttpTransport, ProviderType, ReqwestTransport};
use sentra_prompt::{load_prompt, RAG_ANSWER_PROMPT_ID};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

/// Shared HTTP transport honoring the configured timeout.
pub(crate) fn transport(config: &AppConfig) -> AppResult<Arc<dyn HttpTransport>> {
    let timeout = config.provider.timeout_secs.map(Duration::from_secs);
    Ok(Arc::new(ReqwestTransport::new(timeout)?))
}

pub(crate) fn embedder(
    config: &AppConfig,
    transport: Arc<dyn HttpTransport>,
) -> AppResult<Arc<dyn EmbeddingProvider>> {
    let embedding_config = EmbeddingConfig::from_app_config(config)?;
    create_provider(&embedding_config, transport)
}

/// Chat-backed generator, or the extractive one for providers without a
/// chat model.
pub(crate) fn generator(
    config: &AppConfig,
    transport: Arc<dyn HttpTransport>,
) -> AppResult<Arc<dyn AnswerGenerator>> {
    let provider = ProviderType::parse(&config.provider.name).ok_or_else(|| {
        AppError::Config(format!("Unknown provider: {}", config.provider.name))
    })?;

    if !provider.supports_chat() {
        tracing::info!(
            "Provider '{}' has no chat model, answering with the best passage",
            provider
        );
        return Ok(Arc::new(ExtractiveAnswerGenerator));
    }

    let api_key = config.resolve_api_key()?;
    let client = create_client(
        provider.as_str(),
        config.provider.base_url.as_deref(),
        api_key.as_deref(),
        transport,
        config.debug,
    )
    .map_err(AppError::Config)?;

    let prompt = load_prompt(&config.workspace, RAG_ANSWER_PROMPT_ID)?;
    tracing::debug!("Loaded prompt definition: {}", prompt.id);

    Ok(Arc::new(
        LlmAnswerGenerator::new(client, &config.provider.chat_model, prompt)
            .with_temperature(config.provider.temperature),
    ))
}

/// Build the index from the data directory, or load it when persisted.
pub(crate) async fn prepare_index(
    config: &AppConfig,
    embedder: Arc<dyn EmbeddingProvider>,
    force: bool,
) -> AppResult<(VectorIndex, IndexOrigin)> {
    let mut index = VectorIndex::new(IndexPaths::from_config(config));
    let coordinator =
        IndexBuildCoordinator::new(Arc::new(DirectoryIngestor::new(config.data_dir())), embedder);

    let origin = if force {
        IndexOrigin::Built(coordinator.rebuild(&mut index).await?)
    } else {
        coordinator.build_or_load(&mut index).await?
    };

    Ok((index, origin))
}

/// Validate the configuration, prepare the index and wire the engine.
pub(crate) async fn open_engine(config: &AppConfig) -> AppResult<RetrievalEngine> {
    config.validate()?;

    let transport = transport(config)?;
    let embedder = embedder(config, transport.clone())?;
    let generator = generator(config, transport)?;
    let (index, _) = prepare_index(config, embedder.clone(), false).await?;

    Ok(
        RetrievalEngine::new(
            Arc::new(index),
            embedder,
            generator,
            RetrievalOptions::from(&config.retrieval),
        )
        .with_debug(config.debug),
    )
}

/// Print a value as pretty JSON on stdout.
pub(crate) fn print_json<T: Serialize>(value: &T) -> AppResult<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}

#[cfg(test)]
pub(crate) mod test_support {
    use sentra_core::config::AppConfig;
    use std::fs;
    use tempfile::TempDir;

    /// Offline workspace with a small data directory.
    pub(crate) fn hashing_workspace() -> (TempDir, AppConfig) {
        let temp = TempDir::new().unwrap();
        let data = temp.path().join("data");
        fs::create_dir(&data).unwrap();
        fs::write(
            data.join("animals.txt"),
            "Cats are small domesticated mammals.\n\nDogs are loyal companions.",
        )
        .unwrap();
        fs::write(data.join("weather.txt"), "The sky is blue on a clear day.").unwrap();

        let mut config = AppConfig {
            workspace: temp.path().to_path_buf(),
            ..Default::default()
        };
        config.provider.name = "hashing".to_string();
        (temp, config)
    }
}
