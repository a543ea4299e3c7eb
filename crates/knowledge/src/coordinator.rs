//! Build-or-load orchestration for the vector index.

use crate::embeddings::EmbeddingProvider;
use crate::error::{BuildError, IndexError};
use crate::ingest::DocumentSource;
use crate::types::BuildReport;
use crate::vector_index::VectorIndex;
use std::sync::Arc;
use std::time::Instant;

/// How the index came to be in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexOrigin {
    /// Read from the persisted artifacts
    Loaded,
    /// Embedded from source documents and persisted
    Built(BuildReport),
}

/// Decides between loading the persisted index and building a new one.
pub struct IndexBuildCoordinator {
    source: Arc<dyn DocumentSource>,
    embedder: Arc<dyn EmbeddingProvider>,
}

impl IndexBuildCoordinator {
    pub fn new(source: Arc<dyn DocumentSource>, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        Self { source, embedder }
    }

    /// Load the index when both artifacts exist, otherwise build and save it.
    ///
    /// Existing artifacts are trusted as-is; they are never compared with
    /// the source documents.
    pub async fn build_or_load(&self, index: &mut VectorIndex) -> Result<IndexOrigin, IndexError> {
        if index.exists_on_disk() {
            tracing::info!("Loading index from {:?}", index.paths().vectors);
            index.load_from_disk()?;
            return Ok(IndexOrigin::Loaded);
        }

        let report = self.rebuild(index).await?;
        Ok(IndexOrigin::Built(report))
    }

    /// Embed every document, build the index and persist it.
    pub async fn rebuild(&self, index: &mut VectorIndex) -> Result<BuildReport, IndexError> {
        let start = Instant::now();

        let documents = self.source.load_documents().map_err(IndexError::Ingest)?;
        if documents.is_empty() {
            return Err(BuildError::NoDocuments.into());
        }

        tracing::info!(
            "Embedding {} documents using provider '{}' (model: {})",
            documents.len(),
            self.embedder.provider_name(),
            self.embedder.model_name()
        );

        let mut embeddings = Vec::with_capacity(documents.len());
        for document in &documents {
            let embedding =
                self.embedder
                    .embed(&document.content)
                    .await
                    .map_err(|source| IndexError::Embedding {
                        id: document.id.clone(),
                        source,
                    })?;
            tracing::debug!("Embedded {} ({} dims)", document.id, embedding.len());
            embeddings.push(embedding);
        }

        let report = index.build(documents, embeddings)?;
        index.save_to_disk()?;

        tracing::info!(
            "Index built: {} entries, {} skipped in {:.2}s",
            report.kept,
            report.skipped.len(),
            start.elapsed().as_secs_f64()
        );

        Ok(report)
    }
}
