//! Error types for index building, persistence, search and retrieval.

use sentra_core::AppError;
use std::path::PathBuf;

/// Errors raised by [`crate::VectorIndex::build`] and the build coordinator.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("{documents} documents but {embeddings} embeddings")]
    SizeMismatch { documents: usize, embeddings: usize },

    #[error("every embedding is empty")]
    AllEmpty,

    #[error("no embedding matches the reference dimension {dimension}")]
    NoValidEntries { dimension: usize },

    #[error("no documents found in data directory")]
    NoDocuments,
}

/// Errors raised while saving or loading the persisted index.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("index is empty, nothing to save")]
    NothingToSave,

    #[error("metadata holds {metadata} records but the vector file holds {vectors}")]
    CountMismatch { metadata: usize, vectors: usize },

    #[error("failed to open {path:?}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path:?}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("corrupt index file {path:?}: {reason}")]
    Corrupt { path: PathBuf, reason: String },
}

/// Errors raised by [`crate::VectorIndex::search`].
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("index is empty")]
    EmptyIndex,
}

/// Errors raised while answering a question.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("failed to embed question: {0}")]
    EmbeddingFailed(#[source] AppError),

    #[error("search failed: {0}")]
    Search(#[from] SearchError),

    #[error("failed to generate answer: {0}")]
    GenerationFailed(#[source] AppError),
}

/// Errors raised by the build-or-load sequence.
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    #[error("index build failed: {0}")]
    Build(#[from] BuildError),

    #[error("index persistence failed: {0}")]
    Io(#[from] IoError),

    #[error("failed to embed {id}: {source}")]
    Embedding { id: String, source: AppError },

    #[error("failed to load documents: {0}")]
    Ingest(#[source] AppError),
}

macro_rules! into_app_error {
    ($($ty:ty),+) => {
        $(
            impl From<$ty> for AppError {
                fn from(err: $ty) -> Self {
                    AppError::Knowledge(err.to_string())
                }
            }
        )+
    };
}

into_app_error!(BuildError, IoError, SearchError, EngineError, IndexError);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = BuildError::SizeMismatch {
            documents: 3,
            embeddings: 2,
        };
        assert_eq!(err.to_string(), "3 documents but 2 embeddings");

        let err = IoError::CountMismatch {
            metadata: 4,
            vectors: 5,
        };
        assert!(err.to_string().contains("4 records"));
    }

    #[test]
    fn test_into_app_error() {
        let app: AppError = SearchError::EmptyIndex.into();
        assert_eq!(app.to_string(), "Knowledge error: index is empty");
    }

    #[test]
    fn test_engine_error_wraps_search() {
        let err: EngineError = SearchError::EmptyIndex.into();
        assert!(matches!(err, EngineError::Search(SearchError::EmptyIndex)));
    }
}
