//! Vector index and retrieval engine.
//!
//! Builds a dense index over text chunks, persists it as a binary vector file
//! plus JSON metadata, ranks chunks by cosine similarity and assembles a
//! bounded context for answer generation.

pub mod coordinator;
pub mod embeddings;
pub mod error;
pub mod ingest;
pub mod rag;
pub mod similarity;
mod storage;
pub mod types;
pub mod vector_index;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use coordinator::{IndexBuildCoordinator, IndexOrigin};
pub use embeddings::{create_provider, EmbeddingConfig, EmbeddingProvider, HashingProvider};
pub use error::{BuildError, EngineError, IndexError, IoError, SearchError};
pub use ingest::{DirectoryIngestor, DocumentSource};
pub use rag::{
    AnswerGenerator, AssembledContext, ContextBudget, ExtractiveAnswerGenerator,
    LlmAnswerGenerator, RagAnswer, RetrievalEngine, RetrievalOptions,
};
pub use similarity::cosine_similarity;
pub use types::{
    approx_eq, BuildReport, Document, EmbeddingVector, IndexEntry, IndexPaths, IndexStats,
    ScoredDocument, SkipReason, SkippedEntry,
};
pub use vector_index::VectorIndex;
