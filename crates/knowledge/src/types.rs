//! Knowledge system type definitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Embedding vector; every entry of one index shares the same length.
pub type EmbeddingVector = Vec<f32>;

/// Default tolerance for [`approx_eq`].
pub const DEFAULT_TOLERANCE: f32 = 1e-6;

/// Compare two embeddings component-wise within `tolerance`.
///
/// Vectors of different lengths are never equal.
pub fn approx_eq(a: &[f32], b: &[f32], tolerance: f32) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| (x - y).abs() <= tolerance)
}

/// A chunk of source text; the unit of retrieval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Unique chunk identifier (e.g. "doc-0")
    pub id: String,

    /// Path or name of the file the chunk came from
    pub source: String,

    /// Raw chunk text
    pub content: String,
}

impl Document {
    pub fn new(
        id: impl Into<String>,
        source: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            content: content.into(),
        }
    }
}

/// One document paired with its embedding.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexEntry {
    pub document: Document,
    pub embedding: EmbeddingVector,
}

/// A search hit with its cosine similarity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredDocument {
    pub document: Document,
    pub score: f64,
}

/// Why a document was left out of a build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SkipReason {
    /// The embedding had no components
    EmptyEmbedding,
    /// The embedding length differed from the reference dimension
    DimensionMismatch { expected: usize, actual: usize },
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyEmbedding => write!(f, "empty embedding"),
            Self::DimensionMismatch { expected, actual } => {
                write!(f, "dimension {} (expected {})", actual, expected)
            }
        }
    }
}

/// A document excluded from a build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedEntry {
    pub id: String,
    pub reason: SkipReason,
}

/// Outcome of a successful build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildReport {
    /// Reference dimension of the index
    pub dimension: usize,

    /// Number of entries kept
    pub kept: usize,

    /// Entries excluded from the index
    pub skipped: Vec<SkippedEntry>,
}

/// Locations of the two persisted artifacts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexPaths {
    /// Binary vector file
    pub vectors: PathBuf,

    /// JSON metadata file
    pub metadata: PathBuf,
}

impl IndexPaths {
    pub fn new(vectors: impl Into<PathBuf>, metadata: impl Into<PathBuf>) -> Self {
        Self {
            vectors: vectors.into(),
            metadata: metadata.into(),
        }
    }

    /// Artifact paths configured for a workspace.
    pub fn from_config(config: &sentra_core::AppConfig) -> Self {
        Self::new(config.index_path(), config.metadata_path())
    }
}

/// Statistics about an index and its persisted artifacts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexStats {
    /// Number of entries
    pub entries: usize,

    /// Embedding dimension
    pub dimension: usize,

    /// Number of distinct sources
    pub sources: usize,

    /// Size of the binary vector file in bytes
    pub vector_bytes: u64,

    /// Size of the metadata file in bytes
    pub metadata_bytes: u64,

    /// Last modification time of the metadata file
    pub built_at: Option<DateTime<Utc>>,
}
