//! In-memory vector index with binary persistence.
//!
//! The index holds `(document, embedding)` entries of one shared dimension.
//! It is built or loaded once at startup and read-only afterwards; search is
//! a full linear scan ranked by cosine similarity.

use crate::error::{BuildError, IoError, SearchError};
use crate::similarity::cosine_similarity;
use crate::storage;
use crate::types::{
    BuildReport, Document, EmbeddingVector, IndexEntry, IndexPaths, IndexStats, ScoredDocument,
    SkipReason, SkippedEntry,
};
use chrono::{DateTime, Utc};
use std::collections::HashSet;

/// Dense vector index over documents.
#[derive(Debug, Clone)]
pub struct VectorIndex {
    paths: IndexPaths,
    entries: Vec<IndexEntry>,
    dimension: usize,
}

impl VectorIndex {
    /// Create an empty index persisted at `paths`.
    pub fn new(paths: IndexPaths) -> Self {
        Self {
            paths,
            entries: Vec::new(),
            dimension: 0,
        }
    }

    pub fn paths(&self) -> &IndexPaths {
        &self.paths
    }

    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Shared embedding dimension, `0` while empty.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Replace the contents with `documents` paired to `embeddings`.
    ///
    /// The first non-empty embedding fixes the dimension. Pairs whose
    /// embedding is empty or of another length are skipped and reported.
    /// On error the current contents are left untouched.
    pub fn build(
        &mut self,
        documents: Vec<Document>,
        embeddings: Vec<EmbeddingVector>,
    ) -> Result<BuildReport, BuildError> {
        if documents.len() != embeddings.len() {
            return Err(BuildError::SizeMismatch {
                documents: documents.len(),
                embeddings: embeddings.len(),
            });
        }

        let dimension = embeddings
            .iter()
            .map(Vec::len)
            .find(|&len| len > 0)
            .ok_or(BuildError::AllEmpty)?;

        let mut entries = Vec::with_capacity(documents.len());
        let mut skipped = Vec::new();

        for (document, embedding) in documents.into_iter().zip(embeddings) {
            let reason = if embedding.is_empty() {
                Some(SkipReason::EmptyEmbedding)
            } else if embedding.len() != dimension {
                Some(SkipReason::DimensionMismatch {
                    expected: dimension,
                    actual: embedding.len(),
                })
            } else {
                None
            };

            match reason {
                Some(reason) => {
                    tracing::warn!("Skipping {} ({})", document.id, reason);
                    skipped.push(SkippedEntry {
                        id: document.id,
                        reason,
                    });
                }
                None => entries.push(IndexEntry {
                    document,
                    embedding,
                }),
            }
        }

        if entries.is_empty() {
            return Err(BuildError::NoValidEntries { dimension });
        }

        tracing::info!(
            "Built index with {} entries of dimension {} ({} skipped)",
            entries.len(),
            dimension,
            skipped.len()
        );

        let report = BuildReport {
            dimension,
            kept: entries.len(),
            skipped,
        };
        self.entries = entries;
        self.dimension = dimension;

        Ok(report)
    }

    /// Persist the vector file, then the metadata file.
    pub fn save_to_disk(&self) -> Result<(), IoError> {
        if self.entries.is_empty() {
            return Err(IoError::NothingToSave);
        }

        let vectors = storage::encode_vectors(
            self.entries.iter().map(|e| e.embedding.as_slice()),
            self.entries.len(),
            self.dimension,
            &self.paths.vectors,
        )?;
        let metadata = storage::encode_metadata(
            self.entries.iter().map(|e| &e.document),
            &self.paths.metadata,
        )?;

        storage::write_atomic(&self.paths.vectors, &vectors)?;
        storage::write_atomic(&self.paths.metadata, &metadata)?;

        tracing::info!(
            "Saved {} entries to {:?} and {:?}",
            self.entries.len(),
            self.paths.vectors,
            self.paths.metadata
        );
        Ok(())
    }

    /// Replace the contents with the persisted index.
    ///
    /// On failure the index is left empty.
    pub fn load_from_disk(&mut self) -> Result<(), IoError> {
        self.entries.clear();
        self.dimension = 0;

        let vector_bytes = storage::read_file(&self.paths.vectors)?;
        let (dimension, vectors) = storage::decode_vectors(&vector_bytes, &self.paths.vectors)?;

        let metadata_bytes = storage::read_file(&self.paths.metadata)?;
        let documents = storage::decode_metadata(&metadata_bytes, &self.paths.metadata)?;

        if documents.len() != vectors.len() {
            return Err(IoError::CountMismatch {
                metadata: documents.len(),
                vectors: vectors.len(),
            });
        }

        self.entries = documents
            .into_iter()
            .zip(vectors)
            .map(|(document, embedding)| IndexEntry {
                document,
                embedding,
            })
            .collect();
        self.dimension = dimension;

        tracing::info!(
            "Loaded {} entries of dimension {} from {:?}",
            self.entries.len(),
            self.dimension,
            self.paths.vectors
        );
        Ok(())
    }

    /// Whether both artifacts exist. Contents are not checked.
    pub fn exists_on_disk(&self) -> bool {
        self.paths.vectors.is_file() && self.paths.metadata.is_file()
    }

    /// Delete both artifacts. Returns whether anything was removed.
    pub fn remove_from_disk(&self) -> Result<bool, IoError> {
        let mut removed = false;
        for path in [&self.paths.vectors, &self.paths.metadata] {
            match std::fs::remove_file(path) {
                Ok(()) => {
                    tracing::info!("Removed {:?}", path);
                    removed = true;
                }
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(source) => {
                    return Err(IoError::WriteFailed {
                        path: path.clone(),
                        source,
                    })
                }
            }
        }
        Ok(removed)
    }

    /// The `top_k` documents most similar to `query`, best first.
    pub fn search(&self, query: &[f32], top_k: usize) -> Result<Vec<Document>, SearchError> {
        Ok(self
            .search_scored(query, top_k)?
            .into_iter()
            .map(|hit| hit.document)
            .collect())
    }

    /// Like [`search`](Self::search), keeping the similarity scores.
    ///
    /// `top_k` is clamped to the number of entries. Equal scores keep
    /// entry order.
    pub fn search_scored(
        &self,
        query: &[f32],
        top_k: usize,
    ) -> Result<Vec<ScoredDocument>, SearchError> {
        if self.entries.is_empty() {
            return Err(SearchError::EmptyIndex);
        }

        let mut scored: Vec<(usize, f64)> = self
            .entries
            .iter()
            .enumerate()
            .map(|(i, entry)| (i, cosine_similarity(query, &entry.embedding)))
            .collect();

        // Stable sort: ties stay in entry order
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        scored.truncate(top_k.min(self.entries.len()));

        Ok(scored
            .into_iter()
            .map(|(i, score)| ScoredDocument {
                document: self.entries[i].document.clone(),
                score,
            })
            .collect())
    }

    /// Entry counts plus the size and age of the persisted artifacts.
    pub fn stats(&self) -> IndexStats {
        let size = |path: &std::path::Path| std::fs::metadata(path).map(|m| m.len()).unwrap_or(0);
        let built_at = std::fs::metadata(&self.paths.metadata)
            .and_then(|m| m.modified())
            .ok()
            .map(DateTime::<Utc>::from);

        let sources: HashSet<&str> = self
            .entries
            .iter()
            .map(|e| e.document.source.as_str())
            .collect();

        IndexStats {
            entries: self.entries.len(),
            dimension: self.dimension,
            sources: sources.len(),
            vector_bytes: size(self.paths.vectors.as_path()),
            metadata_bytes: size(self.paths.metadata.as_path()),
            built_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn docs(n: usize) -> Vec<Document> {
        (0..n)
            .map(|i| Document::new(format!("doc-{}", i), "a.txt", format!("chunk {}", i)))
            .collect()
    }

    fn index_in(temp: &TempDir) -> VectorIndex {
        VectorIndex::new(IndexPaths::new(
            temp.path().join("artifacts/index.bin"),
            temp.path().join("artifacts/metadata.json"),
        ))
    }

    #[test]
    fn test_build_size_mismatch() {
        let temp = TempDir::new().unwrap();
        let mut index = index_in(&temp);
        let err = index.build(docs(2), vec![vec![1.0]]).unwrap_err();
        assert!(matches!(
            err,
            BuildError::SizeMismatch {
                documents: 2,
                embeddings: 1
            }
        ));
    }

    #[test]
    fn test_build_all_empty() {
        let temp = TempDir::new().unwrap();
        let mut index = index_in(&temp);
        let err = index.build(docs(2), vec![vec![], vec![]]).unwrap_err();
        assert!(matches!(err, BuildError::AllEmpty));
    }

    #[test]
    fn test_build_skips_empty_embeddings() {
        let temp = TempDir::new().unwrap();
        let mut index = index_in(&temp);
        let report = index
            .build(docs(3), vec![vec![], vec![1.0, 0.0], vec![0.0, 1.0]])
            .unwrap();

        assert_eq!(report.dimension, 2);
        assert_eq!(report.kept, 2);
        assert_eq!(
            report.skipped,
            vec![SkippedEntry {
                id: "doc-0".to_string(),
                reason: SkipReason::EmptyEmbedding
            }]
        );
        assert_eq!(index.entries()[0].document.id, "doc-1");
    }

    #[test]
    fn test_failed_build_keeps_previous_entries() {
        let temp = TempDir::new().unwrap();
        let mut index = index_in(&temp);
        index.build(docs(1), vec![vec![1.0, 2.0]]).unwrap();

        assert!(index.build(docs(2), vec![vec![1.0]]).is_err());
        assert_eq!(index.len(), 1);
        assert_eq!(index.dimension(), 2);
    }

    #[test]
    fn test_save_empty_index() {
        let temp = TempDir::new().unwrap();
        let index = index_in(&temp);
        assert!(matches!(index.save_to_disk(), Err(IoError::NothingToSave)));
        assert!(!index.exists_on_disk());
    }

    #[test]
    fn test_top_k_zero_returns_nothing() {
        let temp = TempDir::new().unwrap();
        let mut index = index_in(&temp);
        index.build(docs(2), vec![vec![1.0], vec![2.0]]).unwrap();
        assert!(index.search(&[1.0], 0).unwrap().is_empty());
    }

    #[test]
    fn test_remove_from_disk() {
        let temp = TempDir::new().unwrap();
        let mut index = index_in(&temp);
        index.build(docs(1), vec![vec![1.0]]).unwrap();
        index.save_to_disk().unwrap();
        assert!(index.exists_on_disk());

        assert!(index.remove_from_disk().unwrap());
        assert!(!index.exists_on_disk());
        assert!(!index.remove_from_disk().unwrap());
    }

    #[test]
    fn test_stats() {
        let temp = TempDir::new().unwrap();
        let mut index = index_in(&temp);
        let documents = vec![
            Document::new("doc-0", "a.txt", "x"),
            Document::new("doc-1", "a.txt", "y"),
            Document::new("doc-2", "b.txt", "z"),
        ];
        index
            .build(documents, vec![vec![1.0, 0.0], vec![0.0, 1.0], vec![1.0, 1.0]])
            .unwrap();

        let before = index.stats();
        assert_eq!(before.vector_bytes, 0);
        assert!(before.built_at.is_none());

        index.save_to_disk().unwrap();
        let stats = index.stats();
        assert_eq!(stats.entries, 3);
        assert_eq!(stats.dimension, 2);
        assert_eq!(stats.sources, 2);
        assert_eq!(stats.vector_bytes, 8 + 3 * 2 * 4);
        assert!(stats.metadata_bytes > 0);
        assert!(stats.built_at.is_some());
    }
}
