//! Integration tests across the index, coordinator and retrieval engine.

mod persistence;

use crate::embeddings::EmbeddingProvider;
use crate::ingest::DocumentSource;
use crate::rag::AnswerGenerator;
use crate::types::{Document, IndexPaths};
use crate::vector_index::VectorIndex;
use sentra_core::{AppError, AppResult};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tempfile::TempDir;

/// Index persisted under `<temp>/artifacts`.
pub(crate) fn index_in(temp: &TempDir) -> VectorIndex {
    VectorIndex::new(IndexPaths::new(
        temp.path().join("artifacts").join("index.bin"),
        temp.path().join("artifacts").join("metadata.json"),
    ))
}

/// Documents `doc-0..` from a single source.
pub(crate) fn documents(contents: &[&str]) -> Vec<Document> {
    contents
        .iter()
        .enumerate()
        .map(|(i, content)| Document::new(format!("doc-{}", i), "data/a.txt", *content))
        .collect()
}

/// Embedder returning fixed vectors per text and counting calls.
#[derive(Debug, Default)]
pub(crate) struct FixedEmbedder {
    vectors: HashMap<String, Vec<f32>>,
    failing: Option<String>,
    calls: AtomicUsize,
}

impl FixedEmbedder {
    pub(crate) fn new(pairs: &[(&str, Vec<f32>)]) -> Self {
        Self {
            vectors: pairs
                .iter()
                .map(|(text, vector)| (text.to_string(), vector.clone()))
                .collect(),
            ..Default::default()
        }
    }

    /// Fail when asked to embed `text`.
    pub(crate) fn failing_on(mut self, text: &str) -> Self {
        self.failing = Some(text.to_string());
        self
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl EmbeddingProvider for FixedEmbedder {
    fn provider_name(&self) -> &str {
        "fixed"
    }

    fn model_name(&self) -> &str {
        "fixed-test"
    }

    async fn embed(&self, text: &str) -> AppResult<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.as_deref() == Some(text) {
            return Err(AppError::Llm("embedding service unavailable".to_string()));
        }
        self.vectors
            .get(text)
            .cloned()
            .ok_or_else(|| AppError::Knowledge(format!("no vector for '{}'", text)))
    }
}

/// In-memory document source.
pub(crate) struct StaticSource(pub(crate) Vec<Document>);

impl DocumentSource for StaticSource {
    fn load_documents(&self) -> AppResult<Vec<Document>> {
        Ok(self.0.clone())
    }
}

/// Generator that records the context it receives.
#[derive(Default)]
pub(crate) struct RecordingGenerator {
    pub(crate) contexts: Mutex<Vec<Vec<String>>>,
    pub(crate) fail: bool,
}

#[async_trait::async_trait]
impl AnswerGenerator for RecordingGenerator {
    async fn complete(&self, question: &str, context: &[String]) -> AppResult<String> {
        if self.fail {
            return Err(AppError::Llm("model offline".to_string()));
        }
        self.contexts.lock().unwrap().push(context.to_vec());
        Ok(format!("answer to {}", question))
    }
}
