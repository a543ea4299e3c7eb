//! Retrieval engine: embed, search, assemble, generate.

use crate::embeddings::EmbeddingProvider;
use crate::error::EngineError;
use crate::rag::context::{assemble_context, ContextBudget};
use crate::rag::generator::AnswerGenerator;
use crate::rag::types::{AssembledContext, RagAnswer};
use crate::vector_index::VectorIndex;
use sentra_core::config::RetrievalSettings;
use std::sync::Arc;

/// Retrieval parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetrievalOptions {
    /// Number of documents retrieved per question
    pub top_k: usize,

    /// Context byte limits
    pub budget: ContextBudget,
}

impl Default for RetrievalOptions {
    fn default() -> Self {
        Self {
            top_k: 3,
            budget: ContextBudget::default(),
        }
    }
}

impl From<&RetrievalSettings> for RetrievalOptions {
    fn from(settings: &RetrievalSettings) -> Self {
        Self {
            top_k: settings.top_k,
            budget: ContextBudget::from(settings),
        }
    }
}

/// Answers questions against a read-only index.
///
/// Each call embeds the question, searches, assembles the bounded context
/// and delegates to the generator, strictly in that order.
pub struct RetrievalEngine {
    index: Arc<VectorIndex>,
    embedder: Arc<dyn EmbeddingProvider>,
    generator: Arc<dyn AnswerGenerator>,
    options: RetrievalOptions,
    debug: bool,
}

impl RetrievalEngine {
    pub fn new(
        index: Arc<VectorIndex>,
        embedder: Arc<dyn EmbeddingProvider>,
        generator: Arc<dyn AnswerGenerator>,
        options: RetrievalOptions,
    ) -> Self {
        Self {
            index,
            embedder,
            generator,
            options,
            debug: false,
        }
    }

    /// Log the assembled context size at info level.
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn options(&self) -> RetrievalOptions {
        self.options
    }

    pub fn index(&self) -> &VectorIndex {
        &self.index
    }

    /// Answer a question.
    pub async fn answer(&self, question: &str) -> Result<String, EngineError> {
        Ok(self.answer_with_sources(question).await?.answer)
    }

    /// Answer a question and report the context that was used.
    pub async fn answer_with_sources(&self, question: &str) -> Result<RagAnswer, EngineError> {
        let context = self.retrieve(question).await?;

        let answer = self
            .generator
            .complete(question, &context.decorated_chunks())
            .await
            .map_err(EngineError::GenerationFailed)?;

        Ok(RagAnswer {
            answer,
            sources: context.sources(),
            context_chars: context.total_chars,
            chunks_used: context.chunks.len(),
        })
    }

    /// Embed the question, search and assemble the context without
    /// generating an answer.
    pub async fn retrieve(&self, question: &str) -> Result<AssembledContext, EngineError> {
        let query = self
            .embedder
            .embed(question)
            .await
            .map_err(EngineError::EmbeddingFailed)?;

        let hits = self.index.search_scored(&query, self.options.top_k)?;
        tracing::debug!(
            "Retrieved {} documents, scores: {:?}",
            hits.len(),
            hits.iter().map(|h| h.score).collect::<Vec<_>>()
        );

        let documents: Vec<_> = hits.into_iter().map(|hit| hit.document).collect();
        let context = assemble_context(&documents, self.options.budget);

        if self.debug {
            tracing::info!(
                "Context: {} chunks, {} chars",
                context.chunks.len(),
                context.total_chars
            );
        }

        Ok(context)
    }
}
