//! RAG (Retrieval-Augmented Generation) answering.
//!
//! Retrieves the chunks closest to a question, packs them into a bounded
//! context and hands both to a generator.

pub mod context;
pub mod engine;
pub mod generator;
pub mod types;

pub use context::{assemble_context, ContextBudget, TRUNCATION_MARKER};
pub use engine::{RetrievalEngine, RetrievalOptions};
pub use generator::{AnswerGenerator, ExtractiveAnswerGenerator, LlmAnswerGenerator};
pub use types::{AssembledContext, ContextChunk, RagAnswer};
