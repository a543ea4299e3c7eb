//! Prompt system for Sentra.
//!
//! This crate provides structured prompt management with:
//! - YAML-based prompt definitions with a built-in RAG answer prompt
//! - Handlebars template rendering

pub mod builder;
pub mod loader;
pub mod types;

// Re-export main types
pub use builder::build_prompt;
pub use loader::{builtin_prompt, load_prompt, RAG_ANSWER_PROMPT_ID};
pub use types::{BuiltPrompt, BuiltPromptMetadata, PromptDefinition};
