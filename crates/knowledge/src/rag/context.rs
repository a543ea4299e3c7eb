//! Bounded context assembly.
//!
//! Retrieved documents are decorated with a `[source]` header and packed in
//! ranked order under two byte limits: one per chunk and one for the whole
//! context. Headers count toward the total.

use crate::rag::types::{AssembledContext, ContextChunk};
use crate::types::Document;
use sentra_core::config::RetrievalSettings;

/// Appended to content that was cut.
pub const TRUNCATION_MARKER: &str = "...";

/// Byte limits for the assembled context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextBudget {
    /// Cap on the raw content of one chunk
    pub max_chars_per_chunk: usize,

    /// Cap on the sum of decorated chunks
    pub max_total_chars: usize,
}

impl Default for ContextBudget {
    fn default() -> Self {
        Self {
            max_chars_per_chunk: 800,
            max_total_chars: 3000,
        }
    }
}

impl From<&RetrievalSettings> for ContextBudget {
    fn from(settings: &RetrievalSettings) -> Self {
        Self {
            max_chars_per_chunk: settings.max_chars_per_chunk,
            max_total_chars: settings.max_total_chars,
        }
    }
}

/// Pack `documents` (best first) into a context that respects `budget`.
///
/// A chunk that fits the remaining budget exactly is kept whole. The first
/// chunk that does not fit is cut so header, content and marker fill the
/// remaining budget, and assembly stops there. When the remaining budget
/// cannot hold the header, the marker and at least one character, assembly
/// stops without it.
pub fn assemble_context(documents: &[Document], budget: ContextBudget) -> AssembledContext {
    let mut context = AssembledContext::default();

    for document in documents {
        if context.total_chars >= budget.max_total_chars {
            break;
        }
        let remaining = budget.max_total_chars - context.total_chars;

        let (content, truncated) = cap_content(&document.content, budget.max_chars_per_chunk);
        let mut chunk = ContextChunk {
            source: document.source.clone(),
            content,
            truncated,
        };

        if chunk.decorated_len() <= remaining {
            context.total_chars += chunk.decorated_len();
            context.chunks.push(chunk);
            continue;
        }

        let overhead = chunk.header().len() + TRUNCATION_MARKER.len();
        if overhead >= remaining {
            tracing::debug!("No room left for {} in context", document.id);
            break;
        }

        let cut = floor_char_boundary(&document.content, remaining - overhead);
        if cut == 0 {
            break;
        }

        chunk.content = format!("{}{}", &document.content[..cut], TRUNCATION_MARKER);
        chunk.truncated = true;
        context.total_chars += chunk.decorated_len();
        context.chunks.push(chunk);
        break;
    }

    context
}

fn cap_content(content: &str, max_chars: usize) -> (String, bool) {
    if content.len() <= max_chars {
        return (content.to_string(), false);
    }
    let cut = floor_char_boundary(content, max_chars);
    (format!("{}{}", &content[..cut], TRUNCATION_MARKER), true)
}

/// Largest char boundary of `s` at or below `index`.
fn floor_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        return s.len();
    }
    let mut i = index;
    while !s.is_char_boundary(i) {
        i -= 1;
    }
    i
}
