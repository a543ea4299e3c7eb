//! RAG response types.

use serde::{Deserialize, Serialize};

/// One retrieved chunk as it appears in the context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextChunk {
    /// Source of the chunk, shown in the header line
    pub source: String,

    /// Chunk text, ending in the truncation marker when cut
    pub content: String,

    /// Whether `content` was shortened
    pub truncated: bool,
}

impl ContextChunk {
    /// Header line prepended to the content.
    pub fn header(&self) -> String {
        format!("[{}]\n", self.source)
    }

    /// Header plus content, as sent to the model.
    pub fn decorated(&self) -> String {
        format!("{}{}", self.header(), self.content)
    }

    /// Byte length of [`decorated`](Self::decorated).
    pub fn decorated_len(&self) -> usize {
        self.source.len() + "[]\n".len() + self.content.len()
    }
}

/// Context assembled for one question.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssembledContext {
    /// Included chunks in ranked order
    pub chunks: Vec<ContextChunk>,

    /// Sum of the decorated chunk lengths in bytes
    pub total_chars: usize,
}

impl AssembledContext {
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Decorated chunks in ranked order.
    pub fn decorated_chunks(&self) -> Vec<String> {
        self.chunks.iter().map(ContextChunk::decorated).collect()
    }

    /// Distinct sources in ranked order.
    pub fn sources(&self) -> Vec<String> {
        let mut sources: Vec<String> = Vec::new();
        for chunk in &self.chunks {
            if !sources.contains(&chunk.source) {
                sources.push(chunk.source.clone());
            }
        }
        sources
    }
}

/// Answer produced by the retrieval engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RagAnswer {
    /// Generated answer text
    pub answer: String,

    /// Distinct sources of the context, best first
    pub sources: Vec<String>,

    /// Decorated context size in bytes
    pub context_chars: usize,

    /// Number of chunks in the context
    pub chunks_used: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(source: &str, content: &str) -> ContextChunk {
        ContextChunk {
            source: source.to_string(),
            content: content.to_string(),
            truncated: false,
        }
    }

    #[test]
    fn test_decoration() {
        let c = chunk("data/a.txt", "cats are mammals");
        assert_eq!(c.decorated(), "[data/a.txt]\ncats are mammals");
        assert_eq!(c.decorated_len(), c.decorated().len());
    }

    #[test]
    fn test_decorated_len_counts_bytes() {
        let c = chunk("données/été.txt", "café crème");
        assert_eq!(c.decorated_len(), c.decorated().len());
        assert_eq!(c.decorated_len(), "[données/été.txt]\ncafé crème".len());
    }

    #[test]
    fn test_sources_deduplicated_in_order() {
        let context = AssembledContext {
            chunks: vec![chunk("b.txt", "1"), chunk("a.txt", "2"), chunk("b.txt", "3")],
            total_chars: 0,
        };
        assert_eq!(context.sources(), vec!["b.txt", "a.txt"]);
    }

    #[test]
    fn test_answer_serialization() {
        let answer = RagAnswer {
            answer: "Yes.".to_string(),
            sources: vec!["a.txt".to_string()],
            context_chars: 20,
            chunks_used: 1,
        };
        let json = serde_json::to_value(&answer).unwrap();
        assert_eq!(json["chunks_used"], 1);
        assert_eq!(json["sources"][0], "a.txt");
    }
}
