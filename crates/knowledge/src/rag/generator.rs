//! Answer generation from a question and its context.

use sentra_core::{AppError, AppResult};
use sentra_llm::{LlmClient, LlmRequest};
use sentra_prompt::{build_prompt, PromptDefinition};
use std::collections::HashMap;
use std::sync::Arc;

/// Follows every context chunk in the prompt.
pub const CHUNK_DELIMITER: &str = "\n\n---\n\n";

/// Produces an answer for a question given decorated context chunks.
#[async_trait::async_trait]
pub trait AnswerGenerator: Send + Sync {
    async fn complete(&self, question: &str, context: &[String]) -> AppResult<String>;
}

/// Join context chunks, each followed by [`CHUNK_DELIMITER`].
pub fn join_context(context: &[String]) -> String {
    context
        .iter()
        .map(|chunk| format!("{}{}", chunk, CHUNK_DELIMITER))
        .collect()
}

/// Renders the answer prompt and sends it to a chat model.
pub struct LlmAnswerGenerator {
    client: Arc<dyn LlmClient>,
    model: String,
    prompt: PromptDefinition,
    temperature: Option<f32>,
}

impl LlmAnswerGenerator {
    pub fn new(client: Arc<dyn LlmClient>, model: impl Into<String>, prompt: PromptDefinition) -> Self {
        Self {
            client,
            model: model.into(),
            prompt,
            temperature: None,
        }
    }

    /// Sampling temperature sent with every request; `None` keeps the model default.
    pub fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }
}

#[async_trait::async_trait]
impl AnswerGenerator for LlmAnswerGenerator {
    async fn complete(&self, question: &str, context: &[String]) -> AppResult<String> {
        let mut variables = HashMap::new();
        variables.insert("context".to_string(), join_context(context));
        variables.insert("question".to_string(), question.to_string());

        let built = build_prompt(&self.prompt, variables)?;

        let mut request = LlmRequest::new(built.user, &self.model);
        if let Some(system) = built.system {
            request = request.with_system(system);
        }
        if let Some(temperature) = self.temperature {
            request = request.with_temperature(temperature);
        }

        tracing::debug!(
            "Requesting answer from {} ({} context chunks)",
            self.client.provider_name(),
            context.len()
        );

        let response = self.client.complete(&request).await?;
        tracing::debug!(
            "Answer used {} tokens",
            response.usage.total_tokens
        );

        Ok(response.content)
    }
}

/// Offline generator that quotes the best-ranked chunk.
///
/// Used with the hashing provider, which has no chat model.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExtractiveAnswerGenerator;

#[async_trait::async_trait]
impl AnswerGenerator for ExtractiveAnswerGenerator {
    async fn complete(&self, _question: &str, context: &[String]) -> AppResult<String> {
        let best = context
            .first()
            .ok_or_else(|| AppError::Knowledge("No context to answer from".to_string()))?;
        Ok(format!("Most relevant passage:\n{}", best))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sentra_llm::{LlmResponse, LlmUsage};
    use sentra_prompt::{builtin_prompt, RAG_ANSWER_PROMPT_ID};
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingClient {
        requests: Mutex<Vec<LlmRequest>>,
    }

    #[async_trait::async_trait]
    impl LlmClient for RecordingClient {
        fn provider_name(&self) -> &str {
            "recording"
        }

        async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse> {
            self.requests.lock().unwrap().push(request.clone());
            Ok(LlmResponse {
                content: "Cats are mammals.".to_string(),
                model: request.model.clone(),
                usage: LlmUsage::new(1, 1),
            })
        }
    }

    #[test]
    fn test_join_context() {
        let joined = join_context(&["[a]\nx".to_string(), "[b]\ny".to_string()]);
        assert_eq!(joined, "[a]\nx\n\n---\n\n[b]\ny\n\n---\n\n");
        assert_eq!(join_context(&[]), "");
    }

    #[tokio::test]
    async fn test_llm_generator_renders_prompt() {
        let client = Arc::new(RecordingClient::default());
        let generator = LlmAnswerGenerator::new(
            client.clone(),
            "gpt-5-nano",
            builtin_prompt(RAG_ANSWER_PROMPT_ID).unwrap(),
        );

        let answer = generator
            .complete("Are cats mammals?", &["[a.txt]\ncats are mammals".to_string()])
            .await
            .unwrap();
        assert_eq!(answer, "Cats are mammals.");

        let requests = client.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].model, "gpt-5-nano");
        assert_eq!(requests[0].temperature, None);
        assert_eq!(requests[0].system.as_deref(), Some("You are a helpful assistant."));
        assert!(requests[0]
            .prompt
            .contains("Context:\n[a.txt]\ncats are mammals\n\n---\n\n\nQuestion:\nAre cats mammals?"));
    }

    #[tokio::test]
    async fn test_llm_generator_sends_temperature() {
        let client = Arc::new(RecordingClient::default());
        let generator = LlmAnswerGenerator::new(
            client.clone(),
            "gpt-5-nano",
            builtin_prompt(RAG_ANSWER_PROMPT_ID).unwrap(),
        )
        .with_temperature(Some(0.2));

        generator
            .complete("Are cats mammals?", &["[a.txt]\ncats are mammals".to_string()])
            .await
            .unwrap();

        let requests = client.requests.lock().unwrap();
        assert_eq!(requests[0].temperature, Some(0.2));
    }

    #[tokio::test]
    async fn test_extractive_generator() {
        let answer = ExtractiveAnswerGenerator
            .complete("q", &["[a.txt]\ncats".to_string(), "[b.txt]\nsky".to_string()])
            .await
            .unwrap();
        assert_eq!(answer, "Most relevant passage:\n[a.txt]\ncats");

        assert!(ExtractiveAnswerGenerator.complete("q", &[]).await.is_err());
    }
}
