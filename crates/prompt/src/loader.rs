//! Prompt loader for YAML prompt definitions.

use crate::types::PromptDefinition;
use sentra_core::{AppError, AppResult};
use std::path::Path;

/// Identifier of the built-in retrieval-augmented answer prompt.
pub const RAG_ANSWER_PROMPT_ID: &str = "rag.answer";

const RAG_ANSWER_SYSTEM: &str = "You are a helpful assistant.";

const RAG_ANSWER_TEMPLATE: &str = "You are SentraAI, a retrieval-augmented assistant. \
Use the provided context when it is relevant to the user's question. \
If the question is generic small talk (like 'hello'), you may respond normally. \
If the user asks about specific facts not in the context, say you don't know.\n\n\
Context:\n{{context}}\nQuestion:\n{{question}}\n\nAnswer:";

/// Return a prompt compiled into the binary, if one exists for `prompt_id`.
pub fn builtin_prompt(prompt_id: &str) -> Option<PromptDefinition> {
    match prompt_id {
        RAG_ANSWER_PROMPT_ID => Some(PromptDefinition {
            id: RAG_ANSWER_PROMPT_ID.to_string(),
            title: "Retrieval-augmented answer".to_string(),
            api_version: "1.0".to_string(),
            created_by: "sentra".to_string(),
            system: Some(RAG_ANSWER_SYSTEM.to_string()),
            template: RAG_ANSWER_TEMPLATE.to_string(),
        }),
        _ => None,
    }
}

/// Load a prompt definition by ID.
///
/// Looks for `<id>.yml` in `.sentra/prompts/` under the workspace and falls
/// back to the built-in definition of the same ID.
///
/// # Example
/// ```no_run
/// use sentra_prompt::load_prompt;
/// use std::path::Path;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let prompt = load_prompt(Path::new("."), "rag.answer")?;
/// println!("Loaded prompt: {}", prompt.title);
/// # Ok(())
/// # }
/// ```
pub fn load_prompt(workspace_path: &Path, prompt_id: &str) -> AppResult<PromptDefinition> {
    let prompt_file = workspace_path
        .join(".sentra")
        .join("prompts")
        .join(format!("{}.yml", prompt_id));

    if !prompt_file.exists() {
        return builtin_prompt(prompt_id).ok_or_else(|| {
            AppError::Prompt(format!("Prompt file not found: {:?}", prompt_file))
        });
    }

    tracing::debug!("Loading prompt from: {:?}", prompt_file);

    let contents = std::fs::read_to_string(&prompt_file).map_err(|e| {
        AppError::Prompt(format!(
            "Failed to read prompt file {:?}: {}",
            prompt_file, e
        ))
    })?;

    let definition: PromptDefinition = serde_yaml::from_str(&contents).map_err(|e| {
        AppError::Prompt(format!(
            "Failed to parse prompt YAML {:?}: {}",
            prompt_file, e
        ))
    })?;

    validate_prompt(&definition)?;

    tracing::info!("Loaded prompt: {} ({})", definition.id, definition.title);

    Ok(definition)
}

/// Validate a prompt definition.
fn validate_prompt(def: &PromptDefinition) -> AppResult<()> {
    if def.id.is_empty() {
        return Err(AppError::Prompt("Prompt ID cannot be empty".to_string()));
    }

    if def.template.is_empty() {
        return Err(AppError::Prompt(
            "Prompt template cannot be empty".to_string(),
        ));
    }

    if !def.api_version.contains('.') {
        return Err(AppError::Prompt(format!(
            "Invalid apiVersion format: {}. Expected format: 'x.y'",
            def.api_version
        )));
    }

    Ok(())
}
