//! Ask command handler.
//!
//! Answers one question against the index and exits.

use super::{open_engine, print_json};
use crate::commands::chat::normalize_quotes;
use clap::Args;
use sentra_core::{config::AppConfig, AppError, AppResult};

/// Answer a single question
#[derive(Args, Debug)]
pub struct AskCommand {
    /// The question to ask
    pub question: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Print the retrieved context instead of generating an answer
    #[arg(long)]
    pub show_context: bool,
}

impl AskCommand {
    /// Execute the ask command.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing ask command");
        tracing::debug!("Ask command options: {:?}", self);

        let question = self.question.trim();
        if question.is_empty() {
            return Err(AppError::Config("No question provided".to_string()));
        }

        let engine = open_engine(config).await?;

        if self.show_context {
            let context = engine.retrieve(question).await?;
            if self.json {
                print_json(&context)?;
            } else {
                for chunk in context.decorated_chunks() {
                    println!("{}\n", chunk);
                }
                println!(
                    "({} chunks, {} chars)",
                    context.chunks.len(),
                    context.total_chars
                );
            }
            return Ok(());
        }

        let mut answer = engine.answer_with_sources(question).await?;
        answer.answer = normalize_quotes(&answer.answer);

        if self.json {
            print_json(&answer)?;
        } else {
            println!("{}", answer.answer);

            if !answer.sources.is_empty() {
                println!();
                println!("Sources:");
                for source in &answer.sources {
                    println!("- {}", source);
                }
            }
        }

        Ok(())
    }
}
