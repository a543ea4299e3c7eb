//! Chat command handler.
//!
//! Interactive question loop over the built or loaded index.

use super::open_engine;
use clap::Args;
use sentra_core::{config::AppConfig, AppResult};
use sentra_knowledge::RetrievalEngine;
use std::io::{BufRead, Write};

/// Interactive question loop
#[derive(Args, Debug, Default)]
pub struct ChatCommand {}

impl ChatCommand {
    /// Execute the chat command.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing chat command");

        let mut stdout = std::io::stdout();
        writeln!(stdout, "Building / loading index...")?;
        stdout.flush()?;

        let engine = open_engine(config).await?;

        write!(stdout, "SentraAI CLI ready. Type 'exit' to quit.\n\n")?;

        let stdin = std::io::stdin();
        run_session(&engine, stdin.lock(), stdout, std::io::stderr()).await
    }
}

/// Read questions line by line and print answers until `exit`, `quit` or
/// end of input.
///
/// A failed question is reported on `errors` and the loop continues.
pub async fn run_session<R, W, E>(
    engine: &RetrievalEngine,
    mut input: R,
    mut output: W,
    mut errors: E,
) -> AppResult<()>
where
    R: BufRead,
    W: Write,
    E: Write,
{
    let mut line = String::new();

    loop {
        write!(output, "You> ")?;
        output.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            break;
        }

        let question = line.trim();
        if question == "exit" || question == "quit" {
            break;
        }
        if question.is_empty() {
            continue;
        }

        match engine.answer(question).await {
            Ok(answer) => {
                write!(output, "\nSentraAI> {}\n\n", normalize_quotes(&answer))?;
            }
            Err(e) => {
                tracing::debug!("Question failed: {:?}", e);
                writeln!(errors, "Error: {}", e)?;
            }
        }
    }

    writeln!(output, "Bye.")?;
    output.flush()?;
    Ok(())
}

/// Replace typographic right single quotes with ASCII apostrophes.
pub fn normalize_quotes(text: &str) -> String {
    text.replace('\u{2019}', "'")
}
