//! Sentra CLI
//!
//! Main entry point for the sentra command-line tool.
//! Builds or loads the vector index and answers questions over it.

mod commands;

use clap::{Parser, Subcommand};
use commands::{AskCommand, ChatCommand, IndexCommand};
use sentra_core::config::{AppConfig, ConfigOverrides};
use sentra_core::{logging, AppResult};
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

/// Sentra - retrieval-augmented answers over a local document folder
#[derive(Parser, Debug)]
#[command(name = "sentra")]
#[command(about = "Retrieval-augmented answers over a local document folder", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to workspace directory (default: current directory)
    #[arg(short, long, global = true, env = "SENTRA_WORKSPACE")]
    workspace: Option<PathBuf>,

    /// Path to config file (default: <workspace>/sentra.yaml)
    #[arg(short, long, global = true, env = "SENTRA_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Provider (openai, ollama, hashing)
    #[arg(short, long, global = true)]
    provider: Option<String>,

    /// Chat model identifier
    #[arg(long, global = true)]
    chat_model: Option<String>,

    /// Embedding model identifier
    #[arg(long, global = true)]
    embedding_model: Option<String>,

    /// Number of chunks retrieved per question
    #[arg(short = 'k', long, global = true)]
    top_k: Option<usize>,

    /// Log raw provider responses and context sizes
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Interactive question loop (default)
    Chat(ChatCommand),

    /// Answer a single question
    Ask(AskCommand),

    /// Vector index management
    Index(IndexCommand),
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    ExitCode::from(exit_status(run(cli).await, std::io::stderr()))
}

/// Process exit status for the command result: 0 on success, 1 after
/// reporting `Fatal error: <msg>` on `errors`.
fn exit_status<W: Write>(result: AppResult<()>, mut errors: W) -> u8 {
    match result {
        Ok(()) => 0,
        Err(e) => {
            tracing::error!("Command failed: {}", e);
            let _ = writeln!(errors, "Fatal error: {}", e);
            1
        }
    }
}

async fn run(cli: Cli) -> AppResult<()> {
    let config = AppConfig::load(cli.workspace, cli.config)?;

    let config = config.with_overrides(ConfigOverrides {
        provider: cli.provider,
        chat_model: cli.chat_model,
        embedding_model: cli.embedding_model,
        top_k: cli.top_k,
        log_level: cli.log_level,
        verbose: cli.verbose,
        no_color: cli.no_color,
        debug: cli.debug,
    });

    logging::init_logging(config.log_level.as_deref(), config.no_color, config.log_format)?;

    tracing::info!("Sentra CLI starting");
    tracing::debug!("Workspace: {:?}", config.workspace);
    tracing::debug!("Provider: {}", config.provider.name);
    tracing::debug!("Chat model: {}", config.provider.chat_model);

    let command = cli
        .command
        .unwrap_or_else(|| Commands::Chat(ChatCommand::default()));

    let command_name = match &command {
        Commands::Chat(_) => "chat",
        Commands::Ask(_) => "ask",
        Commands::Index(_) => "index",
    };
    let _span = tracing::info_span!("command", name = command_name).entered();

    let result = match command {
        Commands::Chat(cmd) => cmd.execute(&config).await,
        Commands::Ask(cmd) => cmd.execute(&config).await,
        Commands::Index(cmd) => cmd.execute(&config).await,
    };

    if result.is_ok() {
        tracing::info!("Command completed successfully");
    }

    result
}
