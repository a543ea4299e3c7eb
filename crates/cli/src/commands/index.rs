//! Index command handler.
//!
//! Builds, inspects and removes the persisted vector index.

use super::{embedder, prepare_index, print_json, transport};
use clap::{Args, Subcommand};
use sentra_core::{config::AppConfig, AppResult};
use sentra_knowledge::{IndexOrigin, IndexPaths, IndexStats, VectorIndex};

/// Vector index management
#[derive(Args, Debug)]
pub struct IndexCommand {
    #[command(subcommand)]
    pub action: IndexAction,
}

#[derive(Subcommand, Debug)]
pub enum IndexAction {
    /// Build the index, or load it when already persisted
    Build(IndexBuildCommand),
    /// Show statistics of the persisted index
    Stats(IndexStatsCommand),
    /// Delete the persisted index
    Clean(IndexCleanCommand),
}

impl IndexCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        match &self.action {
            IndexAction::Build(cmd) => cmd.execute(config).await,
            IndexAction::Stats(cmd) => cmd.execute(config),
            IndexAction::Clean(cmd) => cmd.execute(config),
        }
    }
}

/// Build the index
#[derive(Args, Debug)]
pub struct IndexBuildCommand {
    /// Rebuild even when the index is already persisted
    #[arg(long)]
    pub force: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl IndexBuildCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing index build command (force: {})", self.force);
        config.validate()?;

        let embedder = embedder(config, transport(config)?)?;
        let (index, origin) = prepare_index(config, embedder, self.force).await?;

        if self.json {
            let output = match &origin {
                IndexOrigin::Loaded => serde_json::json!({
                    "origin": "loaded",
                    "entries": index.len(),
                    "dimension": index.dimension(),
                }),
                IndexOrigin::Built(report) => serde_json::json!({
                    "origin": "built",
                    "entries": report.kept,
                    "dimension": report.dimension,
                    "skipped": report.skipped,
                }),
            };
            print_json(&output)?;
            return Ok(());
        }

        match origin {
            IndexOrigin::Loaded => println!(
                "Loaded existing index: {} entries of dimension {} (use --force to rebuild)",
                index.len(),
                index.dimension()
            ),
            IndexOrigin::Built(report) => {
                println!(
                    "Built index: {} entries of dimension {}",
                    report.kept, report.dimension
                );
                for skipped in &report.skipped {
                    println!("  skipped {} ({})", skipped.id, skipped.reason);
                }
            }
        }

        Ok(())
    }
}

/// Show index statistics
#[derive(Args, Debug)]
pub struct IndexStatsCommand {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl IndexStatsCommand {
    pub fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing index stats command");

        let stats = load_stats(config)?;

        if self.json {
            print_json(&stats)?;
            return Ok(());
        }

        println!("Index Statistics");
        println!("================");
        println!("Entries:    {}", stats.entries);
        println!("Dimension:  {}", stats.dimension);
        println!("Sources:    {}", stats.sources);
        println!("Vectors:    {} bytes", stats.vector_bytes);
        println!("Metadata:   {} bytes", stats.metadata_bytes);
        if let Some(built_at) = stats.built_at {
            println!("Built at:   {}", built_at.format("%Y-%m-%d %H:%M:%S UTC"));
        }

        Ok(())
    }
}

/// Statistics of the persisted index; all zero when nothing is persisted.
fn load_stats(config: &AppConfig) -> AppResult<IndexStats> {
    let mut index = VectorIndex::new(IndexPaths::from_config(config));
    if index.exists_on_disk() {
        index.load_from_disk()?;
    } else {
        tracing::warn!("No index found at {:?}", index.paths().vectors);
    }
    Ok(index.stats())
}

/// Delete the index
#[derive(Args, Debug)]
pub struct IndexCleanCommand {}

impl IndexCleanCommand {
    pub fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing index clean command");

        let index = VectorIndex::new(IndexPaths::from_config(config));
        if index.remove_from_disk()? {
            println!("Index removed");
        } else {
            println!("No index to remove");
        }

        Ok(())
    }
}
