//! CLI adapter for DocMind
//!
//! Provides the command-line interface for ingestion, questions and
//! index maintenance. This module is parallel to `http/`: both
//! depend on `core/` but not on each other.
//!
//! # Architecture
//!
//! ```text
//!              +------------------+
//!              |     core/        |
//!              |  (domain logic)  |
//!              +--------+---------+
//!                       |
//!          +------------+------------+
//!          |                         |
//!          v                         v
//! +------------------+      +------------------+
//! |      http/       |      |      cli/        |
//! | (axum adapter)   |      | (clap adapter)   |
//! +------------------+      +------------------+
//! ```

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};

/// DocMind - question answering over your documents
///
/// Ingest a folder of text documents into a vector index, then ask
/// questions and get answers with the source passages they came from.
#[derive(Parser, Debug)]
#[command(name = "docmind")]
#[command(version)]
#[command(about = "Retrieval-augmented question answering over documents", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(long, global = true, default_value = "human")]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output (default)
    #[default]
    Human,
    /// JSON output for scripting
    Json,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Chunk, embed and index the document folder
    Ingest(commands::IngestArgs),

    /// Answer a question from the indexed documents
    Ask(commands::AskArgs),

    /// Show information about the persisted index
    #[command(name = "index-info")]
    IndexInfo(commands::IndexInfoArgs),

    /// Delete the persisted index
    #[command(name = "delete-index")]
    DeleteIndex(commands::DeleteIndexArgs),

    /// Show current configuration
    #[command(name = "show-config")]
    ShowConfig(commands::ConfigArgs),

    /// Generate shell completion scripts
    ///
    /// Output completion script to stdout. To install:
    ///
    ///   bash:  docmind completions bash > ~/.local/share/bash-completion/completions/docmind
    ///   zsh:   docmind completions zsh > ~/.zfunc/_docmind
    ///   fish:  docmind completions fish > ~/.config/fish/completions/docmind.fish
    Completions(commands::CompletionsArgs),
}

/// Run the CLI with the provided arguments
pub async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    use crate::core::config::Config;
    use crate::core::services::Services;
    use crate::core::xdg::XdgDirs;
    use std::sync::Arc;

    let services = match cli.command {
        // Completions doesn't need configuration or services
        Commands::Completions(args) => return commands::completions::execute(args),
        _ => {
            XdgDirs::new().ensure_dirs_exist()?;
            Arc::new(Services::new(Config::load()?)?)
        }
    };

    match cli.command {
        Commands::Ingest(args) => commands::ingest::execute(args, &services, cli.format).await,
        Commands::Ask(args) => commands::ask::execute(args, &services, cli.format).await,
        Commands::IndexInfo(args) => {
            commands::index::execute_info(args, &services, cli.format).await
        }
        Commands::DeleteIndex(args) => {
            commands::index::execute_delete(args, &services, cli.format).await
        }
        Commands::ShowConfig(args) => commands::config::execute(args, &services, cli.format).await,
        Commands::Completions(_) => unreachable!(), // Handled above
    }
}
