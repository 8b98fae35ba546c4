//! Config command - show current configuration

use crate::cli::OutputFormat;
use crate::core::services::Services;
use clap::Args;
use serde::Serialize;
use std::sync::Arc;

/// Arguments for the config command
#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Show all configuration including defaults
    #[arg(long, short = 'a')]
    pub all: bool,
}

/// Configuration summary
#[derive(Debug, Serialize)]
pub struct ConfigResponse {
    pub config_file: String,
    pub source_dir: String,
    pub index_path: String,
    pub chunk_size: usize,
    pub overlap: usize,
    pub embedding_model: String,
    pub generation_model: String,
    pub top_k: usize,
}

/// Execute the config command
pub async fn execute(
    args: ConfigArgs,
    services: &Arc<Services>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = &services.config;

    if args.all {
        match format {
            OutputFormat::Human => print!("{}", toml::to_string_pretty(&**config)?),
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&**config)?),
        }
        return Ok(());
    }

    let xdg = crate::core::xdg::XdgDirs::new();
    let response = ConfigResponse {
        config_file: xdg.config_file().to_string_lossy().into_owned(),
        source_dir: config.documents.source_dir.display().to_string(),
        index_path: config.index.path.display().to_string(),
        chunk_size: config.chunking.chunk_size,
        overlap: config.chunking.overlap,
        embedding_model: config.embedding.model.clone(),
        generation_model: config.generation.model.clone(),
        top_k: config.answer.top_k,
    };

    match format {
        OutputFormat::Human => {
            println!("Configuration:");
            println!("  config_file: {}", response.config_file);
            println!("  source_dir: {}", response.source_dir);
            println!("  index_path: {}", response.index_path);
            println!("  chunking:");
            println!("    chunk_size: {}", response.chunk_size);
            println!("    overlap: {}", response.overlap);
            println!("  models:");
            println!("    embedding: {}", response.embedding_model);
            println!("    generation: {}", response.generation_model);
            println!("  answer:");
            println!("    top_k: {}", response.top_k);
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }

    Ok(())
}
