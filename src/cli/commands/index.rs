//! Index commands - inspect or delete the persisted snapshot

use crate::cli::output::{self, colors, format_bytes, format_relative_time};
use crate::cli::OutputFormat;
use crate::core::services::Services;
use crate::core::storage::{delete_snapshot, read_meta};
use clap::Args;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Arguments for the index-info command
#[derive(Args, Debug)]
pub struct IndexInfoArgs {
    /// Index snapshot directory (defaults to index.path)
    #[arg(long)]
    pub index: Option<PathBuf>,
}

/// Arguments for the delete-index command
#[derive(Args, Debug)]
pub struct DeleteIndexArgs {
    /// Index snapshot directory (defaults to index.path)
    #[arg(long)]
    pub index: Option<PathBuf>,

    /// Skip the confirmation requirement
    #[arg(long, short = 'y')]
    pub yes: bool,
}

/// Index information response
#[derive(Debug, Serialize)]
pub struct IndexInfoResponse {
    pub path: String,
    pub entries: usize,
    pub dimension: Option<usize>,
    pub metric: String,
    pub format_version: u32,
    pub size_bytes: u64,
    pub created_at: String,
    pub persisted_at: String,
}

fn snapshot_size(path: &Path) -> u64 {
    std::fs::read_dir(path)
        .map(|entries| {
            entries
                .filter_map(|e| e.ok())
                .filter_map(|e| e.metadata().ok())
                .map(|m| m.len())
                .sum()
        })
        .unwrap_or(0)
}

/// Execute the index-info command
pub async fn execute_info(
    args: IndexInfoArgs,
    services: &Arc<Services>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let path = args
        .index
        .unwrap_or_else(|| services.config.index.path.clone());
    let meta = read_meta(&path)?;

    let response = IndexInfoResponse {
        path: path.display().to_string(),
        entries: meta.entries,
        dimension: meta.dimension,
        metric: meta.metric.to_string(),
        format_version: meta.format_version,
        size_bytes: snapshot_size(&path),
        created_at: meta.created_at.to_rfc3339(),
        persisted_at: meta.persisted_at.to_rfc3339(),
    };

    match format {
        OutputFormat::Human => {
            println!("{}", colors::label("Index:"));
            println!("  Path:      {}", colors::file_path(&response.path));
            println!(
                "  Entries:   {}",
                colors::number(&response.entries.to_string())
            );
            println!(
                "  Dimension: {}",
                response
                    .dimension
                    .map_or_else(|| "-".to_string(), |d| d.to_string())
            );
            println!("  Metric:    {}", response.metric);
            println!("  Size:      {}", format_bytes(response.size_bytes));
            println!(
                "  Saved:     {} {}",
                response.persisted_at,
                colors::dim(&format!("({})", format_relative_time(&meta.persisted_at)))
            );
        }
        OutputFormat::Json => output::print_json(&response)?,
    }

    Ok(())
}

/// Execute the delete-index command
pub async fn execute_delete(
    args: DeleteIndexArgs,
    services: &Arc<Services>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let path = args
        .index
        .unwrap_or_else(|| services.config.index.path.clone());

    if !args.yes {
        return Err(format!(
            "Refusing to delete {} without --yes",
            path.display()
        )
        .into());
    }

    let deleted = delete_snapshot(&path)?;

    match format {
        OutputFormat::Human => {
            if deleted {
                output::print_success(&format!("Deleted index at {}", path.display()));
            } else {
                output::print_warning(&format!("No index at {}", path.display()));
            }
        }
        OutputFormat::Json => output::print_json(&serde_json::json!({
            "path": path.display().to_string(),
            "deleted": deleted,
        }))?,
    }

    Ok(())
}
