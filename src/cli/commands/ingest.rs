//! Ingest command - build the vector index from a document folder

use crate::cli::output::{self, colors, format_duration};
use crate::cli::OutputFormat;
use crate::core::indexer::{ChunkState, DocumentSource, IngestOutcome, Progress};
use crate::core::services::Services;
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;

/// Arguments for the ingest command
#[derive(Args, Debug)]
pub struct IngestArgs {
    /// Document directory (defaults to documents.source_dir)
    #[arg(long, short = 's')]
    pub source: Option<PathBuf>,

    /// Index snapshot directory (defaults to index.path)
    #[arg(long)]
    pub index: Option<PathBuf>,

    /// Suppress progress output
    #[arg(long, short = 'q')]
    pub quiet: bool,
}

fn api_key_present(var: &str) -> bool {
    std::env::var(var).is_ok_and(|v| !v.trim().is_empty())
}

/// Execute the ingest command
pub async fn execute(
    args: IngestArgs,
    services: &Arc<Services>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = &services.config;
    let source = args
        .source
        .unwrap_or_else(|| config.documents.source_dir.clone());
    let show_progress = output::show_progress(format, args.quiet);

    if !source.exists() {
        std::fs::create_dir_all(&source)?;
        output::print_warning(&format!(
            "Created document directory {}. Add .txt or .md files there and run ingest again.",
            source.display()
        ));
        return Ok(());
    }

    if !api_key_present(&config.embedding.api_key_env) {
        return Err(format!(
            "API key not found. Set ${} before ingesting.",
            config.embedding.api_key_env
        )
        .into());
    }

    let loader = services.document_loader(Some(&source))?;
    let documents = loader.documents()?;
    if documents.is_empty() {
        output::print_warning(&format!(
            "No documents found in {}",
            source.display()
        ));
        return Ok(());
    }

    if show_progress {
        eprintln!(
            "Ingesting {} document(s) from {}",
            colors::number(&documents.len().to_string()),
            colors::file_path(&source.display().to_string())
        );
    }

    let pipeline = services.ingestion_pipeline(args.index.as_deref());
    let mut sink = |p: Progress<'_>| {
        if show_progress && p.state == ChunkState::Embedding {
            eprintln!(
                "{}",
                colors::dim(&format!("Processing chunk {}/{}", p.current, p.total))
            );
        }
    };
    let report = pipeline.run(&documents, &mut sink).await?;

    match format {
        OutputFormat::Human => match &report.outcome {
            IngestOutcome::Completed => {
                println!(
                    "{} {} chunks from {} documents in {}",
                    colors::success("Indexed"),
                    colors::number(&report.chunks_inserted.to_string()),
                    colors::number(&report.documents.to_string()),
                    format_duration(report.duration_ms as f64 / 1000.0)
                );
                println!(
                    "Index saved to {}",
                    colors::file_path(&report.index_path.display().to_string())
                );
            }
            IngestOutcome::Aborted { .. } => {
                if report.snapshot_persisted {
                    output::print_warning(&format!(
                        "Partial index with {}/{} chunks saved to {}",
                        report.chunks_inserted,
                        report.chunks_total,
                        report.index_path.display()
                    ));
                }
            }
        },
        OutputFormat::Json => output::print_json(&report)?,
    }

    match report.outcome {
        IngestOutcome::Completed => Ok(()),
        IngestOutcome::Aborted {
            chunk_index,
            chunk_id,
            error,
        } => Err(format!(
            "Ingestion stopped at chunk {}/{} ({}): {}",
            chunk_index + 1,
            report.chunks_total,
            chunk_id,
            error
        )
        .into()),
    }
}
