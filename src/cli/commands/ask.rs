//! Ask command - answer a question from the local index

use crate::cli::output::colors;
use crate::cli::OutputFormat;
use crate::core::services::Services;
use clap::Args;
use std::sync::Arc;

/// Arguments for the ask command
#[derive(Args, Debug)]
pub struct AskArgs {
    /// Question to answer
    pub query: String,

    /// Number of passages used as context (defaults to answer.top_k)
    #[arg(long, short = 'k')]
    pub k: Option<usize>,
}

/// Execute the ask command
pub async fn execute(
    args: AskArgs,
    services: &Arc<Services>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    if !services.load_index() {
        return Err(format!(
            "No usable index at {}. Run 'docmind ingest' first.",
            services.config.index.path.display()
        )
        .into());
    }

    let k = args.k.unwrap_or(services.config.answer.top_k);
    let answer = services.answer.answer_with_k(&args.query, k).await?;

    match format {
        OutputFormat::Human => {
            println!("{}\n", answer.answer);
            if !answer.sources.is_empty() {
                println!("{}", colors::label("Sources:"));
                for (i, source) in answer.sources.iter().enumerate() {
                    println!(
                        "[{}] {} {}",
                        colors::rank(&(i + 1).to_string()),
                        colors::page(&format!("page {}", source.page)),
                        colors::dim(&source.content.replace('\n', " "))
                    );
                }
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&answer)?);
        }
    }

    Ok(())
}
