//! DocMind CLI - ingest documents and ask questions from the terminal
//!
//! # Examples
//!
//! ```bash
//! # Build the index from ./data/documents
//! docmind ingest
//!
//! # Ask a question
//! docmind ask "What does the warranty cover?"
//!
//! # Inspect or remove the persisted index
//! docmind index-info
//! docmind delete-index --yes
//! ```

use clap::Parser;
use docmind::cli::output::print_error;
use docmind::cli::{run, Cli};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Library logs go to stderr and stay quiet unless RUST_LOG asks for more
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "docmind=warn".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run(cli).await {
        print_error(&e.to_string());
        std::process::exit(1);
    }
}
