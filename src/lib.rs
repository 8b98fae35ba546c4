//! DocMind - question answering over a folder of documents
//!
//! Two pipelines share one vector index:
//!
//! - **ingestion**: documents are split into overlapping chunks, each
//!   chunk is embedded through a rate-limited, retrying gateway and
//!   inserted into the index, which is then persisted to disk
//! - **retrieval-answer**: a question is embedded, the nearest chunks
//!   are fetched and a chat model answers from them, citing sources
//!
//! # Architecture
//!
//! - **core**: Domain logic (protocol-agnostic)
//!   - config, error, types, xdg
//!   - providers (OpenAI-compatible embedding and chat clients)
//!   - retry, gateway (bounded retries and pacing)
//!   - storage (vector index, snapshots, shared handle)
//!   - indexer (document loading, chunking, ingestion)
//!   - answer (prompt assembly, retrieval-answer pipeline)
//!   - services (unified service container)
//!
//! - **http**: REST API adapter (depends on core)
//!   - handlers, middleware, error mapping
//!
//! - **cli**: command-line adapter (depends on core)

// Core domain logic (protocol-agnostic)
pub mod core;

// HTTP REST adapter
pub mod http;

// Command-line adapter
pub mod cli;

// Re-export commonly used types for convenience
pub use core::config::Config;
pub use core::error::{DocMindError, Result};
pub use core::services::Services;
pub use core::types::*;
