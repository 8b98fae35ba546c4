//! Core domain logic (protocol-agnostic)
//!
//! This module contains all business logic that is independent
//! of the HTTP and CLI adapters.
//!
//! # Architecture
//!
//! - **config**: Configuration loading (TOML + environment)
//! - **error**: Error types and Result alias
//! - **types**: Domain data structures
//! - **xdg**: XDG directory handling
//! - **providers**: Embedding and answer model capabilities
//! - **retry**: Bounded retry with backoff
//! - **gateway**: Embedding calls with retry and pacing
//! - **storage**: Vector index, snapshots and the serving handle
//! - **indexer**: Chunking, document loading, ingestion pipeline
//! - **answer**: Retrieval-augmented answering
//! - **services**: Unified service container

pub mod answer;
pub mod config;
pub mod error;
pub mod gateway;
pub mod indexer;
pub mod providers;
pub mod retry;
pub mod services;
pub mod storage;
pub mod types;
pub mod xdg;

// Re-export key types for convenience
pub use config::Config;
pub use error::{DocMindError, Result};
pub use services::Services;
