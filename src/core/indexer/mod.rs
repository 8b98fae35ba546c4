//! Document ingestion module.
//!
//! Turns a document corpus into a persisted vector index:
//!
//! - UTF-8 safe hierarchical chunking with character overlap
//! - Directory loading with pattern matching and page splitting
//! - Per-page PDF text extraction
//! - Sequential embed-and-insert pipeline with partial persistence
//!
//! # Safety
//!
//! The chunker slices through `char_indices()` so boundaries never
//! fall inside a multi-byte sequence, whatever the document holds.

pub mod chunker;
pub mod loader;
pub mod pdf;
pub mod pipeline;

pub use chunker::Chunker;
pub use loader::{DirectoryLoader, DocumentSource};
pub use pipeline::{
    ChunkState, IngestOutcome, IngestReport, IngestionPipeline, NoProgress, Progress, ProgressSink,
};
