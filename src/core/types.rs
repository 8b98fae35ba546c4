//! Core data types for the DocMind service.
//!
//! This module defines the data structures shared by the ingestion
//! and answer pipelines and by the HTTP/CLI adapters: documents,
//! chunks, search hits, answers, requests and responses.

use serde::{Deserialize, Serialize};

/// A source document with page attribution.
///
/// Page boundaries are recorded as character offsets into `text`,
/// so provenance can be computed for any character position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Document identifier (usually the file path)
    pub id: String,

    /// Full document text
    pub text: String,

    /// Character offset at which each page starts (first is 0)
    page_starts: Vec<usize>,
}

impl Document {
    /// Single-page document.
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            page_starts: vec![0],
        }
    }

    /// Build a document from per-page text.
    ///
    /// Pages are joined with a blank line so that page breaks are
    /// also paragraph boundaries for the chunker.
    pub fn from_pages<S: AsRef<str>>(id: impl Into<String>, pages: &[S]) -> Self {
        let mut text = String::new();
        let mut page_starts = Vec::with_capacity(pages.len().max(1));
        let mut chars = 0;

        for (i, page) in pages.iter().enumerate() {
            if i > 0 {
                text.push_str(PAGE_JOINER);
                chars += PAGE_JOINER.len();
            }
            page_starts.push(chars);
            let page = page.as_ref();
            text.push_str(page);
            chars += page.chars().count();
        }

        if page_starts.is_empty() {
            page_starts.push(0);
        }

        Self {
            id: id.into(),
            text,
            page_starts,
        }
    }

    /// Number of pages (at least 1)
    pub fn page_count(&self) -> usize {
        self.page_starts.len()
    }

    /// 1-based page containing the character at `char_offset`
    pub fn page_at(&self, char_offset: usize) -> usize {
        self.page_starts.partition_point(|&start| start <= char_offset).max(1)
    }
}

const PAGE_JOINER: &str = "\n\n";

/// A bounded text segment of one document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// The actual text content
    pub text: String,

    /// Identifier of the source document
    pub document_id: String,

    /// 1-based page number where the chunk's new content begins
    pub page: usize,

    /// Sequential chunk number within the document
    pub chunk_index: usize,

    /// Character offset where the chunk starts in the document
    pub start_offset: usize,

    /// Leading characters repeated from the previous chunk
    pub overlap: usize,
}

impl Chunk {
    /// Stable human-readable identity, used in logs and errors
    pub fn id(&self) -> String {
        format!("{}#{}", self.document_id, self.chunk_index)
    }

    /// Length in characters
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// One nearest-neighbour result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    /// Internal index id
    pub id: u64,

    /// Distance to the query vector (lower = closer)
    pub distance: f32,

    /// Chunk the vector was computed from
    pub chunk: Chunk,
}

/// A source excerpt attached to an answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    /// Truncated chunk text
    pub content: String,

    /// 1-based page number
    pub page: usize,
}

/// Synthesized answer with attributed sources
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    pub answer: String,
    pub sources: Vec<Source>,
}

/// Request to ask a question
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskRequest {
    /// Natural-language question
    pub query: String,
}

/// Index status returned by the status endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexStatusResponse {
    /// Whether an index is loaded and queries can be served
    pub loaded: bool,

    /// Number of entries in the index
    pub entries: usize,

    /// Vector dimension (absent when no index is loaded)
    pub dimension: Option<usize>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Service version
    pub version: String,

    /// Answer-synthesis model in use
    pub model: String,
}
