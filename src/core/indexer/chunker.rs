//! UTF-8 safe hierarchical text chunking.
//!
//! Documents are cut on the coarsest boundary that keeps pieces
//! small enough: paragraphs, then lines, then sentence ends, then
//! words, and finally raw characters. Pieces are packed greedily
//! into chunk bodies, and every chunk after the first starts with
//! the trailing `overlap` characters of its predecessor.
//!
//! All sizes are measured in **characters**, not bytes. Slicing
//! goes through `char_indices()` so a boundary can never fall
//! inside a multi-byte sequence.
//!
//! # Example
//!
//! ```
//! use docmind::core::indexer::Chunker;
//! use docmind::core::types::Document;
//!
//! let chunker = Chunker::new(40, 10);
//! let doc = Document::new("notes.txt", "First paragraph here.\n\nSecond paragraph 👋 is a bit longer.");
//! let chunks = chunker.chunk_document(&doc);
//!
//! for chunk in &chunks {
//!     assert!(chunk.char_len() <= 40);
//! }
//! ```

use crate::core::types::{Chunk, Document};

/// Split boundaries, coarsest first. Raw characters are the
/// implicit last level.
const SEPARATORS: [&str; 4] = ["\n\n", "\n", ".", " "];

/// Hierarchical chunker with character overlap.
#[derive(Debug, Clone)]
pub struct Chunker {
    /// Maximum characters per chunk, overlap included
    max_chunk_size: usize,

    /// Characters repeated from the previous chunk
    overlap: usize,
}

impl Chunker {
    /// Create a new chunker.
    ///
    /// # Panics
    ///
    /// Panics if `max_chunk_size` is 0 or if
    /// `overlap >= max_chunk_size`. Configuration validation
    /// rejects both before a chunker is ever built.
    pub fn new(max_chunk_size: usize, overlap: usize) -> Self {
        assert!(max_chunk_size > 0, "max_chunk_size must be > 0");
        assert!(overlap < max_chunk_size, "overlap must be < max_chunk_size");

        Self {
            max_chunk_size,
            overlap,
        }
    }

    /// Get the maximum chunk size in characters.
    pub fn max_chunk_size(&self) -> usize {
        self.max_chunk_size
    }

    /// Get the overlap size in characters.
    pub fn overlap(&self) -> usize {
        self.overlap
    }

    /// Lazily chunk a sequence of documents.
    ///
    /// Each document is chunked only when the iterator reaches it.
    /// Calling this again restarts from the first document.
    pub fn chunks<'a>(&'a self, documents: &'a [Document]) -> impl Iterator<Item = Chunk> + 'a {
        documents
            .iter()
            .flat_map(move |doc| self.chunk_document(doc))
    }

    /// Chunk a single document.
    ///
    /// Empty or whitespace-only documents yield no chunks.
    pub fn chunk_document(&self, doc: &Document) -> Vec<Chunk> {
        let text = doc.text.as_str();
        if text.trim().is_empty() {
            return Vec::new();
        }

        // Byte offset of every character, plus the end of the text,
        // so character positions can be sliced safely.
        let mut byte_at: Vec<usize> = text.char_indices().map(|(b, _)| b).collect();
        byte_at.push(text.len());

        let body_budget = self.max_chunk_size - self.overlap;
        let mut pieces = Vec::new();
        split_pieces(text, 0, body_budget, &mut pieces);

        let bodies = self.pack_bodies(&pieces);

        let mut chunks = Vec::with_capacity(bodies.len());
        let mut prev_start = 0;

        for (i, &(body_start, body_end)) in bodies.iter().enumerate() {
            let body = &text[byte_at[body_start]..byte_at[body_end]];
            let is_last = i + 1 == bodies.len();
            if is_last && i > 0 && body.trim().is_empty() {
                break;
            }

            let start = if i == 0 {
                body_start
            } else {
                prev_start.max(body_start.saturating_sub(self.overlap))
            };

            chunks.push(Chunk {
                text: text[byte_at[start]..byte_at[body_end]].to_string(),
                document_id: doc.id.clone(),
                page: doc.page_at(body_start),
                chunk_index: chunks.len(),
                start_offset: start,
                overlap: body_start - start,
            });

            prev_start = start;
        }

        chunks
    }

    /// Greedily pack pieces into contiguous `(start, end)` character
    /// ranges. The first body may use the whole chunk size; later
    /// bodies leave room for the overlap prefix.
    fn pack_bodies(&self, pieces: &[&str]) -> Vec<(usize, usize)> {
        let mut bodies = Vec::new();
        let mut body_start = 0;
        let mut body_len = 0;

        for piece in pieces {
            let len = piece.chars().count();
            let budget = if bodies.is_empty() {
                self.max_chunk_size
            } else {
                self.max_chunk_size - self.overlap
            };

            if body_len > 0 && body_len + len > budget {
                bodies.push((body_start, body_start + body_len));
                body_start += body_len;
                body_len = 0;
            }
            body_len += len;
        }

        if body_len > 0 {
            bodies.push((body_start, body_start + body_len));
        }

        bodies
    }
}

/// Recursively cut `text` into pieces of at most `limit` characters.
///
/// Separators stay attached to the end of the piece they terminate,
/// so the pieces concatenate back to exactly `text`.
fn split_pieces<'a>(text: &'a str, level: usize, limit: usize, out: &mut Vec<&'a str>) {
    if text.chars().count() <= limit {
        out.push(text);
        return;
    }

    let Some(offset) = SEPARATORS[level.min(SEPARATORS.len())..]
        .iter()
        .position(|sep| text.contains(sep))
    else {
        split_chars(text, limit, out);
        return;
    };

    let level = level + offset;
    for piece in text.split_inclusive(SEPARATORS[level]) {
        if piece.chars().count() <= limit {
            out.push(piece);
        } else {
            split_pieces(piece, level + 1, limit, out);
        }
    }
}

/// Last resort: fixed windows of `limit` characters
fn split_chars<'a>(text: &'a str, limit: usize, out: &mut Vec<&'a str>) {
    let mut window_start = 0;
    for (count, (byte, _)) in text.char_indices().enumerate() {
        if count > 0 && count % limit == 0 {
            out.push(&text[window_start..byte]);
            window_start = byte;
        }
    }
    out.push(&text[window_start..]);
}
