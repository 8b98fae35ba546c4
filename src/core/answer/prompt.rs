//! Prompt assembly and source previews.

use crate::core::types::{SearchHit, Source};

/// Instructions given to the answer model with every question
pub const SYSTEM_INSTRUCTIONS: &str = "You are an expert assistant answering questions about \
the documents provided below. Use only the following retrieved context to answer. \
If the answer is not in the context, say clearly that the information is not in the \
documents; do not make anything up. Keep the answer technical and direct.";

/// Appended to every source preview
pub const PREVIEW_MARKER: &str = "...";

/// Retrieved chunk texts in rank order, separated by a blank line
pub fn build_context(hits: &[SearchHit]) -> String {
    hits.iter()
        .map(|hit| hit.chunk.text.as_str())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// First `max_chars` characters of `text` followed by the marker
pub fn truncate_preview(text: &str, max_chars: usize) -> String {
    let mut preview: String = text.chars().take(max_chars).collect();
    preview.push_str(PREVIEW_MARKER);
    preview
}

/// Sources in rank order with 1-based pages
pub fn sources_from_hits(hits: &[SearchHit], preview_chars: usize) -> Vec<Source> {
    hits.iter()
        .map(|hit| Source {
            content: truncate_preview(&hit.chunk.text, preview_chars),
            page: hit.chunk.page,
        })
        .collect()
}
