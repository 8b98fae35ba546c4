//! PDF text extraction.
//!
//! Each PDF page becomes one document page, so chunk page numbers
//! match the page numbers a reader sees. Pages without a text layer
//! (scans) come out empty.

use lopdf::Document as PdfDocument;
use std::path::Path;

use crate::core::error::{DocMindError, Result};

fn unreadable(path: &Path, reason: impl ToString) -> DocMindError {
    DocMindError::DocumentUnreadable {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}

/// Text of every page in `path`, in page order
pub fn extract_pages(path: &Path) -> Result<Vec<String>> {
    let pdf = PdfDocument::load(path).map_err(|e| unreadable(path, e))?;

    let mut pages = Vec::new();
    for number in pdf.get_pages().into_keys() {
        let text = pdf
            .extract_text(&[number])
            .map_err(|e| unreadable(path, format!("page {number}: {e}")))?;
        pages.push(text.trim_end().to_string());
    }

    if pages.is_empty() {
        return Err(unreadable(path, "no pages"));
    }

    tracing::debug!("Extracted {} pages from {:?}", pages.len(), path);
    Ok(pages)
}
