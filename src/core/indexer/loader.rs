//! Document sources.
//!
//! The ingestion pipeline only needs a list of [`Document`]s. The
//! default source walks a directory and filters files with glob
//! patterns. PDFs are split on their own pages; everything else is
//! read as UTF-8 text where form feeds (`\x0C`) mark page breaks.

use glob::Pattern;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

use crate::core::error::{DocMindError, Result};
use crate::core::indexer::pdf;
use crate::core::types::Document;

/// Page separator inside text files
pub const PAGE_BREAK: char = '\x0C';

/// Anything that can produce documents for ingestion
pub trait DocumentSource {
    fn documents(&self) -> Result<Vec<Document>>;
}

impl DocumentSource for Vec<Document> {
    fn documents(&self) -> Result<Vec<Document>> {
        Ok(self.clone())
    }
}

/// Reads text documents from a directory tree
pub struct DirectoryLoader {
    root: PathBuf,

    /// Patterns to include (e.g., "*.txt", "*.pdf")
    include_patterns: Vec<Pattern>,

    /// Patterns to exclude (e.g., "**/archive/**")
    exclude_patterns: Vec<Pattern>,

    /// Maximum file size in bytes (skip larger files)
    max_file_size_bytes: u64,
}

fn compile(patterns: Vec<String>, kind: &str) -> Result<Vec<Pattern>> {
    patterns
        .into_iter()
        .map(|p| {
            Pattern::new(&p).map_err(|e| {
                DocMindError::ConfigError(format!("Invalid {kind} pattern '{p}': {e}"))
            })
        })
        .collect()
}

impl DirectoryLoader {
    /// Create a loader for `root`.
    ///
    /// Fails if any pattern is not a valid glob.
    pub fn new(
        root: impl Into<PathBuf>,
        include_patterns: Vec<String>,
        exclude_patterns: Vec<String>,
        max_file_size_mb: usize,
    ) -> Result<Self> {
        Ok(Self {
            root: root.into(),
            include_patterns: compile(include_patterns, "include")?,
            exclude_patterns: compile(exclude_patterns, "exclude")?,
            max_file_size_bytes: (max_file_size_mb as u64) * 1024 * 1024,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Matching files, sorted by path
    pub fn collect_files(&self) -> Result<Vec<PathBuf>> {
        if !self.root.is_dir() {
            return Err(DocMindError::InvalidPath(format!(
                "Document directory does not exist: {}",
                self.root.display()
            )));
        }

        let mut files = Vec::new();

        for entry in WalkDir::new(&self.root)
            .follow_links(false)
            .into_iter()
            .filter_entry(|e| self.should_process_entry(e))
        {
            match entry {
                Ok(entry) => {
                    if !entry.file_type().is_file() {
                        continue;
                    }

                    let path = entry.path();

                    if let Ok(metadata) = entry.metadata() {
                        if metadata.len() > self.max_file_size_bytes {
                            tracing::debug!(
                                "Skipping large file: {:?} ({} bytes)",
                                path,
                                metadata.len()
                            );
                            continue;
                        }
                    }

                    if self.matches_patterns(path) {
                        files.push(path.to_path_buf());
                    }
                }
                Err(e) => {
                    tracing::warn!("Walk error: {}", e);
                }
            }
        }

        files.sort();
        Ok(files)
    }

    /// Skip hidden and excluded directories; never the root itself
    fn should_process_entry(&self, entry: &DirEntry) -> bool {
        let path = entry.path();
        if path == self.root || !entry.file_type().is_dir() {
            return true;
        }

        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            if name.starts_with('.') {
                return false;
            }
        }

        !self.exclude_patterns.iter().any(|p| p.matches_path(path))
    }

    fn matches_patterns(&self, path: &Path) -> bool {
        let Some(path_str) = path.to_str() else {
            return false;
        };
        let file_name = path.file_name().and_then(|f| f.to_str()).unwrap_or("");

        let included = self.include_patterns.is_empty()
            || self
                .include_patterns
                .iter()
                .any(|p| p.matches(path_str) || p.matches(file_name));

        included
            && !self
                .exclude_patterns
                .iter()
                .any(|p| p.matches(path_str) || p.matches_path(path))
    }

    fn document_id(&self, path: &Path) -> String {
        path.strip_prefix(&self.root)
            .unwrap_or(path)
            .to_string_lossy()
            .replace('\\', "/")
    }

    /// Read one file into a paged document
    pub fn read_document(&self, path: &Path) -> Result<Document> {
        let is_pdf = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("pdf"));
        if is_pdf {
            let pages = pdf::extract_pages(path)?;
            return Ok(Document::from_pages(self.document_id(path), &pages));
        }

        let contents = fs::read_to_string(path)?;
        let pages: Vec<&str> = contents.split(PAGE_BREAK).collect();
        Ok(Document::from_pages(self.document_id(path), &pages))
    }
}

impl DocumentSource for DirectoryLoader {
    /// Unreadable, non-UTF-8 or broken PDF files are logged and skipped
    fn documents(&self) -> Result<Vec<Document>> {
        let files = self.collect_files()?;
        tracing::info!(
            "Found {} document files in {}",
            files.len(),
            self.root.display()
        );

        let mut documents = Vec::with_capacity(files.len());
        for path in &files {
            match self.read_document(path) {
                Ok(doc) => {
                    tracing::debug!("Loaded {} ({} pages)", doc.id, doc.page_count());
                    documents.push(doc);
                }
                Err(e) => {
                    tracing::warn!("Skipping {:?}: {}", path, e);
                }
            }
        }

        Ok(documents)
    }
}
