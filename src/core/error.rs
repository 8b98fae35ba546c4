//! Error types and error handling for the DocMind service.
//!
//! This module defines the error types used throughout the
//! application. Protocol-specific error handling (HTTP status
//! codes) is handled in the respective adapter modules.

use std::path::PathBuf;

use thiserror::Error;

use crate::core::providers::ProviderError;

/// Result type alias for DocMind operations
pub type Result<T> = std::result::Result<T, DocMindError>;

/// Main error type for the DocMind service
#[derive(Error, Debug)]
pub enum DocMindError {
    /// A remote call kept failing until the retry policy gave up
    #[error("Remote call for '{target}' failed after {attempts} attempts: {source}")]
    TransientCallExhausted {
        target: String,
        attempts: u32,
        #[source]
        source: ProviderError,
    },

    #[error("Vector index not found at {0}")]
    IndexNotFound(PathBuf),

    #[error("Vector index at {path} is unreadable: {reason}")]
    IndexCorrupt { path: PathBuf, reason: String },

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Answer generation failed during {stage}: {source}")]
    AnswerGenerationFailed {
        stage: &'static str,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Invalid vector: {0}")]
    InvalidVector(String),

    #[error("Document {path} is unreadable: {reason}")]
    DocumentUnreadable { path: PathBuf, reason: String },

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),
}

impl DocMindError {
    /// Get user-friendly error message
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// No usable index: the caller should answer "service unavailable"
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            DocMindError::IndexNotFound(_)
                | DocMindError::IndexCorrupt { .. }
                | DocMindError::ServiceUnavailable(_)
        )
    }

    /// Check if this is a bad request error (invalid input)
    pub fn is_bad_request(&self) -> bool {
        matches!(
            self,
            DocMindError::InvalidQuery(_) | DocMindError::InvalidPath(_)
        )
    }

    /// Failure of a remote capability (embedding or synthesis)
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            DocMindError::TransientCallExhausted { .. }
                | DocMindError::AnswerGenerationFailed { .. }
        )
    }

    /// Whether the same request may succeed later without changes
    pub fn is_retryable(&self) -> bool {
        self.is_unavailable() || self.is_upstream()
    }
}
