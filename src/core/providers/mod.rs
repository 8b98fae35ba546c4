//! Model provider capabilities.
//!
//! The pipelines only see two one-method traits: one that turns
//! text into a vector and one that writes an answer from a
//! grounding context. Concrete HTTP adapters live in [`openai`];
//! tests substitute deterministic fakes.

pub mod openai;

use async_trait::async_trait;
use thiserror::Error;

pub use openai::{OpenAiChatSynthesizer, OpenAiEmbeddingProvider};

/// Failure of a single provider call
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Provider returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid provider response: {0}")]
    InvalidResponse(String),

    #[error("API key not set (expected in ${0})")]
    MissingApiKey(String),
}

/// Text embedding capability
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed one text into a fixed-dimension vector
    async fn embed(&self, text: &str) -> Result<Vec<f32>, ProviderError>;

    /// Model identifier, for logs
    fn model_name(&self) -> &str;
}

/// Grounded answer-synthesis capability
#[async_trait]
pub trait AnswerSynthesizer: Send + Sync {
    /// Produce an answer to `query` using only `context`, following
    /// `system_instructions`
    async fn generate(
        &self,
        system_instructions: &str,
        context: &str,
        query: &str,
    ) -> Result<String, ProviderError>;

    /// Model identifier, for logs and the health endpoint
    fn model_name(&self) -> &str;
}
