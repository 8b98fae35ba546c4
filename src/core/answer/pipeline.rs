//! Retrieval-augmented answering.

use std::sync::Arc;

use tracing::{debug, info};

use crate::core::answer::prompt::{build_context, sources_from_hits, SYSTEM_INSTRUCTIONS};
use crate::core::error::{DocMindError, Result};
use crate::core::gateway::EmbeddingGateway;
use crate::core::providers::AnswerSynthesizer;
use crate::core::storage::IndexHandle;
use crate::core::types::Answer;

/// Tunables for the answer pipeline
#[derive(Debug, Clone)]
pub struct AnswerSettings {
    pub top_k: usize,
    pub preview_chars: usize,
    pub max_query_length: usize,
}

impl Default for AnswerSettings {
    fn default() -> Self {
        Self {
            top_k: 3,
            preview_chars: 200,
            max_query_length: 2000,
        }
    }
}

/// Query → embed → top-k → synthesize → attributed answer.
///
/// Never mutates the index.
#[derive(Clone)]
pub struct AnswerPipeline {
    index: IndexHandle,
    gateway: EmbeddingGateway,
    synthesizer: Arc<dyn AnswerSynthesizer>,
    settings: AnswerSettings,
}

impl AnswerPipeline {
    pub fn new(
        index: IndexHandle,
        gateway: EmbeddingGateway,
        synthesizer: Arc<dyn AnswerSynthesizer>,
        settings: AnswerSettings,
    ) -> Self {
        Self {
            index,
            gateway,
            synthesizer,
            settings,
        }
    }

    pub fn settings(&self) -> &AnswerSettings {
        &self.settings
    }

    pub fn index(&self) -> &IndexHandle {
        &self.index
    }

    pub fn model_name(&self) -> &str {
        self.synthesizer.model_name()
    }

    fn validate_query(&self, query: &str) -> Result<()> {
        if query.trim().is_empty() {
            return Err(DocMindError::InvalidQuery("query cannot be empty".to_string()));
        }
        let len = query.chars().count();
        if len > self.settings.max_query_length {
            return Err(DocMindError::InvalidQuery(format!(
                "query is {} characters long (max {})",
                len, self.settings.max_query_length
            )));
        }
        Ok(())
    }

    /// Answer `query` with the default `top_k`
    pub async fn answer(&self, query: &str) -> Result<Answer> {
        self.answer_with_k(query, self.settings.top_k).await
    }

    /// Answer `query` using the `k` nearest chunks as context
    pub async fn answer_with_k(&self, query: &str, k: usize) -> Result<Answer> {
        self.validate_query(query)?;
        if k == 0 {
            return Err(DocMindError::InvalidQuery("k must be at least 1".to_string()));
        }
        let index = self.index.require()?;

        let vector = self
            .gateway
            .embed("query", query)
            .await
            .map_err(|e| DocMindError::AnswerGenerationFailed {
                stage: "embedding",
                source: Box::new(e),
            })?;

        // An index built with another embedding model cannot serve this one
        if let Some(dim) = index.dimension().filter(|&d| d != vector.len()) {
            return Err(DocMindError::ServiceUnavailable(format!(
                "index has {} dimensions but the embedding model returned {}; re-run ingestion",
                dim,
                vector.len()
            )));
        }

        let hits = index.query(&vector, k)?;
        debug!(
            "Retrieved {} chunks: {:?}",
            hits.len(),
            hits.iter().map(|h| h.id).collect::<Vec<_>>()
        );

        let context = build_context(&hits);
        let answer = self
            .synthesizer
            .generate(SYSTEM_INSTRUCTIONS, &context, query)
            .await
            .map_err(|e| DocMindError::AnswerGenerationFailed {
                stage: "synthesis",
                source: Box::new(e),
            })?;

        info!("Answered query with {} sources", hits.len());

        Ok(Answer {
            answer,
            sources: sources_from_hits(&hits, self.settings.preview_chars),
        })
    }
}
