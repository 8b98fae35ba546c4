//! Unified service container for DocMind
//!
//! Wires configuration, providers, the index handle and both
//! pipelines together. The HTTP server and the CLI build one of
//! these at startup and use nothing else.

use crate::core::answer::{AnswerPipeline, AnswerSettings};
use crate::core::config::Config;
use crate::core::error::{DocMindError, Result};
use crate::core::gateway::EmbeddingGateway;
use crate::core::indexer::{Chunker, DirectoryLoader, IngestionPipeline};
use crate::core::providers::{
    AnswerSynthesizer, EmbeddingProvider, OpenAiChatSynthesizer, OpenAiEmbeddingProvider,
};
use crate::core::retry::RetryPolicy;
use crate::core::storage::IndexHandle;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Unified services container
///
/// All adapters use this same struct for service access.
#[derive(Clone)]
pub struct Services {
    /// Application configuration
    pub config: Arc<Config>,

    /// Serving index, empty until [`Services::load_index`] succeeds
    pub index: IndexHandle,

    /// Embedding gateway with ingestion pacing
    pub gateway: EmbeddingGateway,

    /// Question answering over `index`
    pub answer: AnswerPipeline,
}

impl Services {
    /// Create services backed by the OpenAI-compatible providers
    /// named in the configuration
    pub fn new(config: Config) -> Result<Self> {
        let embedder = OpenAiEmbeddingProvider::new(
            &config.embedding.base_url,
            &config.embedding.model,
            &config.embedding.api_key_env,
            Duration::from_secs(config.embedding.timeout_sec),
        )
        .map_err(|e| DocMindError::ConfigError(e.to_string()))?;

        let synthesizer = OpenAiChatSynthesizer::new(
            &config.generation.base_url,
            &config.generation.model,
            &config.generation.api_key_env,
            config.generation.temperature,
            Duration::from_secs(config.generation.timeout_sec),
        )
        .map_err(|e| DocMindError::ConfigError(e.to_string()))?;

        if !embedder.has_api_key() {
            tracing::warn!(
                "{} is not set; embedding requests will fail until it is",
                config.embedding.api_key_env
            );
        }
        if !synthesizer.has_api_key() {
            tracing::warn!(
                "{} is not set; answer generation will fail until it is",
                config.generation.api_key_env
            );
        }

        Ok(Self::with_providers(
            config,
            Arc::new(embedder),
            Arc::new(synthesizer),
        ))
    }

    /// Create services with explicit providers
    pub fn with_providers(
        config: Config,
        embedder: Arc<dyn EmbeddingProvider>,
        synthesizer: Arc<dyn AnswerSynthesizer>,
    ) -> Self {
        let retry = RetryPolicy::new(config.embedding.max_attempts, config.embedding.backoff());
        let gateway = EmbeddingGateway::new(
            embedder,
            retry,
            Duration::from_millis(config.embedding.pacing_ms),
        )
        .with_expected_dimension(config.embedding.dimensions);

        let index = IndexHandle::empty();
        let answer = AnswerPipeline::new(
            index.clone(),
            gateway.with_pacing(Duration::from_millis(config.answer.query_pacing_ms)),
            synthesizer,
            AnswerSettings {
                top_k: config.answer.top_k,
                preview_chars: config.answer.preview_chars,
                max_query_length: config.answer.max_query_length,
            },
        );

        Self {
            config: Arc::new(config),
            index,
            gateway,
            answer,
        }
    }

    /// Load the configured snapshot into the serving handle.
    ///
    /// Returns whether an index is now available.
    pub fn load_index(&self) -> bool {
        self.index.load_at_startup(&self.config.index.path)
    }

    /// Ingestion pipeline writing to `index_path` (the configured
    /// path when `None`)
    pub fn ingestion_pipeline(&self, index_path: Option<&Path>) -> IngestionPipeline {
        IngestionPipeline::new(
            Chunker::new(self.config.chunking.chunk_size, self.config.chunking.overlap),
            self.gateway.clone(),
            self.config.index.metric,
            index_path.unwrap_or(self.config.index.path.as_path()),
        )
    }

    /// Document loader for `source_dir` (the configured directory
    /// when `None`)
    pub fn document_loader(&self, source_dir: Option<&Path>) -> Result<DirectoryLoader> {
        let docs = &self.config.documents;
        DirectoryLoader::new(
            source_dir.unwrap_or(docs.source_dir.as_path()),
            docs.include_patterns.clone(),
            docs.exclude_patterns.clone(),
            docs.max_file_size_mb,
        )
    }
}
