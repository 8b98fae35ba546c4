//! Embedding gateway: retry, validation and pacing around a provider.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::sleep;
use tracing::debug;

use crate::core::error::{DocMindError, Result};
use crate::core::providers::{EmbeddingProvider, ProviderError};
use crate::core::retry::RetryPolicy;

/// Stateless wrapper turning an unreliable embedding call into a
/// bounded one.
///
/// Every successful call is followed by a fixed pacing delay, so a
/// sequential caller never exceeds one request per `pacing` interval
/// regardless of how many retries happened before.
#[derive(Clone)]
pub struct EmbeddingGateway {
    provider: Arc<dyn EmbeddingProvider>,
    retry: RetryPolicy,
    pacing: Duration,
    expected_dimension: Option<usize>,
}

impl EmbeddingGateway {
    pub fn new(provider: Arc<dyn EmbeddingProvider>, retry: RetryPolicy, pacing: Duration) -> Self {
        Self {
            provider,
            retry,
            pacing,
            expected_dimension: None,
        }
    }

    /// Reject vectors whose length differs from `dimension`
    pub fn with_expected_dimension(mut self, dimension: Option<usize>) -> Self {
        self.expected_dimension = dimension;
        self
    }

    /// Same provider and retry policy, different pacing
    pub fn with_pacing(&self, pacing: Duration) -> Self {
        Self {
            pacing,
            ..self.clone()
        }
    }

    pub fn pacing(&self) -> Duration {
        self.pacing
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    pub fn model_name(&self) -> &str {
        self.provider.model_name()
    }

    /// Embed `text`, retrying transient failures.
    ///
    /// `target` names what is being embedded (a chunk id, "query")
    /// and only shows up in logs and errors.
    pub async fn embed(&self, target: &str, text: &str) -> Result<Vec<f32>> {
        let vector = self
            .retry
            .execute(|| self.embed_once(text))
            .await
            .map_err(|exhausted| DocMindError::TransientCallExhausted {
                target: target.to_string(),
                attempts: exhausted.attempts,
                source: exhausted.last_error,
            })?;

        debug!("Embedded {} ({} dims)", target, vector.len());

        if !self.pacing.is_zero() {
            sleep(self.pacing).await;
        }

        Ok(vector)
    }

    async fn embed_once(&self, text: &str) -> std::result::Result<Vec<f32>, ProviderError> {
        let vector = self.provider.embed(text).await?;

        if vector.is_empty() {
            return Err(ProviderError::InvalidResponse(
                "provider returned an empty vector".to_string(),
            ));
        }
        if let Some(pos) = vector.iter().position(|x| !x.is_finite()) {
            return Err(ProviderError::InvalidResponse(format!(
                "component {} of the vector is {}",
                pos, vector[pos]
            )));
        }
        if let Some(expected) = self.expected_dimension {
            if vector.len() != expected {
                return Err(ProviderError::InvalidResponse(format!(
                    "expected {} dimensions, got {}",
                    expected,
                    vector.len()
                )));
            }
        }

        Ok(vector)
    }
}
