//! OpenAI-compatible HTTP providers.
//!
//! Both adapters speak the de-facto standard `/v1/embeddings` and
//! `/v1/chat/completions` endpoints, so any compatible server
//! (OpenAI, a local llama.cpp/vLLM gateway, ...) can be used by
//! pointing `base_url` at it.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{AnswerSynthesizer, EmbeddingProvider, ProviderError};

/// Longest provider error body kept in an error message
const MAX_ERROR_BODY_CHARS: usize = 500;

fn normalize_base_url(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}

fn has_version_suffix(base_url: &str) -> bool {
    let Some(last_segment) = base_url.rsplit('/').next() else {
        return false;
    };
    let Some(rest) = last_segment.strip_prefix('v') else {
        return false;
    };
    !rest.is_empty() && rest.chars().all(|c| c.is_ascii_digit())
}

/// Resolve `path` (e.g. `embeddings`) against a base URL that may or
/// may not already carry a version segment.
fn endpoint(base_url: &str, path: &str) -> String {
    let normalized = normalize_base_url(base_url);
    if normalized.ends_with(&format!("/{path}")) {
        return normalized;
    }
    if has_version_suffix(&normalized) {
        return format!("{normalized}/{path}");
    }
    format!("{normalized}/v1/{path}")
}

fn read_api_key(api_key_env: &str) -> Option<String> {
    std::env::var(api_key_env)
        .ok()
        .filter(|key| !key.trim().is_empty())
}

fn build_client(timeout: Duration) -> Result<reqwest::Client, ProviderError> {
    Ok(reqwest::Client::builder().timeout(timeout).build()?)
}

async fn post_json<Req, Resp>(
    client: &reqwest::Client,
    url: &str,
    api_key: Option<&str>,
    api_key_env: &str,
    body: &Req,
) -> Result<Resp, ProviderError>
where
    Req: Serialize + ?Sized,
    Resp: for<'de> Deserialize<'de>,
{
    let key = api_key.ok_or_else(|| ProviderError::MissingApiKey(api_key_env.to_string()))?;

    let response = client.post(url).bearer_auth(key).json(body).send().await?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ProviderError::Status {
            status: status.as_u16(),
            body: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
        });
    }

    Ok(response.json::<Resp>().await?)
}

/// Embeddings through `POST {base_url}/v1/embeddings`
pub struct OpenAiEmbeddingProvider {
    client: reqwest::Client,
    api_key: Option<String>,
    api_key_env: String,
    base_url: String,
    model: String,
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: Vec<&'a str>,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

impl OpenAiEmbeddingProvider {
    /// Build a provider reading its API key from `api_key_env`.
    ///
    /// A missing key is not an error here; calls fail with
    /// [`ProviderError::MissingApiKey`] instead, so a server can
    /// still start and report the problem per request.
    pub fn new(
        base_url: &str,
        model: &str,
        api_key_env: &str,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        Ok(Self {
            client: build_client(timeout)?,
            api_key: read_api_key(api_key_env),
            api_key_env: api_key_env.to_string(),
            base_url: normalize_base_url(base_url),
            model: model.to_string(),
        })
    }

    /// Whether an API key was found in the environment
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, ProviderError> {
        let request = EmbeddingRequest {
            model: &self.model,
            input: vec![text],
        };

        let response: EmbeddingResponse = post_json(
            &self.client,
            &endpoint(&self.base_url, "embeddings"),
            self.api_key.as_deref(),
            &self.api_key_env,
            &request,
        )
        .await?;

        response
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| ProviderError::InvalidResponse("empty embedding response".to_string()))
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

/// Answer synthesis through `POST {base_url}/v1/chat/completions`
pub struct OpenAiChatSynthesizer {
    client: reqwest::Client,
    api_key: Option<String>,
    api_key_env: String,
    base_url: String,
    model: String,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    content: Option<String>,
}

impl OpenAiChatSynthesizer {
    pub fn new(
        base_url: &str,
        model: &str,
        api_key_env: &str,
        temperature: f32,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        Ok(Self {
            client: build_client(timeout)?,
            api_key: read_api_key(api_key_env),
            api_key_env: api_key_env.to_string(),
            base_url: normalize_base_url(base_url),
            model: model.to_string(),
            temperature,
        })
    }

    /// Whether an API key was found in the environment
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}

#[async_trait]
impl AnswerSynthesizer for OpenAiChatSynthesizer {
    async fn generate(
        &self,
        system_instructions: &str,
        context: &str,
        query: &str,
    ) -> Result<String, ProviderError> {
        let system = format!("{system_instructions}\n\n{context}");
        let request = ChatRequest {
            model: &self.model,
            temperature: self.temperature,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &system,
                },
                ChatMessage {
                    role: "user",
                    content: query,
                },
            ],
        };

        let response: ChatResponse = post_json(
            &self.client,
            &endpoint(&self.base_url, "chat/completions"),
            self.api_key.as_deref(),
            &self.api_key_env,
            &request,
        )
        .await?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| ProviderError::InvalidResponse("no completion choices".to_string()))
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
