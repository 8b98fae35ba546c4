//! Configuration management for the DocMind service.
//!
//! This module handles loading configuration from TOML files and
//! environment variables, with sensible defaults for all settings.

use crate::core::error::{DocMindError, Result};
use crate::core::retry::Backoff;
use crate::core::storage::Metric;
use crate::core::xdg::XdgDirs;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub chunking: ChunkingConfig,
    #[serde(default)]
    pub documents: DocumentsConfig,
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    #[serde(default)]
    pub generation: GenerationConfig,
    #[serde(default)]
    pub index: IndexConfig,
    #[serde(default)]
    pub answer: AnswerConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

/// Chunking configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChunkingConfig {
    /// Characters per chunk (not bytes!)
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Character overlap between consecutive chunks
    #[serde(default = "default_overlap")]
    pub overlap: usize,
}

/// Document source configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DocumentsConfig {
    /// Directory scanned for documents
    #[serde(default = "default_source_dir")]
    pub source_dir: PathBuf,

    /// File patterns to include (glob syntax)
    #[serde(default = "default_include_patterns")]
    pub include_patterns: Vec<String>,

    /// File patterns to exclude (glob syntax)
    #[serde(default = "default_exclude_patterns")]
    pub exclude_patterns: Vec<String>,

    /// Maximum file size in MB (skip larger files)
    #[serde(default = "default_max_file_size")]
    pub max_file_size_mb: usize,
}

/// Embedding provider configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EmbeddingConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_embedding_model")]
    pub model: String,

    /// Expected vector dimension; any size is accepted when unset
    #[serde(default)]
    pub dimensions: Option<usize>,

    /// Environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Total attempts per embedding call
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Delay schedule between attempts
    #[serde(default)]
    pub backoff: BackoffKind,

    /// Backoff unit: with `linear` the n-th retry waits n × this,
    /// with `fixed` every retry waits exactly this
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,

    /// Pause after every successful call during ingestion
    #[serde(default = "default_pacing_ms")]
    pub pacing_ms: u64,

    #[serde(default = "default_embedding_timeout")]
    pub timeout_sec: u64,
}

/// Retry delay schedule selector
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BackoffKind {
    #[default]
    Linear,
    Fixed,
}

impl EmbeddingConfig {
    /// Retry delay schedule built from `backoff` and `base_delay_ms`
    pub fn backoff(&self) -> Backoff {
        let base = Duration::from_millis(self.base_delay_ms);
        match self.backoff {
            BackoffKind::Linear => Backoff::Linear { base },
            BackoffKind::Fixed => Backoff::Fixed(base),
        }
    }
}

/// Answer model configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GenerationConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_generation_model")]
    pub model: String,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    #[serde(default = "default_generation_timeout")]
    pub timeout_sec: u64,
}

/// Vector index configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IndexConfig {
    /// Snapshot directory
    #[serde(default = "default_index_path")]
    pub path: PathBuf,

    #[serde(default)]
    pub metric: Metric,
}

/// Answer pipeline configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AnswerConfig {
    /// Chunks retrieved per question
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Characters of each source shown in responses
    #[serde(default = "default_preview_chars")]
    pub preview_chars: usize,

    #[serde(default = "default_max_query_length")]
    pub max_query_length: usize,

    /// Pause after embedding a question
    #[serde(default)]
    pub query_pacing_ms: u64,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_sec: u64,
}

// Default value functions
fn default_chunk_size() -> usize {
    1000
}

fn default_overlap() -> usize {
    200
}

fn default_source_dir() -> PathBuf {
    PathBuf::from("./base")
}

fn default_include_patterns() -> Vec<String> {
    vec!["*.txt".to_string(), "*.md".to_string(), "*.pdf".to_string()]
}

fn default_exclude_patterns() -> Vec<String> {
    vec![
        "**/.git/**".to_string(),
        "**/node_modules/**".to_string(),
        "**/target/**".to_string(),
        "**/build/**".to_string(),
        "**/dist/**".to_string(),
    ]
}

fn default_max_file_size() -> usize {
    20
}

fn default_base_url() -> String {
    "https://api.openai.com".to_string()
}

fn default_embedding_model() -> String {
    "text-embedding-3-small".to_string()
}

fn default_generation_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

fn default_max_attempts() -> u32 {
    3
}

fn default_base_delay_ms() -> u64 {
    10_000
}

fn default_pacing_ms() -> u64 {
    2_000
}

fn default_embedding_timeout() -> u64 {
    60
}

fn default_generation_timeout() -> u64 {
    120
}

fn default_temperature() -> f32 {
    0.2
}

fn default_index_path() -> PathBuf {
    PathBuf::from("./data/index")
}

fn default_top_k() -> usize {
    3
}

fn default_preview_chars() -> usize {
    200
}

fn default_max_query_length() -> usize {
    2000
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_request_timeout() -> u64 {
    300
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            overlap: default_overlap(),
        }
    }
}

impl Default for DocumentsConfig {
    fn default() -> Self {
        Self {
            source_dir: default_source_dir(),
            include_patterns: default_include_patterns(),
            exclude_patterns: default_exclude_patterns(),
            max_file_size_mb: default_max_file_size(),
        }
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_embedding_model(),
            dimensions: None,
            api_key_env: default_api_key_env(),
            max_attempts: default_max_attempts(),
            backoff: BackoffKind::default(),
            base_delay_ms: default_base_delay_ms(),
            pacing_ms: default_pacing_ms(),
            timeout_sec: default_embedding_timeout(),
        }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_generation_model(),
            temperature: default_temperature(),
            api_key_env: default_api_key_env(),
            timeout_sec: default_generation_timeout(),
        }
    }
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            path: default_index_path(),
            metric: Metric::default(),
        }
    }
}

impl Default for AnswerConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
            preview_chars: default_preview_chars(),
            max_query_length: default_max_query_length(),
            query_pacing_ms: 0,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout_sec: default_request_timeout(),
        }
    }
}

/// Parse an environment variable, ignoring unset or malformed values
fn env_parse<T: FromStr>(var: &str) -> Option<T> {
    env::var(var).ok().and_then(|v| v.trim().parse().ok())
}

fn config_error(msg: &str) -> DocMindError {
    DocMindError::ConfigError(msg.to_string())
}

impl Config {
    /// Load configuration from TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| DocMindError::ConfigError(format!("Failed to read config file: {e}")))?;

        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load config with priority: env vars > TOML > defaults
    ///
    /// This method uses XDG Base Directory specification for file locations.
    pub fn load() -> Result<Self> {
        let xdg = XdgDirs::new();
        Self::load_with_xdg(&xdg)
    }

    /// Load config with explicit XDG directories
    ///
    /// Priority order:
    /// 1. DOCMIND_CONFIG env var
    /// 2. XDG config file (~/.config/docmind/config.toml)
    /// 3. ./docmind.toml
    /// 4. Defaults
    pub fn load_with_xdg(xdg: &XdgDirs) -> Result<Self> {
        let mut config = if let Ok(config_path) = env::var("DOCMIND_CONFIG") {
            Self::from_file(config_path)?
        } else {
            let xdg_config = xdg.config_file();
            if xdg_config.exists() {
                Self::from_file(xdg_config)?
            } else if Path::new("docmind.toml").exists() {
                Self::from_file("docmind.toml")?
            } else {
                Self::default()
            }
        };

        // Index lives in the XDG data directory unless placed explicitly
        if config.index.path == default_index_path() {
            config.index.path = xdg.index_dir();
        }

        config.merge_env();
        config.validate()?;

        Ok(config)
    }

    /// Merge configuration with environment variables
    pub fn merge_env(&mut self) {
        // Chunking
        if let Some(size) = env_parse("DOCMIND_CHUNK_SIZE") {
            self.chunking.chunk_size = size;
        }
        if let Some(overlap) = env_parse("DOCMIND_OVERLAP") {
            self.chunking.overlap = overlap;
        }

        // Documents
        if let Ok(dir) = env::var("DOCMIND_SOURCE_DIR") {
            self.documents.source_dir = PathBuf::from(dir);
        }

        // Embedding
        if let Ok(url) = env::var("DOCMIND_EMBEDDING_URL") {
            self.embedding.base_url = url;
        }
        if let Ok(model) = env::var("DOCMIND_EMBEDDING_MODEL") {
            self.embedding.model = model;
        }
        if let Some(attempts) = env_parse("DOCMIND_MAX_ATTEMPTS") {
            self.embedding.max_attempts = attempts;
        }
        if let Some(delay) = env_parse("DOCMIND_BASE_DELAY_MS") {
            self.embedding.base_delay_ms = delay;
        }
        if let Some(pacing) = env_parse("DOCMIND_PACING_MS") {
            self.embedding.pacing_ms = pacing;
        }

        // Generation
        if let Ok(url) = env::var("DOCMIND_GENERATION_URL") {
            self.generation.base_url = url;
        }
        if let Ok(model) = env::var("DOCMIND_GENERATION_MODEL") {
            self.generation.model = model;
        }

        // Index
        if let Ok(path) = env::var("DOCMIND_INDEX_PATH") {
            self.index.path = PathBuf::from(path);
        }

        // Answer
        if let Some(k) = env_parse("DOCMIND_TOP_K") {
            self.answer.top_k = k;
        }

        // Server
        if let Ok(host) = env::var("DOCMIND_HOST") {
            self.server.host = host;
        }
        if let Some(port) = env_parse("DOCMIND_PORT") {
            self.server.port = port;
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.chunking.chunk_size == 0 {
            return Err(config_error("Chunk size must be non-zero"));
        }
        if self.chunking.overlap >= self.chunking.chunk_size {
            return Err(config_error("Overlap must be less than chunk size"));
        }

        if self.embedding.max_attempts == 0 {
            return Err(config_error("Embedding max_attempts must be at least 1"));
        }
        if self.embedding.dimensions == Some(0) {
            return Err(config_error("Embedding dimensions must be non-zero"));
        }

        if !(0.0..=2.0).contains(&self.generation.temperature) {
            return Err(config_error("Temperature must be between 0 and 2"));
        }

        if self.answer.top_k == 0 {
            return Err(config_error("top_k must be non-zero"));
        }
        if self.answer.preview_chars == 0 {
            return Err(config_error("preview_chars must be non-zero"));
        }
        if self.answer.max_query_length == 0 {
            return Err(config_error("Max query length must be non-zero"));
        }

        if self.server.port == 0 {
            return Err(config_error("Server port must be non-zero"));
        }
        if self.server.request_timeout_sec == 0 {
            return Err(config_error("Request timeout must be non-zero"));
        }

        Ok(())
    }

    /// Log configuration (API keys are never read here)
    pub fn log_config(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Chunk size: {} chars", self.chunking.chunk_size);
        tracing::info!("  Overlap: {} chars", self.chunking.overlap);
        tracing::info!("  Source dir: {:?}", self.documents.source_dir);
        tracing::info!(
            "  Include patterns: {:?}",
            self.documents.include_patterns
        );
        tracing::info!(
            "  Embedding: {} at {} (key from ${})",
            self.embedding.model,
            self.embedding.base_url,
            self.embedding.api_key_env
        );
        tracing::info!(
            "  Retry: {} attempts, {:?} backoff, {}ms base delay, {}ms pacing",
            self.embedding.max_attempts,
            self.embedding.backoff,
            self.embedding.base_delay_ms,
            self.embedding.pacing_ms
        );
        tracing::info!(
            "  Generation: {} at {} (temperature {})",
            self.generation.model,
            self.generation.base_url,
            self.generation.temperature
        );
        tracing::info!(
            "  Index: {:?} ({} metric)",
            self.index.path,
            self.index.metric
        );
        tracing::info!("  Top k: {}", self.answer.top_k);
        tracing::info!("  Max query length: {}", self.answer.max_query_length);
        tracing::info!("  Request timeout: {}s", self.server.request_timeout_sec);
    }
}
