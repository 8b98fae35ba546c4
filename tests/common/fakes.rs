// Deterministic model providers for tests

use async_trait::async_trait;
use docmind::core::providers::{AnswerSynthesizer, EmbeddingProvider, ProviderError};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

/// Default vocabulary used by the fixtures
#[allow(dead_code)]
pub const KEYWORDS: [&str; 4] = ["alpha", "beta", "gamma", "delta"];

/// Bag-of-keywords embedder.
///
/// One dimension per keyword plus a final bucket for every other
/// word; vectors are unit length so L2 ranks like cosine.
#[allow(dead_code)]
pub struct KeywordEmbedder {
    keywords: Vec<&'static str>,
    calls: AtomicU32,
}

#[allow(dead_code)]
impl KeywordEmbedder {
    pub fn new() -> Self {
        Self::with_keywords(&KEYWORDS)
    }

    pub fn with_keywords(keywords: &[&'static str]) -> Self {
        Self {
            keywords: keywords.to_vec(),
            calls: AtomicU32::new(0),
        }
    }

    pub fn dimension(&self) -> usize {
        self.keywords.len() + 1
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    /// The vector this embedder produces for `text`
    pub fn vector_for(&self, text: &str) -> Vec<f32> {
        let mut v = vec![0.0f32; self.dimension()];
        for word in text.split_whitespace() {
            let word = word
                .trim_matches(|c: char| !c.is_alphanumeric())
                .to_lowercase();
            if word.is_empty() {
                continue;
            }
            match self.keywords.iter().position(|k| *k == word) {
                Some(i) => v[i] += 1.0,
                None => v[self.keywords.len()] += 1.0,
            }
        }
        let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm == 0.0 {
            v[self.keywords.len()] = 1.0;
        } else {
            v.iter_mut().for_each(|x| *x /= norm);
        }
        v
    }
}

#[async_trait]
impl EmbeddingProvider for KeywordEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.vector_for(text))
    }

    fn model_name(&self) -> &str {
        "keyword-test"
    }
}

/// Keyword embedder that fails on demand.
///
/// The first `fail_first` calls return a 503. Any text containing
/// `poison` fails every time.
#[allow(dead_code)]
pub struct FlakyEmbedder {
    inner: KeywordEmbedder,
    fail_first: u32,
    poison: Option<&'static str>,
    calls: AtomicU32,
}

#[allow(dead_code)]
impl FlakyEmbedder {
    pub fn failing_first(fail_first: u32) -> Self {
        Self {
            inner: KeywordEmbedder::new(),
            fail_first,
            poison: None,
            calls: AtomicU32::new(0),
        }
    }

    pub fn poisoned(marker: &'static str) -> Self {
        Self {
            inner: KeywordEmbedder::new(),
            fail_first: 0,
            poison: Some(marker),
            calls: AtomicU32::new(0),
        }
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EmbeddingProvider for FlakyEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, ProviderError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        let poisoned = self.poison.is_some_and(|p| text.contains(p));
        if call <= self.fail_first || poisoned {
            return Err(ProviderError::Status {
                status: 503,
                body: "service busy".to_string(),
            });
        }
        self.inner.embed(text).await
    }

    fn model_name(&self) -> &str {
        "flaky-test"
    }
}

/// Synthesizer that answers with the query and remembers the context
#[allow(dead_code)]
pub struct EchoSynthesizer {
    last_context: Mutex<Option<String>>,
}

#[allow(dead_code)]
impl EchoSynthesizer {
    pub fn new() -> Self {
        Self {
            last_context: Mutex::new(None),
        }
    }

    pub fn last_context(&self) -> Option<String> {
        self.last_context.lock().unwrap().clone()
    }
}

#[async_trait]
impl AnswerSynthesizer for EchoSynthesizer {
    async fn generate(
        &self,
        _system_instructions: &str,
        context: &str,
        query: &str,
    ) -> Result<String, ProviderError> {
        *self.last_context.lock().unwrap() = Some(context.to_string());
        Ok(format!("answer to: {query}"))
    }

    fn model_name(&self) -> &str {
        "echo-test"
    }
}

/// Synthesizer whose upstream is always down
#[allow(dead_code)]
pub struct FailingSynthesizer;

#[async_trait]
impl AnswerSynthesizer for FailingSynthesizer {
    async fn generate(
        &self,
        _system_instructions: &str,
        _context: &str,
        _query: &str,
    ) -> Result<String, ProviderError> {
        Err(ProviderError::Status {
            status: 500,
            body: "internal error".to_string(),
        })
    }

    fn model_name(&self) -> &str {
        "failing-test"
    }
}

/// Keyword embedder that returns a NaN component for texts
/// containing `marker`
#[allow(dead_code)]
pub struct NonFiniteEmbedder {
    inner: KeywordEmbedder,
    marker: &'static str,
}

#[allow(dead_code)]
impl NonFiniteEmbedder {
    pub fn new(marker: &'static str) -> Self {
        Self {
            inner: KeywordEmbedder::new(),
            marker,
        }
    }
}

#[async_trait]
impl EmbeddingProvider for NonFiniteEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, ProviderError> {
        let mut v = self.inner.embed(text).await?;
        if text.contains(self.marker) {
            v[0] = f32::NAN;
        }
        Ok(v)
    }

    fn model_name(&self) -> &str {
        "non-finite-test"
    }
}
