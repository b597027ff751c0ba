//! Deterministic stand-ins for the model-backed services, shared by unit tests.

use async_trait::async_trait;

use crate::embedding::{Embedder, EmbeddingError};
use crate::llm_client::{LlmError, TextGenerator};

/// Bag-of-words embedder: one dimension per vocabulary word, holding the
/// number of times that word appears in the lowercased text.
pub struct KeywordEmbedder {
    vocabulary: Vec<String>,
}

impl KeywordEmbedder {
    pub fn new(vocabulary: &[&str]) -> Self {
        Self {
            vocabulary: vocabulary.iter().map(|w| w.to_lowercase()).collect(),
        }
    }
}

#[async_trait]
impl Embedder for KeywordEmbedder {
    fn model_name(&self) -> &str {
        "keyword-test"
    }

    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        Ok(texts
            .iter()
            .map(|text| {
                let lowered = text.to_lowercase();
                let tokens: Vec<&str> = lowered.split_whitespace().collect();
                self.vocabulary
                    .iter()
                    .map(|word| tokens.iter().filter(|t| **t == word.as_str()).count() as f32)
                    .collect()
            })
            .collect())
    }
}

pub struct FailingEmbedder;

#[async_trait]
impl Embedder for FailingEmbedder {
    fn model_name(&self) -> &str {
        "failing-test"
    }

    async fn embed(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        Err(EmbeddingError::Unavailable("test embedder".into()))
    }
}

/// Returns the prompt unchanged.
pub struct EchoGenerator;

#[async_trait]
impl TextGenerator for EchoGenerator {
    fn model_name(&self) -> &str {
        "echo-test"
    }

    async fn generate(&self, prompt: &str, _system: &str) -> Result<String, LlmError> {
        Ok(prompt.to_string())
    }
}

/// Returns a fixed reply regardless of the prompt.
pub struct CannedGenerator(pub &'static str);

#[async_trait]
impl TextGenerator for CannedGenerator {
    fn model_name(&self) -> &str {
        "canned-test"
    }

    async fn generate(&self, _prompt: &str, _system: &str) -> Result<String, LlmError> {
        Ok(self.0.to_string())
    }
}

pub struct FailingGenerator;

#[async_trait]
impl TextGenerator for FailingGenerator {
    fn model_name(&self) -> &str {
        "failing-test"
    }

    async fn generate(&self, _prompt: &str, _system: &str) -> Result<String, LlmError> {
        Err(LlmError::EmptyContent)
    }
}
