//! Sentence-embedding backends used by the clustering engine.
//!
//! - [`LocalEmbedder`]: in-process fastembed model (feature `local-embeddings`),
//!   loaded once at startup and run on the blocking pool.
//! - [`OllamaEmbedder`]: `POST /api/embed` on a local Ollama instance.
//! - [`UnavailableEmbedder`]: stands in when no backend could be initialised;
//!   every call fails so the pipeline reports the service as unavailable.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::Config;

pub const DEFAULT_LOCAL_MODEL: &str = "all-minilm-l6-v2";
pub const DEFAULT_OLLAMA_MODEL: &str = "nomic-embed-text";

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("Embedding backend unavailable: {0}")]
    Unavailable(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Embedding API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Embedding model error: {0}")]
    Model(String),

    #[error("Expected {expected} embeddings, got {actual}")]
    CountMismatch { expected: usize, actual: usize },
}

/// Maps texts to fixed-length vectors, one per input, in input order.
#[async_trait]
pub trait Embedder: Send + Sync {
    fn model_name(&self) -> &str;

    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError>;
}

// ============ Unavailable ============

pub struct UnavailableEmbedder {
    reason: String,
}

impl UnavailableEmbedder {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl Embedder for UnavailableEmbedder {
    fn model_name(&self) -> &str {
        "unavailable"
    }

    async fn embed(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        Err(EmbeddingError::Unavailable(self.reason.clone()))
    }
}

// ============ Ollama ============

#[derive(Debug, Deserialize)]
struct OllamaEmbedResponse {
    embeddings: Vec<Vec<f32>>,
}

pub struct OllamaEmbedder {
    client: reqwest::Client,
    url: String,
    model: String,
}

impl OllamaEmbedder {
    pub fn new(url: &str, model: &str, timeout: Duration) -> Result<Self, EmbeddingError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        })
    }
}

#[async_trait]
impl Embedder for OllamaEmbedder {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        let body = serde_json::json!({ "model": self.model, "input": texts });

        let response = self
            .client
            .post(format!("{}/api/embed", self.url))
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                warn!("Ollama embed request failed: {e}");
                EmbeddingError::Http(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(EmbeddingError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: OllamaEmbedResponse = response.json().await?;
        if parsed.embeddings.len() != texts.len() {
            return Err(EmbeddingError::CountMismatch {
                expected: texts.len(),
                actual: parsed.embeddings.len(),
            });
        }
        Ok(parsed.embeddings)
    }
}

// ============ Local (fastembed) ============

#[cfg(feature = "local-embeddings")]
pub use local::LocalEmbedder;

#[cfg(feature = "local-embeddings")]
mod local {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};

    use super::{Embedder, EmbeddingError};

    /// fastembed model held for the life of the process.
    pub struct LocalEmbedder {
        model_name: String,
        model: Arc<Mutex<TextEmbedding>>,
    }

    impl LocalEmbedder {
        /// Loads (downloading on first use) the named model. Blocking.
        pub fn load(model_name: &str) -> Result<Self, EmbeddingError> {
            let model = TextEmbedding::try_new(InitOptions::new(to_fastembed_model(model_name)?))
                .map_err(|e| EmbeddingError::Model(format!("failed to load {model_name}: {e}")))?;
            Ok(Self {
                model_name: model_name.to_string(),
                model: Arc::new(Mutex::new(model)),
            })
        }
    }

    fn to_fastembed_model(name: &str) -> Result<EmbeddingModel, EmbeddingError> {
        match name {
            "all-minilm-l6-v2" => Ok(EmbeddingModel::AllMiniLML6V2),
            "all-minilm-l12-v2" => Ok(EmbeddingModel::AllMiniLML12V2),
            "bge-small-en-v1.5" => Ok(EmbeddingModel::BGESmallENV15),
            "bge-base-en-v1.5" => Ok(EmbeddingModel::BGEBaseENV15),
            "nomic-embed-text-v1.5" => Ok(EmbeddingModel::NomicEmbedTextV15),
            other => Err(EmbeddingError::Model(format!(
                "unknown local embedding model '{other}'"
            ))),
        }
    }

    #[async_trait]
    impl Embedder for LocalEmbedder {
        fn model_name(&self) -> &str {
            &self.model_name
        }

        async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
            if texts.is_empty() {
                return Ok(Vec::new());
            }
            let model = Arc::clone(&self.model);
            let texts = texts.to_vec();
            tokio::task::spawn_blocking(move || {
                let mut model = model
                    .lock()
                    .map_err(|_| EmbeddingError::Model("embedding model lock poisoned".into()))?;
                model
                    .embed(texts, None)
                    .map_err(|e| EmbeddingError::Model(e.to_string()))
            })
            .await
            .map_err(|e| EmbeddingError::Model(format!("embedding task failed: {e}")))?
        }
    }
}

/// Builds the configured embedder. Initialisation failures are logged and
/// degrade to [`UnavailableEmbedder`] so the rest of the service still starts.
pub async fn create_embedder(config: &Config) -> Box<dyn Embedder> {
    let timeout = Duration::from_secs(config.request_timeout_secs);
    let result: Result<Box<dyn Embedder>, EmbeddingError> = match config.embedding_provider.as_str()
    {
        "ollama" => {
            let model = config.embedding_model.as_deref().unwrap_or(DEFAULT_OLLAMA_MODEL);
            OllamaEmbedder::new(&config.ollama_url, model, timeout)
                .map(|e| Box::new(e) as Box<dyn Embedder>)
        }
        "local" => load_local(config.embedding_model.as_deref()).await,
        _ => Err(EmbeddingError::Unavailable(
            "embedding provider is disabled".into(),
        )),
    };

    match result {
        Ok(embedder) => {
            info!("Embedder initialized (model: {})", embedder.model_name());
            embedder
        }
        Err(e) => {
            warn!("Embedder unavailable, clustering will be disabled: {e}");
            Box::new(UnavailableEmbedder::new(e.to_string()))
        }
    }
}

#[cfg(feature = "local-embeddings")]
async fn load_local(model: Option<&str>) -> Result<Box<dyn Embedder>, EmbeddingError> {
    let model = model.unwrap_or(DEFAULT_LOCAL_MODEL).to_string();
    tokio::task::spawn_blocking(move || LocalEmbedder::load(&model))
        .await
        .map_err(|e| EmbeddingError::Model(format!("model load task failed: {e}")))?
        .map(|e| Box::new(e) as Box<dyn Embedder>)
}

#[cfg(not(feature = "local-embeddings"))]
async fn load_local(_model: Option<&str>) -> Result<Box<dyn Embedder>, EmbeddingError> {
    Err(EmbeddingError::Unavailable(
        "local embeddings require --features local-embeddings".into(),
    ))
}
