use std::sync::Arc;

use crate::analysis::projection::Projector;
use crate::config::Config;
use crate::embedding::Embedder;
use crate::github::RepositorySource;
use crate::summarizer::Summarizer;

/// Shared application state injected into all route handlers via Axum extractors.
/// Model-backed services are built once at startup and shared by every request.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub embedder: Arc<dyn Embedder>,
    /// 2-D layout used for the cluster scatter plot.
    pub projector: Arc<dyn Projector>,
    pub summarizer: Summarizer,
    /// GitHub client behind the per-user fetch cache.
    pub github: Arc<dyn RepositorySource>,
}
