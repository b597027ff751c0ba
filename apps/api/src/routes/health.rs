use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns service status plus which model backends are active.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "portfolio-api",
        "embedding_provider": state.config.embedding_provider,
        "embedding_model": state.embedder.model_name(),
        "summaries_available": state.summarizer.is_available(),
    }))
}
