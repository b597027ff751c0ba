mod analysis;
mod config;
mod embedding;
mod errors;
mod github;
mod llm_client;
mod models;
mod profile;
mod recommend;
mod report;
mod routes;
mod state;
mod summarizer;
#[cfg(test)]
mod test_support;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analysis::projection::StressLayout;
use crate::config::Config;
use crate::embedding::{create_embedder, Embedder};
use crate::github::{CachedGitHub, GitHubClient};
use crate::llm_client::create_generator;
use crate::routes::build_router;
use crate::state::AppState;
use crate::summarizer::Summarizer;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on unknown providers or missing keys)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Portfolio API v{}", env!("CARGO_PKG_VERSION"));

    let timeout = Duration::from_secs(config.request_timeout_secs);

    // Embedding model (may take a while on first download)
    let embedder: Arc<dyn Embedder> = Arc::from(create_embedder(&config).await);

    // Summary generator; absent when disabled
    let summarizer = Summarizer::new(create_generator(&config));
    info!("Summaries available: {}", summarizer.is_available());

    // GitHub client with per-user fetch cache
    let client = GitHubClient::new(
        &config.github_api_url,
        config.github_token.clone(),
        config.github_max_commit_pages,
        timeout,
    )?;
    let github = Arc::new(CachedGitHub::new(
        client,
        Duration::from_secs(config.fetch_cache_ttl_secs),
    ));
    info!(
        "GitHub client initialized ({}, cache ttl {}s)",
        config.github_api_url, config.fetch_cache_ttl_secs
    );

    let state = AppState {
        config: config.clone(),
        embedder,
        projector: Arc::new(StressLayout::default()),
        summarizer,
        github,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
