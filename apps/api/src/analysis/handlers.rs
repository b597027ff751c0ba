//! Axum route handlers for the Analysis API.

use axum::{extract::State, Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::analysis::pipeline::{analyze_portfolio, AnalysisServices, PortfolioAnalysis};
use crate::errors::AppError;
use crate::github::{is_valid_login, parse_username};
use crate::models::project::ProjectRecord;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct GitHubAnalysisRequest {
    /// Bare username or profile URL.
    pub username: String,
    #[serde(default)]
    pub token: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ReadmeSummaryRequest {
    pub name: String,
    #[serde(default)]
    pub readme_content: String,
}

#[derive(Debug, Serialize)]
pub struct ReadmeSummaryResponse {
    pub name: String,
    pub summary: String,
}

/// POST /api/v1/analysis/github
///
/// Fetches the user's repositories and runs the full analysis pipeline.
pub async fn handle_github_analysis(
    State(state): State<AppState>,
    Json(request): Json<GitHubAnalysisRequest>,
) -> Result<Json<PortfolioAnalysis>, AppError> {
    let username = parse_username(&request.username);
    if username.is_empty() {
        return Err(AppError::Validation("username cannot be empty".to_string()));
    }
    if !is_valid_login(&username) {
        return Err(AppError::Validation(format!(
            "'{username}' is not a valid GitHub username"
        )));
    }
    let token = request
        .token
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty());

    let projects = state.github.fetch_projects(&username, token).await?;
    if projects.is_empty() {
        return Err(AppError::NotFound(format!(
            "Could not find any valid repositories for user '{username}'. Please check the username and token."
        )));
    }
    info!(username = %username, repositories = projects.len(), "Starting analysis");

    let services = AnalysisServices {
        embedder: state.embedder.as_ref(),
        projector: state.projector.as_ref(),
        summarizer: &state.summarizer,
    };
    let analysis =
        analyze_portfolio(&username, projects, services, Utc::now().date_naive()).await?;

    Ok(Json(analysis))
}

/// POST /api/v1/projects/summary
///
/// Model-written summary of a single project's README.
pub async fn handle_readme_summary(
    State(state): State<AppState>,
    Json(request): Json<ReadmeSummaryRequest>,
) -> Result<Json<ReadmeSummaryResponse>, AppError> {
    if request.name.trim().is_empty() {
        return Err(AppError::Validation("name cannot be empty".to_string()));
    }
    let project = ProjectRecord::new(request.name.trim(), "").with_readme(request.readme_content);
    let summary = state.summarizer.summarize_readme(&project).await;
    Ok(Json(ReadmeSummaryResponse {
        name: project.name,
        summary,
    }))
}
