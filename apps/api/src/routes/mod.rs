pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;
use crate::{analysis, profile, recommend, report};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Analysis API
        .route(
            "/api/v1/analysis/github",
            post(analysis::handlers::handle_github_analysis),
        )
        .route(
            "/api/v1/analysis/profile",
            post(profile::handlers::handle_profile_analysis),
        )
        .route(
            "/api/v1/projects/summary",
            post(analysis::handlers::handle_readme_summary),
        )
        // Career API
        .route(
            "/api/v1/career/roles",
            get(recommend::handlers::handle_list_roles),
        )
        .route(
            "/api/v1/career/compare",
            post(recommend::handlers::handle_compare_role),
        )
        // Report API
        .route("/api/v1/reports", post(report::handlers::handle_export_report))
        .with_state(state)
}
