//! Axum route handlers for career-path planning.

use std::collections::BTreeSet;

use axum::Json;
use serde::Deserialize;

use crate::errors::AppError;
use crate::recommend::career::{compare_to_role, target_roles, CareerComparison, RoleSummary};

#[derive(Debug, Deserialize)]
pub struct CareerCompareRequest {
    pub role: String,
    #[serde(default)]
    pub skills: Vec<String>,
}

/// GET /api/v1/career/roles
pub async fn handle_list_roles() -> Json<Vec<RoleSummary>> {
    Json(target_roles())
}

/// POST /api/v1/career/compare
///
/// Marks each core and secondary skill of the role as present or missing.
pub async fn handle_compare_role(
    Json(request): Json<CareerCompareRequest>,
) -> Result<Json<CareerComparison>, AppError> {
    let skills: BTreeSet<String> = request.skills.into_iter().collect();
    compare_to_role(&request.role, &skills)
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Unknown target role '{}'", request.role)))
}
