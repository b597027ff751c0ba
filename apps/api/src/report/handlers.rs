//! Axum route handler for report export.

use axum::{
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;

use crate::errors::AppError;
use crate::report::{generate_report, ReportData, ReportFormat};

#[derive(Debug, Deserialize)]
pub struct ReportRequest {
    pub username: String,
    #[serde(default)]
    pub total_score: Option<u32>,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub recommendations: String,
    #[serde(default)]
    pub format: ReportFormat,
}

/// POST /api/v1/reports
///
/// Returns the rendered report as an attachment.
pub async fn handle_export_report(
    Json(request): Json<ReportRequest>,
) -> Result<Response, AppError> {
    if request.username.trim().is_empty() {
        return Err(AppError::Validation("username cannot be empty".to_string()));
    }

    let data = ReportData {
        username: request.username.trim().to_string(),
        total_score: request.total_score,
        summary: request.summary,
        recommendations: request.recommendations,
    };
    let report = generate_report(&data, request.format)
        .ok_or_else(|| AppError::Report(format!("rendering failed for {}", data.username)))?;

    Ok((
        [
            (header::CONTENT_TYPE, report.content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", report.filename),
            ),
        ],
        report.bytes,
    )
        .into_response())
}
