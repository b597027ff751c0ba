//! Axum route handlers for profile-document analysis.

use axum::{
    extract::{Multipart, State},
    Json,
};
use bytes::Bytes;
use serde::Serialize;
use tracing::info;

use crate::errors::AppError;
use crate::models::profile::ProfileDocument;
use crate::profile::{parse_profile, DocumentKind};
use crate::recommend::profile::profile_recommendations;
use crate::state::AppState;

pub const UPLOAD_FIELD: &str = "file";
pub const NOTHING_EXTRACTED: &str = "Could not extract any information from the provided LinkedIn file. Please check the file and try again.";

#[derive(Debug, Serialize)]
pub struct ProfileAnalysisResponse {
    pub profile: ProfileDocument,
    pub recommendations: Vec<String>,
}

/// POST /api/v1/analysis/profile
///
/// Multipart upload with a `file` field holding an HTML or PDF profile export.
pub async fn handle_profile_analysis(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ProfileAnalysisResponse>, AppError> {
    let mut upload: Option<(Option<String>, Option<String>, Bytes)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed upload: {e}")))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let content_type = field.content_type().map(str::to_string);
        let filename = field.file_name().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Malformed upload: {e}")))?;
        upload = Some((content_type, filename, bytes));
        break;
    }

    let (content_type, filename, bytes) = upload
        .ok_or_else(|| AppError::Validation(format!("Missing '{UPLOAD_FIELD}' field")))?;
    if bytes.is_empty() {
        return Err(AppError::Validation("Uploaded file is empty".to_string()));
    }

    let kind = DocumentKind::detect(content_type.as_deref(), filename.as_deref(), &bytes);
    let profile = parse_profile(&bytes, kind)?;
    if profile.is_empty() {
        return Err(AppError::UnprocessableEntity(NOTHING_EXTRACTED.to_string()));
    }

    let recommendations = profile_recommendations(&profile, &state.summarizer).await;
    info!(
        ?kind,
        experience = profile.experience.len(),
        skills = profile.skills.len(),
        "Profile analysed"
    );

    Ok(Json(ProfileAnalysisResponse {
        profile,
        recommendations,
    }))
}
