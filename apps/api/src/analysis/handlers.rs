//! Axum route handlers for the Resume Analysis API.

use axum::{
    extract::{multipart::MultipartError, Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::analysis::{analyze_upload, Upload, MAX_UPLOAD_BYTES};
use crate::errors::AppError;
use crate::models::analysis::ResumeAnalysis;
use crate::state::AppState;

/// Multipart field carrying the resume.
const FILE_FIELD: &str = "file";
const DEFAULT_RECENT_LIMIT: usize = 5;
const MAX_RECENT_LIMIT: usize = 100;

#[derive(Debug, Deserialize)]
pub struct RecentQuery {
    pub limit: Option<String>,
}

/// POST /api/resume/analyze
///
/// Accepts a multipart upload with a `file` field (PDF or DOCX, ≤ 5MB) and
/// returns the stored analysis. Identical resume text is served from cache.
pub async fn handle_analyze(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ResumeAnalysis>, AppError> {
    let mut upload: Option<Upload> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let filename = field
            .file_name()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or("resume")
            .to_string();
        let content_type = field.content_type().map(str::to_string);
        let data = field.bytes().await.map_err(multipart_error)?;

        upload = Some(Upload {
            filename,
            content_type,
            data,
        });
        break;
    }

    let upload = upload.ok_or_else(|| AppError::Validation("No file uploaded".to_string()))?;
    let analysis = analyze_upload(&state, upload).await?;
    Ok(Json(analysis))
}

/// GET /api/resume/analysis/:id
pub async fn handle_get_analysis(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ResumeAnalysis>, AppError> {
    let id: i64 = id
        .trim()
        .parse()
        .map_err(|_| AppError::Validation("Invalid ID format".to_string()))?;

    let analysis = state
        .analyses
        .get_analysis(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Analysis not found".to_string()))?;

    Ok(Json(analysis))
}

/// GET /api/resume/analyses/recent?limit=N
///
/// Newest first. `limit` defaults to 5 when missing, unparsable or zero.
pub async fn handle_recent_analyses(
    State(state): State<AppState>,
    Query(params): Query<RecentQuery>,
) -> Result<Json<Vec<ResumeAnalysis>>, AppError> {
    let limit = recent_limit(params.limit.as_deref());
    let analyses = state.analyses.recent_analyses(limit).await?;
    Ok(Json(analyses))
}

fn recent_limit(raw: Option<&str>) -> usize {
    match raw.and_then(|s| s.trim().parse::<usize>().ok()) {
        Some(0) | None => DEFAULT_RECENT_LIMIT,
        Some(n) => n.min(MAX_RECENT_LIMIT),
    }
}

fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(format!(
            "File too large. Maximum size is {}MB",
            MAX_UPLOAD_BYTES / (1024 * 1024)
        ))
    } else {
        AppError::Validation(format!("Malformed upload: {}", e.body_text()))
    }
}
