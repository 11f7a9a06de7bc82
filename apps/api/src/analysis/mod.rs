//! Resume analysis pipeline.
//!
//! upload → file type → text extraction → content hash → cache lookup
//! → resume check → LLM score → persist → cache store.

pub mod handlers;

use bytes::Bytes;
use tracing::{debug, info};

use crate::cache::content_hash;
use crate::errors::AppError;
use crate::extraction::{extract_text, resolve_kind};
use crate::models::analysis::{NewResumeAnalysis, ResumeAnalysis, ScoreCard};
use crate::state::AppState;

/// Largest accepted resume file.
pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

pub const INVALID_FILE_TYPE: &str = "Invalid file type. Only PDF and DOCX files are allowed.";
pub const EMPTY_RESUME: &str = "Resume text is empty. Cannot analyze an empty document.";

/// A file received from the multipart form.
#[derive(Debug, Clone)]
pub struct Upload {
    pub filename: String,
    pub content_type: Option<String>,
    pub data: Bytes,
}

/// Runs the full pipeline for one uploaded file.
pub async fn analyze_upload(state: &AppState, upload: Upload) -> Result<ResumeAnalysis, AppError> {
    if upload.data.len() > MAX_UPLOAD_BYTES {
        return Err(AppError::PayloadTooLarge(format!(
            "File too large. Maximum size is {}MB",
            MAX_UPLOAD_BYTES / (1024 * 1024)
        )));
    }

    let kind = resolve_kind(upload.content_type.as_deref(), Some(&upload.filename))
        .ok_or_else(|| AppError::UnsupportedFileType(INVALID_FILE_TYPE.to_string()))?;

    let text = extract_text(kind, upload.data).await?;
    let text = text.trim();
    if text.is_empty() {
        return Err(AppError::UnprocessableEntity(EMPTY_RESUME.to_string()));
    }

    let hash = content_hash(text);
    if let Some(cached) = state.cache.get(&hash).await {
        debug!("Cache hit for {hash}: returning analysis {}", cached.id);
        return Ok(cached);
    }
    debug!("Cache miss for {hash}, scoring with {} backend", state.scorer.backend());

    let card = if state.scorer.is_resume(text).await? {
        state.scorer.score(text).await?
    } else {
        info!("Upload '{}' does not look like a resume", upload.filename);
        ScoreCard::not_a_resume()
    };

    let analysis = state
        .analyses
        .create_analysis(NewResumeAnalysis {
            filename: upload.filename,
            file_type: kind.mime().to_string(),
            card,
        })
        .await?;

    info!(
        "Created analysis {} for '{}' (overall {})",
        analysis.id, analysis.filename, analysis.card.overall_score
    );

    state.cache.put(&hash, &analysis).await;
    Ok(analysis)
}
