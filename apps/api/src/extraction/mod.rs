//! Document text extraction for uploaded resumes.
//!
//! Parsing is delegated to `pdf-extract` and `docx-rs`. Both are synchronous
//! and CPU-bound, so extraction runs on the blocking pool.

mod docx;
mod pdf;

use std::path::Path;

use bytes::Bytes;
use thiserror::Error;
use tracing::warn;

pub const MIME_PDF: &str = "application/pdf";
pub const MIME_DOCX: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
pub const MIME_MSWORD: &str = "application/msword";

/// Content types browsers send when they don't know better.
const GENERIC_MIME_TYPES: &[&str] = &["application/octet-stream", "binary/octet-stream"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Docx,
    /// `application/msword`. Parsed as DOCX since most such uploads are mislabelled DOCX.
    LegacyWord,
}

impl DocumentKind {
    pub fn mime(self) -> &'static str {
        match self {
            DocumentKind::Pdf => MIME_PDF,
            DocumentKind::Docx => MIME_DOCX,
            DocumentKind::LegacyWord => MIME_MSWORD,
        }
    }
}

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Failed to extract text from PDF file.")]
    Pdf,

    #[error("Failed to extract text from DOCX file.")]
    Docx,

    #[error("Document parser crashed while reading the file.")]
    Crashed,
}

/// Resolves the document kind from the declared content type, falling back
/// to the file extension when the content type is missing or generic.
pub fn resolve_kind(content_type: Option<&str>, filename: Option<&str>) -> Option<DocumentKind> {
    let mime = content_type
        .map(|ct| ct.split(';').next().unwrap_or(ct).trim().to_ascii_lowercase())
        .filter(|ct| !ct.is_empty());

    match mime.as_deref() {
        Some(MIME_PDF) => Some(DocumentKind::Pdf),
        Some(MIME_DOCX) => Some(DocumentKind::Docx),
        Some(MIME_MSWORD) => Some(DocumentKind::LegacyWord),
        Some(other) if !GENERIC_MIME_TYPES.contains(&other) => None,
        _ => kind_from_extension(filename?),
    }
}

fn kind_from_extension(filename: &str) -> Option<DocumentKind> {
    let ext = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())?
        .to_ascii_lowercase();
    match ext.as_str() {
        "pdf" => Some(DocumentKind::Pdf),
        "docx" => Some(DocumentKind::Docx),
        "doc" => Some(DocumentKind::LegacyWord),
        _ => None,
    }
}

/// Extracts plain text from a document.
pub async fn extract_text(kind: DocumentKind, data: Bytes) -> Result<String, ExtractionError> {
    let joined = tokio::task::spawn_blocking(move || extract_text_blocking(kind, &data)).await;

    match joined {
        Ok(result) => result,
        Err(e) => {
            warn!("Document parser task failed: {e}");
            Err(ExtractionError::Crashed)
        }
    }
}

fn extract_text_blocking(kind: DocumentKind, data: &[u8]) -> Result<String, ExtractionError> {
    match kind {
        DocumentKind::Pdf => pdf::extract(data),
        DocumentKind::Docx | DocumentKind::LegacyWord => docx::extract(data),
    }
}
