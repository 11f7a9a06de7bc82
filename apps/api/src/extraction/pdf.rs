use tracing::error;

use super::ExtractionError;

pub(super) fn extract(data: &[u8]) -> Result<String, ExtractionError> {
    pdf_extract::extract_text_from_mem(data).map_err(|e| {
        error!("Error extracting text from PDF: {e}");
        ExtractionError::Pdf
    })
}
