use std::panic;

use tracing::warn;

use super::ExtractError;

/// Text of every page, trimmed.
pub fn extract(bytes: &[u8]) -> Result<String, ExtractError> {
    // pdf-extract panics on some malformed inputs instead of returning an error.
    let result = panic::catch_unwind(|| pdf_extract::extract_text_from_mem(bytes));

    match result {
        Ok(Ok(text)) => Ok(text.trim().to_string()),
        Ok(Err(e)) => Err(ExtractError::Pdf(e.to_string())),
        Err(_) => {
            warn!(bytes = bytes.len(), "PDF parser panicked");
            Err(ExtractError::Pdf("the PDF could not be parsed".to_string()))
        }
    }
}
