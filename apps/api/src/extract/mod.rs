// Plain-text extraction from uploaded resumes.
// Parsing is CPU-bound: callers on the async runtime go through spawn_blocking.

pub mod docx;
pub mod pdf;

#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("Unsupported file type '{0}'. Upload PDF or DOCX.")]
    UnsupportedFormat(String),
    #[error("Could not read PDF: {0}")]
    Pdf(String),
    #[error("Could not read DOCX: {0}")]
    Docx(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Pdf,
    Docx,
}

impl SourceFormat {
    /// Picks the format from the file extension, ignoring case.
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        let lower = file_name.trim().to_ascii_lowercase();
        if lower.ends_with(".pdf") {
            Some(SourceFormat::Pdf)
        } else if lower.ends_with(".docx") {
            Some(SourceFormat::Docx)
        } else {
            None
        }
    }
}

/// Extracts the text of an uploaded resume.
pub fn extract_text(file_name: &str, bytes: &[u8]) -> Result<String, ExtractError> {
    match SourceFormat::from_file_name(file_name) {
        Some(SourceFormat::Pdf) => pdf::extract(bytes),
        Some(SourceFormat::Docx) => docx::extract(bytes),
        None => Err(ExtractError::UnsupportedFormat(file_name.to_string())),
    }
}
