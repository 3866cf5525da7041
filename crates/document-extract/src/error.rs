//! Extraction failure reasons

use thiserror::Error;

use crate::MAX_PDF_PAGES;

/// Why a document yielded no usable text
///
/// The `Display` strings are user-facing and returned verbatim by the server.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExtractionError {
    #[error("File too large ({pages} pages). Please upload a contract under {} pages.", MAX_PDF_PAGES)]
    TooLarge { pages: usize },

    #[error("Unsupported file format. Please upload PDF, DOCX, or TXT.")]
    UnsupportedFormat { filename: String },

    #[error("Could not extract sufficient text. The file might be a scanned image (OCR required).")]
    InsufficientText { chars: usize },

    #[error("Error processing file: {0}")]
    Processing(String),
}

impl ExtractionError {
    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            ExtractionError::TooLarge { .. } => "TOO_LARGE",
            ExtractionError::UnsupportedFormat { .. } => "UNSUPPORTED_FORMAT",
            ExtractionError::InsufficientText { .. } => "INSUFFICIENT_TEXT",
            ExtractionError::Processing(_) => "PROCESSING_ERROR",
        }
    }
}
