//! PDF text extraction
//!
//! The page tree is loaded with lopdf first so oversized documents are
//! rejected before any text decoding. Text itself comes from pdf-extract,
//! which separates pages with form feeds.

use std::panic::{self, AssertUnwindSafe};

use pdf_extract::extract_text_from_mem;

use crate::{ExtractionError, MAX_PDF_PAGES};

/// Page separator emitted by pdf-extract
const FORM_FEED: char = '\x0C';

/// Text decoded from a PDF
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfText {
    /// Page texts joined with newlines; empty pages contribute nothing
    pub text: String,
    pub page_count: usize,
}

/// Count pages without decoding any content streams
pub fn count_pages(pdf_bytes: &[u8]) -> Result<usize, ExtractionError> {
    let document = lopdf::Document::load_mem(pdf_bytes)
        .map_err(|e| ExtractionError::Processing(e.to_string()))?;
    Ok(document.get_pages().len())
}

/// Extract the text of every page, enforcing [`MAX_PDF_PAGES`]
pub fn extract_pdf_text(pdf_bytes: &[u8]) -> Result<PdfText, ExtractionError> {
    let page_count = count_pages(pdf_bytes)?;
    if page_count > MAX_PDF_PAGES {
        tracing::info!(pages = page_count, max = MAX_PDF_PAGES, "Rejecting oversized PDF");
        return Err(ExtractionError::TooLarge { pages: page_count });
    }

    // pdf-extract panics on some malformed content streams
    let decoded = panic::catch_unwind(AssertUnwindSafe(|| extract_text_from_mem(pdf_bytes)))
        .map_err(|payload| {
            let reason = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "PDF text decoder panicked".to_string());
            tracing::warn!(reason = %reason, "PDF text decoder panicked");
            ExtractionError::Processing(reason)
        })?;

    let raw = decoded.map_err(|e| {
        let message = e.to_string();
        if message.to_lowercase().contains("encrypt") || message.to_lowercase().contains("password") {
            ExtractionError::Processing(format!("PDF is password protected: {}", message))
        } else {
            ExtractionError::Processing(message)
        }
    })?;

    let text = join_pages(&raw);

    tracing::debug!(pages = page_count, chars = text.len(), "PDF text decoded");

    Ok(PdfText { text, page_count })
}

/// Join form-feed separated pages with newlines
///
/// Only the blank lines around each page are removed; indentation on a
/// page's first line is kept so quoted text still matches literally.
fn join_pages(raw: &str) -> String {
    raw.split(FORM_FEED)
        .map(|page| page.trim_start_matches(['\r', '\n']).trim_end())
        .filter(|page| !page.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_join_pages_keeps_first_line_indentation() {
        let raw = "\n\n    1. Term. Two years.\n\x0C\n   (a) Notice of 15 days.\n\n\x0C   \n\x0C";
        assert_eq!(
            join_pages(raw),
            "    1. Term. Two years.\n   (a) Notice of 15 days."
        );
    }

    #[test]
    fn test_invalid_pdf_bytes() {
        let result = extract_pdf_text(b"%PDF-1.7 truncated");
        assert!(matches!(result, Err(ExtractionError::Processing(_))));
    }

    #[test]
    fn test_count_pages_rejects_garbage() {
        assert!(count_pages(b"hello").is_err());
    }
}
