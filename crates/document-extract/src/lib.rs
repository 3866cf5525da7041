//! Contract text extraction
//!
//! Converts an uploaded [`Document`] into normalized plain text ready for the
//! analyzer, or a typed reason why it could not:
//!
//! - PDF: page count is capped, text is decoded page by page
//! - DOCX: paragraph text from `word/document.xml`, in document order
//! - TXT: UTF-8 decoding
//!
//! Every format goes through the same post-processing: blank lines are
//! dropped and a minimum amount of text is required. Image-only documents
//! therefore fail with [`ExtractionError::InsufficientText`]; OCR is not
//! supported.
//!
//! # Example
//! ```no_run
//! use document_extract::extract_text;
//! use sentinel_types::Document;
//!
//! let doc = Document::new("nda.txt", std::fs::read("nda.txt").unwrap());
//! match extract_text(&doc) {
//!     Ok(extracted) => println!("{} chars", extracted.char_count()),
//!     Err(e) => eprintln!("{}", e),
//! }
//! ```

pub mod docx;
pub mod error;
pub mod normalize;
pub mod pdf;
pub mod text;

pub use error::ExtractionError;

use sentinel_types::{Document, DocumentFormat};

/// PDFs with more pages than this are rejected before decoding
pub const MAX_PDF_PAGES: usize = 50;

/// Minimum characters of cleaned text; less suggests a scanned document
pub const MIN_TEXT_CHARS: usize = 50;

/// Outcome of [`extract_text`]
pub type ExtractionResult = Result<ExtractedText, ExtractionError>;

/// Normalized text pulled out of a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedText {
    /// Non-blank lines joined with `\n`
    pub text: String,
    pub format: DocumentFormat,
    /// Pages (PDF), paragraphs (DOCX) or lines (TXT) in the source
    pub unit_count: usize,
}

impl ExtractedText {
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}

/// Extract normalized text from an uploaded document
///
/// Never panics: decoder failures, including panics inside the PDF text
/// decoder, come back as [`ExtractionError::Processing`].
pub fn extract_text(document: &Document) -> ExtractionResult {
    let format = document
        .format()
        .ok_or_else(|| ExtractionError::UnsupportedFormat {
            filename: document.name.clone(),
        })?;

    tracing::debug!(
        filename = %document.name,
        format = %format,
        bytes = document.len(),
        "Extracting document text"
    );

    let (raw, unit_count) = match format {
        DocumentFormat::Pdf => {
            let pdf = pdf::extract_pdf_text(&document.bytes)?;
            (pdf.text, pdf.page_count)
        }
        DocumentFormat::Docx => {
            let paragraphs = docx::extract_paragraphs(&document.bytes)?;
            let count = paragraphs.len();
            (paragraphs.join("\n"), count)
        }
        DocumentFormat::Txt => {
            let decoded = text::decode_plain_text(&document.bytes)?;
            let count = decoded.lines().count();
            (decoded, count)
        }
    };

    let text = normalize::drop_blank_lines(&raw);
    let chars = text.chars().count();
    if chars < MIN_TEXT_CHARS {
        tracing::info!(
            filename = %document.name,
            chars,
            "Extracted text below minimum; likely a scanned document"
        );
        return Err(ExtractionError::InsufficientText { chars });
    }

    tracing::info!(
        filename = %document.name,
        format = %format,
        units = unit_count,
        chars,
        "Document text extracted"
    );

    Ok(ExtractedText {
        text,
        format,
        unit_count,
    })
}
