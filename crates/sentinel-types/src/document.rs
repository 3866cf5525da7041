//! Uploaded document model

use serde::{Deserialize, Serialize};

/// Formats the extractor understands, keyed by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    Pdf,
    Docx,
    Txt,
}

impl DocumentFormat {
    /// Infer the format from a filename (case-insensitive extension match)
    pub fn from_filename(name: &str) -> Option<Self> {
        let lower = name.to_lowercase();
        if lower.ends_with(".pdf") {
            Some(DocumentFormat::Pdf)
        } else if lower.ends_with(".docx") {
            Some(DocumentFormat::Docx)
        } else if lower.ends_with(".txt") {
            Some(DocumentFormat::Txt)
        } else {
            None
        }
    }

    /// Get the MIME type for this format
    pub fn mime_type(&self) -> &'static str {
        match self {
            DocumentFormat::Pdf => "application/pdf",
            DocumentFormat::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            DocumentFormat::Txt => "text/plain",
        }
    }
}

impl std::fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentFormat::Pdf => write!(f, "pdf"),
            DocumentFormat::Docx => write!(f, "docx"),
            DocumentFormat::Txt => write!(f, "txt"),
        }
    }
}

/// An uploaded file, alive for the duration of one analysis request
#[derive(Debug, Clone)]
pub struct Document {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl Document {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    pub fn format(&self) -> Option<DocumentFormat> {
        DocumentFormat::from_filename(&self.name)
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_extension_is_case_insensitive() {
        assert_eq!(
            DocumentFormat::from_filename("Lease.PDF"),
            Some(DocumentFormat::Pdf)
        );
        assert_eq!(
            DocumentFormat::from_filename("offer.Docx"),
            Some(DocumentFormat::Docx)
        );
        assert_eq!(
            DocumentFormat::from_filename("notes.txt"),
            Some(DocumentFormat::Txt)
        );
    }

    #[test]
    fn test_unknown_extensions() {
        assert_eq!(DocumentFormat::from_filename("contract.rtf"), None);
        assert_eq!(DocumentFormat::from_filename("contract.doc"), None);
        assert_eq!(DocumentFormat::from_filename("pdf"), None);
    }

    #[test]
    fn test_document_format() {
        let doc = Document::new("nda.txt", b"hello".to_vec());
        assert_eq!(doc.format(), Some(DocumentFormat::Txt));
        assert_eq!(doc.len(), 5);
    }
}
