//! Error types for contract analysis

use serde_json::json;
use thiserror::Error;

/// Raw output kept on parse failures, in characters
pub const RAW_TEXT_PREVIEW_CHARS: usize = 200;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AnalysisError {
    #[error("Local AI Error: {0}")]
    Transport(String),

    #[error("Local AI Error: inference request timed out after {0}s")]
    Timeout(u64),

    #[error("Failed to parse JSON")]
    ParseFailure {
        /// First characters of the model output, for debugging
        raw_text: String,
    },
}

impl AnalysisError {
    /// Build a parse failure, keeping only a preview of the raw output
    pub fn parse_failure(raw: &str) -> Self {
        AnalysisError::ParseFailure {
            raw_text: raw.chars().take(RAW_TEXT_PREVIEW_CHARS).collect(),
        }
    }

    pub fn raw_text(&self) -> Option<&str> {
        match self {
            AnalysisError::ParseFailure { raw_text } => Some(raw_text),
            _ => None,
        }
    }

    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            AnalysisError::Transport(_) => "TRANSPORT_ERROR",
            AnalysisError::Timeout(_) => "TIMEOUT",
            AnalysisError::ParseFailure { .. } => "PARSE_FAILURE",
        }
    }

    /// `{error, raw_text?}` payload returned to API callers
    pub fn to_payload(&self) -> serde_json::Value {
        match self.raw_text() {
            Some(raw) => json!({ "error": self.to_string(), "raw_text": raw }),
            None => json!({ "error": self.to_string() }),
        }
    }
}

impl From<reqwest::Error> for AnalysisError {
    fn from(err: reqwest::Error) -> Self {
        AnalysisError::Transport(err.to_string())
    }
}
