//! Error types for report rendering

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ReportError {
    #[error("Report compilation failed: {}", .0.join("; "))]
    Compile(Vec<String>),

    #[error("PDF export failed: {0}")]
    Export(String),

    #[error("Report rendering timed out after {0}ms")]
    Timeout(u64),

    #[error("Report rendering failed: {0}")]
    Internal(String),
}

impl ReportError {
    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            ReportError::Compile(_) => "REPORT_COMPILE_ERROR",
            ReportError::Export(_) => "REPORT_EXPORT_ERROR",
            ReportError::Timeout(_) => "REPORT_TIMEOUT",
            ReportError::Internal(_) => "REPORT_INTERNAL_ERROR",
        }
    }
}

impl From<serde_json::Error> for ReportError {
    fn from(err: serde_json::Error) -> Self {
        ReportError::Internal(err.to_string())
    }
}
