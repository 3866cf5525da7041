//! Report compilation and PDF export

use std::time::{Duration, Instant};

use base64::Engine;
use typst::diag::{Severity, SourceDiagnostic};

use sentinel_types::AnalysisResult;

use crate::error::ReportError;
use crate::templates::{report_inputs, REPORT_TEMPLATE};
use crate::world::ReportWorld;

/// Upper bound for one report compilation
pub const DEFAULT_RENDER_TIMEOUT_MS: u64 = 30_000;

pub const PDF_MIME_TYPE: &str = "application/pdf";

/// A rendered PDF report
#[derive(Debug, Clone)]
pub struct ReportArtifact {
    pub pdf: Vec<u8>,
    pub page_count: usize,
    /// Non-fatal compiler warnings, e.g. missing glyphs
    pub warnings: Vec<String>,
}

impl ReportArtifact {
    pub fn to_base64(&self) -> String {
        base64::engine::general_purpose::STANDARD.encode(&self.pdf)
    }

    pub fn mime_type(&self) -> &'static str {
        PDF_MIME_TYPE
    }
}

/// Render a report with a compilation timeout
pub async fn render_report(
    analysis: &AnalysisResult,
    filename: &str,
    timeout_ms: u64,
) -> Result<ReportArtifact, ReportError> {
    let world = ReportWorld::new(REPORT_TEMPLATE, report_inputs(analysis, filename)?)?;
    let start = Instant::now();

    let result = tokio::time::timeout(
        Duration::from_millis(timeout_ms),
        tokio::task::spawn_blocking(move || compile_and_export(&world)),
    )
    .await;

    let artifact = match result {
        Ok(Ok(rendered)) => rendered?,
        Ok(Err(join_error)) => {
            return Err(ReportError::Internal(format!(
                "Compilation task panicked: {}",
                join_error
            )));
        }
        Err(_elapsed) => {
            tracing::warn!(filename, timeout_ms, "Report rendering timed out");
            return Err(ReportError::Timeout(timeout_ms));
        }
    };

    tracing::info!(
        filename,
        pages = artifact.page_count,
        bytes = artifact.pdf.len(),
        elapsed_ms = start.elapsed().as_millis(),
        "Report rendered"
    );
    Ok(artifact)
}

/// Render a report on the current thread
pub fn render_report_sync(
    analysis: &AnalysisResult,
    filename: &str,
) -> Result<ReportArtifact, ReportError> {
    let world = ReportWorld::new(REPORT_TEMPLATE, report_inputs(analysis, filename)?)?;
    compile_and_export(&world)
}

fn compile_and_export(world: &ReportWorld) -> Result<ReportArtifact, ReportError> {
    let warned = typst::compile(world);
    let warnings = messages(&warned.warnings, Severity::Warning);

    let document = warned.output.map_err(|diagnostics| {
        let errors = messages(&diagnostics, Severity::Error);
        tracing::error!(errors = ?errors, "Report template failed to compile");
        ReportError::Compile(errors)
    })?;

    let pdf = typst_pdf::pdf(&document, &typst_pdf::PdfOptions::default()).map_err(|diagnostics| {
        ReportError::Export(messages(&diagnostics, Severity::Error).join("; "))
    })?;

    Ok(ReportArtifact {
        pdf,
        page_count: document.pages.len(),
        warnings,
    })
}

/// Flatten diagnostics of one severity into messages with hints appended
fn messages(diagnostics: &[SourceDiagnostic], severity: Severity) -> Vec<String> {
    diagnostics
        .iter()
        .filter(|diag| diag.severity == severity)
        .map(|diag| {
            if diag.hints.is_empty() {
                diag.message.to_string()
            } else {
                let hints: Vec<String> = diag.hints.iter().map(|h| h.to_string()).collect();
                format!("{} (hint: {})", diag.message, hints.join("; "))
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base64_artifact() {
        let artifact = ReportArtifact {
            pdf: b"%PDF-1.7".to_vec(),
            page_count: 1,
            warnings: vec![],
        };
        assert_eq!(artifact.to_base64(), "JVBERi0xLjc=");
        assert_eq!(artifact.mime_type(), "application/pdf");
    }

    #[test]
    fn test_broken_template_reports_compile_errors() {
        let world = ReportWorld::new("#let x = ", serde_json::Map::new()).unwrap();
        let err = compile_and_export(&world).unwrap_err();
        match err {
            ReportError::Compile(errors) => assert!(!errors.is_empty()),
            other => panic!("expected compile error, got {:?}", other),
        }
    }
}
