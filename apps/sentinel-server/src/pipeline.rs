//! Upload analysis pipeline: extract, analyze, highlight, audit
//!
//! Each call is one request's chain. Extraction runs on the blocking pool;
//! the inference call is bounded by the analyzer's own timeout.

use std::collections::BTreeMap;
use std::time::Instant;

use serde_json::{json, Value};
use uuid::Uuid;

use analysis_engine::{highlight, AnalysisError};
use document_extract::{extract_text, ExtractionError};
use sentinel_types::{AnalysisResult, AuditEventType, AuditStatus, Document, Language};

use crate::error::ServerError;
use crate::AppState;

pub const EXTRACTION_FAILED_SUMMARY: &str = "Could not extract text.";
pub const EXTRACTION_FAILED_ADVICE: &str = "Please upload a valid text-based PDF or DOCX.";

/// How one upload ended
#[derive(Debug)]
pub enum AnalyzeOutcome {
    ExtractionFailed(ExtractionError),
    AnalysisFailed(AnalysisError),
    Completed {
        analysis: AnalysisResult,
        highlighted_html: String,
        filename: String,
    },
}

impl AnalyzeOutcome {
    /// Response body for `/api/analyze`
    pub fn into_json(self) -> Value {
        match self {
            AnalyzeOutcome::ExtractionFailed(err) => json!({
                "error": err.to_string(),
                "risk_score": 0,
                "clauses": [],
                "summary": EXTRACTION_FAILED_SUMMARY,
                "executive_advice": EXTRACTION_FAILED_ADVICE,
            }),
            AnalyzeOutcome::AnalysisFailed(err) => err.to_payload(),
            AnalyzeOutcome::Completed {
                analysis,
                highlighted_html,
                filename,
            } => json!({
                "analysis": analysis,
                "highlighted_html": highlighted_html,
                "filename": filename,
            }),
        }
    }
}

/// Run one uploaded document through the whole pipeline
pub async fn analyze_upload(
    state: &AppState,
    document: Document,
    language: Language,
) -> Result<AnalyzeOutcome, ServerError> {
    let request_id = Uuid::new_v4();
    let filename = document.name.clone();
    let start = Instant::now();

    tracing::info!(%request_id, filename = %filename, bytes = document.len(), %language, "Analysis requested");

    let extracted = match tokio::task::spawn_blocking(move || extract_text(&document)).await? {
        Ok(extracted) => extracted,
        Err(err) => {
            tracing::warn!(%request_id, filename = %filename, code = err.code(), error = %err, "Extraction failed");
            state.audit.log_event(
                AuditEventType::ExtractionFailed,
                &filename,
                0,
                AuditStatus::Failure,
                metadata([
                    ("request_id", json!(request_id.to_string())),
                    ("code", json!(err.code())),
                ]),
            );
            return Ok(AnalyzeOutcome::ExtractionFailed(err));
        }
    };

    tracing::debug!(
        %request_id,
        format = %extracted.format,
        units = extracted.unit_count,
        chars = extracted.char_count(),
        "Text extracted"
    );

    let analysis = match state
        .analyzer
        .analyze_contract(&extracted.text, language)
        .await
    {
        Ok(analysis) => analysis,
        Err(err) => {
            tracing::warn!(%request_id, filename = %filename, code = err.code(), error = %err, "Analysis failed");
            state.audit.log_event(
                AuditEventType::AnalysisFailed,
                &filename,
                0,
                AuditStatus::Failure,
                metadata([
                    ("request_id", json!(request_id.to_string())),
                    ("code", json!(err.code())),
                    ("language", json!(language.as_str())),
                ]),
            );
            return Ok(AnalyzeOutcome::AnalysisFailed(err));
        }
    };

    let highlighted_html = highlight(&extracted.text, &analysis.clauses);

    state.audit.log_event(
        AuditEventType::Analysis,
        &filename,
        analysis.risk_score,
        AuditStatus::Success,
        metadata([
            ("request_id", json!(request_id.to_string())),
            ("language", json!(language.as_str())),
            ("contract_type", json!(analysis.contract_type)),
            ("flagged_clauses", json!(analysis.flagged_clauses().count())),
        ]),
    );

    tracing::info!(
        %request_id,
        filename = %filename,
        risk_score = analysis.risk_score,
        elapsed_ms = start.elapsed().as_millis(),
        "Analysis completed"
    );

    Ok(AnalyzeOutcome::Completed {
        analysis,
        highlighted_html,
        filename,
    })
}

pub fn metadata<const N: usize>(pairs: [(&str, Value); N]) -> BTreeMap<String, Value> {
    pairs
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect()
}
