//! API handlers for the Sentinel server
//!
//! Provides REST endpoints for:
//! - Contract upload and analysis
//! - Re-highlighting and JSON export of an analysis
//! - PDF report generation
//! - Template drafting and the audit trail

use std::str::FromStr;

use axum::{
    extract::{Multipart, State},
    http::header,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use analysis_engine::highlight;
use report_engine::render_report;
use sentinel_types::{
    AnalysisResult, AuditEntry, AuditEventType, AuditStatus, Clause, Document, Language,
};

use crate::error::ServerError;
use crate::pipeline::{analyze_upload, metadata};
use crate::AppState;

/// Contract types offered for template drafting
pub const CONTRACT_TEMPLATES: [(&str, &str); 4] = [
    (
        "Employment Agreement",
        "Terms of employment between an employer and an employee",
    ),
    ("NDA", "Confidentiality obligations between disclosing and receiving parties"),
    (
        "Service Agreement",
        "Scope, fees and liabilities for services rendered to a client",
    ),
    ("Lease Deed", "Lease of immovable property between lessor and lessee"),
];

const DEFAULT_REPORT_NAME: &str = "contract.pdf";

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    pub model: String,
}

/// Handler: GET /health
pub async fn handle_health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "sentinel-server",
        version: env!("CARGO_PKG_VERSION"),
        model: state.analyzer.config().model.clone(),
    })
}

/// Handler: POST /api/analyze
///
/// Multipart fields: `file` (required) and `language` (defaults to English).
pub async fn handle_analyze(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<Value>, ServerError> {
    let limit = state.max_upload_bytes;
    let mut upload: Option<Document> = None;
    let mut language = Language::English;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ServerError::from_multipart(e, limit))?
    {
        let field_name = field.name().map(str::to_string);
        match field_name.as_deref() {
            Some("file") => {
                let name = field.file_name().unwrap_or("upload").to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ServerError::from_multipart(e, limit))?;
                if bytes.len() > limit {
                    return Err(ServerError::PayloadTooLarge { limit });
                }
                upload = Some(Document::new(name, bytes.to_vec()));
            }
            Some("language") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ServerError::from_multipart(e, limit))?;
                if !text.trim().is_empty() {
                    language = Language::from_str(&text).map_err(ServerError::InvalidRequest)?;
                }
            }
            other => debug!(field = ?other, "Ignoring multipart field"),
        }
    }

    let document =
        upload.ok_or_else(|| ServerError::InvalidRequest("Missing 'file' field".to_string()))?;

    // Held until the pipeline finishes
    let _permit = state
        .analysis_permits
        .clone()
        .try_acquire_owned()
        .map_err(|_| ServerError::AnalyzerBusy)?;

    let outcome = analyze_upload(&state, document, language).await?;
    Ok(Json(outcome.into_json()))
}

/// Highlight request body
#[derive(Deserialize)]
pub struct HighlightRequest {
    pub text: String,
    #[serde(default)]
    pub clauses: Vec<Clause>,
}

/// Handler: POST /api/highlight
pub async fn handle_highlight(Json(req): Json<HighlightRequest>) -> Json<Value> {
    Json(json!({ "html": highlight(&req.text, &req.clauses) }))
}

/// Handler: POST /api/generate-pdf
///
/// Body is an analysis object, optionally with a `filename` key.
pub async fn handle_generate_pdf(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Json<Value> {
    let filename = body
        .get("filename")
        .and_then(Value::as_str)
        .unwrap_or(DEFAULT_REPORT_NAME)
        .to_string();

    if !body.is_object() {
        return Json(report_failure(
            &state,
            &filename,
            "Request body must be an analysis object".to_string(),
        ));
    }
    let analysis: AnalysisResult = match serde_json::from_value(body) {
        Ok(analysis) => analysis,
        Err(e) => return Json(report_failure(&state, &filename, e.to_string())),
    };

    match render_report(&analysis, &filename, state.render_timeout_ms).await {
        Ok(artifact) => {
            info!(filename = %filename, pages = artifact.page_count, "PDF report generated");
            state.audit.log_event(
                AuditEventType::ReportExport,
                &filename,
                analysis.risk_score,
                AuditStatus::Success,
                metadata([("pages", json!(artifact.page_count))]),
            );
            Json(json!({
                "status": "success",
                "filename": filename,
                "mime_type": artifact.mime_type(),
                "size": artifact.pdf.len(),
                "page_count": artifact.page_count,
                "data": artifact.to_base64(),
            }))
        }
        Err(e) => Json(report_failure(&state, &filename, e.to_string())),
    }
}

fn report_failure(state: &AppState, filename: &str, message: String) -> Value {
    warn!(filename, error = %message, "PDF report generation failed");
    state.audit.log_event(
        AuditEventType::ReportExport,
        filename,
        0,
        AuditStatus::Failure,
        metadata([("error", json!(message))]),
    );
    json!({ "status": "error", "message": message })
}

/// Handler: POST /api/export/json
///
/// Returns the analysis as a pretty-printed download in field declaration order.
pub async fn handle_export_json(
    Json(analysis): Json<AnalysisResult>,
) -> Result<impl IntoResponse, ServerError> {
    let body = serde_json::to_string_pretty(&analysis)
        .map_err(|e| ServerError::Internal(e.to_string()))?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/json"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"analysis.json\"",
            ),
        ],
        body,
    ))
}

/// Template metadata
#[derive(Serialize)]
pub struct TemplateInfo {
    pub name: &'static str,
    pub description: &'static str,
}

/// Template list response
#[derive(Serialize)]
pub struct TemplateListResponse {
    pub success: bool,
    pub templates: Vec<TemplateInfo>,
    pub count: usize,
}

/// Handler: GET /api/templates
pub async fn handle_list_templates() -> Json<TemplateListResponse> {
    let templates: Vec<TemplateInfo> = CONTRACT_TEMPLATES
        .iter()
        .map(|&(name, description)| TemplateInfo { name, description })
        .collect();
    let count = templates.len();

    Json(TemplateListResponse {
        success: true,
        templates,
        count,
    })
}

/// Template generation request body
#[derive(Deserialize)]
pub struct TemplateRequest {
    pub contract_type: String,
    #[serde(default)]
    pub requirements: String,
}

/// Handler: POST /api/templates/generate
pub async fn handle_generate_template(
    State(state): State<AppState>,
    Json(req): Json<TemplateRequest>,
) -> Result<Json<Value>, ServerError> {
    let contract_type = req.contract_type.trim();
    if contract_type.is_empty() {
        return Err(ServerError::InvalidRequest(
            "contract_type must not be empty".to_string(),
        ));
    }

    info!(contract_type, "Template generation requested");

    let (template, status) = match state
        .analyzer
        .try_generate_template(contract_type, &req.requirements)
        .await
    {
        Ok(text) => (text, AuditStatus::Success),
        Err(e) => (e.to_string(), AuditStatus::Failure),
    };

    state.audit.log_event(
        AuditEventType::TemplateGeneration,
        contract_type,
        0,
        status,
        metadata([("requirements", json!(req.requirements))]),
    );

    Ok(Json(json!({
        "contract_type": contract_type,
        "template": template,
    })))
}

/// Audit trail response
#[derive(Serialize)]
pub struct LogsResponse {
    pub success: bool,
    pub logs: Vec<AuditEntry>,
    pub count: usize,
}

/// Handler: GET /api/logs
pub async fn handle_logs(State(state): State<AppState>) -> Result<Json<LogsResponse>, ServerError> {
    let audit = state.audit.clone();
    let logs = tokio::task::spawn_blocking(move || audit.get_logs()).await?;
    let count = logs.len();

    Ok(Json(LogsResponse {
        success: true,
        logs,
        count,
    }))
}
