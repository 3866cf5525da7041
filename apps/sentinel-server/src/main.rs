//! Contract Sentinel Server
//!
//! Accepts contract uploads, extracts their text, asks a locally hosted
//! model for a structured risk analysis and returns it with a highlighted
//! HTML view of the document. Provides REST API endpoints for:
//!
//! - Contract analysis (PDF/DOCX/TXT upload)
//! - Highlighting and JSON export of an analysis
//! - PDF report rendering
//! - Contract template drafting
//! - The audit trail
//!
//! ## Architecture
//!
//! - Rate limiting via tower-governor
//! - Bounded analysis concurrency: excess uploads are rejected with 503
//!   instead of queueing behind the model
//! - Append-only NDJSON audit log

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use clap::Parser;
use tokio::sync::Semaphore;
use tower::ServiceBuilder;
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, Level};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use analysis_engine::{config as analyzer_defaults, AnalyzerConfig, ContractAnalyzer};
use report_engine::DEFAULT_RENDER_TIMEOUT_MS;
use sentinel_types::audit::{AuditLog, DEFAULT_AUDIT_DIR};

mod api;
mod error;
mod pipeline;

use api::{
    handle_analyze, handle_export_json, handle_generate_pdf, handle_generate_template,
    handle_health, handle_highlight, handle_list_templates, handle_logs,
};

/// Multipart framing and the language field on top of the file itself
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Command-line arguments for the Sentinel server
#[derive(Parser, Debug)]
#[command(name = "sentinel-server")]
#[command(about = "Contract risk analysis server backed by a local language model")]
struct Args {
    /// Port to listen on
    #[arg(short, long, env = "SENTINEL_PORT", default_value = "8000")]
    port: u16,

    /// Host address to bind to
    #[arg(long, env = "SENTINEL_HOST", default_value = "0.0.0.0")]
    host: String,

    /// Ollama-compatible generate endpoint
    #[arg(long, env = "OLLAMA_URL", default_value = analyzer_defaults::DEFAULT_ENDPOINT)]
    ollama_url: String,

    /// Model name passed to the endpoint
    #[arg(long, env = "OLLAMA_MODEL", default_value = analyzer_defaults::DEFAULT_MODEL)]
    model: String,

    /// Timeout for one analysis call, in seconds
    #[arg(long, env = "SENTINEL_ANALYSIS_TIMEOUT_SECS", default_value_t = analyzer_defaults::DEFAULT_ANALYSIS_TIMEOUT_SECS)]
    analysis_timeout_secs: u64,

    /// Timeout for one template generation call, in seconds
    #[arg(long, env = "SENTINEL_TEMPLATE_TIMEOUT_SECS", default_value_t = analyzer_defaults::DEFAULT_TEMPLATE_TIMEOUT_SECS)]
    template_timeout_secs: u64,

    /// PDF report render timeout in milliseconds
    #[arg(long, env = "SENTINEL_RENDER_TIMEOUT_MS", default_value_t = DEFAULT_RENDER_TIMEOUT_MS)]
    render_timeout_ms: u64,

    /// Directory holding audit_trail.json
    #[arg(long, env = "SENTINEL_AUDIT_DIR", default_value = DEFAULT_AUDIT_DIR)]
    audit_dir: String,

    /// Largest accepted upload in bytes
    #[arg(long, env = "SENTINEL_MAX_UPLOAD_BYTES", default_value_t = 20 * 1024 * 1024)]
    max_upload_bytes: usize,

    /// Analyses allowed to run at once; further uploads get 503
    #[arg(long, env = "SENTINEL_MAX_CONCURRENT_ANALYSES", default_value_t = 2)]
    max_concurrent_analyses: usize,

    /// Rate limit: requests per second per IP
    #[arg(long, env = "SENTINEL_RATE_LIMIT", default_value_t = 10)]
    rate_limit: u32,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub analyzer: Arc<ContractAnalyzer>,
    pub audit: AuditLog,
    /// One permit per analysis allowed in flight
    pub analysis_permits: Arc<Semaphore>,
    /// Render timeout in milliseconds
    pub render_timeout_ms: u64,
    pub max_upload_bytes: usize,
}

/// Routes, CORS and the body limit; rate limiting is added by `main`
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let body_limit = state.max_upload_bytes + MULTIPART_OVERHEAD_BYTES;

    Router::new()
        // Health check
        .route("/health", get(handle_health))
        // Analysis pipeline
        .route("/api/analyze", post(handle_analyze))
        .route("/api/highlight", post(handle_highlight))
        .route("/api/generate-pdf", post(handle_generate_pdf))
        .route("/api/export/json", post(handle_export_json))
        // Templates
        .route("/api/templates", get(handle_list_templates))
        .route("/api/templates/generate", post(handle_generate_template))
        // Audit trail
        .route("/api/logs", get(handle_logs))
        .layer(
            ServiceBuilder::new()
                .layer(cors)
                .layer(DefaultBodyLimit::max(body_limit)),
        )
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Sentinel server on {}:{}", args.host, args.port);

    let analyzer_config = AnalyzerConfig::default()
        .with_endpoint(&args.ollama_url)
        .with_model(&args.model)
        .with_analysis_timeout(Duration::from_secs(args.analysis_timeout_secs))
        .with_template_timeout(Duration::from_secs(args.template_timeout_secs));
    let analyzer = ContractAnalyzer::new(analyzer_config).context("Failed to build HTTP client")?;

    let state = AppState {
        analyzer: Arc::new(analyzer),
        audit: AuditLog::new(&args.audit_dir),
        analysis_permits: Arc::new(Semaphore::new(args.max_concurrent_analyses.max(1))),
        render_timeout_ms: args.render_timeout_ms,
        max_upload_bytes: args.max_upload_bytes,
    };

    // Create rate limiter configuration
    let rate_limit = args.rate_limit.max(1);
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(rate_limit.into())
            .burst_size(rate_limit * 2)
            .finish()
            .context("Failed to create rate limiter config")?,
    );

    let app = build_router(state).layer(GovernorLayer {
        config: governor_conf,
    });

    // Start server
    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("Server listening on http://{}", addr);
    info!("Inference endpoint: {} (model {})", args.ollama_url, args.model);
    info!("Rate limit: {} requests/second per IP", rate_limit);
    info!(
        "Concurrent analyses: {}, max upload: {} bytes",
        args.max_concurrent_analyses.max(1),
        args.max_upload_bytes
    );
    info!("Audit log: {}/{}", args.audit_dir, AuditLog::FILE_NAME);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
