//! HTTP client for an Ollama-compatible generate endpoint

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::config::AnalyzerConfig;
use crate::error::AnalysisError;

/// Non-streaming generate request body
#[derive(Debug, Serialize)]
pub struct GenerateRequest<'a> {
    pub model: &'a str,
    pub prompt: &'a str,
    pub stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<GenerateOptions>,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct GenerateOptions {
    pub temperature: f32,
    pub num_ctx: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: Option<String>,
}

/// Thin wrapper over a pooled reqwest client
#[derive(Debug, Clone)]
pub struct InferenceClient {
    http: reqwest::Client,
    endpoint: String,
}

impl InferenceClient {
    pub fn new(config: &AnalyzerConfig) -> Result<Self, AnalysisError> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(15))
            .pool_idle_timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            http,
            endpoint: config.endpoint.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// POST a generate request and return the `response` field
    ///
    /// `Ok(None)` means the endpoint answered without a `response` field.
    pub async fn generate(
        &self,
        request: &GenerateRequest<'_>,
        timeout: Duration,
    ) -> Result<Option<String>, AnalysisError> {
        let start = Instant::now();

        let result = self
            .http
            .post(&self.endpoint)
            .timeout(timeout)
            .json(request)
            .send()
            .await
            .and_then(|resp| resp.error_for_status());

        let response = match result {
            Ok(response) => response,
            Err(e) => return Err(classify(e, timeout, start)),
        };

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| classify(e, timeout, start))?;

        tracing::debug!(
            model = request.model,
            elapsed_ms = start.elapsed().as_millis(),
            response_chars = body.response.as_ref().map(|r| r.len()).unwrap_or(0),
            "Inference call completed"
        );

        Ok(body.response)
    }
}

fn classify(err: reqwest::Error, timeout: Duration, start: Instant) -> AnalysisError {
    let elapsed_ms = start.elapsed().as_millis();
    if err.is_timeout() {
        tracing::error!(elapsed_ms, timeout_secs = timeout.as_secs(), "Inference call timed out");
        AnalysisError::Timeout(timeout.as_secs())
    } else {
        tracing::error!(elapsed_ms, error = %err, "Inference call failed");
        AnalysisError::from(err)
    }
}
