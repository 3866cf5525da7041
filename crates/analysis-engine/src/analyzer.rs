//! Contract risk analysis against a local model

use std::time::Instant;

use sentinel_types::{AnalysisResult, Language};

use crate::client::{GenerateOptions, GenerateRequest, InferenceClient};
use crate::config::AnalyzerConfig;
use crate::error::AnalysisError;
use crate::parser::parse_analysis;
use crate::prompts::{build_analysis_prompt, build_template_prompt};

/// Fallback text when the endpoint answers without a `response` field
const MISSING_RESPONSE: &str = "Error";

/// Prompts the configured model and validates what comes back
#[derive(Debug, Clone)]
pub struct ContractAnalyzer {
    client: InferenceClient,
    config: AnalyzerConfig,
}

impl ContractAnalyzer {
    pub fn new(config: AnalyzerConfig) -> Result<Self, AnalysisError> {
        let client = InferenceClient::new(&config)?;

        tracing::info!(
            model = %config.model,
            endpoint = %config.endpoint,
            timeout_secs = config.analysis_timeout.as_secs(),
            "Contract analyzer initialized"
        );

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Analyze contract text and return the structured result
    ///
    /// One inference call, bounded by the analysis timeout and never retried.
    pub async fn analyze_contract(
        &self,
        contract_text: &str,
        language: Language,
    ) -> Result<AnalysisResult, AnalysisError> {
        let start = Instant::now();
        let prompt = build_analysis_prompt(contract_text, language);

        tracing::debug!(
            model = %self.config.model,
            language = %language,
            prompt_length = prompt.len(),
            "Requesting contract analysis"
        );

        let request = GenerateRequest {
            model: &self.config.model,
            prompt: &prompt,
            stream: false,
            format: Some("json"),
            options: Some(GenerateOptions {
                temperature: self.config.temperature,
                num_ctx: self.config.num_ctx,
            }),
        };

        let raw = self
            .client
            .generate(&request, self.config.analysis_timeout)
            .await?
            .unwrap_or_default();

        match parse_analysis(&raw) {
            Some(result) => {
                tracing::info!(
                    model = %self.config.model,
                    elapsed_ms = start.elapsed().as_millis(),
                    risk_score = result.risk_score,
                    clauses = result.clauses.len(),
                    "Contract analysis completed"
                );
                Ok(result)
            }
            None => {
                tracing::warn!(
                    model = %self.config.model,
                    elapsed_ms = start.elapsed().as_millis(),
                    response_chars = raw.len(),
                    "Model output could not be parsed as an analysis"
                );
                Err(AnalysisError::parse_failure(&raw))
            }
        }
    }

    /// Draft a plain-text contract template
    pub async fn try_generate_template(
        &self,
        contract_type: &str,
        requirements: &str,
    ) -> Result<String, AnalysisError> {
        let prompt = build_template_prompt(contract_type, requirements);
        let request = GenerateRequest {
            model: &self.config.model,
            prompt: &prompt,
            stream: false,
            format: None,
            options: None,
        };

        let response = self
            .client
            .generate(&request, self.config.template_timeout)
            .await?;

        Ok(response.unwrap_or_else(|| MISSING_RESPONSE.to_string()))
    }

    /// Best-effort variant of [`Self::try_generate_template`]: failures come back as text
    pub async fn generate_template(&self, contract_type: &str, requirements: &str) -> String {
        match self.try_generate_template(contract_type, requirements).await {
            Ok(text) => text,
            Err(e) => e.to_string(),
        }
    }
}
