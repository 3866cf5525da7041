//! Inference endpoint configuration

use std::time::Duration;

/// Default Ollama generate endpoint
pub const DEFAULT_ENDPOINT: &str = "http://localhost:11434/api/generate";

/// Default local model
pub const DEFAULT_MODEL: &str = "llama3";

/// Low temperature keeps the structured output near-deterministic
pub const DEFAULT_TEMPERATURE: f32 = 0.2;

pub const DEFAULT_NUM_CTX: u32 = 8192;

pub const DEFAULT_ANALYSIS_TIMEOUT_SECS: u64 = 180;

pub const DEFAULT_TEMPLATE_TIMEOUT_SECS: u64 = 120;

/// Settings for [`crate::ContractAnalyzer`]
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzerConfig {
    /// Full URL of the generate endpoint
    pub endpoint: String,
    pub model: String,
    pub temperature: f32,
    /// Context window requested from the model
    pub num_ctx: u32,
    /// Upper bound for one analysis call
    pub analysis_timeout: Duration,
    /// Upper bound for one template generation call
    pub template_timeout: Duration,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            num_ctx: DEFAULT_NUM_CTX,
            analysis_timeout: Duration::from_secs(DEFAULT_ANALYSIS_TIMEOUT_SECS),
            template_timeout: Duration::from_secs(DEFAULT_TEMPLATE_TIMEOUT_SECS),
        }
    }
}

impl AnalyzerConfig {
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_analysis_timeout(mut self, timeout: Duration) -> Self {
        self.analysis_timeout = timeout;
        self
    }

    pub fn with_template_timeout(mut self, timeout: Duration) -> Self {
        self.template_timeout = timeout;
        self
    }
}
