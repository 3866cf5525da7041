//! Contract analysis core
//!
//! - [`ContractAnalyzer`]: prompts a locally hosted model and validates its answer
//! - [`parser`]: salvages a JSON object out of free-form model output
//! - [`highlight`]: marks risky clause quotes inside the source text
//!
//! The analyzer talks to an Ollama-compatible `/api/generate` endpoint. One
//! call per analysis, no retries; failures are returned as [`AnalysisError`].

pub mod analyzer;
pub mod client;
pub mod config;
pub mod error;
pub mod highlight;
pub mod parser;
pub mod prompts;

pub use analyzer::ContractAnalyzer;
pub use config::AnalyzerConfig;
pub use error::AnalysisError;
pub use highlight::{highlight, HighlightSpan};
pub use parser::{clean_json, parse_analysis};
