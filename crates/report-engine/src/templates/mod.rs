//! Embedded report template and its inputs

use chrono::Local;
use serde_json::{Map, Value};

use sentinel_types::AnalysisResult;

use crate::error::ReportError;

/// Typst source of the analysis report
pub const REPORT_TEMPLATE: &str = include_str!("report.typ");

/// Build the `sys.inputs` dictionary the template reads
pub fn report_inputs(
    analysis: &AnalysisResult,
    filename: &str,
) -> Result<Map<String, Value>, ReportError> {
    let mut inputs = Map::new();
    inputs.insert("analysis".to_string(), serde_json::to_value(analysis)?);
    inputs.insert("filename".to_string(), Value::String(filename.to_string()));
    inputs.insert(
        "advice".to_string(),
        Value::String(analysis.advice_or_summary().to_string()),
    );
    inputs.insert(
        "generated_at".to_string(),
        Value::String(Local::now().format("%Y-%m-%d %H:%M").to_string()),
    );
    Ok(inputs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sentinel_types::RiskLevel;

    #[test]
    fn test_inputs_carry_analysis_and_advice() {
        let analysis = AnalysisResult {
            contract_type: "NDA".to_string(),
            risk_score: 30,
            overall_risk_level: RiskLevel::Low,
            summary: "Mutual NDA with standard carve-outs.".to_string(),
            ..Default::default()
        };

        let inputs = report_inputs(&analysis, "nda.pdf").unwrap();
        assert_eq!(inputs["filename"], "nda.pdf");
        assert_eq!(inputs["analysis"]["risk_score"], 30);
        assert_eq!(inputs["analysis"]["overall_risk_level"], "Low");
        // Empty advice falls back to the summary
        assert_eq!(inputs["advice"], "Mutual NDA with standard carve-outs.");
    }

    #[test]
    fn test_template_reads_inputs() {
        assert!(REPORT_TEMPLATE.contains("sys.inputs.at(\"analysis\""));
    }
}
