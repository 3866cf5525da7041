//! Prompt templates for contract analysis and template drafting

use sentinel_types::Language;

/// Persona and ground rules for the analysis call
pub const ANALYSIS_SYSTEM_PROMPT: &str = r#"You are a Senior Legal Consultant reviewing a contract. Respond with strict JSON only.

PARTIES:
Extract the full legal name of every party. When the text only uses a generic label (for example "The Employer"), infer the name from the signature block or the first page.

EXECUTIVE ADVICE:
Write one specific, actionable paragraph telling the reader how to fix the risks found in THIS contract. Propose concrete alternatives (for example "Change notice period to 30 days") and quote the amounts or clauses that should change.

RISK:
Score risk from 0 to 100 under Indian law (Indian Contract Act, 1872). For every clause you flag, copy the exact sentence from the contract into "original_text" without paraphrasing.

Output strict JSON only."#;

/// JSON shape the model must produce
pub const ANALYSIS_SCHEMA: &str = r#"{
    "contract_type": "String",
    "parties": ["Party A", "Party B"],
    "risk_score": Integer (0-100),
    "overall_risk_level": "Low/Medium/High",
    "summary": "String (Brief overview)",
    "executive_advice": "String (Strategic advice paragraph)",
    "clauses": [
        { "title": "String", "risk_level": "High/Medium/Low", "explanation": "String", "recommendation": "String", "original_text": "String" }
    ],
    "missing_clauses": ["String"],
    "compliance_check": { "status": "Pass/Fail", "notes": "String" }
}"#;

/// Build the single analysis prompt
pub fn build_analysis_prompt(contract_text: &str, language: Language) -> String {
    format!(
        "{system}\n\n\
         Analyze this contract text.\n\
         Target Language: {language}\n\n\
         REQUIRED JSON STRUCTURE:\n{schema}\n\n\
         CONTRACT TEXT:\n{contract}\n",
        system = ANALYSIS_SYSTEM_PROMPT,
        language = language,
        schema = ANALYSIS_SCHEMA,
        contract = contract_text,
    )
}

/// Build the plain-text drafting prompt
pub fn build_template_prompt(contract_type: &str, requirements: &str) -> String {
    format!(
        "Act as a Legal Expert. Write a {}. Requirements: {}. Output plain text.",
        contract_type, requirements
    )
}
