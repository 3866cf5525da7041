//! Analysis result model shared by the analyzer, the report renderer and the server
//!
//! Model output is loosely typed, so deserialization is tolerant: missing
//! fields fall back to empty values, `null` is treated as missing, and enum
//! fields accept any casing. Serialization is strict and uses declaration
//! order, which is the field order of the JSON export.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Per-clause and overall risk classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum RiskLevel {
    #[default]
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Parse a model-supplied level; anything unrecognised is `Low`
    pub fn parse_lenient(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "high" => RiskLevel::High,
            "medium" => RiskLevel::Medium,
            _ => RiskLevel::Low,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
        }
    }

    /// Only Medium and High clauses are visually flagged
    pub fn is_flagged(&self) -> bool {
        matches!(self, RiskLevel::Medium | RiskLevel::High)
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for RiskLevel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<Value>::deserialize(deserializer)?;
        Ok(match raw {
            Some(Value::String(s)) => RiskLevel::parse_lenient(&s),
            _ => RiskLevel::Low,
        })
    }
}

/// Outcome of the statutory compliance check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum ComplianceStatus {
    #[default]
    Pass,
    Fail,
}

impl<'de> Deserialize<'de> for ComplianceStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<Value>::deserialize(deserializer)?;
        Ok(match raw {
            Some(Value::String(s)) if s.trim().eq_ignore_ascii_case("fail") => {
                ComplianceStatus::Fail
            }
            Some(Value::Bool(false)) => ComplianceStatus::Fail,
            _ => ComplianceStatus::Pass,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ComplianceCheck {
    #[serde(default)]
    pub status: ComplianceStatus,
    #[serde(default, deserialize_with = "lenient::string")]
    pub notes: String,
}

/// A contractual provision flagged by the model
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Clause {
    #[serde(default, deserialize_with = "lenient::string")]
    pub title: String,
    #[serde(default)]
    pub risk_level: RiskLevel,
    #[serde(default, deserialize_with = "lenient::string")]
    pub explanation: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub recommendation: String,
    /// Verbatim quote expected to occur in the analyzed document
    #[serde(default, deserialize_with = "lenient::string")]
    pub original_text: String,
}

/// Structured legal risk analysis of one contract
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AnalysisResult {
    #[serde(default, deserialize_with = "lenient::string")]
    pub contract_type: String,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub parties: Vec<String>,
    /// 0-100, higher is riskier
    #[serde(default, deserialize_with = "lenient::score")]
    pub risk_score: u8,
    #[serde(default)]
    pub overall_risk_level: RiskLevel,
    #[serde(default, deserialize_with = "lenient::string")]
    pub summary: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub executive_advice: String,
    #[serde(default, deserialize_with = "lenient::clauses")]
    pub clauses: Vec<Clause>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub missing_clauses: Vec<String>,
    #[serde(default, deserialize_with = "lenient::compliance")]
    pub compliance_check: ComplianceCheck,
}

impl AnalysisResult {
    /// Clauses rated Medium or High, in model order
    pub fn flagged_clauses(&self) -> impl Iterator<Item = &Clause> {
        self.clauses.iter().filter(|c| c.risk_level.is_flagged())
    }

    /// Executive advice, falling back to the summary when the model left it empty
    pub fn advice_or_summary(&self) -> &str {
        if self.executive_advice.trim().is_empty() {
            &self.summary
        } else {
            &self.executive_advice
        }
    }
}

/// Output language requested from the model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Language {
    #[default]
    English,
    Hindi,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Hindi => "Hindi",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "english" | "en" => Ok(Language::English),
            "hindi" | "hi" => Ok(Language::Hindi),
            other => Err(format!(
                "Unsupported language '{}'. Must be 'English' or 'Hindi'",
                other
            )),
        }
    }
}

mod lenient {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    use super::{Clause, ComplianceCheck};

    fn value_to_string(value: Value) -> String {
        match value {
            Value::Null => String::new(),
            Value::String(s) => s,
            other => other.to_string(),
        }
    }

    pub fn string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        Ok(Option::<Value>::deserialize(deserializer)?
            .map(value_to_string)
            .unwrap_or_default())
    }

    pub fn string_list<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<String>, D::Error> {
        Ok(match Option::<Value>::deserialize(deserializer)? {
            Some(Value::Array(items)) => items
                .into_iter()
                .map(value_to_string)
                .filter(|s| !s.trim().is_empty())
                .collect(),
            Some(Value::String(s)) if !s.trim().is_empty() => vec![s],
            _ => Vec::new(),
        })
    }

    pub fn score<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u8, D::Error> {
        let raw = match Option::<Value>::deserialize(deserializer)? {
            Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
            Some(Value::String(s)) => s
                .trim()
                .trim_end_matches("/100")
                .trim_end_matches('%')
                .trim()
                .parse::<f64>()
                .unwrap_or(0.0),
            _ => 0.0,
        };
        Ok(raw.round().clamp(0.0, 100.0) as u8)
    }

    pub fn clauses<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Clause>, D::Error> {
        Ok(match Option::<Value>::deserialize(deserializer)? {
            Some(Value::Array(items)) => items
                .into_iter()
                .filter(Value::is_object)
                .filter_map(|item| serde_json::from_value(item).ok())
                .collect(),
            _ => Vec::new(),
        })
    }

    pub fn compliance<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<ComplianceCheck, D::Error> {
        Ok(match Option::<Value>::deserialize(deserializer)? {
            Some(value @ Value::Object(_)) => serde_json::from_value(value).unwrap_or_default(),
            _ => ComplianceCheck::default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use serde_json::json;

    fn sample_result() -> AnalysisResult {
        AnalysisResult {
            contract_type: "Employment Agreement".to_string(),
            parties: vec!["Acme Pvt Ltd".to_string(), "R. Sharma".to_string()],
            risk_score: 72,
            overall_risk_level: RiskLevel::High,
            summary: "Fixed-term employment with one-sided termination.".to_string(),
            executive_advice: "Change notice period to 30 days.".to_string(),
            clauses: vec![Clause {
                title: "Termination".to_string(),
                risk_level: RiskLevel::High,
                explanation: "Only 15 days notice".to_string(),
                recommendation: "Ask for 30 days".to_string(),
                original_text: "terminate with 15 days notice".to_string(),
            }],
            missing_clauses: vec!["Arbitration".to_string()],
            compliance_check: ComplianceCheck {
                status: ComplianceStatus::Fail,
                notes: "Section 27 restraint of trade".to_string(),
            },
        }
    }

    #[test]
    fn test_json_export_round_trip() {
        let original = sample_result();
        let exported = serde_json::to_string_pretty(&original).unwrap();
        let parsed: AnalysisResult = serde_json::from_str(&exported).unwrap();
        assert_eq!(parsed, original);
    }

    #[test]
    fn test_export_field_order_is_stable() {
        let exported = serde_json::to_string(&sample_result()).unwrap();
        let keys = [
            "\"contract_type\"",
            "\"parties\"",
            "\"risk_score\"",
            "\"overall_risk_level\"",
            "\"summary\"",
            "\"executive_advice\"",
            "\"clauses\"",
            "\"missing_clauses\"",
            "\"compliance_check\"",
        ];
        let positions: Vec<usize> = keys
            .iter()
            .map(|k| exported.find(k).expect("key present"))
            .collect();
        let mut sorted = positions.clone();
        sorted.sort_unstable();
        assert_eq!(positions, sorted);
    }

    #[test]
    fn test_missing_fields_default() {
        let parsed: AnalysisResult = serde_json::from_value(json!({
            "contract_type": "NDA",
            "risk_score": 40
        }))
        .unwrap();

        assert_eq!(parsed.contract_type, "NDA");
        assert_eq!(parsed.risk_score, 40);
        assert_eq!(parsed.overall_risk_level, RiskLevel::Low);
        assert!(parsed.clauses.is_empty());
        assert_eq!(parsed.compliance_check.status, ComplianceStatus::Pass);
    }

    #[test]
    fn test_lenient_field_shapes() {
        let parsed: AnalysisResult = serde_json::from_value(json!({
            "contract_type": null,
            "parties": "Sole Party",
            "risk_score": "85",
            "overall_risk_level": "HIGH",
            "summary": 12,
            "clauses": [
                {"title": "Payment", "risk_level": "medium", "original_text": null},
                "not a clause"
            ],
            "missing_clauses": null,
            "compliance_check": {"status": "FAIL", "notes": "Stamp duty missing"}
        }))
        .unwrap();

        assert_eq!(parsed.contract_type, "");
        assert_eq!(parsed.parties, vec!["Sole Party".to_string()]);
        assert_eq!(parsed.risk_score, 85);
        assert_eq!(parsed.overall_risk_level, RiskLevel::High);
        assert_eq!(parsed.summary, "12");
        assert_eq!(parsed.clauses.len(), 1);
        assert_eq!(parsed.clauses[0].risk_level, RiskLevel::Medium);
        assert_eq!(parsed.clauses[0].original_text, "");
        assert_eq!(parsed.compliance_check.status, ComplianceStatus::Fail);
    }

    #[test]
    fn test_risk_score_is_clamped() {
        let high: AnalysisResult = serde_json::from_value(json!({"risk_score": 250})).unwrap();
        let low: AnalysisResult = serde_json::from_value(json!({"risk_score": -3})).unwrap();
        let pct: AnalysisResult = serde_json::from_value(json!({"risk_score": "64/100"})).unwrap();
        assert_eq!(high.risk_score, 100);
        assert_eq!(low.risk_score, 0);
        assert_eq!(pct.risk_score, 64);
    }

    #[test]
    fn test_unknown_risk_level_is_low() {
        assert_eq!(RiskLevel::parse_lenient("Severe-ish"), RiskLevel::Low);
        assert_eq!(RiskLevel::parse_lenient(" High "), RiskLevel::High);
        assert!(!RiskLevel::Low.is_flagged());
        assert!(RiskLevel::Medium.is_flagged());
    }

    #[test]
    fn test_advice_falls_back_to_summary() {
        let mut result = sample_result();
        assert_eq!(result.advice_or_summary(), "Change notice period to 30 days.");
        result.executive_advice = "  ".to_string();
        assert_eq!(
            result.advice_or_summary(),
            "Fixed-term employment with one-sided termination."
        );
    }

    #[test]
    fn test_language_parsing() {
        assert_eq!("english".parse::<Language>(), Ok(Language::English));
        assert_eq!("Hindi".parse::<Language>(), Ok(Language::Hindi));
        assert!("French".parse::<Language>().is_err());
    }

    proptest! {
        #[test]
        fn risk_score_always_in_range(score in any::<i64>()) {
            let parsed: AnalysisResult =
                serde_json::from_value(json!({ "risk_score": score })).unwrap();
            prop_assert!(parsed.risk_score <= 100);
        }
    }
}
