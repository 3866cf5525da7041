pub mod audit;
pub mod document;
pub mod types;

pub use audit::{AuditEntry, AuditEventType, AuditLog, AuditStatus};
pub use document::{Document, DocumentFormat};
pub use types::{
    AnalysisResult, Clause, ComplianceCheck, ComplianceStatus, Language, RiskLevel,
};
