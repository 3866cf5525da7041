//! Append-only audit trail of analysis and generation events
//!
//! Entries are stored as newline-delimited JSON. The file is opened in
//! append mode for every event and each record goes out in a single write,
//! so a single writer never produces torn lines. Concurrent writers from
//! separate processes are not coordinated.

use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use chrono::Local;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default directory for the audit trail
pub const DEFAULT_AUDIT_DIR: &str = "data/audit_logs";

/// Types of auditable events
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditEventType {
    Analysis,
    ExtractionFailed,
    AnalysisFailed,
    TemplateGeneration,
    ReportExport,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum AuditStatus {
    #[default]
    Success,
    Failure,
}

/// A single audit log entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuditEntry {
    pub timestamp: String,
    pub event_type: AuditEventType,
    pub filename: String,
    pub risk_score: u8,
    #[serde(default)]
    pub status: AuditStatus,
    #[serde(default)]
    pub metadata: BTreeMap<String, serde_json::Value>,
}

impl AuditEntry {
    /// Create a new entry stamped with the current local time
    pub fn new(
        event_type: AuditEventType,
        filename: &str,
        risk_score: u8,
        status: AuditStatus,
        metadata: BTreeMap<String, serde_json::Value>,
    ) -> Self {
        Self {
            timestamp: Local::now().to_rfc3339(),
            event_type,
            filename: filename.to_string(),
            risk_score,
            status,
            metadata,
        }
    }
}

#[derive(Debug, Error)]
pub enum AuditError {
    #[error("Failed to write audit log: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize audit entry: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// File-backed audit trail
#[derive(Debug, Clone)]
pub struct AuditLog {
    log_file: PathBuf,
}

impl AuditLog {
    pub const FILE_NAME: &'static str = "audit_trail.json";

    /// Target `<dir>/audit_trail.json`, creating `dir` if needed
    pub fn new(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        if let Err(e) = fs::create_dir_all(dir) {
            tracing::warn!(dir = %dir.display(), error = %e, "Could not create audit log directory");
        }
        Self {
            log_file: dir.join(Self::FILE_NAME),
        }
    }

    pub fn path(&self) -> &Path {
        &self.log_file
    }

    /// Record an event; failures are reported through tracing and never propagated
    pub fn log_event(
        &self,
        event_type: AuditEventType,
        filename: &str,
        risk_score: u8,
        status: AuditStatus,
        metadata: BTreeMap<String, serde_json::Value>,
    ) {
        let entry = AuditEntry::new(event_type, filename, risk_score, status, metadata);
        if let Err(e) = self.append(&entry) {
            tracing::warn!(
                path = %self.log_file.display(),
                event = ?event_type,
                error = %e,
                "Audit log write failed"
            );
        }
    }

    /// Append one entry as a single NDJSON line
    pub fn append(&self, entry: &AuditEntry) -> Result<(), AuditError> {
        let mut line = serde_json::to_string(entry)?;
        line.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_file)?;
        file.write_all(line.as_bytes())?;
        Ok(())
    }

    /// Read every parseable entry, skipping malformed lines
    pub fn get_logs(&self) -> Vec<AuditEntry> {
        let file = match fs::File::open(&self.log_file) {
            Ok(file) => file,
            Err(_) => return Vec::new(),
        };

        // Byte lines: invalid UTF-8 is dropped like any other malformed line
        BufReader::new(file)
            .split(b'\n')
            .map_while(Result::ok)
            .filter_map(|line| serde_json::from_slice(&line).ok())
            .collect()
    }
}

impl Default for AuditLog {
    fn default() -> Self {
        Self::new(DEFAULT_AUDIT_DIR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn metadata(pairs: &[(&str, serde_json::Value)]) -> BTreeMap<String, serde_json::Value> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_log_and_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let log = AuditLog::new(dir.path());

        log.log_event(
            AuditEventType::Analysis,
            "lease.pdf",
            72,
            AuditStatus::Success,
            metadata(&[("language", serde_json::json!("English"))]),
        );
        log.log_event(
            AuditEventType::TemplateGeneration,
            "NDA",
            0,
            AuditStatus::Success,
            BTreeMap::new(),
        );

        let entries = log.get_logs();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].event_type, AuditEventType::Analysis);
        assert_eq!(entries[0].filename, "lease.pdf");
        assert_eq!(entries[0].risk_score, 72);
        assert_eq!(entries[0].metadata["language"], "English");
        assert_eq!(entries[1].event_type, AuditEventType::TemplateGeneration);
    }

    #[test]
    fn test_file_is_newline_delimited_json() {
        let dir = tempfile::tempdir().unwrap();
        let log = AuditLog::new(dir.path());
        log.log_event(
            AuditEventType::Analysis,
            "a.txt",
            10,
            AuditStatus::Success,
            BTreeMap::new(),
        );

        let raw = fs::read_to_string(log.path()).unwrap();
        assert!(raw.ends_with('\n'));
        let line: serde_json::Value = serde_json::from_str(raw.trim_end()).unwrap();
        assert_eq!(line["event_type"], "ANALYSIS");
        assert_eq!(line["status"], "Success");
        assert!(line["metadata"].is_object());
    }

    #[test]
    fn test_malformed_lines_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let log = AuditLog::new(dir.path());
        log.log_event(
            AuditEventType::Analysis,
            "first.pdf",
            5,
            AuditStatus::Success,
            BTreeMap::new(),
        );

        let mut file = OpenOptions::new().append(true).open(log.path()).unwrap();
        writeln!(file, "{{not json").unwrap();
        writeln!(file).unwrap();

        log.log_event(
            AuditEventType::Analysis,
            "second.pdf",
            6,
            AuditStatus::Failure,
            BTreeMap::new(),
        );

        let entries = log.get_logs();
        let names: Vec<&str> = entries.iter().map(|e| e.filename.as_str()).collect();
        assert_eq!(names, vec!["first.pdf", "second.pdf"]);
        assert_eq!(entries[1].status, AuditStatus::Failure);
    }

    #[test]
    fn test_invalid_utf8_line_does_not_hide_later_entries() {
        let dir = tempfile::tempdir().unwrap();
        let log = AuditLog::new(dir.path());
        log.log_event(
            AuditEventType::Analysis,
            "first.pdf",
            5,
            AuditStatus::Success,
            BTreeMap::new(),
        );

        let mut file = OpenOptions::new().append(true).open(log.path()).unwrap();
        file.write_all(&[0xff, 0xfe, b'\n']).unwrap();

        log.log_event(
            AuditEventType::Analysis,
            "second.pdf",
            6,
            AuditStatus::Success,
            BTreeMap::new(),
        );

        let names: Vec<String> = log.get_logs().into_iter().map(|e| e.filename).collect();
        assert_eq!(names, vec!["first.pdf", "second.pdf"]);
    }

    #[test]
    fn test_missing_file_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let log = AuditLog::new(dir.path().join("nested"));
        assert!(log.get_logs().is_empty());
    }

    #[test]
    fn test_write_failure_is_swallowed() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where the log file should be makes every open fail
        let log = AuditLog::new(dir.path());
        fs::create_dir_all(log.path()).unwrap();

        log.log_event(
            AuditEventType::Analysis,
            "x.pdf",
            1,
            AuditStatus::Success,
            BTreeMap::new(),
        );
        assert!(log.get_logs().is_empty());
    }
}
