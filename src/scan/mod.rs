//! Scan results input model
//!
//! The scanning engine writes a JSON document when it finishes; Beacon
//! reads that document and delivers it. Findings are grouped by severity
//! label. Grouping order across severities carries no meaning, but the
//! order of findings within a severity is preserved end to end.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

pub mod dataflow;
pub mod findings;

pub use dataflow::{Component, DataType, DataTypeDetector, Dataflow, Location, ProcessingError};
pub use findings::{Finding, GenericFinding, IgnoreMeta, IgnoredFinding, SeverityMeta};

/// Everything a finished scan produced, as read from the engine's
/// results document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportData {
    /// Languages detected in the scanned tree, with their line counts
    #[serde(default)]
    pub found_languages: BTreeMap<String, i64>,

    /// Active findings, keyed by severity label
    #[serde(default)]
    pub findings_by_severity: BTreeMap<String, Vec<Finding>>,

    /// Suppressed findings, keyed by severity label
    #[serde(default)]
    pub ignored_findings_by_severity: BTreeMap<String, Vec<IgnoredFinding>>,

    #[serde(default)]
    pub dataflow: Dataflow,

    /// Paths the engine discovered, relative to the scan target
    #[serde(default)]
    pub files: Vec<String>,
}

impl ReportData {
    /// Read a scan results document from disk
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read scan results: {}", path.display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Invalid scan results document: {}", path.display()))
    }
}
