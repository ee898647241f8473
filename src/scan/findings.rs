//! Finding types produced by the scanning engine
//!
//! Beacon does not detect anything itself. These types mirror the scan
//! engine's output document so the delivery pipeline can reshape it into
//! the collector's wire schema.

use serde::{Deserialize, Serialize};

/// Severity classification attached to every finding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeverityMeta {
    /// Severity assigned by the rule itself
    pub rule_severity: String,

    /// Severity after sensitive-data weighting has been applied
    pub display_severity: String,

    /// Combined weighting used to rank findings
    #[serde(default)]
    pub final_weighting: f64,
}

/// Why and when a finding was suppressed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IgnoreMeta {
    #[serde(default)]
    pub author: Option<String>,

    #[serde(default)]
    pub comment: Option<String>,

    /// RFC 3339 timestamp of when the suppression was recorded
    #[serde(default)]
    pub ignored_at: Option<String>,

    #[serde(default)]
    pub false_positive: bool,
}

/// A single detected issue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    /// Identifier of the rule that produced this finding
    pub rule_id: String,

    pub title: String,

    #[serde(default)]
    pub description: String,

    /// File the finding was detected in, relative to the scan target
    pub filename: String,

    pub line_number: usize,

    /// Stable identifier for deduplication across scans
    #[serde(default)]
    pub fingerprint: String,

    #[serde(default)]
    pub category_groups: Vec<String>,

    pub severity_meta: SeverityMeta,
}

/// A finding plus the suppression details that silenced it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IgnoredFinding {
    pub finding: Finding,
    pub ignore_meta: IgnoreMeta,
}

/// Capability pair every finding representation exposes to the translator.
///
/// Active and ignored findings are stored as distinct concrete types; the
/// translator is written once against this trait instead of either of them.
pub trait GenericFinding {
    /// The underlying detected issue
    fn finding(&self) -> &Finding;

    /// Suppression details, if this finding was ignored
    fn ignore_meta(&self) -> Option<&IgnoreMeta>;
}

impl GenericFinding for Finding {
    fn finding(&self) -> &Finding {
        self
    }

    fn ignore_meta(&self) -> Option<&IgnoreMeta> {
        None
    }
}

impl GenericFinding for IgnoredFinding {
    fn finding(&self) -> &Finding {
        &self.finding
    }

    fn ignore_meta(&self) -> Option<&IgnoreMeta> {
        Some(&self.ignore_meta)
    }
}
