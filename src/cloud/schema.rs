//! Wire schema for the collector service
//!
//! These types define the JSON document the collector accepts. The report
//! is assembled once per scan and is immutable afterwards, except for the
//! signed storage handle attached between upload and notification.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::scan::{Component, DataType, Finding, IgnoreMeta, ProcessingError, SeverityMeta};

/// Identity of the scanned repository, as the collector expects it.
///
/// Either fully populated from verified git context, or degraded to just
/// `target` and `found_languages` when verification was impossible and the
/// caller allowed it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Meta {
    /// Internal repository ID assigned by the hosting provider
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub host: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub username: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub full_name: String,

    /// Origin URL of the repository
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub url: String,

    /// Path that was scanned
    #[serde(default)]
    pub target: String,

    /// Commit hash the scan ran against
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub sha: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub current_branch: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub default_branch: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub diff_base_branch: String,

    /// Version of the rule set the scan ran with
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub rules_version: String,

    /// Version of the scanner that produced the report
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub beacon_version: String,

    /// Languages detected in the scanned tree, with their line counts
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub found_languages: BTreeMap<String, i64>,

    /// Signed storage handle, attached after a successful upload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signed_id: Option<String>,

    /// Human-readable error carried over from the scan session, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Meta {
    /// Degraded identity for environments without usable git context:
    /// only the scan target and detected languages are populated.
    pub fn degraded(target: String, found_languages: BTreeMap<String, i64>) -> Self {
        Self {
            target,
            found_languages,
            ..Self::default()
        }
    }
}

/// A finding in the collector's shape: the raw finding, its severity
/// classification pulled up to the top level, and suppression details
/// when the finding was ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CloudFinding {
    pub finding: Finding,
    pub severity_meta: SeverityMeta,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ignore_meta: Option<IgnoreMeta>,
}

/// The complete report document sent to the collector
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CloudReport {
    pub meta: Meta,

    /// Active findings, keyed by severity label
    #[serde(default)]
    pub findings: BTreeMap<String, Vec<CloudFinding>>,

    /// Suppressed findings, keyed by severity label
    #[serde(default)]
    pub ignored_findings: BTreeMap<String, Vec<CloudFinding>>,

    #[serde(default)]
    pub data_types: Vec<DataType>,

    #[serde(default)]
    pub components: Vec<Component>,

    #[serde(default)]
    pub errors: Vec<ProcessingError>,

    /// Discovered files, resolvable relative to the scan target
    #[serde(default)]
    pub files: Vec<String>,
}
