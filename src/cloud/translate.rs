//! Findings translation into the wire schema
//!
//! A pure mapping from the engine's severity-grouped findings to
//! [`CloudFinding`] records. Severity keys and per-severity order are
//! preserved; nothing is dropped, duplicated or moved between groups.

use std::collections::BTreeMap;

use super::schema::CloudFinding;
use crate::scan::GenericFinding;

/// Translate one severity-grouped findings map.
///
/// Works for any finding representation exposing the [`GenericFinding`]
/// capabilities, so active and ignored findings go through the same code.
pub fn translate_findings_by_severity<F: GenericFinding>(
    findings_by_severity: &BTreeMap<String, Vec<F>>,
) -> BTreeMap<String, Vec<CloudFinding>> {
    let mut translated: BTreeMap<String, Vec<CloudFinding>> = BTreeMap::new();

    for (severity, findings) in findings_by_severity {
        for entry in findings {
            let finding = entry.finding();
            translated
                .entry(severity.clone())
                .or_default()
                .push(CloudFinding {
                    finding: finding.clone(),
                    severity_meta: finding.severity_meta.clone(),
                    ignore_meta: entry.ignore_meta().cloned(),
                });
        }
    }

    translated
}
