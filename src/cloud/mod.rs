//! Cloud report assembly and delivery
//!
//! The last stage of the scanning pipeline: resolve repository identity,
//! reshape findings into the collector's wire schema, compress the
//! document and ship it. Every stage is synchronous; a failure anywhere
//! is recorded on the scan session instead of aborting the scan.

use tracing::debug;

use crate::config::Config;
use crate::git::GitContext;
use crate::scan::ReportData;
use crate::session::ScanSession;

pub mod meta;
pub mod package;
pub mod schema;
pub mod translate;
pub mod upload;

pub use meta::{MetaError, resolve_meta};
pub use package::{PackageError, PackagedArtifact, package_report};
pub use schema::{CloudFinding, CloudReport, Meta};
pub use translate::translate_findings_by_severity;
pub use upload::{Collector, SendError, UploadHandle, UploadRequest, deliver_report};

/// Assemble the report document for the collector.
///
/// With `ensure_meta` set, incomplete repository identity is a hard error.
/// Without it, resolution failures degrade to an identity carrying only
/// the scan target and detected languages — deliberate behavior for
/// environments without full git context.
pub fn get_report(
    report_data: &ReportData,
    config: &Config,
    git_context: Option<&GitContext>,
    ensure_meta: bool,
) -> Result<CloudReport, MetaError> {
    let meta = match resolve_meta(report_data, config, git_context) {
        Ok(meta) => meta,
        Err(err) if !ensure_meta => {
            debug!("continuing with degraded metadata: {}", err);
            Meta::degraded(
                config.scan.target.clone(),
                report_data.found_languages.clone(),
            )
        }
        Err(err) => return Err(err),
    };

    Ok(CloudReport {
        meta,
        findings: translate_findings_by_severity(&report_data.findings_by_severity),
        ignored_findings: translate_findings_by_severity(&report_data.ignored_findings_by_severity),
        data_types: report_data.dataflow.data_types.clone(),
        components: report_data.dataflow.components.clone(),
        errors: report_data.dataflow.errors.clone(),
        files: discovered_files(&config.scan.target, &report_data.files),
    })
}

/// Send the scan's report to the collector.
///
/// Never returns an error: delivery problems must not fail an otherwise
/// successful scan. Instead a one-line message lands on the session's
/// error field and the details go to the debug log. The packaging
/// temporary directory is removed on every path out of this function.
pub fn send_report<C: Collector>(
    session: &mut ScanSession,
    config: &Config,
    report_data: &ReportData,
    git_context: Option<&GitContext>,
    collector: &C,
) {
    let mut report = match get_report(report_data, config, git_context, true) {
        Ok(report) => report,
        Err(err) => {
            debug!(
                "session {}: unable to resolve report metadata: {}",
                session.id(),
                err
            );
            session.record_error(format!("Unable to calculate metadata. {err}"));
            return;
        }
    };

    // Carry any pre-existing scan error through to the collector
    report.meta.error = session.error().map(str::to_string);

    let artifact = match package_report(&report) {
        Ok(artifact) => artifact,
        Err(err) => {
            debug!("session {}: error creating report: {}", session.id(), err);
            session.record_error("Could not compress report.");
            return;
        }
    };

    if let Err(err) = deliver_report(collector, &mut report.meta, &artifact) {
        debug!(
            "session {}: error sending report to the cloud: {}",
            session.id(),
            err
        );
        session.record_error("Report upload failed.");
    }

    // `artifact` dropped here; its temporary directory goes with it
}

/// Resolve discovered file paths against the scan target.
///
/// Paths are normalized with forward slashes and a stripped `./`, so each
/// entry is resolvable as `<target>/<path>`.
fn discovered_files(target: &str, files: &[String]) -> Vec<String> {
    files
        .iter()
        .map(|file| full_filename(target, file))
        .collect()
}

fn full_filename(target: &str, filename: &str) -> String {
    let filename = filename.trim_start_matches("./");
    let target = target.trim_end_matches('/');

    if target.is_empty() || target == "." {
        filename.to_string()
    } else {
        format!("{target}/{filename}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_filename_joins_against_target() {
        assert_eq!(
            full_filename("services/shop", "app/models/user.rb"),
            "services/shop/app/models/user.rb"
        );
        assert_eq!(
            full_filename("services/shop/", "./app/models/user.rb"),
            "services/shop/app/models/user.rb"
        );
    }

    #[test]
    fn full_filename_leaves_current_dir_target_alone() {
        assert_eq!(full_filename(".", "lib/client.rb"), "lib/client.rb");
        assert_eq!(full_filename("", "lib/client.rb"), "lib/client.rb");
    }

    #[test]
    fn degraded_report_keeps_target_and_languages_only() {
        let mut report_data = ReportData::default();
        report_data
            .found_languages
            .insert("Ruby".to_string(), 420i64);
        let config = Config::default();

        let report = get_report(&report_data, &config, None, false).unwrap();

        assert_eq!(report.meta.target, ".");
        assert_eq!(report.meta.found_languages.len(), 1);
        assert!(report.meta.url.is_empty());
        assert!(report.meta.sha.is_empty());
        assert!(report.meta.current_branch.is_empty());
    }

    #[test]
    fn strict_report_fails_without_git_context() {
        let result = get_report(&ReportData::default(), &Config::default(), None, true);
        assert!(matches!(result, Err(MetaError::NotAGitRepository)));
    }
}
