//! End-to-end tests for the report delivery pipeline
//!
//! The collector is stubbed so delivery semantics can be exercised
//! without a network: error-field behavior, phase ordering and temporary
//! directory cleanup on every path.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::path::PathBuf;

use beacon::api::ApiError;
use beacon::cloud::{self, Collector, Meta, UploadHandle, UploadRequest};
use beacon::config::Config;
use beacon::git::GitContext;
use beacon::scan::{Finding, ReportData, SeverityMeta};
use beacon::session::ScanSession;

/// Collector stub recording what the pipeline asked of it
#[derive(Default)]
struct StubCollector {
    fail_upload: bool,
    fail_notification: bool,
    uploaded: RefCell<Vec<PathBuf>>,
    notified: RefCell<Vec<Meta>>,
}

impl Collector for StubCollector {
    fn upload_file(&self, request: &UploadRequest) -> Result<UploadHandle, ApiError> {
        self.uploaded.borrow_mut().push(request.file_path.clone());

        if self.fail_upload {
            return Err(ApiError::Status {
                status: 500,
                message: "storage unavailable".to_string(),
            });
        }

        assert_eq!(request.content_type, "application/json");
        assert_eq!(request.content_encoding, "gzip");
        assert!(request.file_path.exists(), "artifact must exist during upload");

        Ok(UploadHandle {
            signed_id: "signed-123".to_string(),
        })
    }

    fn scan_finished(&self, meta: &Meta) -> Result<(), ApiError> {
        self.notified.borrow_mut().push(meta.clone());

        if self.fail_notification {
            return Err(ApiError::Status {
                status: 502,
                message: "bad gateway".to_string(),
            });
        }

        Ok(())
    }
}

impl StubCollector {
    /// Temporary directory of the last uploaded artifact
    fn artifact_dir(&self) -> Option<PathBuf> {
        self.uploaded
            .borrow()
            .last()
            .and_then(|path| path.parent().map(|p| p.to_path_buf()))
    }
}

fn complete_git_context() -> GitContext {
    let mut context = GitContext {
        origin_url: "https://github.com/acme/shop.git".to_string(),
        branch: "main".to_string(),
        default_branch: "main".to_string(),
        commit_hash: "0f91a3c4b2".to_string(),
        ..GitContext::default()
    };
    context.derive_identity();
    context
}

fn report_data_with_findings() -> ReportData {
    let finding = |rule_id: &str| Finding {
        rule_id: rule_id.to_string(),
        title: format!("Finding from {rule_id}"),
        description: String::new(),
        filename: "app/models/user.rb".to_string(),
        line_number: 3,
        fingerprint: format!("{rule_id}_3"),
        category_groups: vec![],
        severity_meta: SeverityMeta {
            rule_severity: "high".to_string(),
            display_severity: "high".to_string(),
            final_weighting: 0.5,
        },
    };

    ReportData {
        found_languages: BTreeMap::from([("Ruby".to_string(), 100i64)]),
        findings_by_severity: BTreeMap::from([(
            "high".to_string(),
            vec![finding("rule_a"), finding("rule_b")],
        )]),
        files: vec!["app/models/user.rb".to_string()],
        ..ReportData::default()
    }
}

#[test]
fn successful_delivery_attaches_handle_and_cleans_up() {
    let collector = StubCollector::default();
    let mut session = ScanSession::new();
    let context = complete_git_context();

    cloud::send_report(
        &mut session,
        &Config::default(),
        &report_data_with_findings(),
        Some(&context),
        &collector,
    );

    assert_eq!(session.error(), None);

    let notified = collector.notified.borrow();
    assert_eq!(notified.len(), 1);
    assert_eq!(notified[0].signed_id.as_deref(), Some("signed-123"));
    assert_eq!(notified[0].full_name, "acme/shop");

    let dir = collector.artifact_dir().expect("artifact was uploaded");
    assert!(!dir.exists(), "temporary directory must be removed");
}

#[test]
fn upload_failure_skips_notification_and_cleans_up() {
    let collector = StubCollector {
        fail_upload: true,
        ..StubCollector::default()
    };
    let mut session = ScanSession::new();
    let context = complete_git_context();

    cloud::send_report(
        &mut session,
        &Config::default(),
        &report_data_with_findings(),
        Some(&context),
        &collector,
    );

    assert_eq!(session.error(), Some("Report upload failed."));
    assert!(collector.notified.borrow().is_empty(), "no notification after failed upload");

    let dir = collector.artifact_dir().expect("upload was attempted");
    assert!(!dir.exists(), "temporary directory must be removed on failure too");
}

#[test]
fn notification_failure_is_a_delivery_failure() {
    let collector = StubCollector {
        fail_notification: true,
        ..StubCollector::default()
    };
    let mut session = ScanSession::new();
    let context = complete_git_context();

    cloud::send_report(
        &mut session,
        &Config::default(),
        &report_data_with_findings(),
        Some(&context),
        &collector,
    );

    assert_eq!(session.error(), Some("Report upload failed."));

    let dir = collector.artifact_dir().expect("upload succeeded");
    assert!(!dir.exists());
}

#[test]
fn missing_git_context_fails_metadata_not_upload() {
    let collector = StubCollector::default();
    let mut session = ScanSession::new();

    cloud::send_report(
        &mut session,
        &Config::default(),
        &report_data_with_findings(),
        None,
        &collector,
    );

    let message = session.error().expect("metadata failure recorded");
    assert!(message.starts_with("Unable to calculate metadata."));
    assert!(message.contains("not a git repository"));
    assert!(collector.uploaded.borrow().is_empty());
    assert!(collector.notified.borrow().is_empty());
}

#[test]
fn incomplete_git_context_names_every_override() {
    let collector = StubCollector::default();
    let mut session = ScanSession::new();
    // Only the branch is known
    let context = GitContext {
        branch: "main".to_string(),
        ..GitContext::default()
    };

    cloud::send_report(
        &mut session,
        &Config::default(),
        &report_data_with_findings(),
        Some(&context),
        &collector,
    );

    let message = session.error().expect("metadata failure recorded");
    assert!(message.contains("BEARER_DEFAULT_BRANCH"));
    assert!(message.contains("BEARER_COMMIT"));
    assert!(message.contains("BEARER_REPOSITORY_URL"));
    assert!(!message.contains("'BEARER_BRANCH'"));
    assert!(collector.uploaded.borrow().is_empty());
}

#[test]
fn strict_get_report_fails_without_context_but_degraded_succeeds() {
    let report_data = report_data_with_findings();
    let config = Config::default();

    assert!(cloud::get_report(&report_data, &config, None, true).is_err());

    let report = cloud::get_report(&report_data, &config, None, false).unwrap();
    assert_eq!(report.meta.target, ".");
    assert_eq!(report.meta.found_languages, report_data.found_languages);
    assert!(report.meta.url.is_empty());
    assert!(report.meta.sha.is_empty());
    assert!(report.meta.current_branch.is_empty());

    // Findings still make it into a degraded report
    assert_eq!(report.findings["high"].len(), 2);
    assert_eq!(report.findings["high"][0].finding.rule_id, "rule_a");
    assert_eq!(report.findings["high"][1].finding.rule_id, "rule_b");
}

#[test]
fn assembled_report_resolves_files_against_target() {
    let report_data = report_data_with_findings();
    let mut config = Config::default();
    config.scan.target = "services/shop".to_string();

    let context = complete_git_context();
    let report = cloud::get_report(&report_data, &config, Some(&context), true).unwrap();

    assert_eq!(report.files, vec!["services/shop/app/models/user.rb"]);
    assert_eq!(report.meta.target, "services/shop");
}
