//! Metadata resolution
//!
//! Turns extracted git context into the report identity the collector
//! requires. Every missing required field produces its own diagnostic
//! line naming the environment override that supplies it, so a user can
//! fix their CI setup in one pass instead of one failure at a time.

use thiserror::Error;

use super::schema::Meta;
use crate::config::Config;
use crate::git::{GitContext, overrides};
use crate::scan::ReportData;

/// Why repository identity could not be resolved
#[derive(Debug, Error)]
pub enum MetaError {
    #[error("not a git repository")]
    NotAGitRepository,

    /// One diagnostic line per missing required field
    #[error("{}", .missing.join("\n"))]
    IncompleteMetadata { missing: Vec<String> },
}

/// Resolve a fully-populated report identity from git context.
///
/// Fails with [`MetaError::NotAGitRepository`] when there is no context at
/// all, and with [`MetaError::IncompleteMetadata`] when any of branch,
/// default branch, commit hash or origin URL is missing — all missing
/// fields are reported together.
pub fn resolve_meta(
    report_data: &ReportData,
    config: &Config,
    git_context: Option<&GitContext>,
) -> Result<Meta, MetaError> {
    let Some(context) = git_context else {
        return Err(MetaError::NotAGitRepository);
    };

    let mut missing = Vec::new();
    if context.branch.is_empty() {
        missing.push(format!(
            "Couldn't determine the name of the branch being scanned. \
             Please set the '{}' environment variable.",
            overrides::BRANCH
        ));
    }
    if context.default_branch.is_empty() {
        missing.push(format!(
            "Couldn't determine the default branch of the repository. \
             Please set the '{}' environment variable.",
            overrides::DEFAULT_BRANCH
        ));
    }
    if context.commit_hash.is_empty() {
        missing.push(format!(
            "Couldn't determine the hash of the current commit of the repository. \
             Please set the '{}' environment variable.",
            overrides::COMMIT
        ));
    }
    if context.origin_url.is_empty() {
        missing.push(format!(
            "Couldn't determine the origin URL of the repository. \
             Please set the '{}' environment variable.",
            overrides::REPOSITORY_URL
        ));
    }

    if !missing.is_empty() {
        return Err(MetaError::IncompleteMetadata { missing });
    }

    Ok(Meta {
        id: context.id.clone(),
        host: context.host.clone(),
        username: context.owner.clone(),
        name: context.name.clone(),
        full_name: context.full_name.clone(),
        url: context.origin_url.clone(),
        target: config.scan.target.clone(),
        sha: context.commit_hash.clone(),
        current_branch: context.branch.clone(),
        default_branch: context.default_branch.clone(),
        diff_base_branch: context.base_branch.clone(),
        rules_version: config.scan.rules_version.clone(),
        beacon_version: crate::VERSION.to_string(),
        found_languages: report_data.found_languages.clone(),
        signed_id: None,
        error: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn complete_context() -> GitContext {
        let mut context = GitContext {
            origin_url: "https://github.com/acme/shop.git".into(),
            branch: "feature/checkout".into(),
            default_branch: "main".into(),
            commit_hash: "0f91a3c".into(),
            ..GitContext::default()
        };
        context.derive_identity();
        context
    }

    #[test]
    fn absent_context_is_not_a_repository() {
        let result = resolve_meta(&ReportData::default(), &Config::default(), None);
        assert!(matches!(result, Err(MetaError::NotAGitRepository)));
    }

    #[test]
    fn reports_every_missing_field_together() {
        let context = GitContext {
            branch: "main".into(),
            ..GitContext::default()
        };

        let err = resolve_meta(&ReportData::default(), &Config::default(), Some(&context))
            .unwrap_err();

        let MetaError::IncompleteMetadata { missing } = &err else {
            panic!("expected incomplete metadata, got {err:?}");
        };
        assert_eq!(missing.len(), 3);

        let message = err.to_string();
        assert_eq!(message.lines().count(), 3);
        assert!(message.contains("BEARER_DEFAULT_BRANCH"));
        assert!(message.contains("BEARER_COMMIT"));
        assert!(message.contains("BEARER_REPOSITORY_URL"));
        // The field that was present must not be mentioned
        assert!(!message.contains("'BEARER_BRANCH'"));
    }

    #[test]
    fn complete_context_maps_one_to_one() {
        let mut report_data = ReportData::default();
        report_data.found_languages =
            BTreeMap::from([("Ruby".to_string(), 1204i64), ("SQL".to_string(), 88i64)]);

        let mut config = Config::default();
        config.scan.target = "services/shop".into();
        config.scan.rules_version = "2024.05.1".into();

        let context = complete_context();
        let meta = resolve_meta(&report_data, &config, Some(&context)).unwrap();

        assert_eq!(meta.host, "github.com");
        assert_eq!(meta.username, "acme");
        assert_eq!(meta.name, "shop");
        assert_eq!(meta.full_name, "acme/shop");
        assert_eq!(meta.url, "https://github.com/acme/shop.git");
        assert_eq!(meta.target, "services/shop");
        assert_eq!(meta.sha, "0f91a3c");
        assert_eq!(meta.current_branch, "feature/checkout");
        assert_eq!(meta.default_branch, "main");
        assert_eq!(meta.rules_version, "2024.05.1");
        assert_eq!(meta.beacon_version, crate::VERSION);
        assert_eq!(meta.found_languages, report_data.found_languages);
        assert!(meta.signed_id.is_none());
        assert!(meta.error.is_none());
    }
}
