//! Git context extraction for report attribution
//!
//! The collector attributes every report to a repository, so Beacon pulls
//! identity facts out of the checkout being scanned: current branch,
//! default branch, commit hash and origin URL. CI environments often run
//! scans on detached heads or shallow clones where some of these facts are
//! missing; the documented `BEARER_*` environment overrides fill the gaps
//! and always win over what libgit2 reports.

use git2::Repository;
use std::path::Path;
use tracing::debug;

/// Per-field environment overrides, part of the documented user contract.
pub mod overrides {
    /// Branch being scanned
    pub const BRANCH: &str = "BEARER_BRANCH";
    /// Default branch of the repository
    pub const DEFAULT_BRANCH: &str = "BEARER_DEFAULT_BRANCH";
    /// Hash of the current commit
    pub const COMMIT: &str = "BEARER_COMMIT";
    /// Origin URL of the repository
    pub const REPOSITORY_URL: &str = "BEARER_REPOSITORY_URL";
}

/// Repository facts used to attribute a scan.
///
/// Empty strings mean "could not be determined"; the metadata resolver
/// decides which fields are required.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GitContext {
    /// Internal repository ID assigned by the hosting provider, when known
    pub id: String,
    /// Hosting provider, e.g. "github.com"
    pub host: String,
    /// Owner or organisation part of the repository path
    pub owner: String,
    /// Repository name
    pub name: String,
    /// "owner/name"
    pub full_name: String,
    pub origin_url: String,
    pub branch: String,
    pub default_branch: String,
    /// Base branch for diff scans, empty for full scans
    pub base_branch: String,
    pub commit_hash: String,
}

impl GitContext {
    /// Discover the repository containing `target` and extract its context.
    ///
    /// Returns `None` when `target` is not inside a git repository; whether
    /// that is fatal is the metadata resolver's decision, not ours.
    pub fn discover(target: &Path, base_branch: Option<&str>) -> Option<Self> {
        let repo = match Repository::discover(target) {
            Ok(repo) => repo,
            Err(err) => {
                debug!("no git repository at {}: {}", target.display(), err);
                return None;
            }
        };

        let mut context = Self::from_repository(&repo);
        context.base_branch = base_branch.unwrap_or_default().to_string();
        context.apply_overrides(|name| std::env::var(name).ok());
        context.derive_identity();

        Some(context)
    }

    /// Extract what libgit2 can tell us, leaving unknown fields empty
    fn from_repository(repo: &Repository) -> Self {
        let mut context = Self::default();

        if let Ok(head) = repo.head() {
            // A detached HEAD has no branch name
            match head.shorthand() {
                Some(name) if name != "HEAD" => context.branch = name.to_string(),
                _ => {}
            }

            if let Ok(commit) = head.peel_to_commit() {
                context.commit_hash = commit.id().to_string();
            }
        }

        if let Ok(remote) = repo.find_remote("origin") {
            if let Some(url) = remote.url() {
                context.origin_url = url.to_string();
            }
        }

        if let Ok(reference) = repo.find_reference("refs/remotes/origin/HEAD") {
            if let Some(target) = reference.symbolic_target() {
                if let Some(name) = target.strip_prefix("refs/remotes/origin/") {
                    context.default_branch = name.to_string();
                }
            }
        }

        context
    }

    /// Apply the per-field environment overrides. An override always wins
    /// over the value extracted from the repository.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(branch) = lookup(overrides::BRANCH) {
            self.branch = branch;
        }
        if let Some(default_branch) = lookup(overrides::DEFAULT_BRANCH) {
            self.default_branch = default_branch;
        }
        if let Some(commit) = lookup(overrides::COMMIT) {
            self.commit_hash = commit;
        }
        if let Some(url) = lookup(overrides::REPOSITORY_URL) {
            self.origin_url = url;
        }
    }

    /// Fill host/owner/name/full_name from the origin URL. Runs after
    /// overrides so `BEARER_REPOSITORY_URL` feeds the derived fields too.
    pub fn derive_identity(&mut self) {
        if let Some((host, owner, name)) = parse_origin_url(&self.origin_url) {
            self.full_name = format!("{owner}/{name}");
            self.host = host;
            self.owner = owner;
            self.name = name;
        }
    }
}

/// Split an origin URL into (host, owner, name).
///
/// Handles the scp-like syntax (`git@host:owner/name.git`) and URL schemes
/// (`https://host/owner/name`, `ssh://git@host/owner/name`). The owner part
/// keeps intermediate path segments, so nested groups survive.
fn parse_origin_url(url: &str) -> Option<(String, String, String)> {
    let url = url.trim().trim_end_matches('/');
    let url = url.strip_suffix(".git").unwrap_or(url);
    if url.is_empty() {
        return None;
    }

    let (host, path) = if let Some((_, rest)) = url.split_once("://") {
        let without_user = rest.split_once('@').map(|(_, r)| r).unwrap_or(rest);
        without_user.split_once('/')?
    } else if let Some(rest) = url
        .split_once('@')
        .filter(|(user, _)| !user.contains('/'))
        .map(|(_, rest)| rest)
    {
        // scp-like syntax: user@host:owner/name
        rest.split_once(':')?
    } else {
        return None;
    };

    let path = path.trim_matches('/');
    let (owner, name) = path.rsplit_once('/')?;
    if host.is_empty() || owner.is_empty() || name.is_empty() {
        return None;
    }

    Some((host.to_string(), owner.to_string(), name.to_string()))
}
