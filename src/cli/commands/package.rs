//! Package command implementation
//!
//! Assembles and compresses the report exactly as `send` would, but keeps
//! the artifact on disk instead of uploading it. Useful for inspecting
//! what would be sent, and for air-gapped setups that deliver reports out
//! of band. Without git context the report falls back to degraded
//! metadata rather than failing.

use anyhow::{Context, Result};
use clap::Args;
use std::fs;
use std::path::{Path, PathBuf};

use crate::cli::Output;
use crate::cloud;
use crate::config::Config;
use crate::git::GitContext;
use crate::scan::ReportData;

/// Arguments for the package command
#[derive(Args)]
pub struct PackageArgs {
    /// Scan results document produced by the scanning engine
    #[arg(value_name = "RESULTS")]
    pub input: PathBuf,

    /// Path that was scanned (overrides configuration)
    #[arg(short, long)]
    pub target: Option<String>,

    /// Write the artifact to this path instead of a temporary directory
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Execute the package command
pub fn execute(args: PackageArgs, config_path: Option<&str>, output: &Output) -> Result<()> {
    let mut config = Config::load(config_path)?;
    if let Some(target) = &args.target {
        config.scan.target = target.clone();
    }

    let report_data = ReportData::from_file(&args.input)?;
    let git_context = GitContext::discover(
        Path::new(&config.scan.target),
        config.scan.diff_base_branch.as_deref(),
    );
    if git_context.is_none() {
        output.warning("No git repository found; packaging with degraded metadata");
    }

    let report = cloud::get_report(&report_data, &config, git_context.as_ref(), false)
        .context("Failed to assemble report")?;
    let artifact = cloud::package_report(&report).context("Failed to package report")?;

    let path = match args.output {
        Some(destination) => {
            fs::copy(artifact.path(), &destination).with_context(|| {
                format!("Failed to write artifact to {}", destination.display())
            })?;
            destination
        }
        None => artifact.keep(),
    };

    output.success("Report packaged");
    output.key_value("Artifact:", &path.display().to_string());

    Ok(())
}
