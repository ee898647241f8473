//! Send command implementation
//!
//! Runs the full delivery pipeline: resolve metadata, assemble and
//! compress the report, upload it and notify the collector. A delivery
//! failure is reported but does not fail the command — the scan already
//! succeeded by the time we get here.

use anyhow::Result;
use clap::Args;
use std::path::{Path, PathBuf};

use crate::api;
use crate::cli::Output;
use crate::cloud;
use crate::config::Config;
use crate::git::GitContext;
use crate::scan::ReportData;
use crate::session::ScanSession;

/// Arguments for the send command
#[derive(Args)]
pub struct SendArgs {
    /// Scan results document produced by the scanning engine
    #[arg(value_name = "RESULTS")]
    pub input: PathBuf,

    /// Path that was scanned (overrides configuration)
    #[arg(short, long)]
    pub target: Option<String>,
}

/// Execute the send command
pub fn execute(args: SendArgs, config_path: Option<&str>, output: &Output) -> Result<()> {
    let mut config = Config::load(config_path)?;
    if let Some(target) = &args.target {
        config.scan.target = target.clone();
    }

    let report_data = ReportData::from_file(&args.input)?;
    let git_context = GitContext::discover(
        Path::new(&config.scan.target),
        config.scan.diff_base_branch.as_deref(),
    );

    let client = api::Client::new(&config.api)?;
    let mut session = ScanSession::new();

    output.step(&format!("Delivering report to {}", config.api.base_url));
    cloud::send_report(
        &mut session,
        &config,
        &report_data,
        git_context.as_ref(),
        &client,
    );

    match session.error() {
        Some(message) => {
            // Delivery problems never fail the scan; surface and move on
            output.warning(message);
            output.verbose("Run with -vv for delivery diagnostics");
        }
        None => output.success("Report delivered"),
    }

    Ok(())
}
