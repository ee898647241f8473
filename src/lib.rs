//! # Beacon - Scan Report Packaging and Cloud Delivery
//!
//! Beacon is the last stage of a security scanning pipeline. Given a
//! finished scan's results, it resolves the scanned repository's identity,
//! reshapes findings into the collector's wire schema, compresses the
//! report into a portable artifact and delivers it to the cloud.
//!
//! ## Pipeline
//!
//! 1. **Metadata resolution** — repository identity from git context, with
//!    documented environment overrides for CI environments
//! 2. **Findings translation** — severity-grouped findings into the wire
//!    schema, suppression metadata intact
//! 3. **Assembly** — one immutable report document per scan
//! 4. **Packaging** — gzip-compressed JSON in a scoped temporary directory
//! 5. **Delivery** — object-storage upload, then a scan-finished
//!    notification carrying the signed storage handle
//!
//! Delivery problems never abort an otherwise-successful scan: they are
//! recorded on the scan session and logged, and the scan completes.

pub mod api;
pub mod cli;
pub mod cloud;
pub mod config;
pub mod git;
pub mod scan;
pub mod session;

pub use config::Config;
pub use session::ScanSession;

/// Result type alias for Beacon operations
pub type Result<T> = anyhow::Result<T>;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
pub const PKG_DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
