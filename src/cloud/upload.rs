//! Upload coordination
//!
//! Two-phase delivery: transfer the packaged artifact to object storage,
//! then notify the collector that the scan finished, with the storage
//! handle attached to the report identity. A failure in either phase is a
//! single delivery failure to the caller; there is no partial success and
//! no retry.

use std::path::PathBuf;
use thiserror::Error;

use super::package::PackagedArtifact;
use super::schema::Meta;
use crate::api::ApiError;

/// Fixed name prefix the collector files uploads under
pub const UPLOAD_FILE_PREFIX: &str = "security_report";

const REPORT_CONTENT_TYPE: &str = "application/json";
const REPORT_CONTENT_ENCODING: &str = "gzip";

/// Storage upload request handed to the collector client
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub file_path: PathBuf,
    pub file_prefix: String,
    pub content_type: String,
    pub content_encoding: String,
}

/// Opaque signed reference returned by object storage after a successful
/// transfer; lets the collector retrieve the artifact later
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadHandle {
    pub signed_id: String,
}

/// The remote collector seam.
///
/// The HTTP client implements this for real; tests substitute a stub so
/// delivery semantics can be exercised without a network.
pub trait Collector {
    /// Transfer a local file to object storage under the given prefix,
    /// returning the storage handle
    fn upload_file(&self, request: &UploadRequest) -> Result<UploadHandle, ApiError>;

    /// Tell the collector the scan is complete
    fn scan_finished(&self, meta: &Meta) -> Result<(), ApiError>;
}

/// Which delivery phase failed
#[derive(Debug, Error)]
pub enum SendError {
    #[error("artifact upload failed: {0}")]
    Upload(#[source] ApiError),

    #[error("scan finished notification failed: {0}")]
    Notification(#[source] ApiError),
}

/// Deliver a packaged report.
///
/// On success the storage handle has been attached to `meta` and the
/// collector has acknowledged the notification. The artifact must already
/// exist: packaging failures short-circuit before this is ever called.
pub fn deliver_report<C: Collector>(
    collector: &C,
    meta: &mut Meta,
    artifact: &PackagedArtifact,
) -> Result<(), SendError> {
    let request = UploadRequest {
        file_path: artifact.path().to_path_buf(),
        file_prefix: UPLOAD_FILE_PREFIX.to_string(),
        content_type: REPORT_CONTENT_TYPE.to_string(),
        content_encoding: REPORT_CONTENT_ENCODING.to_string(),
    };

    let handle = collector.upload_file(&request).map_err(SendError::Upload)?;
    meta.signed_id = Some(handle.signed_id);

    collector.scan_finished(meta).map_err(SendError::Notification)
}
