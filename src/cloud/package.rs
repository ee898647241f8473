//! Report packaging
//!
//! Serializes the assembled report to JSON and gzip-compresses it into a
//! temporary file, ready for upload. The artifact's temporary directory is
//! owned by the returned [`PackagedArtifact`]; it is removed when the
//! artifact is dropped, which covers every exit path of the delivery
//! pipeline. The packager itself never removes anything, so a failed
//! upload leaves the artifact on disk until the caller lets go of it.

use flate2::Compression;
use flate2::write::GzEncoder;
use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use thiserror::Error;

use super::schema::CloudReport;

/// Why packaging failed, split by stage so the caller can attribute it
#[derive(Debug, Error)]
pub enum PackageError {
    #[error("failed to create report directory: {0}")]
    CreateDir(#[source] io::Error),

    #[error("failed to create report file: {0}")]
    CreateFile(#[source] io::Error),

    #[error("failed to write compressed report: {0}")]
    Write(#[source] io::Error),
}

/// A compressed report on local disk, plus the temporary directory that
/// owns it. Consumed exactly once by the upload coordinator.
#[derive(Debug)]
pub struct PackagedArtifact {
    dir: TempDir,
    path: PathBuf,
}

impl PackagedArtifact {
    /// Path of the gzip-compressed report file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path of the owning temporary directory
    pub fn dir_path(&self) -> &Path {
        self.dir.path()
    }

    /// Give up ownership: the directory is no longer removed on drop.
    /// Returns the artifact file path.
    pub fn keep(self) -> PathBuf {
        let PackagedArtifact { dir, path } = self;
        let _ = dir.keep();
        path
    }
}

/// Serialize and compress a report into a fresh temporary directory.
///
/// The artifact is flushed and finalized before this returns; the file is
/// named `security-*.json.gz` inside a directory prefixed `reports`.
pub fn package_report(report: &CloudReport) -> Result<PackagedArtifact, PackageError> {
    let dir = tempfile::Builder::new()
        .prefix("reports")
        .tempdir()
        .map_err(PackageError::CreateDir)?;

    let (file, path) = tempfile::Builder::new()
        .prefix("security-")
        .suffix(".json.gz")
        .tempfile_in(dir.path())
        .map_err(PackageError::CreateFile)?
        .keep()
        .map_err(|err| PackageError::CreateFile(err.error))?;

    let mut encoder = GzEncoder::new(file, Compression::default());
    serde_json::to_writer(&mut encoder, report)
        .map_err(|err| PackageError::Write(io::Error::from(err)))?;
    encoder.finish().map_err(PackageError::Write)?;

    Ok(PackagedArtifact { dir, path })
}
