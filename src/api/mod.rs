//! Collector API client
//!
//! Blocking HTTP client for the collector service. Uploads go through a
//! signed-slot protocol: ask the collector for an upload slot, stream the
//! artifact bytes to the slot's storage URL, then reference the returned
//! signed ID in the scan-finished notification. One attempt per request;
//! retry policy belongs to the surrounding CI system, not here.

use reqwest::blocking::{Client as HttpClient, RequestBuilder};
use reqwest::header::{CONTENT_ENCODING, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use crate::cloud::schema::Meta;
use crate::cloud::upload::{Collector, UploadHandle, UploadRequest};
use crate::config::ApiConfig;

const UPLOADS_PATH: &str = "/api/uploads";
const SCAN_FINISHED_PATH: &str = "/api/scans/finished";

/// What went wrong talking to the collector
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("could not read artifact: {0}")]
    Io(#[from] std::io::Error),

    /// The collector answered, but not with success
    #[error("collector responded with status {status}: {message}")]
    Status { status: u16, message: String },
}

/// Signed upload slot issued by the collector
#[derive(Debug, Deserialize)]
struct UploadSlot {
    signed_id: String,
    url: String,
    #[serde(default)]
    headers: BTreeMap<String, String>,
}

#[derive(Debug, Serialize)]
struct UploadSlotRequest<'a> {
    file_prefix: &'a str,
    content_type: &'a str,
    content_encoding: &'a str,
    byte_size: u64,
}

/// HTTP client for the collector service
pub struct Client {
    http: HttpClient,
    base_url: String,
    token: Option<String>,
}

impl Client {
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("beacon/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    fn request_upload_slot(
        &self,
        request: &UploadRequest,
        byte_size: u64,
    ) -> Result<UploadSlot, ApiError> {
        let response = self
            .authorized(self.http.post(self.endpoint(UPLOADS_PATH)))
            .json(&UploadSlotRequest {
                file_prefix: &request.file_prefix,
                content_type: &request.content_type,
                content_encoding: &request.content_encoding,
                byte_size,
            })
            .send()?;

        let response = Self::ensure_success(response)?;
        Ok(response.json()?)
    }

    fn transfer(&self, slot: &UploadSlot, request: &UploadRequest) -> Result<(), ApiError> {
        let file = File::open(&request.file_path)?;

        let mut builder = self
            .http
            .put(&slot.url)
            .header(CONTENT_TYPE, &request.content_type)
            .header(CONTENT_ENCODING, &request.content_encoding);
        for (name, value) in &slot.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder.body(file).send()?;
        Self::ensure_success(response)?;
        Ok(())
    }

    fn ensure_success(
        response: reqwest::blocking::Response,
    ) -> Result<reqwest::blocking::Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response.text().unwrap_or_default();
        Err(ApiError::Status {
            status: status.as_u16(),
            message,
        })
    }
}

impl Collector for Client {
    fn upload_file(&self, request: &UploadRequest) -> Result<UploadHandle, ApiError> {
        let byte_size = std::fs::metadata(&request.file_path)?.len();

        let slot = self.request_upload_slot(request, byte_size)?;
        debug!(
            "uploading {} ({} bytes) to storage slot",
            request.file_path.display(),
            byte_size
        );
        self.transfer(&slot, request)?;

        Ok(UploadHandle {
            signed_id: slot.signed_id,
        })
    }

    fn scan_finished(&self, meta: &Meta) -> Result<(), ApiError> {
        let response = self
            .authorized(self.http.post(self.endpoint(SCAN_FINISHED_PATH)))
            .json(meta)
            .send()?;

        Self::ensure_success(response)?;
        Ok(())
    }
}
