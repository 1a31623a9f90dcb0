//! Notes service API layer
//!
//! `NotesApi` is the only interface for HTTP traffic with the notes backend.
//! Flows and the search session call through it and never build requests
//! themselves; `HttpNotesApi` is the reqwest implementation.

pub mod auth;
pub mod download;
pub mod http;
pub mod upload;

#[cfg(test)]
pub(crate) mod testing;

use std::fmt;
use std::future::Future;

use reqwest::Url;
use serde_json::Value;

use crate::core::error::{NotesError, Result};

pub use auth::Registration;
pub use http::HttpNotesApi;
pub use upload::{UploadForm, UploadReply};

/// How a download endpoint receives its argument
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestParam {
    /// Appended as one percent-encoded path segment
    Segment(String),
    /// Sent as a query parameter
    Query(&'static str, String),
}

/// One candidate download endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    pub endpoint: &'static str,
    pub param: RequestParam,
}

impl DownloadRequest {
    pub fn segment(endpoint: &'static str, value: impl Into<String>) -> Self {
        Self {
            endpoint,
            param: RequestParam::Segment(value.into()),
        }
    }

    pub fn query(endpoint: &'static str, key: &'static str, value: impl Into<String>) -> Self {
        Self {
            endpoint,
            param: RequestParam::Query(key, value.into()),
        }
    }

    /// Absolute URL of this request against `base`
    pub fn url(&self, base: &str) -> Result<Url> {
        let mut url = join_url(base, self.endpoint)?;
        match &self.param {
            RequestParam::Segment(value) => {
                url.path_segments_mut()
                    .map_err(|_| NotesError::Url(format!("cannot append a path to {}", base)))?
                    .push(value);
            }
            RequestParam::Query(key, value) => {
                url.query_pairs_mut().append_pair(key, value);
            }
        }
        Ok(url)
    }
}

impl fmt::Display for DownloadRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.param {
            RequestParam::Segment(value) => write!(f, "GET {}/{}", self.endpoint, value),
            RequestParam::Query(key, value) => write!(f, "GET {}?{}={}", self.endpoint, key, value),
        }
    }
}

/// `<base><path>`, without a doubled slash
pub fn join_url(base: &str, path: &str) -> Result<Url> {
    let raw = format!("{}{}", base.trim_end_matches('/'), path);
    Url::parse(&raw).map_err(|e| NotesError::Url(format!("{}: {}", raw, e)))
}

/// Abstraction over the notes backend.
pub trait NotesApi: Send + Sync {
    /// Fetch the listing, optionally filtered server-side by `query`.
    ///
    /// The body is returned as decoded JSON whatever its shape; callers
    /// unwrap it with `resolver::extract_entries`.
    fn search(&self, query: Option<&str>) -> impl Future<Output = Result<Value>> + Send;

    /// Fetch a binary payload. Any non-success status is an error.
    fn fetch_bytes(
        &self,
        request: &DownloadRequest,
    ) -> impl Future<Output = Result<Vec<u8>>> + Send;

    /// Post a multipart upload. Non-success statuses are returned, not raised.
    fn upload(&self, form: UploadForm) -> impl Future<Output = Result<UploadReply>> + Send;

    /// Sign in; returns the server's message.
    fn login(&self, username: &str, password: &str)
        -> impl Future<Output = Result<String>> + Send;

    /// Create an account; returns the server's message.
    fn register(&self, registration: &Registration) -> impl Future<Output = Result<String>> + Send;

    /// Whether the backend answers at all. Any HTTP status counts.
    fn ping(&self) -> impl Future<Output = bool> + Send;
}
