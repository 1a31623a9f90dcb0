//! Error types shared by the client, resolver and flows

use thiserror::Error;

/// Message shown when every download candidate failed.
pub const DOWNLOAD_FAILED_MESSAGE: &str = "Download failed. Please try again or contact support.";

/// Message shown when an upload name is already in use.
pub const NAME_TAKEN_MESSAGE: &str = "Name already taken. Please choose a different name.";

/// Message shown when the upload endpoint fails without a body.
pub const UPLOAD_FAILED_MESSAGE: &str = "Upload failed. Please try again.";

#[derive(Debug, Error)]
pub enum NotesError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("server returned HTTP {status} for {url}")]
    Status { status: u16, url: String },

    #[error("invalid URL: {0}")]
    Url(String),

    /// All download candidates were exhausted. Only the last error is kept.
    #[error("{DOWNLOAD_FAILED_MESSAGE}")]
    DownloadFailed {
        target: String,
        attempts: usize,
        last_error: String,
    },

    #[error("{0}")]
    NameTaken(String),

    #[error("{0}")]
    UploadFailed(String),

    #[error("{0}")]
    Auth(String),

    #[error("{0}")]
    InvalidInput(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, NotesError>;
