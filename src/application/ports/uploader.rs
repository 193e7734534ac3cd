//! Upload port interface

use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;

/// Upload errors
#[derive(Debug, Clone, Error)]
pub enum UploadError {
    #[error("Nothing to upload")]
    NothingToUpload,

    #[error("Failed to read file {path}: {message}")]
    ReadFailed { path: String, message: String },

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Server rejected request (HTTP {status}): {body}")]
    Rejected { status: u16, body: String },
}

/// Port for sending artifacts and text to the session endpoint
#[async_trait]
pub trait Uploader: Send + Sync {
    /// Upload screenshot files in one multipart request.
    ///
    /// Succeeds only if the server accepted the request.
    async fn upload_screenshots(&self, files: &[PathBuf]) -> Result<(), UploadError>;

    /// Send a chat message (clipboard text or transcript)
    async fn send_message(&self, text: &str) -> Result<(), UploadError>;
}
