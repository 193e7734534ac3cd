//! Clipboard port interface

use async_trait::async_trait;
use thiserror::Error;

/// Clipboard errors
#[derive(Debug, Clone, Error)]
pub enum ClipboardError {
    #[error("Clipboard is empty")]
    Empty,

    #[error("Clipboard unavailable: {0}")]
    ClipboardUnavailable(String),

    #[error("Failed to read clipboard: {0}")]
    ReadFailed(String),
}

/// Port for reading the system clipboard
#[async_trait]
pub trait ClipboardReader: Send + Sync {
    /// Read the current clipboard text.
    ///
    /// # Returns
    /// The text, or `ClipboardError::Empty` when there is nothing but whitespace
    async fn read_text(&self) -> Result<String, ClipboardError>;
}
