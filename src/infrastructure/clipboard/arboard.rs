//! Clipboard reader using arboard
//!
//! Works on X11 and Wayland.

use async_trait::async_trait;

use crate::application::ports::{ClipboardError, ClipboardReader};

/// Clipboard reader backed by arboard
pub struct ArboardClipboard;

impl ArboardClipboard {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ArboardClipboard {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ClipboardReader for ArboardClipboard {
    async fn read_text(&self) -> Result<String, ClipboardError> {
        // arboard operations are blocking
        let text = tokio::task::spawn_blocking(|| {
            let mut clipboard = arboard::Clipboard::new()
                .map_err(|e| ClipboardError::ClipboardUnavailable(e.to_string()))?;

            match clipboard.get_text() {
                Ok(text) => Ok(text),
                Err(arboard::Error::ContentNotAvailable) => Err(ClipboardError::Empty),
                Err(e) => Err(ClipboardError::ReadFailed(e.to_string())),
            }
        })
        .await
        .map_err(|e| ClipboardError::ReadFailed(format!("Task join error: {}", e)))??;

        non_blank(text)
    }
}

fn non_blank(text: String) -> Result<String, ClipboardError> {
    if text.trim().is_empty() {
        Err(ClipboardError::Empty)
    } else {
        Ok(text)
    }
}
