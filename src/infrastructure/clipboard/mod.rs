//! Clipboard infrastructure module

mod arboard;

pub use arboard::ArboardClipboard;

use std::sync::Arc;

use crate::application::ports::ClipboardReader;

/// Create the clipboard reader for the current platform
pub fn create_clipboard() -> Arc<dyn ClipboardReader> {
    Arc::new(ArboardClipboard::new())
}
