//! Transcription infrastructure module

mod disabled;
mod gemini;

pub use disabled::DisabledTranscriber;
pub use gemini::GeminiTranscriber;

use std::sync::Arc;

use crate::application::ports::Transcriber;

/// Create the transcriber for an optional API key
pub fn create_transcriber(api_key: Option<&str>) -> Arc<dyn Transcriber> {
    match api_key {
        Some(key) => Arc::new(GeminiTranscriber::new(key)),
        None => Arc::new(DisabledTranscriber),
    }
}
