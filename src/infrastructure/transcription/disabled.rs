//! Transcriber used when no API key is configured

use std::path::Path;

use async_trait::async_trait;

use crate::application::ports::{Transcriber, TranscriptionError};

/// Fails every request with `MissingApiKey`.
///
/// Keeps the agent usable for screenshots and clipboard without a key.
pub struct DisabledTranscriber;

#[async_trait]
impl Transcriber for DisabledTranscriber {
    async fn transcribe(&self, _audio_path: &Path) -> Result<String, TranscriptionError> {
        Err(TranscriptionError::MissingApiKey)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn always_reports_missing_key() {
        let err = DisabledTranscriber
            .transcribe(Path::new("recording.flac"))
            .await
            .unwrap_err();
        assert!(matches!(err, TranscriptionError::MissingApiKey));
    }
}
