//! Transcription port interface

use std::path::Path;

use async_trait::async_trait;
use thiserror::Error;

/// Transcription errors
#[derive(Debug, Clone, Error)]
pub enum TranscriptionError {
    #[error("Missing API key. Set GEMINI_API_KEY or run 'ai-screenshooter config set api_key <key>'")]
    MissingApiKey,

    #[error("Invalid API key")]
    InvalidApiKey,

    #[error("Rate limit exceeded. Please try again later.")]
    RateLimited,

    #[error("Empty transcription response")]
    EmptyResponse,

    #[error("Failed to read audio file: {0}")]
    ReadFailed(String),

    #[error("API request failed: {0}")]
    RequestFailed(String),

    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    #[error("API error: {0}")]
    ApiError(String),
}

/// Port for speech-to-text
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe a finalized audio file to text.
    ///
    /// # Arguments
    /// * `audio_path` - Encoded audio written by the recording pipeline
    ///
    /// # Returns
    /// The transcribed text or an error
    async fn transcribe(&self, audio_path: &Path) -> Result<String, TranscriptionError>;
}
