//! Audio capture and encoding port interfaces

use std::sync::atomic::AtomicBool;

use thiserror::Error;

use crate::domain::recording::AudioFrames;

/// Recording errors
#[derive(Debug, Clone, Error)]
pub enum RecordingError {
    #[error("No audio device available")]
    NoAudioDevice,

    #[error("Failed to start recording: {0}")]
    StartFailed(String),

    #[error("Recording failed: {0}")]
    RecordingFailed(String),

    #[error("Failed to encode audio: {0}")]
    EncodeFailed(String),
}

/// Port for a blocking microphone source.
///
/// Implementations run on a dedicated thread: they open the device, collect
/// blocks while `active` is set, release the device once it clears and hand
/// the buffer back to the caller.
pub trait AudioSource: Send + Sync {
    fn record_until(&self, active: &AtomicBool) -> Result<AudioFrames, RecordingError>;
}

/// Encoded audio ready to be written to disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedAudio {
    pub bytes: Vec<u8>,
    /// File extension without the dot
    pub extension: &'static str,
}

/// Port for turning recorded frames into a transcribable file format
pub trait AudioEncoder: Send + Sync {
    fn encode(&self, frames: AudioFrames) -> Result<EncodedAudio, RecordingError>;
}
