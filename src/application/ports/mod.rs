//! Port interfaces (traits) for external systems
//!
//! These traits define the boundaries between the application
//! and infrastructure layers.

pub mod audio;
pub mod audio_cue;
pub mod capture;
pub mod clipboard;
pub mod config;
pub mod input;
pub mod transcriber;
pub mod uploader;

// Re-export common types
pub use audio::{AudioEncoder, AudioSource, EncodedAudio, RecordingError};
pub use audio_cue::{AudioCue, AudioCueError, AudioCueType};
pub use capture::{
    CaptureError, CaptureRegion, ScreenCapture, WindowBounds, WindowLocator, WindowLookupError,
};
pub use clipboard::{ClipboardError, ClipboardReader};
pub use config::ConfigStore;
pub use input::{InputError, KeyEventSource};
pub use transcriber::{Transcriber, TranscriptionError};
pub use uploader::{UploadError, Uploader};
