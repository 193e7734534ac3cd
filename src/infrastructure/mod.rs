//! Infrastructure layer - Adapter implementations
//!
//! Contains concrete implementations of the port interfaces,
//! integrating with the keyboard hook, screen, microphone, clipboard,
//! Gemini API and the session endpoint.

pub mod audio_cue;
pub mod capture;
pub mod clipboard;
pub mod config;
pub mod input;
pub mod recording;
pub mod transcription;
pub mod upload;

// Re-export adapters
pub use audio_cue::{create_audio_cue, NoOpAudioCue, RodioAudioCue};
pub use capture::{ScreenshotsCapture, XdotoolWindowLocator};
pub use clipboard::{create_clipboard, ArboardClipboard};
pub use config::XdgConfigStore;
pub use input::RdevKeyListener;
pub use recording::{CpalAudioSource, FlacEncoder};
pub use transcription::{create_transcriber, DisabledTranscriber, GeminiTranscriber};
pub use upload::HttpUploader;
