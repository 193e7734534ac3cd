//! Audio cue infrastructure adapters
//!
//! Provides audio feedback when a gesture fires or recording starts or stops.

mod noop;
mod rodio;

pub use noop::NoOpAudioCue;
pub use rodio::RodioAudioCue;

use std::sync::Arc;

use crate::application::ports::AudioCue;

/// Create an audio cue adapter based on whether audio cues are enabled
pub fn create_audio_cue(enabled: bool) -> Arc<dyn AudioCue> {
    if enabled {
        Arc::new(RodioAudioCue::new())
    } else {
        Arc::new(NoOpAudioCue::new())
    }
}
