//! Recording infrastructure module
//!
//! Microphone capture through cpal and FLAC encoding for the transcriber.

mod cpal_source;
mod flac_encoder;

pub use cpal_source::CpalAudioSource;
pub use flac_encoder::{encode_to_flac, EncodingError, FlacEncoder};
