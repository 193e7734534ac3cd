//! Recording domain module

mod frames;

pub use frames::{AudioFrames, MIN_RECORDING_DURATION, TARGET_SAMPLE_RATE};
