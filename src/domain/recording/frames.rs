//! Recorded audio buffer

use std::time::Duration;

/// Sample rate the transcriber expects (16kHz)
pub const TARGET_SAMPLE_RATE: u32 = 16_000;

/// Recordings shorter than this are discarded
pub const MIN_RECORDING_DURATION: Duration = Duration::from_millis(500);

/// Ordered blocks of mono i16 samples captured at a single sample rate.
///
/// The buffer is owned by the audio producer while recording and moved to
/// the transcription task once the producer has stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioFrames {
    sample_rate: u32,
    blocks: Vec<Vec<i16>>,
}

impl AudioFrames {
    /// Create an empty buffer for the given sample rate
    pub fn new(sample_rate: u32) -> Self {
        Self {
            sample_rate,
            blocks: Vec::new(),
        }
    }

    /// Append a block; empty blocks are dropped
    pub fn push(&mut self, block: Vec<i16>) {
        if !block.is_empty() {
            self.blocks.push(block);
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Total number of samples across all blocks
    pub fn sample_count(&self) -> usize {
        self.blocks.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Recorded duration
    pub fn duration(&self) -> Duration {
        if self.sample_rate == 0 {
            return Duration::ZERO;
        }
        Duration::from_secs_f64(self.sample_count() as f64 / self.sample_rate as f64)
    }

    /// Whether the recording is long enough to transcribe
    pub fn meets_minimum(&self) -> bool {
        !self.is_empty() && self.duration() >= MIN_RECORDING_DURATION
    }

    /// Concatenate all blocks into one sample vector
    pub fn into_samples(self) -> Vec<i16> {
        self.blocks.concat()
    }
}
