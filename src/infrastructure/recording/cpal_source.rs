//! Microphone source using cpal
//!
//! Opens the default input device, downmixes to mono i16 in the stream
//! callback and hands each block to the recording thread over a channel.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::time::Duration;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{SampleFormat, SampleRate, StreamConfig};
use tracing::{debug, warn};

use crate::application::ports::{AudioSource, RecordingError};
use crate::domain::recording::{AudioFrames, TARGET_SAMPLE_RATE};

/// How often the recording thread re-checks the active flag
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Default-microphone audio source
pub struct CpalAudioSource;

impl CpalAudioSource {
    pub fn new() -> Self {
        Self
    }

    fn input_device() -> Result<cpal::Device, RecordingError> {
        let host = cpal::default_host();
        host.default_input_device()
            .ok_or(RecordingError::NoAudioDevice)
    }

    /// Pick an i16/f32 config, preferring fewer channels and 16kHz support
    fn input_config(device: &cpal::Device) -> Result<(StreamConfig, SampleFormat), RecordingError> {
        let supported_configs = device
            .supported_input_configs()
            .map_err(|e| RecordingError::StartFailed(format!("Failed to get configs: {}", e)))?;

        let mut best_config: Option<cpal::SupportedStreamConfigRange> = None;

        for config in supported_configs {
            if config.sample_format() != SampleFormat::I16
                && config.sample_format() != SampleFormat::F32
            {
                continue;
            }

            let includes_target = config.min_sample_rate().0 <= TARGET_SAMPLE_RATE
                && config.max_sample_rate().0 >= TARGET_SAMPLE_RATE;

            let is_better = match &best_config {
                None => true,
                Some(current) => {
                    let fewer_channels = config.channels() < current.channels();
                    let better_rate =
                        includes_target && current.min_sample_rate().0 > TARGET_SAMPLE_RATE;
                    fewer_channels || better_rate
                }
            };
            if is_better {
                best_config = Some(config);
            }
        }

        let config_range = best_config.ok_or(RecordingError::StartFailed(
            "No suitable config found".into(),
        ))?;

        let sample_rate = if config_range.min_sample_rate().0 <= TARGET_SAMPLE_RATE
            && config_range.max_sample_rate().0 >= TARGET_SAMPLE_RATE
        {
            SampleRate(TARGET_SAMPLE_RATE)
        } else {
            config_range.min_sample_rate()
        };

        let sample_format = config_range.sample_format();
        let config = StreamConfig {
            channels: config_range.channels(),
            sample_rate,
            buffer_size: cpal::BufferSize::Default,
        };

        Ok((config, sample_format))
    }

    fn build_stream(
        device: &cpal::Device,
        config: &StreamConfig,
        sample_format: SampleFormat,
        blocks: mpsc::Sender<Vec<i16>>,
    ) -> Result<cpal::Stream, RecordingError> {
        let channels = config.channels;
        let on_error = |err: cpal::StreamError| warn!(error = %err, "Audio stream error");

        let stream = match sample_format {
            SampleFormat::I16 => device.build_input_stream(
                config,
                move |data: &[i16], _: &cpal::InputCallbackInfo| {
                    let _ = blocks.send(downmix(data, channels));
                },
                on_error,
                None,
            ),
            SampleFormat::F32 => device.build_input_stream(
                config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    let i16_data: Vec<i16> = data.iter().map(|&s| (s * 32767.0) as i16).collect();
                    let _ = blocks.send(downmix(&i16_data, channels));
                },
                on_error,
                None,
            ),
            _ => {
                return Err(RecordingError::StartFailed(
                    "Unsupported sample format".into(),
                ))
            }
        };

        stream.map_err(|e| RecordingError::StartFailed(e.to_string()))
    }
}

impl Default for CpalAudioSource {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioSource for CpalAudioSource {
    fn record_until(&self, active: &AtomicBool) -> Result<AudioFrames, RecordingError> {
        let device = Self::input_device()?;
        let (config, sample_format) = Self::input_config(&device)?;
        let sample_rate = config.sample_rate.0;
        debug!(sample_rate, channels = config.channels, "opening input stream");

        let (tx, rx) = mpsc::channel();
        let stream = Self::build_stream(&device, &config, sample_format, tx)?;
        stream
            .play()
            .map_err(|e| RecordingError::StartFailed(e.to_string()))?;

        let mut frames = AudioFrames::new(sample_rate);
        while active.load(Ordering::SeqCst) {
            match rx.recv_timeout(POLL_INTERVAL) {
                Ok(block) => frames.push(block),
                Err(mpsc::RecvTimeoutError::Timeout) => {}
                Err(mpsc::RecvTimeoutError::Disconnected) => {
                    return Err(RecordingError::RecordingFailed(
                        "Audio stream closed".into(),
                    ))
                }
            }
        }

        // Release the device before handing the buffer over
        drop(stream);
        for block in rx.try_iter() {
            frames.push(block);
        }

        Ok(frames)
    }
}

/// Average interleaved channels down to mono
fn downmix(samples: &[i16], channels: u16) -> Vec<i16> {
    if channels <= 1 {
        return samples.to_vec();
    }

    samples
        .chunks(channels as usize)
        .map(|chunk| {
            let sum: i32 = chunk.iter().map(|&s| s as i32).sum();
            (sum / chunk.len() as i32) as i16
        })
        .collect()
}
