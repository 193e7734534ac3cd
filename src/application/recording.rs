//! Voice recording session
//!
//! A session owns a producer running on the blocking pool. The producer owns
//! the frame buffer while it records and returns it through its join handle,
//! so nothing can read the buffer while it is still being written.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::task::JoinHandle;
use tracing::debug;

use crate::domain::recording::AudioFrames;

use super::ports::{AudioSource, RecordingError};

/// An active recording
pub struct RecordingSession {
    active: Arc<AtomicBool>,
    started_at: Instant,
    producer: Option<JoinHandle<Result<AudioFrames, RecordingError>>>,
}

impl RecordingSession {
    /// Start consuming audio from `source` on a background thread.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start(source: Arc<dyn AudioSource>) -> Self {
        let active = Arc::new(AtomicBool::new(true));
        let flag = Arc::clone(&active);

        let producer = tokio::task::spawn_blocking(move || source.record_until(&flag));

        Self {
            active,
            started_at: Instant::now(),
            producer: Some(producer),
        }
    }

    /// Whether the producer is still meant to be recording
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    /// Wall-clock time since the session started
    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// Signal the producer to stop and wait until it has released the device.
    ///
    /// # Returns
    /// The complete buffer, owned by the caller
    pub async fn finish(mut self) -> Result<AudioFrames, RecordingError> {
        self.active.store(false, Ordering::SeqCst);

        let producer = self
            .producer
            .take()
            .ok_or_else(|| RecordingError::RecordingFailed("Session already finished".into()))?;

        let frames = producer
            .await
            .map_err(|e| RecordingError::RecordingFailed(format!("Task join error: {}", e)))??;

        debug!(
            blocks = frames.block_count(),
            samples = frames.sample_count(),
            wall_ms = self.started_at.elapsed().as_millis() as u64,
            "recording producer joined"
        );
        Ok(frames)
    }
}

impl Drop for RecordingSession {
    fn drop(&mut self) {
        // An abandoned session must not keep the microphone open
        self.active.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    /// Emits `total_samples` at 16kHz in 100ms blocks, then idles until stopped
    pub(crate) struct SyntheticSource {
        pub total_samples: usize,
        pub opened: AtomicUsize,
        pub released: AtomicUsize,
    }

    impl SyntheticSource {
        pub(crate) fn new(total_samples: usize) -> Self {
            Self {
                total_samples,
                opened: AtomicUsize::new(0),
                released: AtomicUsize::new(0),
            }
        }
    }

    impl AudioSource for SyntheticSource {
        fn record_until(&self, active: &AtomicBool) -> Result<AudioFrames, RecordingError> {
            self.opened.fetch_add(1, Ordering::SeqCst);
            let mut frames = AudioFrames::new(16_000);
            let mut remaining = self.total_samples;
            while remaining > 0 {
                let block = remaining.min(1_600);
                frames.push(vec![100; block]);
                remaining -= block;
            }
            while active.load(Ordering::SeqCst) {
                std::thread::sleep(Duration::from_millis(5));
            }
            self.released.fetch_add(1, Ordering::SeqCst);
            Ok(frames)
        }
    }

    struct BrokenSource;

    impl AudioSource for BrokenSource {
        fn record_until(&self, _active: &AtomicBool) -> Result<AudioFrames, RecordingError> {
            Err(RecordingError::NoAudioDevice)
        }
    }

    #[tokio::test]
    async fn finish_returns_all_frames() {
        let source = Arc::new(SyntheticSource::new(32_000));
        let session = RecordingSession::start(source.clone());
        assert!(session.is_active());

        tokio::time::sleep(Duration::from_millis(20)).await;
        let frames = session.finish().await.unwrap();

        assert_eq!(frames.sample_count(), 32_000);
        assert_eq!(frames.duration(), Duration::from_secs(2));
        assert_eq!(source.released.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn finish_waits_for_device_release() {
        let source = Arc::new(SyntheticSource::new(1_600));
        let session = RecordingSession::start(source.clone());
        session.finish().await.unwrap();
        // The producer has returned, so the device is already released
        assert_eq!(
            source.opened.load(Ordering::SeqCst),
            source.released.load(Ordering::SeqCst)
        );
    }

    #[tokio::test]
    async fn device_error_surfaces_on_finish() {
        let session = RecordingSession::start(Arc::new(BrokenSource));
        let err = session.finish().await.unwrap_err();
        assert!(matches!(err, RecordingError::NoAudioDevice));
    }

    #[tokio::test]
    async fn dropping_session_stops_producer() {
        let source = Arc::new(SyntheticSource::new(0));
        let session = RecordingSession::start(source.clone());
        drop(session);

        for _ in 0..100 {
            if source.released.load(Ordering::SeqCst) == 1 {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("producer kept recording after the session was dropped");
    }
}
