//! Gesture dispatch
//!
//! The single consumer of the key event stream. It owns the gesture tracker
//! and the active recording session, so neither needs locking. Actions run as
//! spawned tasks and never block event handling.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::domain::gesture::{Gesture, GestureTracker, KeyEvent};

use super::executor::{ActionError, ActionExecutor};
use super::ports::{AudioCue, AudioCueType, AudioSource};
use super::recording::RecordingSession;

/// Routes recognised gestures to their actions
pub struct GestureDispatcher {
    tracker: GestureTracker,
    executor: ActionExecutor,
    audio: Arc<dyn AudioSource>,
    cue: Arc<dyn AudioCue>,
    session: Option<RecordingSession>,
}

impl GestureDispatcher {
    pub fn new(executor: ActionExecutor, audio: Arc<dyn AudioSource>, cue: Arc<dyn AudioCue>) -> Self {
        Self {
            tracker: GestureTracker::new(),
            executor,
            audio,
            cue,
            session: None,
        }
    }

    /// Replace the gesture tracker (custom tap key)
    pub fn with_tracker(mut self, tracker: GestureTracker) -> Self {
        self.tracker = tracker;
        self
    }

    /// Whether a recording session is active
    pub fn is_recording(&self) -> bool {
        self.session.is_some()
    }

    /// Consume events until the stream closes
    pub async fn run(mut self, mut events: mpsc::UnboundedReceiver<KeyEvent>) {
        while let Some(event) = events.recv().await {
            self.handle(&event);
        }
        debug!("key event stream closed");
    }

    /// Feed one event through the tracker and launch the resulting action.
    ///
    /// # Returns
    /// Handle of the spawned action, if one was launched
    pub fn handle(&mut self, event: &KeyEvent) -> Option<JoinHandle<()>> {
        let gesture = self.tracker.handle(event, self.session.is_some())?;
        debug!(%gesture, "gesture recognised");

        match gesture {
            Gesture::StartRecording => {
                self.start_recording();
                None
            }
            Gesture::StopRecording => self.stop_recording(),
            Gesture::CaptureScreenshot => {
                info!("Capturing screenshot...");
                self.play(AudioCueType::Acknowledge);
                let executor = self.executor.clone();
                Some(tokio::spawn(async move {
                    if let Err(e) = executor.capture_screenshot().await {
                        report(gesture, &e);
                    }
                }))
            }
            Gesture::FlushScreenshots => {
                info!("Uploading screenshots...");
                self.play(AudioCueType::Acknowledge);
                let executor = self.executor.clone();
                Some(tokio::spawn(async move {
                    if let Err(e) = executor.flush_screenshots().await {
                        report(gesture, &e);
                    }
                }))
            }
            Gesture::SendClipboard => {
                info!("Sending clipboard...");
                self.play(AudioCueType::Acknowledge);
                let executor = self.executor.clone();
                Some(tokio::spawn(async move {
                    if let Err(e) = executor.send_clipboard().await {
                        report(gesture, &e);
                    }
                }))
            }
        }
    }

    fn start_recording(&mut self) {
        if self.session.is_some() {
            return;
        }
        info!("Voice recording started... (release Esc to stop)");
        self.play(AudioCueType::RecordingStart);
        self.session = Some(RecordingSession::start(Arc::clone(&self.audio)));
    }

    fn stop_recording(&mut self) -> Option<JoinHandle<()>> {
        let session = self.session.take()?;
        info!(elapsed_ms = session.elapsed().as_millis() as u64, "Voice recording stopped, processing...");
        self.play(AudioCueType::RecordingStop);

        let executor = self.executor.clone();
        Some(tokio::spawn(async move {
            let frames = match session.finish().await {
                Ok(frames) => frames,
                Err(e) => {
                    error!(error = %e, "Recording failed");
                    return;
                }
            };
            if let Err(e) = executor.send_voice(frames).await {
                report(Gesture::StopRecording, &e);
            }
        }))
    }

    fn play(&self, cue_type: AudioCueType) {
        let cue = Arc::clone(&self.cue);
        tokio::spawn(async move {
            if let Err(e) = cue.play(cue_type).await {
                debug!(error = %e, "audio cue failed");
            }
        });
    }
}

fn report(gesture: Gesture, err: &ActionError) {
    if err.is_skip() {
        warn!(%gesture, "{}", err);
    } else {
        error!(%gesture, error = %err, "Action failed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::executor::tests::harness;
    use crate::application::ports::AudioCueError;
    use crate::application::recording::tests::SyntheticSource;
    use crate::domain::gesture::Key;
    use async_trait::async_trait;
    use std::sync::atomic::Ordering;
    use std::sync::Mutex as StdMutex;
    use std::time::{Duration, Instant};

    #[derive(Default)]
    struct RecordingCue {
        played: StdMutex<Vec<AudioCueType>>,
    }

    #[async_trait]
    impl AudioCue for RecordingCue {
        async fn play(&self, cue_type: AudioCueType) -> Result<(), AudioCueError> {
            self.played.lock().unwrap().push(cue_type);
            Ok(())
        }
    }

    fn at(base: Instant, ms: u64) -> Instant {
        base + Duration::from_millis(ms)
    }

    #[tokio::test]
    async fn double_tap_hold_release_sends_transcript() {
        let h = harness(None, Ok(String::new()));
        let source = Arc::new(SyntheticSource::new(32_000));
        let cue = Arc::new(RecordingCue::default());
        let mut dispatcher = GestureDispatcher::new(h.executor.clone(), source.clone(), cue.clone());
        let t0 = Instant::now();

        assert!(dispatcher.handle(&KeyEvent::press(Key::Escape, at(t0, 0))).is_none());
        dispatcher.handle(&KeyEvent::release(Key::Escape, at(t0, 80)));
        assert!(!dispatcher.is_recording());

        dispatcher.handle(&KeyEvent::press(Key::Escape, at(t0, 300)));
        assert!(dispatcher.is_recording());

        let task = dispatcher
            .handle(&KeyEvent::release(Key::Escape, at(t0, 2_300)))
            .expect("release should launch processing");
        assert!(!dispatcher.is_recording());
        task.await.unwrap();

        assert_eq!(*h.uploader.messages.lock().unwrap(), vec!["hello world".to_string()]);
        assert_eq!(source.opened.load(Ordering::SeqCst), 1);
        assert_eq!(source.released.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn short_recording_sends_nothing() {
        let h = harness(None, Ok(String::new()));
        let source = Arc::new(SyntheticSource::new(4_800));
        let mut dispatcher =
            GestureDispatcher::new(h.executor.clone(), source, Arc::new(RecordingCue::default()));
        let t0 = Instant::now();

        dispatcher.handle(&KeyEvent::press(Key::Escape, at(t0, 0)));
        dispatcher.handle(&KeyEvent::release(Key::Escape, at(t0, 50)));
        dispatcher.handle(&KeyEvent::press(Key::Escape, at(t0, 200)));
        let task = dispatcher
            .handle(&KeyEvent::release(Key::Escape, at(t0, 500)))
            .unwrap();
        task.await.unwrap();

        assert!(h.transcriber.seen.lock().unwrap().is_empty());
        assert!(h.uploader.messages.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn combos_launch_actions() {
        let h = harness(None, Ok("note".to_string()));
        let cue = Arc::new(RecordingCue::default());
        let mut dispatcher = GestureDispatcher::new(
            h.executor.clone(),
            Arc::new(SyntheticSource::new(0)),
            cue.clone(),
        );
        let t0 = Instant::now();

        dispatcher.handle(&KeyEvent::press(Key::Escape, at(t0, 0)));
        dispatcher
            .handle(&KeyEvent::press(Key::Down, at(t0, 50)))
            .unwrap()
            .await
            .unwrap();
        dispatcher.handle(&KeyEvent::release(Key::Down, at(t0, 80)));
        dispatcher
            .handle(&KeyEvent::press(Key::Up, at(t0, 100)))
            .unwrap()
            .await
            .unwrap();
        dispatcher.handle(&KeyEvent::release(Key::Up, at(t0, 120)));
        dispatcher
            .handle(&KeyEvent::press(Key::Right, at(t0, 140)))
            .unwrap()
            .await
            .unwrap();
        dispatcher.handle(&KeyEvent::release(Key::Escape, at(t0, 200)));

        assert_eq!(h.uploader.batches.lock().unwrap().len(), 1);
        assert_eq!(*h.uploader.messages.lock().unwrap(), vec!["note".to_string()]);
        assert!(h.executor.pending().await.is_empty());
        assert!(!dispatcher.is_recording());

        // Cue tasks are fire-and-forget; give them a moment
        tokio::time::sleep(Duration::from_millis(20)).await;
        let played = cue.played.lock().unwrap().clone();
        assert_eq!(played.len(), 3);
        assert!(played.iter().all(|c| *c == AudioCueType::Acknowledge));
    }

    #[tokio::test]
    async fn arrow_without_tap_key_does_nothing() {
        let h = harness(None, Ok("note".to_string()));
        let mut dispatcher = GestureDispatcher::new(
            h.executor.clone(),
            Arc::new(SyntheticSource::new(0)),
            Arc::new(RecordingCue::default()),
        );
        let t0 = Instant::now();

        assert!(dispatcher.handle(&KeyEvent::press(Key::Down, at(t0, 0))).is_none());
        assert!(dispatcher.handle(&KeyEvent::press(Key::Right, at(t0, 10))).is_none());
        assert!(h.executor.pending().await.is_empty());
    }

    #[tokio::test]
    async fn run_returns_when_stream_closes() {
        let h = harness(None, Ok(String::new()));
        let dispatcher = GestureDispatcher::new(
            h.executor.clone(),
            Arc::new(SyntheticSource::new(0)),
            Arc::new(RecordingCue::default()),
        );
        let (tx, rx) = mpsc::unbounded_channel();
        tx.send(KeyEvent::press(Key::Other("a".into()), Instant::now()))
            .unwrap();
        drop(tx);

        tokio::time::timeout(Duration::from_secs(1), dispatcher.run(rx))
            .await
            .expect("run should end once the sender is gone");
    }
}
