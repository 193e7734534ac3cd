//! Gesture action use cases
//!
//! Every action runs off the dispatcher task. Failures are returned to the
//! caller, which logs them; nothing here terminates the agent.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::domain::artifacts::PendingArtifacts;
use crate::domain::recording::AudioFrames;

use super::ports::{
    AudioEncoder, CaptureError, CaptureRegion, ClipboardError, ClipboardReader, EncodedAudio,
    RecordingError, ScreenCapture, Transcriber, TranscriptionError, UploadError, Uploader,
    WindowLocator,
};

/// Characters of a transcript echoed to the log
const TRANSCRIPT_PREVIEW_CHARS: usize = 100;

/// Errors from gesture actions
#[derive(Debug, Error)]
pub enum ActionError {
    #[error("Screenshot failed: {0}")]
    Capture(#[from] CaptureError),

    #[error("Clipboard read failed: {0}")]
    Clipboard(#[from] ClipboardError),

    #[error("Upload failed: {0}")]
    Upload(#[from] UploadError),

    #[error("Recording failed: {0}")]
    Recording(#[from] RecordingError),

    #[error("Transcription failed: {0}")]
    Transcription(#[from] TranscriptionError),

    #[error("Recording too short ({0:?}), skipping")]
    RecordingTooShort(Duration),

    #[error("Nothing to send")]
    EmptyText,

    #[error("Failed to prepare {path}: {message}")]
    Io { path: String, message: String },
}

impl ActionError {
    /// Whether this is an expected no-op rather than a failure
    pub fn is_skip(&self) -> bool {
        matches!(
            self,
            Self::Upload(UploadError::NothingToUpload)
                | Self::Clipboard(ClipboardError::Empty)
                | Self::RecordingTooShort(_)
                | Self::EmptyText
        )
    }

    fn io(path: &Path, err: std::io::Error) -> Self {
        Self::Io {
            path: path.display().to_string(),
            message: err.to_string(),
        }
    }
}

/// External systems the actions talk to
#[derive(Clone)]
pub struct ActionPorts {
    pub window_locator: Arc<dyn WindowLocator>,
    pub screen: Arc<dyn ScreenCapture>,
    pub clipboard: Arc<dyn ClipboardReader>,
    pub uploader: Arc<dyn Uploader>,
    pub transcriber: Arc<dyn Transcriber>,
    pub encoder: Arc<dyn AudioEncoder>,
}

/// Directories actions write into
#[derive(Debug, Clone)]
pub struct ArtifactDirs {
    pub screenshots: PathBuf,
    pub audio: PathBuf,
}

/// Runs the action behind each gesture.
///
/// Cloning is cheap; clones share the pending screenshot queue. The queue
/// lock is only held for bookkeeping, never across a grab or an upload.
#[derive(Clone)]
pub struct ActionExecutor {
    ports: ActionPorts,
    dirs: ArtifactDirs,
    pending: Arc<Mutex<PendingArtifacts>>,
    /// Serializes flushes so a batch is never uploaded twice
    flushing: Arc<Mutex<()>>,
}

impl ActionExecutor {
    pub fn new(ports: ActionPorts, dirs: ArtifactDirs) -> Self {
        Self {
            ports,
            dirs,
            pending: Arc::new(Mutex::new(PendingArtifacts::new())),
            flushing: Arc::new(Mutex::new(())),
        }
    }

    /// Snapshot of the screenshots waiting for a flush
    pub async fn pending(&self) -> PendingArtifacts {
        self.pending.lock().await.clone()
    }

    /// Capture the focused window (or the whole screen) and queue the file.
    ///
    /// Runs alongside an in-flight flush; the file joins the queue once it
    /// is written.
    pub async fn capture_screenshot(&self) -> Result<PathBuf, ActionError> {
        let dir = &self.dirs.screenshots;
        let path = dir.join(self.pending.lock().await.reserve_file_name());

        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|e| ActionError::io(dir, e))?;

        let region = match self.ports.window_locator.active_window().await {
            Ok(bounds) => {
                info!(%bounds, "Active window detected");
                CaptureRegion::Window(bounds)
            }
            Err(reason) => {
                warn!(%reason, "No active window detected, capturing full screen");
                CaptureRegion::FullScreen
            }
        };

        self.ports.screen.capture(region, &path).await?;

        if !path.exists() {
            return Err(CaptureError::SaveFailed(format!("{} was not written", path.display())).into());
        }

        let mut pending = self.pending.lock().await;
        pending.push(path.clone());
        info!(path = %path.display(), queued = pending.len(), "Screenshot captured");
        Ok(path)
    }

    /// Upload every queued screenshot in one request.
    ///
    /// Only the files in the batch leave the queue, and only when the server
    /// accepts it. Captures queued during the upload stay for the next flush.
    ///
    /// # Returns
    /// Number of files uploaded
    pub async fn flush_screenshots(&self) -> Result<usize, ActionError> {
        let _flushing = self.flushing.lock().await;
        let batch = self.pending.lock().await.paths().to_vec();

        if batch.is_empty() {
            return Err(UploadError::NothingToUpload.into());
        }

        let files: Vec<PathBuf> = batch
            .iter()
            .filter(|path| {
                let exists = path.exists();
                if !exists {
                    warn!(path = %path.display(), "Screenshot missing, skipping");
                }
                exists
            })
            .cloned()
            .collect();

        if files.is_empty() {
            return Err(UploadError::NothingToUpload.into());
        }

        self.ports.uploader.upload_screenshots(&files).await?;

        self.pending.lock().await.remove_all(&batch);
        info!(count = files.len(), "Screenshots uploaded");
        Ok(files.len())
    }

    /// Read the clipboard and send it as a chat message
    pub async fn send_clipboard(&self) -> Result<(), ActionError> {
        let text = self.ports.clipboard.read_text().await?;
        self.send_text(&text).await
    }

    /// Send text to the chat endpoint as is. Blank text is skipped.
    pub async fn send_text(&self, text: &str) -> Result<(), ActionError> {
        if text.trim().is_empty() {
            return Err(ActionError::EmptyText);
        }

        self.ports.uploader.send_message(text).await?;
        info!(chars = text.chars().count(), "Message sent");
        Ok(())
    }

    /// Encode, transcribe and send a finished recording.
    ///
    /// The intermediate audio file is removed before this returns, whatever
    /// the outcome.
    ///
    /// # Returns
    /// The transcript that was sent
    pub async fn send_voice(&self, frames: AudioFrames) -> Result<String, ActionError> {
        if !frames.meets_minimum() {
            return Err(ActionError::RecordingTooShort(frames.duration()));
        }

        let duration = frames.duration();
        let encoder = Arc::clone(&self.ports.encoder);
        let encoded = tokio::task::spawn_blocking(move || encoder.encode(frames))
            .await
            .map_err(|e| RecordingError::EncodeFailed(format!("Task join error: {}", e)))??;
        debug!(
            bytes = encoded.bytes.len(),
            duration_ms = duration.as_millis() as u64,
            "Audio encoded"
        );

        let text = {
            let file = TempAudioFile::write(&self.dirs.audio, encoded).await?;
            info!("Transcribing audio...");
            self.ports.transcriber.transcribe(file.path()).await?
        };

        let text = text.trim();
        if text.is_empty() {
            return Err(TranscriptionError::EmptyResponse.into());
        }
        info!(transcript = %preview(text), "Transcription complete");

        self.send_text(text).await?;
        Ok(text.to_string())
    }
}

/// Encoded recording on disk, removed on drop
struct TempAudioFile {
    path: PathBuf,
}

impl TempAudioFile {
    async fn write(dir: &Path, audio: EncodedAudio) -> Result<Self, ActionError> {
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|e| ActionError::io(dir, e))?;

        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default();
        let file = Self {
            path: dir.join(format!("recording_{}.{}", millis, audio.extension)),
        };

        tokio::fs::write(&file.path, &audio.bytes)
            .await
            .map_err(|e| ActionError::io(&file.path, e))?;
        Ok(file)
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempAudioFile {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => debug!(path = %self.path.display(), "Removed temporary audio"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!(path = %self.path.display(), error = %e, "Failed to remove temporary audio"),
        }
    }
}

/// First characters of a transcript, with an ellipsis when cut
fn preview(text: &str) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(TRANSCRIPT_PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}
