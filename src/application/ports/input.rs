//! Global keyboard input port interface

use thiserror::Error;
use tokio::sync::mpsc::UnboundedSender;

use crate::domain::gesture::KeyEvent;

/// Input stream errors
#[derive(Debug, Clone, Error)]
pub enum InputError {
    #[error("Failed to start keyboard listener: {0}")]
    StartFailed(String),
}

/// Port for a process-wide key event stream.
///
/// Events are delivered in arrival order. When the underlying listener dies
/// the sender is dropped, which closes the stream for the consumer.
pub trait KeyEventSource: Send + Sync {
    fn start(&self, events: UnboundedSender<KeyEvent>) -> Result<(), InputError>;
}
