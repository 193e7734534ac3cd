//! Screen capture port interfaces

use std::fmt;
use std::path::Path;

use async_trait::async_trait;
use thiserror::Error;

/// Screen-space rectangle of a window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowBounds {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl fmt::Display for WindowBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {}, {})", self.x, self.y, self.width, self.height)
    }
}

/// What to grab
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureRegion {
    Window(WindowBounds),
    FullScreen,
}

/// Why the active window could not be located
#[derive(Debug, Clone, Error)]
pub enum WindowLookupError {
    #[error("window lookup is not supported on this platform")]
    Unsupported,

    #[error("{0} not found")]
    ToolNotFound(&'static str),

    #[error("no active window")]
    NoActiveWindow,

    #[error("unexpected window geometry output: {0}")]
    BadOutput(String),
}

/// Screen capture errors
#[derive(Debug, Clone, Error)]
pub enum CaptureError {
    #[error("No screen available: {0}")]
    NoScreen(String),

    #[error("Screen capture failed: {0}")]
    GrabFailed(String),

    #[error("Failed to save screenshot: {0}")]
    SaveFailed(String),
}

/// Port for finding the focused window (best effort)
#[async_trait]
pub trait WindowLocator: Send + Sync {
    /// Bounds of the currently focused window
    async fn active_window(&self) -> Result<WindowBounds, WindowLookupError>;
}

/// Port for grabbing pixels and writing them as a compressed image
#[async_trait]
pub trait ScreenCapture: Send + Sync {
    /// Capture `region` and write it to `path`
    async fn capture(&self, region: CaptureRegion, path: &Path) -> Result<(), CaptureError>;
}
