//! Screen capture infrastructure module
//!
//! Pixels come from the screenshots crate; the focused window is located by
//! asking xdotool for its geometry.

mod screenshots;
mod xdotool;

pub use self::screenshots::{ScreenshotsCapture, JPEG_QUALITY};
pub use self::xdotool::XdotoolWindowLocator;
