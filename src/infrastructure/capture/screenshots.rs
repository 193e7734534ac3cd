//! Screen grabbing with the screenshots crate

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use screenshots::image::codecs::jpeg::JpegEncoder;
use screenshots::image::{DynamicImage, RgbaImage};
use screenshots::Screen;
use tracing::debug;

use crate::application::ports::{CaptureError, CaptureRegion, ScreenCapture, WindowBounds};

/// JPEG quality used for every screenshot
pub const JPEG_QUALITY: u8 = 50;

/// Captures a window region or the primary screen and writes a JPEG
pub struct ScreenshotsCapture {
    quality: u8,
}

impl ScreenshotsCapture {
    pub fn new() -> Self {
        Self {
            quality: JPEG_QUALITY,
        }
    }
}

impl Default for ScreenshotsCapture {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ScreenCapture for ScreenshotsCapture {
    async fn capture(&self, region: CaptureRegion, path: &Path) -> Result<(), CaptureError> {
        let path: PathBuf = path.to_path_buf();
        let quality = self.quality;

        // Screen grabbing and encoding are blocking
        tokio::task::spawn_blocking(move || {
            let image = match region {
                CaptureRegion::Window(bounds) => grab_window(bounds)?,
                CaptureRegion::FullScreen => grab_full_screen()?,
            };
            write_jpeg(image, &path, quality)
        })
        .await
        .map_err(|e| CaptureError::GrabFailed(format!("Task join error: {}", e)))?
    }
}

fn grab_full_screen() -> Result<RgbaImage, CaptureError> {
    let screens = Screen::all().map_err(|e| CaptureError::NoScreen(e.to_string()))?;
    let screen = screens
        .into_iter()
        .next()
        .ok_or_else(|| CaptureError::NoScreen("no screens detected".into()))?;

    screen
        .capture()
        .map_err(|e| CaptureError::GrabFailed(e.to_string()))
}

fn grab_window(bounds: WindowBounds) -> Result<RgbaImage, CaptureError> {
    let screen = Screen::from_point(bounds.x, bounds.y)
        .map_err(|e| CaptureError::NoScreen(e.to_string()))?;
    let info = screen.display_info;

    let (x, y, width, height) = clip_to_display(
        bounds,
        WindowBounds {
            x: info.x,
            y: info.y,
            width: info.width,
            height: info.height,
        },
    )
    .ok_or_else(|| CaptureError::GrabFailed(format!("window {} is off screen", bounds)))?;

    debug!(x, y, width, height, "capturing window area");
    screen
        .capture_area(x, y, width, height)
        .map_err(|e| CaptureError::GrabFailed(e.to_string()))
}

/// Intersect a window with its display.
///
/// Returns the area relative to the display origin, or `None` when nothing
/// of the window is visible.
fn clip_to_display(window: WindowBounds, display: WindowBounds) -> Option<(i32, i32, u32, u32)> {
    let left = window.x.max(display.x);
    let top = window.y.max(display.y);
    let right = (window.x + window.width as i32).min(display.x + display.width as i32);
    let bottom = (window.y + window.height as i32).min(display.y + display.height as i32);

    if right <= left || bottom <= top {
        return None;
    }

    Some((
        left - display.x,
        top - display.y,
        (right - left) as u32,
        (bottom - top) as u32,
    ))
}

fn write_jpeg(image: RgbaImage, path: &Path, quality: u8) -> Result<(), CaptureError> {
    let rgb = DynamicImage::ImageRgba8(image).to_rgb8();

    let file = File::create(path).map_err(|e| CaptureError::SaveFailed(e.to_string()))?;
    let mut writer = BufWriter::new(file);
    JpegEncoder::new_with_quality(&mut writer, quality)
        .encode_image(&rgb)
        .map_err(|e| CaptureError::SaveFailed(e.to_string()))
}
