//! Active window lookup through xdotool (X11)

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;

use crate::application::ports::{WindowBounds, WindowLocator, WindowLookupError};

/// Pause before querying so focus settles after the key press
const FOCUS_SETTLE_DELAY: Duration = Duration::from_millis(100);

/// Locates the focused window with `xdotool getactivewindow getwindowgeometry`
pub struct XdotoolWindowLocator {
    settle: Duration,
}

impl XdotoolWindowLocator {
    pub fn new() -> Self {
        Self {
            settle: FOCUS_SETTLE_DELAY,
        }
    }
}

impl Default for XdotoolWindowLocator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WindowLocator for XdotoolWindowLocator {
    async fn active_window(&self) -> Result<WindowBounds, WindowLookupError> {
        tokio::time::sleep(self.settle).await;

        let output = Command::new("xdotool")
            .args(["getactivewindow", "getwindowgeometry", "--shell"])
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    WindowLookupError::ToolNotFound("xdotool")
                } else {
                    WindowLookupError::BadOutput(e.to_string())
                }
            })?;

        if !output.status.success() {
            return Err(WindowLookupError::NoActiveWindow);
        }

        parse_geometry(&String::from_utf8_lossy(&output.stdout))
    }
}

/// Parse `--shell` output (`X=..`, `Y=..`, `WIDTH=..`, `HEIGHT=..` lines)
fn parse_geometry(output: &str) -> Result<WindowBounds, WindowLookupError> {
    let mut x = None;
    let mut y = None;
    let mut width = None;
    let mut height = None;

    for line in output.lines() {
        let Some((key, value)) = line.trim().split_once('=') else {
            continue;
        };
        match key {
            "X" => x = value.parse::<i32>().ok(),
            "Y" => y = value.parse::<i32>().ok(),
            "WIDTH" => width = value.parse::<u32>().ok(),
            "HEIGHT" => height = value.parse::<u32>().ok(),
            _ => {}
        }
    }

    match (x, y, width, height) {
        (Some(x), Some(y), Some(width), Some(height)) if width > 0 && height > 0 => Ok(WindowBounds {
            x,
            y,
            width,
            height,
        }),
        _ => Err(WindowLookupError::BadOutput(output.trim().to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_shell_output() {
        let output = "WINDOW=65011719\nX=120\nY=-8\nWIDTH=1280\nHEIGHT=720\nSCREEN=0\n";
        assert_eq!(
            parse_geometry(output).unwrap(),
            WindowBounds {
                x: 120,
                y: -8,
                width: 1280,
                height: 720
            }
        );
    }

    #[test]
    fn missing_fields_are_rejected() {
        let err = parse_geometry("WINDOW=1\nX=0\nY=0\n").unwrap_err();
        assert!(matches!(err, WindowLookupError::BadOutput(_)));
    }

    #[test]
    fn zero_sized_window_is_rejected() {
        assert!(parse_geometry("X=0\nY=0\nWIDTH=0\nHEIGHT=10\n").is_err());
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(parse_geometry("XGetWindowProperty failed").is_err());
    }
}
