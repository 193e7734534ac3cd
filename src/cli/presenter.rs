//! CLI presenter for output formatting

use colored::*;

use crate::domain::lock::{format_hms, unix_now, LockMetadata, RunningInstance};

/// Hotkeys and what they do, in display order
pub const HOTKEYS: &[(&str, &str)] = &[
    ("ESC + Down", "Capture screenshot"),
    ("ESC + Up", "Send all screenshots"),
    ("ESC + Right", "Send clipboard text to Code tab"),
    ("Double-tap ESC", "Record voice, transcribe and send"),
];

/// One aligned hotkey line, without indentation
pub fn hotkey_line(keys: &str, action: &str) -> String {
    format!("{:<18}{}", keys, action)
}

/// `MODE (url)`
pub fn server_line(metadata: &LockMetadata) -> String {
    format!("{} ({})", metadata.server_mode, metadata.server_url)
}

/// Presenter for CLI output formatting
pub struct Presenter;

impl Presenter {
    /// Create a new presenter
    pub fn new() -> Self {
        Self
    }

    /// Print info message to stderr
    pub fn info(&self, message: &str) {
        eprintln!("{} {}", "ℹ".cyan(), message);
    }

    /// Print success message to stderr
    pub fn success(&self, message: &str) {
        eprintln!("{} {}", "✓".green(), message);
    }

    /// Print warning message to stderr
    pub fn warn(&self, message: &str) {
        eprintln!("{} {}", "⚠".yellow(), message);
    }

    /// Print error message to stderr
    pub fn error(&self, message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Output text to stdout
    pub fn output(&self, text: &str) {
        println!("{}", text);
    }

    /// Print a key-value pair (for config list)
    pub fn key_value(&self, key: &str, value: &str) {
        println!("{}: {}", key.cyan(), value);
    }

    /// Print the running agent's details and hotkeys
    pub fn running(&self, instance: &RunningInstance) {
        for line in status_lines(instance, unix_now()) {
            println!("{}", line);
        }
    }

    /// Print that no agent is running
    pub fn not_running(&self, stale_cleaned: bool) {
        println!("ai-screenshooter is not running");
        if stale_cleaned {
            println!("  (stale PID file found, cleaning up)");
        }
    }
}

impl Default for Presenter {
    fn default() -> Self {
        Self::new()
    }
}

/// Lines printed by `status` for a live agent, as seen at `now`
pub fn status_lines(instance: &RunningInstance, now: f64) -> Vec<String> {
    let mut lines = vec![format!("ai-screenshooter is running (PID: {})", instance.pid)];

    if let Some(meta) = &instance.metadata {
        lines.push(format!("  Uptime:  {}", format_hms(meta.uptime_at(now))));
        if let Some(remaining) = meta.remaining_at(now) {
            lines.push(format!("  Expires: {} remaining", format_hms(remaining)));
        }
        lines.push(format!("  Server:  {}", server_line(meta)));
    }

    lines.push(String::new());
    lines.push("  Listening for hotkeys:".to_string());
    for (keys, action) in HOTKEYS {
        lines.push(format!("    {}", hotkey_line(keys, action)));
    }
    lines
}
