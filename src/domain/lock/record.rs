//! Lock record value objects

use std::fmt;
use std::str::FromStr;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// Production API base URL
pub const PRODUCTION_URL: &str =
    "https://service.tech4vision.net/ai-management-service/api/v1/sessions/code-challenge";

/// Local development API base URL
pub const LOCAL_URL: &str = "http://localhost:8082/api/v1/sessions/code-challenge";

/// Lifetime bound of a background agent (5 hours)
pub const DAEMON_TIMEOUT: Duration = Duration::from_secs(5 * 60 * 60);

/// Which server the agent talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ServerMode {
    Local,
    Production,
}

impl ServerMode {
    /// Pick the mode from the `--local` flag
    pub const fn from_local_flag(local: bool) -> Self {
        if local {
            Self::Local
        } else {
            Self::Production
        }
    }

    /// Get the string representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Local => "LOCAL",
            Self::Production => "PRODUCTION",
        }
    }
}

impl fmt::Display for ServerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ServerMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "LOCAL" => Ok(Self::Local),
            "PRODUCTION" => Ok(Self::Production),
            other => Err(format!("Unknown server mode: {}", other)),
        }
    }
}

/// Session metadata stored next to the PID file.
///
/// `started_at` is seconds since the Unix epoch, kept as a float so the file
/// stays readable by anything that speaks JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LockMetadata {
    pub started_at: f64,
    pub server_mode: ServerMode,
    pub server_url: String,
    #[serde(default)]
    pub daemon: bool,
}

impl LockMetadata {
    /// Metadata for an agent starting now
    pub fn now(server_mode: ServerMode, server_url: impl Into<String>, daemon: bool) -> Self {
        Self {
            started_at: unix_now(),
            server_mode,
            server_url: server_url.into(),
            daemon,
        }
    }

    /// Time since the agent started, as seen at `now` (seconds since epoch)
    pub fn uptime_at(&self, now: f64) -> Duration {
        Duration::from_secs_f64((now - self.started_at).max(0.0))
    }

    /// Time left before the daemon timeout fires, if the agent has one
    pub fn remaining_at(&self, now: f64) -> Option<Duration> {
        if !self.daemon {
            return None;
        }
        DAEMON_TIMEOUT
            .checked_sub(self.uptime_at(now))
            .filter(|d| !d.is_zero())
    }
}

/// The full lock record: the PID file plus its metadata
#[derive(Debug, Clone, PartialEq)]
pub struct LockRecord {
    pub pid: u32,
    pub metadata: LockMetadata,
}

/// Outcome of acquiring the lock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcquireDecision {
    /// No live instance held the lock
    Admitted,
    /// A live instance (the given PID) was terminated first
    ReplacedPrior(u32),
}

/// A live agent as reported by the status query
#[derive(Debug, Clone, PartialEq)]
pub struct RunningInstance {
    pub pid: u32,
    /// Missing when the metadata file is absent or unreadable
    pub metadata: Option<LockMetadata>,
}

/// Result of the status query
#[derive(Debug, Clone, PartialEq)]
pub enum LockStatus {
    Running(RunningInstance),
    NotRunning {
        /// A lock file naming a dead process was removed
        stale_cleaned: bool,
    },
}

impl LockStatus {
    pub fn is_running(&self) -> bool {
        matches!(self, Self::Running(_))
    }
}

/// Seconds since the Unix epoch
pub fn unix_now() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}

/// Format a duration as `1h 2m 3s`
pub fn format_hms(duration: Duration) -> String {
    let total = duration.as_secs();
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;
    format!("{}h {}m {}s", hours, minutes, seconds)
}
