//! Single-instance lock: PID file plus session metadata
//!
//! The PID file is the source of truth for "is an agent running". It is valid
//! only while the process it names is alive; anything else is stale and gets
//! cleaned up on sight.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process;
use std::time::{Duration, Instant};

use nix::errno::Errno;
use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;
use tracing::{debug, warn};

use crate::domain::lock::{AcquireDecision, LockMetadata, LockStatus, RunningInstance};

use super::paths::AppPaths;

/// Interval between liveness checks while waiting for a process to exit
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// How long SIGTERM gets before escalating to SIGKILL
const TERM_GRACE_PERIOD: Duration = Duration::from_secs(3);

/// How long to wait for the kernel to reap a SIGKILLed process
const KILL_WAIT: Duration = Duration::from_secs(1);

/// Lock file errors
#[derive(Debug, thiserror::Error)]
pub enum LockError {
    #[error("Failed to write lock file {path}: {message}")]
    WriteFailed { path: String, message: String },

    #[error("Failed to remove lock file {path}: {message}")]
    RemoveFailed { path: String, message: String },

    #[error("Failed to signal process {pid}: {message}")]
    SignalFailed { pid: u32, message: String },

    #[error("Process {0} is still running after SIGKILL")]
    StillRunning(u32),
}

/// Owns the PID and metadata files
#[derive(Debug, Clone)]
pub struct LockManager {
    pid_path: PathBuf,
    meta_path: PathBuf,
    grace_period: Duration,
}

impl LockManager {
    pub fn new(paths: &AppPaths) -> Self {
        Self::with_paths(paths.pid_file(), paths.meta_file())
    }

    pub fn with_paths(pid_path: impl Into<PathBuf>, meta_path: impl Into<PathBuf>) -> Self {
        Self {
            pid_path: pid_path.into(),
            meta_path: meta_path.into(),
            grace_period: TERM_GRACE_PERIOD,
        }
    }

    /// Override how long SIGTERM gets before SIGKILL
    pub fn with_grace_period(mut self, grace_period: Duration) -> Self {
        self.grace_period = grace_period;
        self
    }

    pub fn pid_path(&self) -> &Path {
        &self.pid_path
    }

    pub fn meta_path(&self) -> &Path {
        &self.meta_path
    }

    /// PID recorded in the lock file; unreadable or malformed content is `None`
    pub fn read_pid(&self) -> Option<u32> {
        let contents = fs::read_to_string(&self.pid_path).ok()?;
        contents
            .trim()
            .parse::<u32>()
            .ok()
            .filter(|&pid| pid > 0 && pid <= i32::MAX as u32)
    }

    /// Metadata next to the lock file; unreadable or malformed is `None`
    pub fn read_metadata(&self) -> Option<LockMetadata> {
        let contents = fs::read_to_string(&self.meta_path).ok()?;
        match serde_json::from_str(&contents) {
            Ok(meta) => Some(meta),
            Err(e) => {
                debug!(error = %e, "ignoring malformed lock metadata");
                None
            }
        }
    }

    /// Take the lock for this process, terminating a live holder first
    pub fn acquire_or_replace(&self, metadata: &LockMetadata) -> Result<AcquireDecision, LockError> {
        let decision = match self.terminate_running()? {
            Some(pid) => AcquireDecision::ReplacedPrior(pid),
            None => AcquireDecision::Admitted,
        };

        self.write(process::id(), metadata)?;
        Ok(decision)
    }

    /// Terminate the agent holding the lock, if any, and remove the lock files.
    ///
    /// # Returns
    /// The PID that was terminated, or `None` when nothing live held the lock
    pub fn terminate_running(&self) -> Result<Option<u32>, LockError> {
        let pid = match self.read_pid() {
            Some(pid) if pid != process::id() && is_alive(pid) => pid,
            _ => {
                self.release()?;
                return Ok(None);
            }
        };

        debug!(pid, "terminating running instance");
        self.terminate(pid)?;
        self.release()?;
        Ok(Some(pid))
    }

    /// Delete the lock files. Missing files are not an error.
    pub fn release(&self) -> Result<(), LockError> {
        remove_if_exists(&self.pid_path)?;
        remove_if_exists(&self.meta_path)
    }

    /// Who holds the lock. A lock naming a dead process is deleted.
    pub fn status(&self) -> LockStatus {
        if !self.pid_path.exists() {
            return LockStatus::NotRunning {
                stale_cleaned: false,
            };
        }

        if let Some(pid) = self.read_pid().filter(|&pid| is_alive(pid)) {
            return LockStatus::Running(RunningInstance {
                pid,
                metadata: self.read_metadata(),
            });
        }

        if let Err(e) = self.release() {
            warn!(error = %e, "Failed to clean up stale lock");
        }
        LockStatus::NotRunning {
            stale_cleaned: true,
        }
    }

    fn write(&self, pid: u32, metadata: &LockMetadata) -> Result<(), LockError> {
        let meta = serde_json::to_string(metadata).map_err(|e| LockError::WriteFailed {
            path: self.meta_path.display().to_string(),
            message: e.to_string(),
        })?;

        write_file(&self.pid_path, &pid.to_string())?;
        write_file(&self.meta_path, &meta)
    }

    /// SIGTERM, wait, then SIGKILL
    fn terminate(&self, pid: u32) -> Result<(), LockError> {
        if !send_signal(pid, Signal::SIGTERM)? {
            return Ok(());
        }
        if wait_for_exit(pid, self.grace_period) {
            return Ok(());
        }

        warn!(pid, "Process ignored SIGTERM, sending SIGKILL");
        if !send_signal(pid, Signal::SIGKILL)? {
            return Ok(());
        }
        if wait_for_exit(pid, KILL_WAIT) {
            return Ok(());
        }

        Err(LockError::StillRunning(pid))
    }
}

/// Whether a process exists. A process we may not signal still counts.
pub fn is_alive(pid: u32) -> bool {
    if pid == 0 || pid > i32::MAX as u32 {
        return false;
    }
    match kill(Pid::from_raw(pid as i32), None) {
        Ok(()) => true,
        Err(Errno::ESRCH) => false,
        Err(Errno::EPERM) => true,
        Err(_) => false,
    }
}

/// Send a signal. Returns `false` if the process was already gone.
fn send_signal(pid: u32, signal: Signal) -> Result<bool, LockError> {
    match kill(Pid::from_raw(pid as i32), signal) {
        Ok(()) => Ok(true),
        Err(Errno::ESRCH) => Ok(false),
        Err(e) => Err(LockError::SignalFailed {
            pid,
            message: e.to_string(),
        }),
    }
}

/// Poll liveness until the process exits or `limit` elapses
fn wait_for_exit(pid: u32, limit: Duration) -> bool {
    let deadline = Instant::now() + limit;
    loop {
        std::thread::sleep(POLL_INTERVAL);
        if !is_alive(pid) {
            return true;
        }
        if Instant::now() >= deadline {
            return false;
        }
    }
}

fn write_file(path: &Path, contents: &str) -> Result<(), LockError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| LockError::WriteFailed {
            path: parent.display().to_string(),
            message: e.to_string(),
        })?;
    }
    fs::write(path, contents).map_err(|e| LockError::WriteFailed {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

fn remove_if_exists(path: &Path) -> Result<(), LockError> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(LockError::RemoveFailed {
            path: path.display().to_string(),
            message: e.to_string(),
        }),
    }
}
