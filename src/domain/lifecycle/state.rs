//! Agent lifecycle state machine

use std::fmt;
use thiserror::Error;

/// Lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LifecycleState {
    #[default]
    Starting,
    ForegroundRunning,
    DaemonRunning,
    ShuttingDown,
    Terminated,
}

impl LifecycleState {
    /// Get the string representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Starting => "starting",
            Self::ForegroundRunning => "foreground",
            Self::DaemonRunning => "daemon",
            Self::ShuttingDown => "shutting-down",
            Self::Terminated => "terminated",
        }
    }

    /// Whether the agent is processing input
    pub const fn is_running(&self) -> bool {
        matches!(self, Self::ForegroundRunning | Self::DaemonRunning)
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Why the agent is shutting down
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownCause {
    /// SIGTERM
    Terminate,
    /// SIGINT (Ctrl+C in the foreground)
    Interrupt,
    /// The daemon lifetime bound elapsed
    Timeout,
    /// The keyboard event source stopped
    InputClosed,
}

impl ShutdownCause {
    /// Whether this cause ends the process with a success status
    pub const fn is_clean(&self) -> bool {
        !matches!(self, Self::InputClosed)
    }
}

impl fmt::Display for ShutdownCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Terminate => "received SIGTERM",
            Self::Interrupt => "received SIGINT",
            Self::Timeout => "5-hour timeout reached",
            Self::InputClosed => "keyboard listener stopped",
        };
        write!(f, "{}", text)
    }
}

/// Error when an invalid state transition is attempted
#[derive(Debug, Clone, Error)]
#[error("Invalid lifecycle transition: cannot {action} while {current_state}")]
pub struct InvalidStateTransition {
    pub current_state: LifecycleState,
    pub action: String,
}

/// Agent lifecycle.
///
/// State machine:
///   STARTING -> FOREGROUND_RUNNING | DAEMON_RUNNING (run)
///   *_RUNNING -> SHUTTING_DOWN (begin_shutdown)
///   SHUTTING_DOWN -> TERMINATED (terminate)
#[derive(Debug, Default)]
pub struct Lifecycle {
    state: LifecycleState,
    cause: Option<ShutdownCause>,
}

impl Lifecycle {
    /// Create a lifecycle in the starting state
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the current state
    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// Why shutdown began, once it has
    pub fn cause(&self) -> Option<ShutdownCause> {
        self.cause
    }

    /// Transition from STARTING to one of the running states
    pub fn run(&mut self, daemon: bool) -> Result<LifecycleState, InvalidStateTransition> {
        if self.state != LifecycleState::Starting {
            return Err(self.invalid("start running"));
        }
        self.state = if daemon {
            LifecycleState::DaemonRunning
        } else {
            LifecycleState::ForegroundRunning
        };
        Ok(self.state)
    }

    /// Transition from a running state to SHUTTING_DOWN
    pub fn begin_shutdown(&mut self, cause: ShutdownCause) -> Result<(), InvalidStateTransition> {
        if !self.state.is_running() {
            return Err(self.invalid("shut down"));
        }
        self.state = LifecycleState::ShuttingDown;
        self.cause = Some(cause);
        Ok(())
    }

    /// Transition from SHUTTING_DOWN to TERMINATED
    pub fn terminate(&mut self) -> Result<(), InvalidStateTransition> {
        if self.state != LifecycleState::ShuttingDown {
            return Err(self.invalid("terminate"));
        }
        self.state = LifecycleState::Terminated;
        Ok(())
    }

    fn invalid(&self, action: &str) -> InvalidStateTransition {
        InvalidStateTransition {
            current_state: self.state,
            action: action.to_string(),
        }
    }
}
