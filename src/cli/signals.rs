//! Shutdown triggers: SIGTERM, SIGINT and the daemon lifetime bound

use std::time::Duration;

use tokio::signal::unix::{signal, Signal, SignalKind};
use tokio::time::Instant;
use tracing::debug;

use crate::domain::lifecycle::ShutdownCause;

/// Resolves once the agent should stop
pub struct ShutdownSignals {
    sigterm: Signal,
    sigint: Signal,
    deadline: Option<Instant>,
}

impl ShutdownSignals {
    /// Install the signal handlers and arm the optional timeout.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn install(timeout: Option<Duration>) -> Result<Self, std::io::Error> {
        let sigterm = signal(SignalKind::terminate())?;
        let sigint = signal(SignalKind::interrupt())?;
        let deadline = timeout.map(|t| Instant::now() + t);
        if let Some(t) = timeout {
            debug!(timeout_secs = t.as_secs(), "auto-termination armed");
        }

        Ok(Self {
            sigterm,
            sigint,
            deadline,
        })
    }

    /// Whether a timeout is armed
    pub fn has_deadline(&self) -> bool {
        self.deadline.is_some()
    }

    /// Wait for the first shutdown trigger
    pub async fn recv(&mut self) -> ShutdownCause {
        let deadline = self.deadline;
        let timeout = async move {
            match deadline {
                Some(at) => tokio::time::sleep_until(at).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            _ = self.sigterm.recv() => ShutdownCause::Terminate,
            _ = self.sigint.recv() => ShutdownCause::Interrupt,
            _ = timeout => ShutdownCause::Timeout,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn timeout_fires() {
        let mut signals = ShutdownSignals::install(Some(Duration::from_millis(30))).unwrap();
        assert!(signals.has_deadline());

        let cause = tokio::time::timeout(Duration::from_secs(2), signals.recv())
            .await
            .expect("timeout should resolve");
        assert_eq!(cause, ShutdownCause::Timeout);
    }

    #[tokio::test]
    async fn no_timeout_keeps_waiting() {
        let mut signals = ShutdownSignals::install(None).unwrap();
        assert!(!signals.has_deadline());

        let result = tokio::time::timeout(Duration::from_millis(50), signals.recv()).await;
        assert!(result.is_err());
    }
}
