//! `status` and `stop`

use std::process::ExitCode;

use crate::domain::lock::LockStatus;

use super::app::{EXIT_ERROR, EXIT_SUCCESS};
use super::lock_file::LockManager;
use super::paths::AppPaths;
use super::presenter::Presenter;

/// Print whether an agent is running. Exit 0 if it is, 1 otherwise.
pub fn handle_status(paths: &AppPaths, presenter: &Presenter) -> ExitCode {
    match LockManager::new(paths).status() {
        LockStatus::Running(instance) => {
            presenter.running(&instance);
            ExitCode::from(EXIT_SUCCESS)
        }
        LockStatus::NotRunning { stale_cleaned } => {
            presenter.not_running(stale_cleaned);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// Terminate the running agent. Exit 0 if one was stopped, 1 otherwise.
pub async fn handle_stop(paths: &AppPaths, presenter: &Presenter) -> ExitCode {
    let lock = LockManager::new(paths);
    let result = tokio::task::spawn_blocking(move || lock.terminate_running()).await;

    match result {
        Ok(Ok(Some(_))) => {
            presenter.output("ai-screenshooter stopped");
            ExitCode::from(EXIT_SUCCESS)
        }
        Ok(Ok(None)) => {
            presenter.output("ai-screenshooter is not running");
            ExitCode::from(EXIT_ERROR)
        }
        Ok(Err(e)) => {
            presenter.error(&e.to_string());
            ExitCode::from(EXIT_ERROR)
        }
        Err(e) => {
            presenter.error(&format!("Task join error: {}", e));
            ExitCode::from(EXIT_ERROR)
        }
    }
}
