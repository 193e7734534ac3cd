//! Agent runner: `start` in the foreground, as the detached daemon, or as
//! the parent that launches the daemon

use std::process::ExitCode;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{error, info, warn};

use crate::application::ports::KeyEventSource;
use crate::application::{ActionExecutor, ActionPorts, ArtifactDirs, GestureDispatcher};
use crate::domain::config::AppConfig;
use crate::domain::lifecycle::{Lifecycle, ShutdownCause};
use crate::domain::lock::{AcquireDecision, LockMetadata, ServerMode, DAEMON_TIMEOUT};
use crate::infrastructure::{
    create_audio_cue, create_clipboard, create_transcriber, CpalAudioSource, FlacEncoder,
    HttpUploader, RdevKeyListener, ScreenshotsCapture, XdotoolWindowLocator,
};

use super::app::{load_config, EXIT_ERROR, EXIT_SUCCESS};
use super::args::StartOptions;
use super::lock_file::LockManager;
use super::logging;
use super::paths::AppPaths;
use super::presenter::{hotkey_line, server_line, Presenter, HOTKEYS};
use super::signals::ShutdownSignals;
use super::spawn::spawn_background;

/// Handle `start`
pub async fn run_start(options: StartOptions, paths: AppPaths) -> ExitCode {
    if options.background {
        return launch_background(&options, &paths).await;
    }
    run_agent(options, paths).await
}

/// Stop any running agent, start a detached one and return
async fn launch_background(options: &StartOptions, paths: &AppPaths) -> ExitCode {
    let presenter = Presenter::new();
    let lock = LockManager::new(paths);

    presenter.output("Starting in background mode...");
    let terminating = lock.clone();
    match tokio::task::spawn_blocking(move || terminating.terminate_running()).await {
        Ok(Ok(Some(_))) => presenter.output("Replaced existing instance."),
        Ok(Ok(None)) => {}
        Ok(Err(e)) => {
            presenter.error(&e.to_string());
            return ExitCode::from(EXIT_ERROR);
        }
        Err(e) => {
            presenter.error(&format!("Task join error: {}", e));
            return ExitCode::from(EXIT_ERROR);
        }
    }

    match spawn_background(options) {
        Ok(pid) => {
            presenter.output(&format!("Started background process (PID: {})", pid));
            presenter.output(&format!("PID file: {}", lock.pid_path().display()));
            presenter.output(&format!("Log file: {}", paths.log_file().display()));
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            presenter.error(&format!("Failed to start background process: {}", e));
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// Run the agent in this process until a shutdown trigger fires
pub async fn run_agent(options: StartOptions, paths: AppPaths) -> ExitCode {
    let daemon = options.daemon;
    let _log_guard = if daemon {
        match logging::init_file(&paths.log_file()) {
            Ok(guard) => Some(guard),
            Err(_) => {
                logging::init_console();
                None
            }
        }
    } else {
        logging::init_console();
        None
    };

    let mut lifecycle = Lifecycle::new();
    let config = load_config().await;
    let mode = ServerMode::from_local_flag(options.local);
    let server_url = config.server_url(mode).to_string();
    let lock = LockManager::new(&paths);

    let metadata = LockMetadata::now(mode, server_url.clone(), daemon);
    let acquiring = lock.clone();
    let record = metadata.clone();
    let acquired =
        tokio::task::spawn_blocking(move || acquiring.acquire_or_replace(&record)).await;
    match acquired {
        Ok(Ok(AcquireDecision::Admitted)) => {}
        Ok(Ok(AcquireDecision::ReplacedPrior(pid))) => {
            info!("Replaced existing instance (PID: {})", pid)
        }
        Ok(Err(e)) => {
            error!("{}", e);
            return ExitCode::from(EXIT_ERROR);
        }
        Err(e) => {
            error!("Task join error: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    }

    let timeout = daemon.then_some(DAEMON_TIMEOUT);
    let mut signals = match ShutdownSignals::install(timeout) {
        Ok(signals) => signals,
        Err(e) => {
            error!("Failed to setup signal handler: {}", e);
            release(&lock);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    if let Err(e) = lifecycle.run(daemon) {
        error!("{}", e);
        release(&lock);
        return ExitCode::from(EXIT_ERROR);
    }

    let (tx, rx) = mpsc::unbounded_channel();
    if let Err(e) = RdevKeyListener::new().start(tx) {
        error!("{}", e);
        release(&lock);
        return ExitCode::from(EXIT_ERROR);
    }

    let dispatcher = build_dispatcher(&config, &paths, &server_url, &options.token);
    log_banner(&metadata, daemon);

    let cause = tokio::select! {
        _ = dispatcher.run(rx) => ShutdownCause::InputClosed,
        cause = signals.recv() => cause,
    };

    ExitCode::from(shut_down(&mut lifecycle, &lock, cause))
}

/// Log the cause, release the lock and pick the exit status.
///
/// Signals and the timeout exit with success; a dead key listener does not.
fn shut_down(lifecycle: &mut Lifecycle, lock: &LockManager, cause: ShutdownCause) -> u8 {
    if lifecycle.begin_shutdown(cause).is_err() {
        warn!(state = %lifecycle.state(), "shutdown requested outside a running state");
    }
    if cause.is_clean() {
        info!("Shutting down: {}", cause);
    } else {
        error!("Shutting down: {}", cause);
    }
    release(lock);
    let _ = lifecycle.terminate();

    if cause.is_clean() {
        EXIT_SUCCESS
    } else {
        EXIT_ERROR
    }
}

fn build_dispatcher(
    config: &AppConfig,
    paths: &AppPaths,
    server_url: &str,
    token: &str,
) -> GestureDispatcher {
    let api_key = config.api_key();
    if api_key.is_none() {
        warn!("No Gemini API key set; voice transcription is disabled");
    }

    let ports = ActionPorts {
        window_locator: Arc::new(XdotoolWindowLocator::new()),
        screen: Arc::new(ScreenshotsCapture::new()),
        clipboard: create_clipboard(),
        uploader: Arc::new(HttpUploader::new(server_url, token)),
        transcriber: create_transcriber(api_key),
        encoder: Arc::new(FlacEncoder::new()),
    };
    let dirs = ArtifactDirs {
        screenshots: paths.screenshot_dir(),
        audio: paths.audio_dir(),
    };

    GestureDispatcher::new(
        ActionExecutor::new(ports, dirs),
        Arc::new(CpalAudioSource::new()),
        create_audio_cue(config.audio_cues_or_default()),
    )
}

fn log_banner(metadata: &LockMetadata, daemon: bool) {
    info!("AI Screenshot CLI started.");
    info!("Server: {}", server_line(metadata));
    info!("Listening for hotkeys:");
    for (keys, action) in HOTKEYS {
        info!("  {}", hotkey_line(keys, action));
    }
    if !daemon {
        info!("Running... (Press Ctrl + C to exit)");
    }
}

fn release(lock: &LockManager) {
    if let Err(e) = lock.release() {
        warn!(error = %e, "Failed to release lock");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::lifecycle::LifecycleState;
    use tempfile::TempDir;

    /// A running lifecycle holding a freshly written lock
    fn running(dir: &TempDir, daemon: bool) -> (Lifecycle, LockManager) {
        let lock = LockManager::new(&AppPaths::with_home(dir.path()));
        lock.acquire_or_replace(&LockMetadata::now(ServerMode::Local, "http://localhost:8082", daemon))
            .unwrap();
        assert!(lock.pid_path().exists());

        let mut lifecycle = Lifecycle::new();
        lifecycle.run(daemon).unwrap();
        (lifecycle, lock)
    }

    #[test]
    fn sigterm_releases_lock_and_succeeds() {
        let dir = TempDir::new().unwrap();
        let (mut lifecycle, lock) = running(&dir, true);

        assert_eq!(shut_down(&mut lifecycle, &lock, ShutdownCause::Terminate), EXIT_SUCCESS);
        assert!(!lock.pid_path().exists());
        assert!(!lock.meta_path().exists());
        assert_eq!(lifecycle.state(), LifecycleState::Terminated);
        assert_eq!(lifecycle.cause(), Some(ShutdownCause::Terminate));
    }

    #[test]
    fn interrupt_releases_lock_and_succeeds() {
        let dir = TempDir::new().unwrap();
        let (mut lifecycle, lock) = running(&dir, false);

        assert_eq!(shut_down(&mut lifecycle, &lock, ShutdownCause::Interrupt), EXIT_SUCCESS);
        assert!(!lock.pid_path().exists());
    }

    #[test]
    fn timeout_releases_lock_and_succeeds() {
        let dir = TempDir::new().unwrap();
        let (mut lifecycle, lock) = running(&dir, true);

        assert_eq!(shut_down(&mut lifecycle, &lock, ShutdownCause::Timeout), EXIT_SUCCESS);
        assert!(!lock.pid_path().exists());
        assert_eq!(lifecycle.cause(), Some(ShutdownCause::Timeout));
    }

    #[test]
    fn closed_input_releases_lock_and_fails() {
        let dir = TempDir::new().unwrap();
        let (mut lifecycle, lock) = running(&dir, false);

        assert_eq!(shut_down(&mut lifecycle, &lock, ShutdownCause::InputClosed), EXIT_ERROR);
        assert!(!lock.pid_path().exists());
        assert_eq!(lifecycle.state(), LifecycleState::Terminated);
    }
}
