//! CLI layer - Command-line interface
//!
//! Contains argument parsing, output formatting, the single-instance lock,
//! signal handling, backgrounding and the agent runner.

pub mod agent_app;
pub mod app;
pub mod args;
pub mod config_cmd;
pub mod lock_file;
pub mod logging;
pub mod paths;
pub mod presenter;
pub mod signals;
pub mod spawn;
pub mod status_cmd;

// Re-export commonly used types
pub use agent_app::run_start;
pub use app::{EXIT_ERROR, EXIT_SUCCESS};
pub use args::{Cli, Commands, ConfigAction, StartOptions};
pub use config_cmd::handle_config_command;
pub use lock_file::{LockError, LockManager};
pub use paths::AppPaths;
pub use presenter::Presenter;
pub use status_cmd::{handle_status, handle_stop};
