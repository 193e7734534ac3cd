//! CLI argument definitions using Clap

use clap::{Args, Parser, Subcommand};

/// Environment variable carrying the session token
pub const TOKEN_ENV: &str = "AI_SCREENSHOOTER_TOKEN";

/// ai-screenshooter - hotkey screenshots, clipboard and voice for a code-challenge session
#[derive(Parser, Debug)]
#[command(name = "ai-screenshooter")]
#[command(version)]
#[command(about = "Hotkey agent that sends screenshots, clipboard text and voice to a session")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start listening for hotkeys
    Start(StartOptions),
    /// Show whether an agent is running
    Status,
    /// Stop the running agent
    Stop,
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Options for `start`
#[derive(Args, Debug, Clone)]
pub struct StartOptions {
    /// Session bearer token
    #[arg(long, env = TOKEN_ENV, hide_env_values = true)]
    pub token: String,

    /// Send to the local server instead of production
    #[arg(long)]
    pub local: bool,

    /// Detach and run in the background
    #[arg(short = 'b', long, conflicts_with = "daemon")]
    pub background: bool,

    /// Internal marker for the detached child
    #[arg(long, hide = true)]
    pub daemon: bool,
}

/// Config action subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Create config file with defaults
    Init,
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// Config value
        value: String,
    },
    /// Get a config value
    Get {
        /// Config key
        key: String,
    },
    /// List all config values
    List,
    /// Show config file path
    Path,
}

/// Valid config keys
pub const VALID_CONFIG_KEYS: &[&str] = &["api_key", "production_url", "local_url", "audio_cues"];

/// Check if a config key is valid
pub fn is_valid_config_key(key: &str) -> bool {
    VALID_CONFIG_KEYS.contains(&key)
}
