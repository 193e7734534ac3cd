//! Exit codes and configuration loading shared by the commands

use std::env;

use crate::application::ports::ConfigStore;
use crate::domain::config::AppConfig;
use crate::infrastructure::XdgConfigStore;

/// Exit codes
pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_ERROR: u8 = 1;

/// Environment variable holding the Gemini API key
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Configuration taken from the environment
pub fn env_config() -> AppConfig {
    AppConfig {
        api_key: env::var(API_KEY_ENV).ok().filter(|s| !s.trim().is_empty()),
        ..AppConfig::empty()
    }
}

/// Load and merge configuration: defaults < file < env
pub async fn load_merged_config<S: ConfigStore>(store: &S) -> AppConfig {
    let file_config = match store.load().await {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!(error = %e, "Ignoring unreadable config file");
            AppConfig::empty()
        }
    };

    AppConfig::defaults().merge(file_config).merge(env_config())
}

/// Load the merged configuration from the standard location
pub async fn load_config() -> AppConfig {
    load_merged_config(&XdgConfigStore::new()).await
}
