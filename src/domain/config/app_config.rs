//! Application configuration value object

use serde::{Deserialize, Serialize};

use crate::domain::lock::{ServerMode, LOCAL_URL, PRODUCTION_URL};

/// Application configuration.
/// All fields are optional to support partial configs and merging.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    pub api_key: Option<String>,
    pub production_url: Option<String>,
    pub local_url: Option<String>,
    pub audio_cues: Option<bool>,
}

impl AppConfig {
    /// Create config with default values
    pub fn defaults() -> Self {
        Self {
            api_key: None,
            production_url: Some(PRODUCTION_URL.to_string()),
            local_url: Some(LOCAL_URL.to_string()),
            audio_cues: Some(true),
        }
    }

    /// Create an empty config (all None)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Merge this config with another, where other takes precedence.
    /// Only non-None values from other will override this.
    pub fn merge(self, other: Self) -> Self {
        Self {
            api_key: other.api_key.or(self.api_key),
            production_url: other.production_url.or(self.production_url),
            local_url: other.local_url.or(self.local_url),
            audio_cues: other.audio_cues.or(self.audio_cues),
        }
    }

    /// Base URL for the given server mode
    pub fn server_url(&self, mode: ServerMode) -> &str {
        match mode {
            ServerMode::Local => self.local_url.as_deref().unwrap_or(LOCAL_URL),
            ServerMode::Production => self.production_url.as_deref().unwrap_or(PRODUCTION_URL),
        }
    }

    /// Get audio cue setting, or true if not set
    pub fn audio_cues_or_default(&self) -> bool {
        self.audio_cues.unwrap_or(true)
    }

    /// API key, ignoring blank values
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|k| !k.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_have_both_urls() {
        let config = AppConfig::defaults();
        assert_eq!(config.server_url(ServerMode::Local), LOCAL_URL);
        assert_eq!(config.server_url(ServerMode::Production), PRODUCTION_URL);
        assert!(config.audio_cues_or_default());
        assert!(config.api_key().is_none());
    }

    #[test]
    fn empty_config_falls_back_to_constants() {
        let config = AppConfig::empty();
        assert_eq!(config.server_url(ServerMode::Local), LOCAL_URL);
        assert!(config.audio_cues_or_default());
    }

    #[test]
    fn merge_prefers_other() {
        let base = AppConfig::defaults();
        let file = AppConfig {
            local_url: Some("http://127.0.0.1:9000/api".to_string()),
            audio_cues: Some(false),
            ..Default::default()
        };

        let merged = base.merge(file);
        assert_eq!(
            merged.server_url(ServerMode::Local),
            "http://127.0.0.1:9000/api"
        );
        assert_eq!(merged.server_url(ServerMode::Production), PRODUCTION_URL);
        assert!(!merged.audio_cues_or_default());
    }

    #[test]
    fn merge_keeps_base_when_other_empty() {
        let base = AppConfig {
            api_key: Some("key".to_string()),
            ..Default::default()
        };
        let merged = base.merge(AppConfig::empty());
        assert_eq!(merged.api_key(), Some("key"));
    }

    #[test]
    fn blank_api_key_is_ignored() {
        let config = AppConfig {
            api_key: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(config.api_key().is_none());
    }
}
