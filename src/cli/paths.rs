//! Well-known file locations

use std::env;
use std::path::{Path, PathBuf};

/// Overrides the home directory used for every agent file
pub const HOME_ENV: &str = "AI_SCREENSHOOTER_HOME";

const PID_FILE: &str = ".ai-screenshooter.pid";
const META_FILE: &str = ".ai-screenshooter.meta.json";
const LOG_FILE: &str = ".ai-screenshooter.log";
const DATA_DIR: &str = ".ai-screenshooter";

/// Paths of the lock, metadata, log and artifact directories
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    home: PathBuf,
}

impl AppPaths {
    /// Resolve from `AI_SCREENSHOOTER_HOME`, falling back to the user's home
    pub fn resolve() -> Self {
        let home = env::var_os(HOME_ENV)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from)
            .or_else(dirs::home_dir)
            .unwrap_or_else(env::temp_dir);

        Self::with_home(home)
    }

    pub fn with_home(home: impl Into<PathBuf>) -> Self {
        Self { home: home.into() }
    }

    pub fn home(&self) -> &Path {
        &self.home
    }

    pub fn pid_file(&self) -> PathBuf {
        self.home.join(PID_FILE)
    }

    pub fn meta_file(&self) -> PathBuf {
        self.home.join(META_FILE)
    }

    pub fn log_file(&self) -> PathBuf {
        self.home.join(LOG_FILE)
    }

    pub fn screenshot_dir(&self) -> PathBuf {
        self.home.join(DATA_DIR).join("screenshots")
    }

    pub fn audio_dir(&self) -> PathBuf {
        self.home.join(DATA_DIR).join("audio")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn files_live_in_home() {
        let paths = AppPaths::with_home("/home/dev");
        assert_eq!(paths.pid_file(), PathBuf::from("/home/dev/.ai-screenshooter.pid"));
        assert_eq!(
            paths.meta_file(),
            PathBuf::from("/home/dev/.ai-screenshooter.meta.json")
        );
        assert_eq!(paths.log_file(), PathBuf::from("/home/dev/.ai-screenshooter.log"));
    }

    #[test]
    fn artifact_dirs_live_under_data_dir() {
        let paths = AppPaths::with_home("/home/dev");
        assert_eq!(
            paths.screenshot_dir(),
            PathBuf::from("/home/dev/.ai-screenshooter/screenshots")
        );
        assert_eq!(paths.audio_dir(), PathBuf::from("/home/dev/.ai-screenshooter/audio"));
    }
}
