//! Screenshots waiting to be uploaded

use std::path::{Path, PathBuf};

/// Ordered queue of captured screenshot files.
///
/// Captures append; only a successful upload removes entries, and only the
/// ones it uploaded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingArtifacts {
    paths: Vec<PathBuf>,
    next_index: usize,
}

impl PendingArtifacts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the file name for the next capture (`screenshot_<n>.jpg`).
    ///
    /// Numbers are never handed out twice, so a capture still in flight
    /// cannot collide with a queued file.
    pub fn reserve_file_name(&mut self) -> String {
        let name = format!("screenshot_{}.jpg", self.next_index);
        self.next_index += 1;
        name
    }

    pub fn push(&mut self, path: impl Into<PathBuf>) {
        self.paths.push(path.into());
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Drop the entries a finished upload covered; later captures stay queued
    pub fn remove_all(&mut self, uploaded: &[PathBuf]) {
        self.paths.retain(|path| !uploaded.contains(path));
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.paths.iter().any(|p| p == path)
    }
}
