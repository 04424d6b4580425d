use std::path::{Path, PathBuf};

use tokio::fs::{self, File};

use crate::models::Fingerprint;

/// Attachment storage rooted at the configured home directory.
///
/// Layout: `<home>/<fingerprint shard>/<filename>`.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    home: PathBuf,
}

impl LocalStorage {
    pub fn new(home: impl Into<PathBuf>) -> Self {
        Self { home: home.into() }
    }

    pub fn home(&self) -> &Path {
        &self.home
    }

    /// Create the home directory if missing
    pub async fn ensure_home(&self) -> std::io::Result<()> {
        fs::create_dir_all(&self.home).await
    }

    pub fn shard_dir(&self, fingerprint: &Fingerprint) -> PathBuf {
        self.home.join(fingerprint.shard())
    }

    /// Create the shard directory for a fingerprint; existing directories are fine
    pub async fn ensure_shard(&self, fingerprint: &Fingerprint) -> std::io::Result<PathBuf> {
        let dir = self.shard_dir(fingerprint);
        fs::create_dir_all(&dir).await?;
        Ok(dir)
    }

    /// Create (or truncate) `filename` inside `dir`.
    ///
    /// The filename is joined verbatim. Callers passing untrusted names can
    /// escape `dir` with `..` components or absolute paths.
    pub async fn create_file(&self, dir: &Path, filename: &str) -> std::io::Result<File> {
        File::create(dir.join(filename)).await
    }
}
