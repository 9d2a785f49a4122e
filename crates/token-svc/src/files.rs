//! Resolution and reading of caller-named credential files.
//!
//! Callers choose which file the service reads. Without a credentials
//! directory any path readable by the process is accepted; with one, the
//! resolved path must stay inside it.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{Context, Result};
use common::ServiceError;
use tokio::io::AsyncReadExt;
use tracing::warn;

/// Largest credentials file the service will read. Real key files are a few
/// KiB.
pub const MAX_CREDENTIALS_FILE_LEN: u64 = 64 * 1024;

/// Read policy for credential files.
#[derive(Debug, Clone, Default)]
pub struct CredentialFiles {
    root: Option<Arc<PathBuf>>,
}

impl CredentialFiles {
    /// Accept any path the process can read.
    pub fn unrestricted() -> Self {
        Self { root: None }
    }

    /// Accept only files inside `dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if `dir` does not exist or cannot be canonicalized.
    pub async fn restricted_to(dir: &Path) -> Result<Self> {
        let root = tokio::fs::canonicalize(dir)
            .await
            .with_context(|| format!("CREDENTIALS_DIR {} is not accessible", dir.display()))?;

        if !tokio::fs::metadata(&root).await?.is_dir() {
            anyhow::bail!("CREDENTIALS_DIR {} is not a directory", root.display());
        }

        Ok(Self {
            root: Some(Arc::new(root)),
        })
    }

    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref().map(PathBuf::as_path)
    }

    /// Read the whole file named by `filename`.
    ///
    /// Relative names are resolved against the credentials directory when one
    /// is configured, otherwise against the working directory. Only regular
    /// files up to [`MAX_CREDENTIALS_FILE_LEN`] bytes are read.
    pub async fn read(&self, filename: &str) -> Result<Vec<u8>, ServiceError> {
        let path = self.resolve(filename).await?;
        let not_readable = |e: std::io::Error| {
            warn!(filename, error = %e, "error reading credentials file");
            ServiceError::FileNotReadable
        };

        // Checked before opening: opening a FIFO blocks until a writer appears.
        let meta = tokio::fs::metadata(&path).await.map_err(not_readable)?;
        if !meta.is_file() {
            warn!(filename, "credentials file is not a regular file");
            return Err(ServiceError::FileNotReadable);
        }

        let file = tokio::fs::File::open(&path).await.map_err(not_readable)?;
        let mut buf = Vec::new();
        file.take(MAX_CREDENTIALS_FILE_LEN + 1)
            .read_to_end(&mut buf)
            .await
            .map_err(not_readable)?;

        if buf.len() as u64 > MAX_CREDENTIALS_FILE_LEN {
            warn!(
                filename,
                limit = MAX_CREDENTIALS_FILE_LEN,
                "credentials file too large"
            );
            return Err(ServiceError::FileNotReadable);
        }

        Ok(buf)
    }

    async fn resolve(&self, filename: &str) -> Result<PathBuf, ServiceError> {
        let Some(root) = self.root() else {
            return Ok(PathBuf::from(filename));
        };

        // Symlinks and `..` are resolved before the containment check.
        let resolved = tokio::fs::canonicalize(root.join(filename))
            .await
            .map_err(|e| {
                warn!(filename, error = %e, "error resolving credentials file");
                ServiceError::FileNotReadable
            })?;

        if !resolved.starts_with(root) {
            warn!(filename, "credentials file outside CREDENTIALS_DIR");
            return Err(ServiceError::FileNotPermitted);
        }

        Ok(resolved)
    }
}
