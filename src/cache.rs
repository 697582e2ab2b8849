//! Last-known-good layouts on local disk.
//!
//! When the backend is unreachable the editor opens the most recent layout
//! it successfully loaded or saved, instead of an empty canvas.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::error::CacheError;
use crate::store::LayoutTarget;

#[derive(Debug, Clone)]
pub struct LayoutCache {
    dir: PathBuf,
}

impl LayoutCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File holding the cached layout for `target`.
    #[must_use]
    pub fn path_for(&self, target: &LayoutTarget) -> PathBuf {
        self.dir.join(format!("{}.json", target.cache_key()))
    }

    /// The cached layout, or `None` if nothing has been cached yet.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] if the file exists but cannot be read or parsed.
    pub async fn read(&self, target: &LayoutTarget) -> Result<Option<Value>, CacheError> {
        let bytes = match tokio::fs::read(self.path_for(target)).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_slice(&bytes)?))
    }

    /// Replace the cached layout for `target`.
    ///
    /// Writes to a temporary file first so a crash never leaves a torn file.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] if the directory or file cannot be written.
    pub async fn write(&self, target: &LayoutTarget, layout: &Value) -> Result<(), CacheError> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.path_for(target);
        let tmp = path.with_extension("json.tmp");
        let bytes = serde_json::to_vec_pretty(layout)?;
        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "cache_test.rs"]
mod tests;
