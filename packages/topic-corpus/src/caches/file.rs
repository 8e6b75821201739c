//! Directory-backed document cache.

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{CacheError, CacheResult};
use crate::traits::cache::DocumentCache;

/// Stores each document as `<root>/<key>`.
///
/// The root directory is created on first write and recreated if it
/// disappears between writes.
#[derive(Debug, Clone)]
pub struct FileCache {
    root: PathBuf,
}

impl FileCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }
}

fn io_error(key: &str, source: std::io::Error) -> CacheError {
    CacheError::Io {
        key: key.to_string(),
        source,
    }
}

#[async_trait]
impl DocumentCache for FileCache {
    async fn exists(&self, key: &str) -> CacheResult<bool> {
        match tokio::fs::metadata(self.path_for(key)).await {
            Ok(meta) => Ok(meta.is_file()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(io_error(key, e)),
        }
    }

    async fn read(&self, key: &str) -> CacheResult<String> {
        match tokio::fs::read_to_string(self.path_for(key)).await {
            Ok(text) => Ok(text),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(CacheError::Missing {
                key: key.to_string(),
            }),
            Err(e) => Err(io_error(key, e)),
        }
    }

    async fn write(&self, key: &str, text: &str) -> CacheResult<()> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| io_error(key, e))?;
        tokio::fs::write(self.path_for(key), text)
            .await
            .map_err(|e| io_error(key, e))?;
        debug!(root = %self.root.display(), key = %key, bytes = text.len(), "Cached document");
        Ok(())
    }

    async fn clear(&self) -> CacheResult<()> {
        match tokio::fs::remove_dir_all(&self.root).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error(&self.root.display().to_string(), e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_round_trip_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FileCache::new(dir.path().join("Google"));

        assert!(!cache.exists("Hitachi.txt").await.unwrap());
        cache.write("Hitachi.txt", "electronics").await.unwrap();

        assert!(cache.exists("Hitachi.txt").await.unwrap());
        assert_eq!(cache.read("Hitachi.txt").await.unwrap(), "electronics");
        assert!(dir.path().join("Google/Hitachi.txt").is_file());
    }

    #[tokio::test]
    async fn test_root_recreated_after_clear() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FileCache::new(dir.path().join("Google"));

        cache.write("A.txt", "a").await.unwrap();
        cache.clear().await.unwrap();
        assert!(!cache.root().exists());
        assert!(matches!(cache.read("A.txt").await, Err(CacheError::Missing { .. })));

        cache.write("B.txt", "b").await.unwrap();
        assert!(cache.exists("B.txt").await.unwrap());
    }

    #[tokio::test]
    async fn test_clear_missing_root_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FileCache::new(dir.path().join("never-written"));
        cache.clear().await.unwrap();
    }
}
