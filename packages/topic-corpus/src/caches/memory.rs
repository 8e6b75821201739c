//! In-memory document cache for testing and short-lived corpora.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

use crate::error::{CacheError, CacheResult};
use crate::traits::cache::DocumentCache;

/// In-memory storage for cleaned documents.
///
/// Useful for testing and development. Entries are lost when the cache
/// is dropped.
#[derive(Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, String>>,
    writes: RwLock<Vec<String>>,
}

impl MemoryCache {
    /// Create a new empty memory cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate an entry, as if a previous run had cached it.
    pub fn with_entry(self, key: impl Into<String>, text: impl Into<String>) -> Self {
        self.entries.write().unwrap().insert(key.into(), text.into());
        self
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sorted keys of all stored entries.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<_> = self.entries.read().unwrap().keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Keys in the order they were written (repeats included).
    pub fn writes(&self) -> Vec<String> {
        self.writes.read().unwrap().clone()
    }
}

#[async_trait]
impl DocumentCache for MemoryCache {
    async fn exists(&self, key: &str) -> CacheResult<bool> {
        Ok(self.entries.read().unwrap().contains_key(key))
    }

    async fn read(&self, key: &str) -> CacheResult<String> {
        self.entries
            .read()
            .unwrap()
            .get(key)
            .cloned()
            .ok_or_else(|| CacheError::Missing {
                key: key.to_string(),
            })
    }

    async fn write(&self, key: &str, text: &str) -> CacheResult<()> {
        self.entries
            .write()
            .unwrap()
            .insert(key.to_string(), text.to_string());
        self.writes.write().unwrap().push(key.to_string());
        Ok(())
    }

    async fn clear(&self) -> CacheResult<()> {
        self.entries.write().unwrap().clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_write_read_exists() {
        let cache = MemoryCache::new();
        assert!(!cache.exists("A.txt").await.unwrap());

        cache.write("A.txt", "alpha").await.unwrap();
        assert!(cache.exists("A.txt").await.unwrap());
        assert_eq!(cache.read("A.txt").await.unwrap(), "alpha");
        assert_eq!(cache.writes(), vec!["A.txt".to_string()]);
    }

    #[tokio::test]
    async fn test_missing_and_clear() {
        let cache = MemoryCache::new().with_entry("B.txt", "beta");
        assert!(matches!(
            cache.read("A.txt").await,
            Err(CacheError::Missing { .. })
        ));

        cache.clear().await.unwrap();
        assert!(cache.is_empty());
    }
}
