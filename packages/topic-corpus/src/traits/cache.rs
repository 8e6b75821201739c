//! Cache storage for cleaned document text.

use async_trait::async_trait;

use crate::error::CacheResult;

/// Key/value storage for cleaned document text.
///
/// Keys are canonical file names derived from page URLs
/// (see [`cache_key_for_url`](crate::topic::cache_key_for_url)).
#[async_trait]
pub trait DocumentCache: Send + Sync {
    /// Whether an entry exists for `key`.
    async fn exists(&self, key: &str) -> CacheResult<bool>;

    /// Read the entry for `key`.
    async fn read(&self, key: &str) -> CacheResult<String>;

    /// Write (or overwrite) the entry for `key`.
    async fn write(&self, key: &str, text: &str) -> CacheResult<()>;

    /// Remove every entry.
    async fn clear(&self) -> CacheResult<()>;
}

#[async_trait]
impl<C: DocumentCache + ?Sized> DocumentCache for std::sync::Arc<C> {
    async fn exists(&self, key: &str) -> CacheResult<bool> {
        (**self).exists(key).await
    }

    async fn read(&self, key: &str) -> CacheResult<String> {
        (**self).read(key).await
    }

    async fn write(&self, key: &str, text: &str) -> CacheResult<()> {
        (**self).write(key, text).await
    }

    async fn clear(&self) -> CacheResult<()> {
        (**self).clear().await
    }
}
