//! Fetch capability.

use async_trait::async_trait;

use crate::error::FetchResult;

/// Fetches raw page markup by URL.
///
/// No retry happens at this layer; the corpus treats any error as terminal
/// for that request.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch the raw markup served at `url`.
    async fn fetch(&self, url: &str) -> FetchResult<String>;

    /// Short name for logs.
    fn name(&self) -> &str {
        "fetcher"
    }
}

#[async_trait]
impl<F: PageFetcher + ?Sized> PageFetcher for std::sync::Arc<F> {
    async fn fetch(&self, url: &str) -> FetchResult<String> {
        (**self).fetch(url).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
