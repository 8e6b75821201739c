//! Politeness wrapper: randomized delay plus rate limit before each fetch.
//!
//! Uses the governor crate for the rate limit and its jitter for the
//! randomized part of the delay.

use async_trait::async_trait;
use governor::{Jitter, Quota, RateLimiter};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use crate::config::PolitenessConfig;
use crate::error::FetchResult;
use crate::traits::fetcher::PageFetcher;

type DefaultRateLimiter = RateLimiter<
    governor::state::NotKeyed,
    governor::state::InMemoryState,
    governor::clock::DefaultClock,
>;

/// A fetcher wrapper that waits before every request.
///
/// Each fetch first sleeps `min_delay + random(0..=jitter)`, then waits for
/// the rate limiter (when one is configured).
pub struct PoliteFetcher<F: PageFetcher> {
    inner: F,
    limiter: Option<Arc<DefaultRateLimiter>>,
    min_delay: Duration,
    jitter: Option<Jitter>,
}

impl<F: PageFetcher> PoliteFetcher<F> {
    /// Wrap `fetcher` with the given policy.
    pub fn new(fetcher: F, config: &PolitenessConfig) -> Self {
        let limiter = config
            .requests_per_second
            .and_then(NonZeroU32::new)
            .map(|rps| Arc::new(RateLimiter::direct(Quota::per_second(rps))));
        Self {
            inner: fetcher,
            limiter,
            min_delay: Duration::from_millis(config.min_delay_ms),
            jitter: (config.jitter_ms > 0)
                .then(|| Jitter::up_to(Duration::from_millis(config.jitter_ms))),
        }
    }

    pub fn inner(&self) -> &F {
        &self.inner
    }

    async fn wait_turn(&self) {
        let delay = match self.jitter {
            Some(jitter) => jitter + self.min_delay,
            None => self.min_delay,
        };
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        if let Some(limiter) = &self.limiter {
            limiter.until_ready().await;
        }
    }
}

#[async_trait]
impl<F: PageFetcher> PageFetcher for PoliteFetcher<F> {
    async fn fetch(&self, url: &str) -> FetchResult<String> {
        self.wait_turn().await;
        self.inner.fetch(url).await
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}

/// Extension trait for easy politeness wrapping.
pub trait FetcherExt: PageFetcher + Sized {
    /// Wrap this fetcher with a politeness policy.
    fn polite(self, config: &PolitenessConfig) -> PoliteFetcher<Self> {
        PoliteFetcher::new(self, config)
    }
}

impl<F: PageFetcher + Sized> FetcherExt for F {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockFetcher;
    use std::time::Instant;

    #[tokio::test]
    async fn test_delay_before_every_fetch() {
        let mock = MockFetcher::new()
            .with_page("https://example.com/1", "one")
            .with_page("https://example.com/2", "two");

        let config = PolitenessConfig {
            min_delay_ms: 60,
            jitter_ms: 20,
            requests_per_second: None,
        };
        let fetcher = mock.polite(&config);

        let start = Instant::now();
        fetcher.fetch("https://example.com/1").await.unwrap();
        fetcher.fetch("https://example.com/2").await.unwrap();

        assert!(
            start.elapsed() >= Duration::from_millis(120),
            "politeness delay not applied: {:?}",
            start.elapsed()
        );
        assert_eq!(fetcher.inner().total_calls(), 2);
    }

    #[tokio::test]
    async fn test_rate_limit() {
        let mock = MockFetcher::new().with_page("https://example.com/1", "one");
        let config = PolitenessConfig {
            min_delay_ms: 0,
            jitter_ms: 0,
            requests_per_second: Some(2),
        };
        let fetcher = mock.polite(&config);

        let start = Instant::now();
        for _ in 0..3 {
            fetcher.fetch("https://example.com/1").await.unwrap();
        }

        // burst of two, the third waits for the quota
        assert!(
            start.elapsed().as_millis() >= 400,
            "rate limit not applied: {:?}",
            start.elapsed()
        );
    }

    #[tokio::test]
    async fn test_errors_pass_through() {
        let fetcher = MockFetcher::new().polite(&PolitenessConfig::none());
        assert!(fetcher.fetch("https://example.com/missing").await.is_err());
    }
}
