//! Testing utilities including mock implementations.
//!
//! These are useful for testing code that builds corpora without making
//! real network calls.

use async_trait::async_trait;
use std::collections::HashMap;
use std::io;
use std::sync::RwLock;

use crate::caches::MemoryCache;
use crate::error::{CacheError, CacheResult, FetchError, FetchResult};
use crate::traits::cache::DocumentCache;
use crate::traits::fetcher::PageFetcher;

/// Number of leading tokens a rendered fixture spends on page furniture.
/// Matches the default sanitizer prefix drop.
pub const FURNITURE_TOKENS: usize = 10;

const FURNITURE_FILLER: &[&str] = &[
    "Jump", "to", "navigation", "search", "menu", "page", "tools", "view", "history", "more",
];

/// A mock fetcher serving canned markup by URL.
///
/// Unknown URLs fail with a 404. Every call is recorded, so tests can
/// assert exactly which pages were fetched and how often.
#[derive(Default)]
pub struct MockFetcher {
    pages: RwLock<HashMap<String, String>>,
    calls: RwLock<Vec<String>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `markup` at `url`.
    pub fn with_page(self, url: impl Into<String>, markup: impl Into<String>) -> Self {
        self.pages.write().unwrap().insert(url.into(), markup.into());
        self
    }

    /// Serve a rendered fixture at `base_url` + its title.
    pub fn with_fixture(self, base_url: &str, fixture: &PageFixture) -> Self {
        let url = format!("{}{}", base_url, fixture.title);
        self.with_page(url, fixture.render())
    }

    /// Every URL requested, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.read().unwrap().clone()
    }

    /// How many times `url` was requested.
    pub fn calls_for(&self, url: &str) -> usize {
        self.calls.read().unwrap().iter().filter(|u| *u == url).count()
    }

    pub fn total_calls(&self) -> usize {
        self.calls.read().unwrap().len()
    }

    /// Clear call history.
    pub fn clear_calls(&self) {
        self.calls.write().unwrap().clear();
    }
}

#[async_trait]
impl PageFetcher for MockFetcher {
    async fn fetch(&self, url: &str) -> FetchResult<String> {
        self.calls.write().unwrap().push(url.to_string());
        self.pages
            .read()
            .unwrap()
            .get(url)
            .cloned()
            .ok_or_else(|| FetchError::Status {
                url: url.to_string(),
                status: 404,
            })
    }

    fn name(&self) -> &str {
        "mock"
    }
}

/// Which cache operations a [`FailingCache`] refuses.
#[derive(Debug, Clone, Copy, Default)]
struct Faults {
    exists: bool,
    read: bool,
    write: bool,
}

/// A memory cache whose operations can be made to fail.
///
/// Healthy operations go to an inner [`MemoryCache`], so entries seeded
/// with [`with_entry`](Self::with_entry) are visible to `exists` even
/// when reads fail.
#[derive(Default)]
pub struct FailingCache {
    inner: MemoryCache,
    faults: Faults,
}

impl FailingCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate an entry in the inner cache.
    pub fn with_entry(mut self, key: impl Into<String>, text: impl Into<String>) -> Self {
        self.inner = self.inner.with_entry(key, text);
        self
    }

    pub fn failing_exists(mut self) -> Self {
        self.faults.exists = true;
        self
    }

    pub fn failing_reads(mut self) -> Self {
        self.faults.read = true;
        self
    }

    pub fn failing_writes(mut self) -> Self {
        self.faults.write = true;
        self
    }

    /// Entries that actually reached storage.
    pub fn keys(&self) -> Vec<String> {
        self.inner.keys()
    }
}

fn injected(key: &str, op: &str) -> CacheError {
    CacheError::Io {
        key: key.to_string(),
        source: io::Error::new(io::ErrorKind::Other, format!("injected {} failure", op)),
    }
}

#[async_trait]
impl DocumentCache for FailingCache {
    async fn exists(&self, key: &str) -> CacheResult<bool> {
        if self.faults.exists {
            return Err(injected(key, "exists"));
        }
        self.inner.exists(key).await
    }

    async fn read(&self, key: &str) -> CacheResult<String> {
        if self.faults.read {
            return Err(injected(key, "read"));
        }
        self.inner.read(key).await
    }

    async fn write(&self, key: &str, text: &str) -> CacheResult<()> {
        if self.faults.write {
            return Err(injected(key, "write"));
        }
        self.inner.write(key, text).await
    }

    async fn clear(&self) -> CacheResult<()> {
        self.inner.clear().await
    }
}

/// What kind of page a fixture renders as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixtureKind {
    /// Real article: categories navigation present.
    Article,
    /// Disambiguation page: categories navigation plus the disambiguation category.
    Disambiguation,
    /// Non-article page: no categories navigation.
    Stub,
}

/// Builder for encyclopedia article markup in the default template.
///
/// ```
/// use topic_corpus::testing::PageFixture;
///
/// let page = PageFixture::article("Google")
///     .intro("Google is a search company.", &["Larry_Page", "Sergey_Brin"])
///     .section("History", "Founded in a garage.", &["Stanford_University"])
///     .render();
/// assert!(page.contains("mw-headline"));
/// ```
#[derive(Debug, Clone)]
pub struct PageFixture {
    pub title: String,
    pub kind: FixtureKind,
    intro: Vec<String>,
    sections: Vec<(String, Vec<String>)>,
}

impl PageFixture {
    pub fn article(title: impl Into<String>) -> Self {
        Self::with_kind(title, FixtureKind::Article)
    }

    pub fn disambiguation(title: impl Into<String>) -> Self {
        Self::with_kind(title, FixtureKind::Disambiguation)
    }

    pub fn stub(title: impl Into<String>) -> Self {
        Self::with_kind(title, FixtureKind::Stub)
    }

    fn with_kind(title: impl Into<String>, kind: FixtureKind) -> Self {
        Self {
            title: title.into(),
            kind,
            intro: Vec::new(),
            sections: Vec::new(),
        }
    }

    /// Add an introduction paragraph with links to `links`.
    pub fn intro(mut self, text: &str, links: &[&str]) -> Self {
        self.intro.push(paragraph(text, links));
        self
    }

    /// Add a paragraph under heading `heading` (created on first use).
    pub fn section(mut self, heading: &str, text: &str, links: &[&str]) -> Self {
        let para = paragraph(text, links);
        match self.sections.iter_mut().find(|(h, _)| h == heading) {
            Some((_, paras)) => paras.push(para),
            None => self.sections.push((heading.to_string(), vec![para])),
        }
        self
    }

    /// Raw markup for this page.
    pub fn render(&self) -> String {
        let mut html = String::new();
        html.push_str(&format!(
            "<html><head><title>{} - Wikipedia</title></head><body>\n",
            self.title.replace('_', " ")
        ));
        html.push_str("<!-- bodyContent -->\n");
        html.push_str("<!-- tagline -->From Wikipedia, the free encyclopedia<!-- /tagline -->\n");
        html.push_str("<!-- subtitle --><div id=\"contentSub\"></div><!-- /jumpto -->\n");
        html.push_str(&self.furniture());

        for para in &self.intro {
            html.push_str(para);
        }

        if !self.sections.is_empty() {
            html.push_str("<div id=\"toc\"><h2>Contents</h2></div>\n");
        }
        for (heading, paras) in &self.sections {
            html.push_str(&format!(
                "<h2><span class=\"mw-headline\" id=\"{}\">{}</span></h2>\n",
                heading.replace(' ', "_"),
                heading
            ));
            for para in paras {
                html.push_str(para);
            }
        }

        html.push_str("<!-- /bodyContent -->\n");
        html.push_str("<div id=\"catlinks\">");
        if self.kind != FixtureKind::Stub {
            html.push_str(
                "<a href=\"/wiki/Special:Categories\" title=\"Special:Categories\">Categories</a>: ",
            );
        }
        if self.kind == FixtureKind::Disambiguation {
            html.push_str(
                "<a href=\"/wiki/Category:Disambiguation_pages\" title=\"Category:Disambiguation pages\">Disambiguation pages</a>",
            );
        }
        html.push_str("</div>\n</body></html>\n");
        html
    }

    /// Title heading plus filler, exactly [`FURNITURE_TOKENS`] tokens for
    /// titles up to that many words.
    fn furniture(&self) -> String {
        let title = self.title.replace('_', " ");
        let used = title.split_whitespace().count();
        let filler = FURNITURE_FILLER[..FURNITURE_TOKENS.saturating_sub(used)].join(" ");
        format!(
            "<h1 id=\"firstHeading\">{}</h1><div id=\"jump-to-nav\">{}</div>\n",
            title, filler
        )
    }
}

fn paragraph(text: &str, links: &[&str]) -> String {
    let anchors: Vec<String> = links
        .iter()
        .map(|link| {
            format!(
                "<a href=\"/wiki/{}\" title=\"{}\">{}</a>",
                link,
                link.replace('_', " "),
                link.replace('_', " ")
            )
        })
        .collect();
    format!("<p>{} {}</p>\n", text, anchors.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SanitizerConfig;
    use crate::sanitizer::Sanitizer;

    #[tokio::test]
    async fn test_mock_fetcher_records_calls() {
        let fetcher = MockFetcher::new().with_page("https://example.com/a", "A");

        assert_eq!(fetcher.fetch("https://example.com/a").await.unwrap(), "A");
        assert!(fetcher.fetch("https://example.com/b").await.is_err());
        fetcher.fetch("https://example.com/a").await.unwrap();

        assert_eq!(fetcher.calls_for("https://example.com/a"), 2);
        assert_eq!(fetcher.calls_for("https://example.com/b"), 1);
        assert_eq!(fetcher.total_calls(), 3);
    }

    #[tokio::test]
    async fn test_failing_cache_fails_only_configured_operations() {
        let cache = FailingCache::new().with_entry("A.txt", "a").failing_reads();

        assert!(cache.exists("A.txt").await.unwrap());
        assert!(matches!(cache.read("A.txt").await, Err(CacheError::Io { .. })));
        cache.write("B.txt", "b").await.unwrap();
        assert_eq!(cache.keys(), vec!["A.txt", "B.txt"]);

        let cache = FailingCache::new().failing_writes();
        assert!(cache.write("C.txt", "c").await.is_err());
        assert!(cache.keys().is_empty());
    }

    #[test]
    fn test_fixture_furniture_is_dropped_by_default_sanitizer() {
        let markup = PageFixture::article("Data_Mining")
            .intro("Data mining finds patterns", &[])
            .render();
        let text = Sanitizer::new(&SanitizerConfig::default())
            .unwrap()
            .clean(&markup)
            .unwrap();
        assert_eq!(text, "Data mining finds patterns");
    }

    #[test]
    fn test_fixture_kinds_render_markers() {
        let article = PageFixture::article("A").render();
        let disambiguation = PageFixture::disambiguation("A").render();
        let stub = PageFixture::stub("A").render();

        assert!(article.contains("/wiki/Special:Categories"));
        assert!(!article.contains("Disambiguation_pages"));
        assert!(disambiguation.contains("/wiki/Category:Disambiguation_pages"));
        assert!(!stub.contains("/wiki/Special:Categories"));
    }
}
