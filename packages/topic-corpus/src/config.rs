//! Configuration types for acquisition, cleaning and analysis.
//!
//! Every pattern the pipeline relies on lives here rather than in module
//! constants, so the cleaning and filtering policy can be swapped and
//! tested in isolation.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::stopwords::ENGLISH_STOPWORDS;

/// Default encyclopedia base URL; a topic is appended to form its page URL.
pub const DEFAULT_BASE_URL: &str = "https://en.wikipedia.org/wiki/";

/// Configuration for a [`Corpus`](crate::Corpus).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorpusConfig {
    /// Base URL topics are appended to.
    pub base_url: String,

    /// User agent sent by [`HttpFetcher`](crate::HttpFetcher).
    pub user_agent: String,

    /// Upper bound on documents fetched at once during materialization.
    ///
    /// Default: 1 (strictly sequential).
    pub max_concurrent_fetches: usize,

    /// Politeness policy applied before every fetch.
    pub politeness: PolitenessConfig,

    /// Where discovery looks for sections, links and validity markers.
    pub markup: MarkupProfile,

    /// Cleaning rules for page bodies.
    pub sanitizer: SanitizerConfig,
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: "TopicCorpus/0.1 (+https://github.com/topic-corpus)".to_string(),
            max_concurrent_fetches: 1,
            politeness: PolitenessConfig::default(),
            markup: MarkupProfile::default(),
            sanitizer: SanitizerConfig::default(),
        }
    }
}

impl CorpusConfig {
    /// Create a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the user agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the fetch concurrency cap (values below 1 are treated as 1).
    pub fn with_max_concurrent_fetches(mut self, max: usize) -> Self {
        self.max_concurrent_fetches = max.max(1);
        self
    }

    /// Set the politeness policy.
    pub fn with_politeness(mut self, politeness: PolitenessConfig) -> Self {
        self.politeness = politeness;
        self
    }

    /// Set the markup profile.
    pub fn with_markup(mut self, markup: MarkupProfile) -> Self {
        self.markup = markup;
        self
    }

    /// Set the sanitizer rules.
    pub fn with_sanitizer(mut self, sanitizer: SanitizerConfig) -> Self {
        self.sanitizer = sanitizer;
        self
    }

    /// Scheme and host of the base URL, used to absolutize site-relative links.
    ///
    /// `None` when the base URL does not parse or has no host.
    pub fn origin(&self) -> Option<String> {
        let url = url::Url::parse(&self.base_url).ok()?;
        url.has_host().then(|| url.origin().ascii_serialization())
    }
}

/// Randomized delay and rate limit applied before each fetch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolitenessConfig {
    /// Fixed part of the delay before each request (milliseconds).
    pub min_delay_ms: u64,

    /// Upper bound of the random part added on top (milliseconds).
    pub jitter_ms: u64,

    /// Sustained request rate; `None` disables the rate limiter.
    pub requests_per_second: Option<u32>,
}

impl Default for PolitenessConfig {
    fn default() -> Self {
        Self {
            min_delay_ms: 500,
            jitter_ms: 1000,
            requests_per_second: Some(1),
        }
    }
}

impl PolitenessConfig {
    /// No delay and no rate limit. Only for tests and local fixtures.
    pub fn none() -> Self {
        Self {
            min_delay_ms: 0,
            jitter_ms: 0,
            requests_per_second: None,
        }
    }
}

/// Layout of an article page as seen by discovery and validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkupProfile {
    /// Marker opening the article body; the introduction starts here.
    pub body_start: String,

    /// Marker closing the article body; the last section ends here.
    pub body_end: String,

    /// Section heading pattern; capture group 1 is the heading text.
    pub heading_pattern: String,

    /// Outbound article link pattern; capture group 1 is the site-relative path.
    pub link_pattern: String,

    /// Present on every real article (the categories navigation link).
    pub article_marker: String,

    /// Present on disambiguation pages.
    pub disambiguation_marker: String,

    /// Namespaces whose pages are never treated as topics (talk variants included).
    pub excluded_namespaces: Vec<String>,

    /// Individual pages never treated as topics.
    pub excluded_pages: Vec<String>,
}

impl Default for MarkupProfile {
    fn default() -> Self {
        Self {
            body_start: "<!-- bodyContent -->".to_string(),
            body_end: "<!-- /bodyContent -->".to_string(),
            heading_pattern: r#"(?s)<span class="mw-headline"[^>]*>(.*?)</span>"#.to_string(),
            link_pattern: r#"href="(/wiki/[^'" >]+)""#.to_string(),
            article_marker: r#"<a href="/wiki/Special:Categories""#.to_string(),
            disambiguation_marker: "/wiki/Category:Disambiguation_pages".to_string(),
            excluded_namespaces: [
                "Wikipedia",
                "File",
                "Special",
                "Help",
                "Category",
                "Talk",
                "Portal",
                "Template",
                "User",
                "Draft",
                "Module",
                "MediaWiki",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            excluded_pages: vec!["Main_Page".to_string()],
        }
    }
}

/// Ordered cleaning rules for page bodies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SanitizerConfig {
    /// Marker opening the body region.
    pub body_start: String,

    /// Marker closing the body region.
    pub body_end: String,

    /// `(start, end)` marker pairs; everything between them is dropped.
    pub boilerplate_regions: Vec<(String, String)>,

    /// Literal markup snippets dropped from the body.
    pub boilerplate_literals: Vec<String>,

    /// Number of leading tokens dropped as page furniture (title, navigation).
    pub prefix_tokens: usize,

    /// Characters replaced with a space.
    pub punctuation: String,

    /// Patterns removed after whitespace is collapsed.
    pub trailing_boilerplate: Vec<String>,
}

impl Default for SanitizerConfig {
    fn default() -> Self {
        Self {
            body_start: "<!-- bodyContent -->".to_string(),
            body_end: "<!-- /bodyContent -->".to_string(),
            boilerplate_regions: vec![
                ("<!-- tagline -->".to_string(), "<!-- /tagline -->".to_string()),
                ("<!-- subtitle -->".to_string(), "<!-- /jumpto -->".to_string()),
            ],
            boilerplate_literals: vec!["<h2>Contents</h2>".to_string()],
            prefix_tokens: 10,
            punctuation: r##"'()^"#:\;"##.to_string(),
            trailing_boilerplate: vec![r"Wikimedia Commons.*?pages".to_string()],
        }
    }
}

impl SanitizerConfig {
    /// Set the number of leading tokens dropped.
    pub fn with_prefix_tokens(mut self, n: usize) -> Self {
        self.prefix_tokens = n;
        self
    }
}

/// Filtering policy for the [`TopicAnalyzer`](crate::TopicAnalyzer).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Lowercase words never counted.
    pub stopwords: HashSet<String>,

    /// Lowercase punctuation and symbol tokens never counted.
    pub excluded_tokens: HashSet<String>,

    /// A term must occur strictly more often than this.
    pub term_threshold: usize,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            stopwords: ENGLISH_STOPWORDS.iter().map(|w| w.to_string()).collect(),
            excluded_tokens: [",", ".", "/", "-", "?", "=", "[", "]", "+", "/?", "%", "isbn"]
                .into_iter()
                .map(String::from)
                .collect(),
            term_threshold: 2,
        }
    }
}

impl AnalyzerConfig {
    /// Replace the stopword set.
    pub fn with_stopwords(mut self, words: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.stopwords = words.into_iter().map(|w| w.into().to_lowercase()).collect();
        self
    }

    /// Add an excluded token.
    pub fn exclude(mut self, token: impl Into<String>) -> Self {
        self.excluded_tokens.insert(token.into().to_lowercase());
        self
    }

    /// Set the term threshold.
    pub fn with_term_threshold(mut self, threshold: usize) -> Self {
        self.term_threshold = threshold;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin_from_base_url() {
        let config = CorpusConfig::new().with_base_url("http://en.wikipedia.org/wiki/");
        assert_eq!(config.origin().as_deref(), Some("http://en.wikipedia.org"));
    }

    #[test]
    fn test_origin_requires_absolute_base_url() {
        assert_eq!(CorpusConfig::new().with_base_url("/wiki/").origin(), None);
        assert_eq!(CorpusConfig::new().with_base_url("mailto:x@y.z").origin(), None);
    }

    #[test]
    fn test_concurrency_floor() {
        let config = CorpusConfig::new().with_max_concurrent_fetches(0);
        assert_eq!(config.max_concurrent_fetches, 1);
    }

    #[test]
    fn test_default_analyzer_filters() {
        let config = AnalyzerConfig::default();
        assert!(config.stopwords.contains("the"));
        assert!(config.excluded_tokens.contains("isbn"));
        assert_eq!(config.term_threshold, 2);
    }
}
