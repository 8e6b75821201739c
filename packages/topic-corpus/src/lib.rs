//! Lazy Encyclopedia Corpus Library
//!
//! Builds a small text corpus on demand by crawling one hop outward from a
//! seed encyclopedia article, groups the linked documents by the section of
//! the seed page that referenced them, and computes word/topic frequency
//! statistics over the result.
//!
//! # Design
//!
//! - Discovery is cheap: opening a corpus fetches only the seed page
//! - Linked documents are fetched when a selection names them, at most once
//! - Failed documents are remembered and never retried
//! - A mandatory randomized delay precedes every request
//! - Cleaning and filtering rules are configuration, not constants
//!
//! # Usage
//!
//! ```rust,ignore
//! use topic_corpus::{AnalyzerConfig, CorpusBuilder, FileCache, HttpFetcher, Selector, TopicAnalyzer};
//!
//! let fetcher = HttpFetcher::new("my-agent/1.0")?;
//! let corpus = CorpusBuilder::new(fetcher, FileCache::new("Data_Mining"))
//!     .open("data mining")
//!     .await?;
//!
//! // Fetches only the documents linked from the "Background" section
//! let words = corpus.tagged_words(Selector::All, Selector::one("Background")).await?;
//!
//! let analyzer = TopicAnalyzer::new(&words, &AnalyzerConfig::default());
//! for (word, count) in analyzer.most_frequent_words(10, &Selector::All) {
//!     println!("{word}: {count}");
//! }
//! ```
//!
//! # Modules
//!
//! - [`topic`] - Topic identifiers, URL and cache key derivation
//! - [`sanitizer`] - Raw markup to cleaned text
//! - [`corpus`] - Discovery, lazy materialization and selection
//! - [`stream`] - The `(word, topic)` stream fed to the analyzer
//! - [`analyzer`] - Word/topic frequency queries
//! - [`traits`] - Fetch and cache collaborators
//! - [`fetchers`] - HTTP fetcher and the politeness wrapper
//! - [`caches`] - In-memory and directory-backed caches
//! - [`testing`] - Mock fetcher and page fixtures for testing

pub mod analyzer;
pub mod caches;
pub mod config;
pub mod corpus;
pub mod error;
pub mod fetchers;
pub mod sanitizer;
pub mod stopwords;
pub mod stream;
pub mod testing;
pub mod tokenizer;
pub mod topic;
pub mod traits;

// Re-export core types at crate root
pub use analyzer::TopicAnalyzer;
pub use config::{
    AnalyzerConfig, CorpusConfig, MarkupProfile, PolitenessConfig, SanitizerConfig,
    DEFAULT_BASE_URL,
};
pub use corpus::{
    validate_article, Corpus, CorpusBuilder, DocumentState, InvalidReason, SectionSelector,
    Selector, TopicSelector, INTRODUCTION,
};
pub use error::{
    CacheError, CacheResult, ContentShapeError, CorpusError, FetchError, FetchResult, Result,
    UnresolvedReason,
};
pub use sanitizer::Sanitizer;
pub use stream::TaggedWords;
pub use tokenizer::{Tokenizer, WhitespaceTokenizer, WordPunctTokenizer};
pub use topic::{canonicalize, url_for, Topic};
pub use traits::{cache::DocumentCache, fetcher::PageFetcher};

// Re-export implementations
pub use caches::{FileCache, MemoryCache};
pub use fetchers::{FetcherExt, HttpFetcher, PoliteFetcher};

// Re-export testing utilities
pub use testing::{FailingCache, MockFetcher, PageFixture};
