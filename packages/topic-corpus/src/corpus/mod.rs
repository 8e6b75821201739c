//! Lazy corpus acquisition.
//!
//! A [`Corpus`] is opened from a seed topic. Opening fetches and validates
//! the seed page, caches its cleaned text and builds the section index from
//! its links. Linked documents are only fetched when a selection that
//! names them is materialized, and each one is fetched at most once per
//! corpus, whether it ends up materialized or invalid.
//!
//! # Example
//!
//! ```rust,ignore
//! use topic_corpus::{CorpusBuilder, FileCache, HttpFetcher, Selector};
//!
//! let corpus = CorpusBuilder::new(HttpFetcher::new("my-agent/1.0")?, FileCache::new("Google"))
//!     .open("google")
//!     .await?;
//!
//! for section in corpus.sections() {
//!     println!("{section}");
//! }
//! let history = corpus.topics(Selector::one("History"))?;
//! let text = corpus.raw_text(Selector::All, Selector::one("History")).await?;
//! ```

pub mod discovery;
pub mod document;
pub mod selector;

use futures::stream::{self, StreamExt};
use indexmap::{IndexMap, IndexSet};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::{Arc, RwLock};
use tracing::{debug, info, warn};

use crate::config::CorpusConfig;
use crate::error::{CorpusError, Result, UnresolvedReason};
use crate::fetchers::PoliteFetcher;
use crate::sanitizer::Sanitizer;
use crate::stream::TaggedWords;
use crate::tokenizer::{Tokenizer, WordPunctTokenizer};
use crate::topic::{cache_key_for_url, canonicalize, url_for, Topic};
use crate::traits::cache::DocumentCache;
use crate::traits::fetcher::PageFetcher;

pub use discovery::{validate_article, SectionIndex, INTRODUCTION};
pub use document::{DocumentState, InvalidReason};
pub use selector::{SectionSelector, Selector, TopicSelector};

use discovery::MarkupRules;
use document::DocumentSlot;

/// Separator placed between documents by [`Corpus::raw_text`].
pub const DOCUMENT_SEPARATOR: &str = "\n";

/// Builder for [`Corpus`].
pub struct CorpusBuilder {
    fetcher: Arc<dyn PageFetcher>,
    cache: Arc<dyn DocumentCache>,
    config: CorpusConfig,
    tokenizer: Arc<dyn Tokenizer>,
}

impl CorpusBuilder {
    /// Start a builder with the default configuration and tokenizer.
    ///
    /// The fetcher is wrapped with the configured politeness policy when
    /// the corpus is opened; pass it unwrapped.
    pub fn new(fetcher: impl PageFetcher + 'static, cache: impl DocumentCache + 'static) -> Self {
        Self {
            fetcher: Arc::new(fetcher),
            cache: Arc::new(cache),
            config: CorpusConfig::default(),
            tokenizer: Arc::new(WordPunctTokenizer),
        }
    }

    pub fn config(mut self, config: CorpusConfig) -> Self {
        self.config = config;
        self
    }

    pub fn tokenizer(mut self, tokenizer: impl Tokenizer + 'static) -> Self {
        self.tokenizer = Arc::new(tokenizer);
        self
    }

    /// Resolve `seed_text` and open a corpus rooted at it.
    ///
    /// Fails with [`CorpusError::UnresolvedTopic`] when the seed page cannot
    /// be fetched, is not an article, or does not match the page template.
    pub async fn open(self, seed_text: &str) -> Result<Corpus> {
        let engine = Engine::new(self.fetcher, self.cache, self.config, self.tokenizer)?;
        Corpus::open(Arc::new(engine), seed_text).await
    }
}

/// Collaborators and compiled rules shared by every corpus opened from
/// one builder.
struct Engine {
    fetcher: PoliteFetcher<Arc<dyn PageFetcher>>,
    cache: Arc<dyn DocumentCache>,
    config: CorpusConfig,
    rules: MarkupRules,
    sanitizer: Sanitizer,
    tokenizer: Arc<dyn Tokenizer>,
}

impl Engine {
    fn new(
        fetcher: Arc<dyn PageFetcher>,
        cache: Arc<dyn DocumentCache>,
        config: CorpusConfig,
        tokenizer: Arc<dyn Tokenizer>,
    ) -> Result<Self> {
        let origin = config.origin().ok_or_else(|| CorpusError::InvalidBaseUrl {
            url: config.base_url.clone(),
        })?;
        let rules = MarkupRules::new(&config.markup, origin)?;
        let sanitizer = Sanitizer::new(&config.sanitizer)?;
        Ok(Self {
            fetcher: PoliteFetcher::new(fetcher, &config.politeness),
            cache,
            rules,
            sanitizer,
            tokenizer,
            config,
        })
    }

    /// Cached text for `key`, or fetch, validate, clean and cache it.
    async fn acquire(
        &self,
        topic: &Topic,
        url: &str,
        key: &str,
    ) -> std::result::Result<Arc<str>, InvalidReason> {
        if let Some(text) = self.cached(key).await {
            debug!(topic = %topic, key, "Cache hit");
            return Ok(text.into());
        }

        debug!(topic = %topic, url, fetcher = self.fetcher.name(), "Fetching document");
        let markup = self.fetcher.fetch(url).await.map_err(|error| {
            warn!(topic = %topic, url, error = %error, "Fetch failed, marking invalid");
            InvalidReason::Unreachable
        })?;

        if !self.rules.is_article(&markup) {
            warn!(topic = %topic, url, "Not an article, marking invalid");
            return Err(InvalidReason::NotAnArticle);
        }

        let text = self.sanitizer.clean(&markup).map_err(|error| {
            warn!(topic = %topic, url, error = %error, "Unexpected page layout, marking invalid");
            InvalidReason::MalformedContent
        })?;

        self.store(key, &text).await;
        Ok(text.into())
    }

    /// Cache faults fall back to fetching.
    async fn cached(&self, key: &str) -> Option<String> {
        match self.cache.exists(key).await {
            Ok(true) => match self.cache.read(key).await {
                Ok(text) => Some(text),
                Err(error) => {
                    warn!(key, error = %error, "Cache read failed, fetching instead");
                    None
                }
            },
            Ok(false) => None,
            Err(error) => {
                warn!(key, error = %error, "Cache lookup failed, fetching instead");
                None
            }
        }
    }

    async fn store(&self, key: &str, text: &str) {
        if let Err(error) = self.cache.write(key, text).await {
            warn!(key, error = %error, "Cache write failed, keeping text in memory only");
        }
    }
}

/// A seed topic, its section index and the documents reachable from it.
pub struct Corpus {
    engine: Arc<Engine>,
    root: Topic,
    seed_url: String,
    seed_text: Arc<str>,
    sections: IndexMap<String, IndexSet<Topic>>,
    documents: HashMap<Topic, DocumentSlot>,
    invalid: RwLock<BTreeSet<Topic>>,
}

impl Corpus {
    async fn open(engine: Arc<Engine>, seed_text: &str) -> Result<Self> {
        let root = canonicalize(seed_text);
        let seed_url = url_for(&engine.config.base_url, &root);
        let unresolved = |reason: UnresolvedReason| CorpusError::UnresolvedTopic {
            topic: root.clone(),
            reason,
        };

        info!(topic = %root, url = %seed_url, "Opening corpus");

        let markup = engine
            .fetcher
            .fetch(&seed_url)
            .await
            .map_err(|error| unresolved(UnresolvedReason::Unreachable(error)))?;

        if !engine.rules.is_article(&markup) {
            return Err(unresolved(UnresolvedReason::NotAnArticle));
        }

        let text = engine
            .sanitizer
            .clean(&markup)
            .map_err(|error| unresolved(UnresolvedReason::MalformedContent(error)))?;

        let seed_key = cache_key_for_url(&seed_url);
        if engine.cached(&seed_key).await.is_none() {
            engine.store(&seed_key, &text).await;
        }
        let seed_text: Arc<str> = text.into();

        let SectionIndex { sections, urls } = engine.rules.discover(&markup);

        let mut documents = HashMap::with_capacity(urls.len() + 1);
        for (topic, url) in urls {
            let key = cache_key_for_url(&url);
            documents.insert(topic, DocumentSlot::discovered(url, key));
        }
        documents.insert(
            root.clone(),
            DocumentSlot::materialized(seed_url.clone(), seed_key, Arc::clone(&seed_text)),
        );

        info!(
            topic = %root,
            sections = sections.len(),
            topics = documents.len() - 1,
            "Corpus opened"
        );

        Ok(Self {
            engine,
            root,
            seed_url,
            seed_text,
            sections,
            documents,
            invalid: RwLock::new(BTreeSet::new()),
        })
    }

    /// Open a corpus for another seed topic, sharing this corpus's
    /// fetcher, cache and configuration.
    pub async fn corpus_for(&self, topic_text: &str) -> Result<Corpus> {
        Corpus::open(Arc::clone(&self.engine), topic_text).await
    }

    pub fn root_topic(&self) -> &Topic {
        &self.root
    }

    pub fn seed_url(&self) -> &str {
        &self.seed_url
    }

    /// Cleaned text of the seed page.
    pub fn seed_text(&self) -> &str {
        &self.seed_text
    }

    pub fn config(&self) -> &CorpusConfig {
        &self.engine.config
    }

    /// Section names in discovery order, starting with the introduction.
    pub fn sections(&self) -> Vec<&str> {
        self.sections.keys().map(String::as_str).collect()
    }

    /// Sorted topics of the selected sections (all sections for
    /// [`Selector::All`]), known-invalid topics excluded.
    pub fn topics(&self, sections: SectionSelector) -> Result<Vec<Topic>> {
        let members = self.section_members(&sections)?;
        let invalid = self.invalid.read().unwrap();
        Ok(members.into_iter().filter(|t| !invalid.contains(t)).collect())
    }

    /// Sorted cache keys of the selected sections' non-invalid topics.
    pub fn file_ids(&self, sections: SectionSelector) -> Result<Vec<String>> {
        let mut keys: Vec<String> = self
            .topics(sections)?
            .iter()
            .filter_map(|topic| self.documents.get(topic))
            .map(|slot| slot.key.clone())
            .collect();
        keys.sort();
        Ok(keys)
    }

    /// Sorted topics recorded as invalid so far.
    pub fn invalid_topics(&self) -> Vec<Topic> {
        self.invalid.read().unwrap().iter().cloned().collect()
    }

    /// Current state of `topic`, or `None` when it was never discovered.
    pub async fn status(&self, topic: &Topic) -> Option<DocumentState> {
        let slot = self.documents.get(topic)?;
        let state = slot.state.lock().await;
        Some(state.clone())
    }

    /// Materialize a selection and return the topics that ended up usable.
    ///
    /// At most one of `topics` and `sections` may name something. An
    /// explicit topic list keeps its order; a section expansion (or no
    /// selection at all) is sorted. Per-topic failures are not errors: the
    /// topic is recorded as invalid and left out of the result.
    pub async fn materialize(
        &self,
        topics: TopicSelector,
        sections: SectionSelector,
    ) -> Result<Vec<Topic>> {
        let documents = self.materialized(&topics, &sections).await?;
        Ok(documents.into_iter().map(|(topic, _)| topic).collect())
    }

    /// Concatenated cleaned text of a selection, one document per line.
    pub async fn raw_text(&self, topics: TopicSelector, sections: SectionSelector) -> Result<String> {
        let documents = self.materialized(&topics, &sections).await?;
        Ok(documents
            .iter()
            .map(|(_, text)| &**text)
            .collect::<Vec<_>>()
            .join(DOCUMENT_SEPARATOR))
    }

    /// All tokens of a selection, in document order.
    pub async fn words(&self, topics: TopicSelector, sections: SectionSelector) -> Result<Vec<String>> {
        let words = self.tagged_words(topics, sections).await?;
        Ok(words.iter().map(|(word, _)| word.to_string()).collect())
    }

    /// Materialize a selection and return its `(word, topic)` stream.
    ///
    /// Tokenization happens lazily while the stream is iterated; the stream
    /// can be iterated any number of times.
    pub async fn tagged_words(
        &self,
        topics: TopicSelector,
        sections: SectionSelector,
    ) -> Result<TaggedWords> {
        let documents = self.materialized(&topics, &sections).await?;
        Ok(TaggedWords::new(documents, Arc::clone(&self.engine.tokenizer)))
    }

    /// Clear the cache storage. Other corpora sharing the cache lose their
    /// cached text too.
    pub async fn discard(self) -> Result<()> {
        info!(topic = %self.root, "Discarding corpus cache");
        self.engine.cache.clear().await?;
        Ok(())
    }

    async fn materialized(
        &self,
        topics: &TopicSelector,
        sections: &SectionSelector,
    ) -> Result<Vec<(Topic, Arc<str>)>> {
        let selection = self.select(topics, sections)?;
        let requested = selection.len();
        let width = self.engine.config.max_concurrent_fetches.max(1);

        let outcomes: Vec<(Topic, Option<Arc<str>>)> = stream::iter(selection)
            .map(|topic| async move {
                let text = self.materialize_one(&topic).await;
                (topic, text)
            })
            .buffered(width)
            .collect()
            .await;

        let documents: Vec<_> = outcomes
            .into_iter()
            .filter_map(|(topic, text)| text.map(|text| (topic, text)))
            .collect();

        debug!(requested, materialized = documents.len(), "Selection materialized");
        Ok(documents)
    }

    async fn materialize_one(&self, topic: &Topic) -> Option<Arc<str>> {
        let slot = self.documents.get(topic)?;
        let mut state = slot.state.lock().await;

        match &*state {
            DocumentState::Materialized(text) => return Some(Arc::clone(text)),
            DocumentState::Invalid(_) => return None,
            DocumentState::Discovered => {}
        }

        match self.engine.acquire(topic, &slot.url, &slot.key).await {
            Ok(text) => {
                *state = DocumentState::Materialized(Arc::clone(&text));
                Some(text)
            }
            Err(reason) => {
                self.invalid.write().unwrap().insert(topic.clone());
                *state = DocumentState::Invalid(reason);
                None
            }
        }
    }

    fn select(&self, topics: &TopicSelector, sections: &SectionSelector) -> Result<Vec<Topic>> {
        match (topics.items(), sections.items()) {
            (Some(_), Some(_)) => Err(CorpusError::ConflictingSelector),
            (Some(named), None) => {
                let mut seen = HashSet::new();
                let mut selection = Vec::with_capacity(named.len());
                for topic in named {
                    if !self.documents.contains_key(topic) {
                        return Err(CorpusError::UnknownTopic {
                            topic: topic.clone(),
                        });
                    }
                    if seen.insert(topic) {
                        selection.push(topic.clone());
                    }
                }
                Ok(selection)
            }
            (None, _) => Ok(self.section_members(sections)?.into_iter().collect()),
        }
    }

    fn section_members(&self, sections: &SectionSelector) -> Result<BTreeSet<Topic>> {
        let Some(names) = sections.items() else {
            return Ok(self.sections.values().flatten().cloned().collect());
        };

        let mut members = BTreeSet::new();
        for name in names {
            let topics = self
                .sections
                .get(name.as_str())
                .ok_or_else(|| CorpusError::UnknownSection {
                    section: name.clone(),
                })?;
            members.extend(topics.iter().cloned());
        }
        Ok(members)
    }
}

impl std::fmt::Debug for Corpus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Corpus")
            .field("root", &self.root)
            .field("seed_url", &self.seed_url)
            .field("sections", &self.sections.len())
            .field("documents", &self.documents.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::caches::MemoryCache;
    use crate::config::PolitenessConfig;
    use crate::testing::{FailingCache, MockFetcher, PageFixture};

    const BASE: &str = "http://en.wikipedia.org/wiki/";

    fn config() -> CorpusConfig {
        CorpusConfig::new()
            .with_base_url(BASE)
            .with_politeness(PolitenessConfig::none())
    }

    fn seed() -> PageFixture {
        PageFixture::article("Google")
            .intro("Google is a search company.", &["Larry_Page", "Sergey_Brin"])
            .section("History", "Founded in a garage.", &["Stanford_University", "Broken"])
            .section("Products", "Search and ads.", &["Gmail", "Ambiguous"])
    }

    fn fetcher() -> Arc<MockFetcher> {
        Arc::new(
            MockFetcher::new()
                .with_fixture(BASE, &seed())
                .with_fixture(BASE, &PageFixture::article("Larry_Page").intro("Co-founder", &[]))
                .with_fixture(BASE, &PageFixture::article("Sergey_Brin").intro("Co-founder", &[]))
                .with_fixture(
                    BASE,
                    &PageFixture::article("Stanford_University").intro("A university", &[]),
                )
                .with_fixture(BASE, &PageFixture::article("Gmail").intro("Email service", &[]))
                .with_fixture(BASE, &PageFixture::disambiguation("Ambiguous")),
        )
    }

    async fn open(fetcher: Arc<MockFetcher>, cache: Arc<MemoryCache>) -> Corpus {
        CorpusBuilder::new(fetcher, cache)
            .config(config())
            .open("google")
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_open_fetches_only_the_seed() {
        let fetcher = fetcher();
        let cache = Arc::new(MemoryCache::new());
        let corpus = open(fetcher.clone(), cache.clone()).await;

        assert_eq!(corpus.root_topic().as_str(), "Google");
        assert_eq!(corpus.seed_url(), "http://en.wikipedia.org/wiki/Google");
        assert!(corpus.seed_text().starts_with("Google is a search company"));
        assert_eq!(fetcher.calls(), vec!["http://en.wikipedia.org/wiki/Google"]);
        assert_eq!(cache.keys(), vec!["Google.txt"]);
        assert_eq!(corpus.sections(), vec!["Introduction", "History", "Products"]);
    }

    #[tokio::test]
    async fn test_open_rejects_disambiguation_seed() {
        let fetcher = Arc::new(MockFetcher::new().with_fixture(
            BASE,
            &PageFixture::disambiguation("Mercury").intro("May refer to", &["Mercury_(planet)"]),
        ));

        let err = CorpusBuilder::new(fetcher, MemoryCache::new())
            .config(config())
            .open("mercury")
            .await
            .unwrap_err();

        match err {
            CorpusError::UnresolvedTopic { topic, reason } => {
                assert_eq!(topic.as_str(), "Mercury");
                assert!(matches!(reason, UnresolvedReason::NotAnArticle));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_open_reports_unreachable_seed() {
        let err = CorpusBuilder::new(MockFetcher::new(), MemoryCache::new())
            .config(config())
            .open("nowhere at all")
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            CorpusError::UnresolvedTopic {
                reason: UnresolvedReason::Unreachable(_),
                ..
            }
        ));
        assert!(err.to_string().contains("Nowhere_At_All"));
    }

    #[tokio::test]
    async fn test_open_reports_malformed_seed() {
        let markup = PageFixture::article("Odd")
            .render()
            .replace("<!-- /bodyContent -->", "");
        let fetcher = MockFetcher::new().with_page(format!("{}Odd", BASE), markup);

        let err = CorpusBuilder::new(fetcher, MemoryCache::new())
            .config(config())
            .open("odd")
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            CorpusError::UnresolvedTopic {
                reason: UnresolvedReason::MalformedContent(_),
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_topics_by_section() {
        let corpus = open(fetcher(), Arc::new(MemoryCache::new())).await;

        let all: Vec<_> = corpus.topics(Selector::All).unwrap();
        assert_eq!(
            all.iter().map(Topic::as_str).collect::<Vec<_>>(),
            vec![
                "Ambiguous",
                "Broken",
                "Gmail",
                "Larry_Page",
                "Sergey_Brin",
                "Stanford_University"
            ]
        );

        let history = corpus.topics(Selector::one("History")).unwrap();
        assert_eq!(
            history.iter().map(Topic::as_str).collect::<Vec<_>>(),
            vec!["Broken", "Stanford_University"]
        );

        let err = corpus.topics(Selector::one("Nope")).unwrap_err();
        assert!(matches!(err, CorpusError::UnknownSection { section } if section == "Nope"));
    }

    #[tokio::test]
    async fn test_materialize_marks_failures_invalid_without_aborting() {
        let fetcher = fetcher();
        let cache = Arc::new(MemoryCache::new());
        let corpus = open(fetcher.clone(), cache.clone()).await;

        let done = corpus
            .materialize(Selector::All, Selector::many(["History", "Products"]))
            .await
            .unwrap();

        assert_eq!(
            done.iter().map(Topic::as_str).collect::<Vec<_>>(),
            vec!["Gmail", "Stanford_University"]
        );
        assert_eq!(
            corpus
                .invalid_topics()
                .iter()
                .map(Topic::as_str)
                .collect::<Vec<_>>(),
            vec!["Ambiguous", "Broken"]
        );
        assert_eq!(
            corpus.status(&Topic::new("Broken")).await,
            Some(DocumentState::Invalid(InvalidReason::Unreachable))
        );
        assert_eq!(
            corpus.status(&Topic::new("Ambiguous")).await,
            Some(DocumentState::Invalid(InvalidReason::NotAnArticle))
        );
        assert_eq!(
            cache.keys(),
            vec!["Gmail.txt", "Google.txt", "Stanford_University.txt"]
        );

        // Invalid topics disappear from listings.
        let history = corpus.topics(Selector::one("History")).unwrap();
        assert_eq!(history, vec![Topic::new("Stanford_University")]);
        assert_eq!(
            corpus.file_ids(Selector::one("Products")).unwrap(),
            vec!["Gmail.txt"]
        );
    }

    #[tokio::test]
    async fn test_materialize_is_idempotent() {
        let fetcher = fetcher();
        let corpus = open(fetcher.clone(), Arc::new(MemoryCache::new())).await;

        let first = corpus.materialize(Selector::All, Selector::All).await.unwrap();
        let calls = fetcher.total_calls();
        let second = corpus.materialize(Selector::All, Selector::All).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(fetcher.total_calls(), calls);
        assert_eq!(fetcher.calls_for("http://en.wikipedia.org/wiki/Broken"), 1);
    }

    #[tokio::test]
    async fn test_explicit_topics_keep_order() {
        let corpus = open(fetcher(), Arc::new(MemoryCache::new())).await;

        let done = corpus
            .materialize(
                Selector::many(["Sergey_Brin", "Ambiguous", "Larry_Page", "Sergey_Brin"]),
                Selector::All,
            )
            .await
            .unwrap();

        assert_eq!(
            done,
            vec![Topic::new("Sergey_Brin"), Topic::new("Larry_Page")]
        );
    }

    #[tokio::test]
    async fn test_selector_errors() {
        let corpus = open(fetcher(), Arc::new(MemoryCache::new())).await;

        let err = corpus
            .materialize(Selector::one("Gmail"), Selector::one("Products"))
            .await
            .unwrap_err();
        assert!(matches!(err, CorpusError::ConflictingSelector));

        let err = corpus
            .materialize(Selector::one("Unlinked"), Selector::All)
            .await
            .unwrap_err();
        assert!(matches!(err, CorpusError::UnknownTopic { .. }));
    }

    #[tokio::test]
    async fn test_cache_hit_skips_fetch() {
        let fetcher = fetcher();
        let cache = Arc::new(MemoryCache::new().with_entry("Gmail.txt", "cached gmail text"));
        let corpus = open(fetcher.clone(), cache).await;

        let text = corpus
            .raw_text(Selector::one("Gmail"), Selector::All)
            .await
            .unwrap();

        assert_eq!(text, "cached gmail text");
        assert_eq!(fetcher.calls_for("http://en.wikipedia.org/wiki/Gmail"), 0);
    }

    #[tokio::test]
    async fn test_raw_text_joins_documents() {
        let corpus = open(fetcher(), Arc::new(MemoryCache::new())).await;

        let text = corpus
            .raw_text(Selector::All, Selector::one("Introduction"))
            .await
            .unwrap();

        assert_eq!(text, "Co-founder\nCo-founder");
    }

    #[tokio::test]
    async fn test_tagged_words_follow_document_order() {
        let corpus = open(fetcher(), Arc::new(MemoryCache::new())).await;

        let words = corpus
            .tagged_words(Selector::many(["Stanford_University", "Gmail"]), Selector::All)
            .await
            .unwrap();

        let pairs: Vec<_> = words.iter().map(|(w, t)| (w, t.as_str())).collect();
        assert_eq!(
            pairs,
            vec![
                ("A", "Stanford_University"),
                ("university", "Stanford_University"),
                ("Email", "Gmail"),
                ("service", "Gmail"),
            ]
        );

        let flat = corpus
            .words(Selector::one("Gmail"), Selector::All)
            .await
            .unwrap();
        assert_eq!(flat, vec!["Email", "service"]);
    }

    #[tokio::test]
    async fn test_concurrent_requests_share_one_fetch() {
        let fetcher = fetcher();
        let corpus = open(fetcher.clone(), Arc::new(MemoryCache::new())).await;

        let (a, b) = tokio::join!(
            corpus.materialize(Selector::one("Gmail"), Selector::All),
            corpus.materialize(Selector::one("Gmail"), Selector::All),
        );

        assert_eq!(a.unwrap(), b.unwrap());
        assert_eq!(fetcher.calls_for("http://en.wikipedia.org/wiki/Gmail"), 1);
    }

    #[tokio::test]
    async fn test_corpus_for_shares_collaborators() {
        let fetcher = Arc::new(
            MockFetcher::new()
                .with_fixture(BASE, &seed())
                .with_fixture(BASE, &PageFixture::article("Gmail").intro("Email service", &[])),
        );
        let cache = Arc::new(MemoryCache::new());
        let corpus = open(fetcher.clone(), cache.clone()).await;

        let gmail = corpus.corpus_for("gmail").await.unwrap();

        assert_eq!(gmail.root_topic().as_str(), "Gmail");
        assert_eq!(gmail.config().base_url, BASE);
        assert_eq!(cache.keys(), vec!["Gmail.txt", "Google.txt"]);
    }

    #[tokio::test]
    async fn test_relative_base_url_rejected_before_fetching() {
        let fetcher = fetcher();
        let err = CorpusBuilder::new(fetcher.clone(), MemoryCache::new())
            .config(config().with_base_url("/wiki/"))
            .open("google")
            .await
            .unwrap_err();

        assert!(matches!(err, CorpusError::InvalidBaseUrl { ref url } if url == "/wiki/"));
        assert_eq!(fetcher.total_calls(), 0);
    }

    #[tokio::test]
    async fn test_cache_write_failure_still_materializes() {
        let fetcher = fetcher();
        let cache = Arc::new(FailingCache::new().failing_writes());
        let corpus = CorpusBuilder::new(fetcher.clone(), cache.clone())
            .config(config())
            .open("google")
            .await
            .unwrap();

        let topics = corpus
            .materialize(Selector::one("Gmail"), Selector::All)
            .await
            .unwrap();
        assert_eq!(topics, vec![Topic::new("Gmail")]);

        let text = corpus.raw_text(Selector::one("Gmail"), Selector::All).await.unwrap();
        assert_eq!(text, "Email service");
        assert!(corpus.invalid_topics().is_empty());
        assert!(cache.keys().is_empty());
        assert_eq!(fetcher.calls_for("http://en.wikipedia.org/wiki/Gmail"), 1);
    }

    #[tokio::test]
    async fn test_cache_read_failure_falls_back_to_one_fetch() {
        let fetcher = fetcher();
        let cache = FailingCache::new()
            .with_entry("Gmail.txt", "stale cached text")
            .failing_reads();
        let corpus = CorpusBuilder::new(fetcher.clone(), cache)
            .config(config())
            .open("google")
            .await
            .unwrap();

        let text = corpus.raw_text(Selector::one("Gmail"), Selector::All).await.unwrap();
        corpus.raw_text(Selector::one("Gmail"), Selector::All).await.unwrap();

        assert_eq!(text, "Email service");
        assert_eq!(fetcher.calls_for("http://en.wikipedia.org/wiki/Gmail"), 1);
    }

    #[tokio::test]
    async fn test_cache_lookup_failure_falls_back_to_fetch() {
        let fetcher = fetcher();
        let corpus = CorpusBuilder::new(fetcher.clone(), FailingCache::new().failing_exists())
            .config(config())
            .open("google")
            .await
            .unwrap();

        let topics = corpus
            .materialize(Selector::one("Larry_Page"), Selector::All)
            .await
            .unwrap();

        assert_eq!(topics, vec![Topic::new("Larry_Page")]);
        assert_eq!(fetcher.calls_for("http://en.wikipedia.org/wiki/Larry_Page"), 1);
    }

    #[tokio::test]
    async fn test_discard_clears_cache() {
        let cache = Arc::new(MemoryCache::new());
        let corpus = open(fetcher(), cache.clone()).await;
        corpus
            .materialize(Selector::All, Selector::one("Introduction"))
            .await
            .unwrap();
        assert!(!cache.is_empty());

        corpus.discard().await.unwrap();

        assert!(cache.is_empty());
    }
}
