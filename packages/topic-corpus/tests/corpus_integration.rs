//! Integration tests for corpus acquisition.
//!
//! These tests drive the public API against a mock fetcher:
//! 1. Open a corpus from a seed page
//! 2. Materialize selections lazily
//! 3. Stream tagged words into the analyzer

use std::sync::Arc;

use proptest::prelude::*;
use topic_corpus::{
    AnalyzerConfig, CorpusBuilder, CorpusConfig, CorpusError, FileCache, MemoryCache,
    MockFetcher, PageFixture, PolitenessConfig, Selector, Topic, TopicAnalyzer, UnresolvedReason,
};

const BASE: &str = "http://en.wikipedia.org/wiki/";

fn url(topic: &str) -> String {
    format!("{}{}", BASE, topic)
}

fn test_config() -> CorpusConfig {
    CorpusConfig::new()
        .with_base_url(BASE)
        .with_politeness(PolitenessConfig::none())
}

/// Seed "Data_Mining": the introduction links X and Y, "Background" links Z.
fn data_mining_fetcher() -> Arc<MockFetcher> {
    let seed = PageFixture::article("Data_Mining")
        .intro("Data mining finds patterns in data.", &["X", "Y"])
        .section("Background", "Statistics came first.", &["Z"]);

    Arc::new(
        MockFetcher::new()
            .with_fixture(BASE, &seed)
            .with_fixture(BASE, &PageFixture::article("X").intro("Xylophone music", &[]))
            .with_fixture(BASE, &PageFixture::article("Y").intro("Yodel music", &[]))
            .with_fixture(
                BASE,
                &PageFixture::article("Z").intro("Zebra Zebra Zebra stripes", &[]),
            ),
    )
}

#[tokio::test]
async fn test_background_section_fetches_only_its_documents() {
    let fetcher = data_mining_fetcher();
    let cache = Arc::new(MemoryCache::new());
    let corpus = CorpusBuilder::new(fetcher.clone(), cache.clone())
        .config(test_config())
        .open("data mining")
        .await
        .unwrap();

    let done = corpus
        .materialize(Selector::All, Selector::one("Background"))
        .await
        .unwrap();

    assert_eq!(done, vec![Topic::new("Z")]);
    assert_eq!(fetcher.calls(), vec![url("Data_Mining"), url("Z")]);
    assert_eq!(fetcher.calls_for(&url("X")), 0);
    assert_eq!(fetcher.calls_for(&url("Y")), 0);
    assert_eq!(cache.keys(), vec!["Data_Mining.txt", "Z.txt"]);
    assert_eq!(
        corpus.topics(Selector::one("Background")).unwrap(),
        vec![Topic::new("Z")]
    );
}

#[tokio::test]
async fn test_disambiguation_seed_fails_regardless_of_content() {
    let seed = PageFixture::disambiguation("Mercury")
        .intro("Mercury may refer to", &["Mercury_(planet)", "Mercury_(element)"])
        .section("Science", "Lots of real content here.", &["Astronomy"]);
    let fetcher = MockFetcher::new().with_fixture(BASE, &seed);

    let err = CorpusBuilder::new(fetcher, MemoryCache::new())
        .config(test_config())
        .open("Mercury")
        .await
        .unwrap_err();

    match err {
        CorpusError::UnresolvedTopic { topic, reason } => {
            assert_eq!(topic, Topic::new("Mercury"));
            assert!(matches!(reason, UnresolvedReason::NotAnArticle));
        }
        other => panic!("expected UnresolvedTopic, got {other:?}"),
    }
}

#[tokio::test]
async fn test_second_materialize_performs_no_fetch() {
    let fetcher = data_mining_fetcher();
    let corpus = CorpusBuilder::new(fetcher.clone(), MemoryCache::new())
        .config(test_config())
        .open("data mining")
        .await
        .unwrap();

    let first = corpus.materialize(Selector::All, Selector::All).await.unwrap();
    let after_first = fetcher.total_calls();
    let second = corpus.materialize(Selector::All, Selector::All).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(after_first, 4);
    assert_eq!(fetcher.total_calls(), after_first);
}

#[tokio::test]
async fn test_file_cache_survives_a_second_corpus() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("Data_Mining");

    let first_fetcher = data_mining_fetcher();
    let corpus = CorpusBuilder::new(first_fetcher.clone(), FileCache::new(&root))
        .config(test_config())
        .open("data mining")
        .await
        .unwrap();
    corpus
        .materialize(Selector::All, Selector::one("Introduction"))
        .await
        .unwrap();
    assert!(root.join("X.txt").is_file());

    // A fresh corpus over the same directory reads X and Y from disk.
    let second_fetcher = data_mining_fetcher();
    let corpus = CorpusBuilder::new(second_fetcher.clone(), FileCache::new(&root))
        .config(test_config())
        .open("data mining")
        .await
        .unwrap();
    let text = corpus
        .raw_text(Selector::All, Selector::one("Introduction"))
        .await
        .unwrap();

    assert_eq!(text, "Xylophone music\nYodel music");
    assert_eq!(second_fetcher.calls(), vec![url("Data_Mining")]);

    corpus.discard().await.unwrap();
    assert!(!root.exists());
}

#[tokio::test]
async fn test_tagged_words_feed_the_analyzer() {
    let corpus = CorpusBuilder::new(data_mining_fetcher(), MemoryCache::new())
        .config(test_config())
        .open("data mining")
        .await
        .unwrap();

    let words = corpus.tagged_words(Selector::All, Selector::All).await.unwrap();
    let analyzer = TopicAnalyzer::new(&words, &AnalyzerConfig::default());

    let topics: Vec<_> = analyzer.topics().map(Topic::as_str).collect();
    assert_eq!(topics, vec!["X", "Y", "Z"]);
    assert_eq!(
        analyzer.most_frequent_words(1, &Selector::All),
        vec![("Zebra", 3)]
    );
    assert_eq!(
        analyzer.most_frequent_terms(5, &Selector::All),
        vec![("Zebra", 3)]
    );
    assert_eq!(
        analyzer.topics_containing_words(&["music"]),
        vec![Topic::new("X"), Topic::new("Y")]
    );
    assert_eq!(
        analyzer.common_words_between_topics(&Selector::many(["X", "Y"])),
        vec!["music"]
    );

    // The stream is re-iterable: a second analyzer sees the same pairs.
    let again = TopicAnalyzer::new(&words, &AnalyzerConfig::default());
    assert_eq!(again.vocabulary_len(), analyzer.vocabulary_len());
}

#[tokio::test]
async fn test_concurrent_materialization_keeps_order() {
    let fetcher = data_mining_fetcher();
    let corpus = CorpusBuilder::new(fetcher.clone(), MemoryCache::new())
        .config(test_config().with_max_concurrent_fetches(3))
        .open("data mining")
        .await
        .unwrap();

    let done = corpus
        .materialize(Selector::many(["Z", "X", "Y"]), Selector::All)
        .await
        .unwrap();

    assert_eq!(
        done,
        vec![Topic::new("Z"), Topic::new("X"), Topic::new("Y")]
    );
    assert_eq!(fetcher.total_calls(), 4);
}

const POOL: &[&str] = &["Alpha", "Beta", "Gamma", "Delta", "Epsilon", "Zeta"];

fn seed_with_sections(sections: &[Vec<usize>]) -> PageFixture {
    let mut seed = PageFixture::article("Seed");
    for (i, links) in sections.iter().enumerate() {
        let links: Vec<&str> = links.iter().map(|&l| POOL[l]).collect();
        seed = if i == 0 {
            seed.intro("Opening text", &links)
        } else {
            seed.section(&format!("Part {}", i), "Section text", &links)
        };
    }
    seed
}

proptest! {
    #[test]
    fn prop_every_topic_belongs_to_a_section(
        sections in prop::collection::vec(
            prop::collection::vec(0..POOL.len(), 0..4),
            1..5,
        )
    ) {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        runtime.block_on(async {
            let fetcher = MockFetcher::new().with_fixture(BASE, &seed_with_sections(&sections));
            let corpus = CorpusBuilder::new(fetcher, MemoryCache::new())
                .config(test_config())
                .open("seed")
                .await
                .unwrap();

            let all = corpus.topics(Selector::All).unwrap();
            let mut union: Vec<Topic> = Vec::new();
            for section in corpus.sections() {
                for topic in corpus.topics(Selector::one(section)).unwrap() {
                    if !union.contains(&topic) {
                        union.push(topic);
                    }
                }
            }
            union.sort();

            for topic in &all {
                prop_assert!(union.contains(topic), "{} belongs to no section", topic);
            }
            prop_assert_eq!(all, union);
            Ok(())
        })?;
    }
}
