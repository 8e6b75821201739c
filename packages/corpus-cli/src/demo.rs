//! Scripted demonstration of every corpus and analyzer operation.

use anyhow::Result;
use colored::Colorize;

use topic_corpus::{AnalyzerConfig, Corpus, Selector, Topic, TopicAnalyzer, INTRODUCTION};

use crate::commands;
use crate::config::CliConfig;
use crate::output;

const TOP_N: usize = 30;

pub async fn run(
    config: &CliConfig,
    topic: &str,
    sections: Vec<String>,
    second_topic: Option<String>,
) -> Result<()> {
    output::header(&format!("Corpus for '{}'", topic));
    let corpus = commands::open_corpus(config, topic).await?;
    println!("Root topic is {}", corpus.root_topic().as_str().bold());
    println!("Seed page: {}", corpus.seed_url());

    commands::sections(&corpus);
    commands::topics(&corpus, Selector::All)?;

    let sections = if sections.is_empty() {
        default_sections(&corpus)
    } else {
        sections
    };
    if sections.is_empty() {
        output::warning("The seed page has no sections besides the introduction.");
        return Ok(());
    }

    output::header(&format!("Topics for sections {:?}", sections));
    output::list(corpus.topics(Selector::Many(sections.clone()))?);

    let first = sections[0].clone();
    output::header(&format!("File ids for section '{}'", first));
    output::list(corpus.file_ids(Selector::one(first.as_str()))?);

    output::header(&format!("Raw text for section '{}'", first));
    println!("{}", corpus.raw_text(Selector::All, Selector::one(first.as_str())).await?);

    if let Some(topic) = corpus.topics(Selector::one(first.as_str()))?.first() {
        output::header(&format!("First 100 words of '{}'", topic));
        let words = corpus.words(Selector::One(topic.clone()), Selector::All).await?;
        output::list(words.iter().take(100));
    }

    if let Some(second) = second_topic {
        output::header(&format!("New corpus with topic '{}'", second));
        match commands::open_corpus(config, &second).await {
            Ok(other) => output::list(other.sections()),
            Err(e) => output::warning(e),
        }
    }

    output::header("First 200 topic-tagged words for the introduction");
    let intro = corpus.tagged_words(Selector::All, Selector::one(INTRODUCTION)).await?;
    output::list(intro.iter().take(200).map(|(w, t)| format!("({}, {})", w, t)));

    analyze(&corpus, sections).await?;
    commands::report_invalid(&corpus);
    Ok(())
}

async fn analyze(corpus: &Corpus, sections: Vec<String>) -> Result<()> {
    output::header(&format!("Analyzer over sections {:?}", sections));
    let stream = corpus.tagged_words(Selector::All, Selector::Many(sections)).await?;
    let analyzer = TopicAnalyzer::new(&stream, &AnalyzerConfig::default());

    output::header("Topics in the analyzer");
    output::list(analyzer.topics());

    output::header(&format!("Top {} most frequent words among all topics", TOP_N));
    output::counts(&analyzer.most_frequent_words(TOP_N, &Selector::All));

    // Pairwise queries use the first two topics in the stream.
    let pair: Vec<Topic> = analyzer.topics().take(2).cloned().collect();
    if pair.len() < 2 {
        output::warning("Fewer than two usable topics; skipping pairwise queries.");
        return Ok(());
    }
    let selection = Selector::Many(pair.clone());
    let names: Vec<&str> = pair.iter().map(Topic::as_str).collect();

    output::header(&format!("Top {} most frequent words by topic for {:?}", TOP_N, names));
    for (topic, counts) in analyzer.most_frequent_words_by_topic(TOP_N, &selection) {
        println!("{}", topic.as_str().bold());
        output::counts(&counts);
    }

    output::header(&format!("Top {} most frequent terms for {:?}", TOP_N, names));
    output::counts(&analyzer.most_frequent_terms(TOP_N, &selection));

    output::header(&format!("Top {} most frequent terms by topic for {:?}", TOP_N, names));
    for (topic, counts) in analyzer.most_frequent_terms_by_topic(TOP_N, &selection) {
        println!("{}", topic.as_str().bold());
        output::counts(&counts);
    }

    let sample: Vec<&str> = analyzer
        .most_frequent_words(2, &Selector::All)
        .into_iter()
        .map(|(word, _)| word)
        .collect();
    output::header(&format!("Topics containing the words {:?}", sample));
    output::list(analyzer.topics_containing_words(sample.as_slice()));

    output::header(&format!("Common words between topics {:?}", names));
    output::list(analyzer.common_words_between_topics(&selection));

    Ok(())
}

/// Up to three sections after the introduction.
fn default_sections(corpus: &Corpus) -> Vec<String> {
    corpus
        .sections()
        .into_iter()
        .filter(|s| *s != INTRODUCTION)
        .take(3)
        .map(String::from)
        .collect()
}
