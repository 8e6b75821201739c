//! Scripted subcommands.

use anyhow::{Context, Result};
use colored::Colorize;
use serde_json::json;
use tracing::info;

use topic_corpus::{
    AnalyzerConfig, Corpus, CorpusBuilder, FileCache, HttpFetcher, SectionSelector, Selector,
    TopicAnalyzer,
};

use crate::config::CliConfig;
use crate::output;

/// Open a corpus cached under the topic's own folder.
pub async fn open_corpus(config: &CliConfig, topic: &str) -> Result<Corpus> {
    let corpus_config = config.corpus_config();
    let fetcher = HttpFetcher::from_config(&corpus_config).context("Failed to build HTTP client")?;
    let cache_dir = config.cache_dir_for(topic);

    info!(topic, cache_dir = %cache_dir.display(), "Opening corpus");

    let corpus = CorpusBuilder::new(fetcher, FileCache::new(cache_dir))
        .config(corpus_config)
        .open(topic)
        .await?;
    Ok(corpus)
}

/// `--section` flags as a selector: none means every section.
pub fn section_selector(mut names: Vec<String>) -> SectionSelector {
    match names.len() {
        0 => Selector::All,
        1 => names.pop().map_or(Selector::All, Selector::One),
        _ => Selector::Many(names),
    }
}

pub fn sections(corpus: &Corpus) {
    output::header(&format!("Sections of '{}'", corpus.root_topic()));
    output::list(corpus.sections());
}

pub fn topics(corpus: &Corpus, sections: SectionSelector) -> Result<()> {
    let topics = corpus.topics(sections)?;
    output::header(&format!("Topics ({})", topics.len()));
    output::list(topics);
    Ok(())
}

pub fn files(corpus: &Corpus, sections: SectionSelector) -> Result<()> {
    let file_ids = corpus.file_ids(sections)?;
    output::header(&format!("File ids ({})", file_ids.len()));
    output::list(file_ids);
    Ok(())
}

pub async fn raw(corpus: &Corpus, sections: SectionSelector) -> Result<()> {
    let text = corpus.raw_text(Selector::All, sections).await?;
    output::header("Raw text");
    println!("{}", text);
    report_invalid(corpus);
    Ok(())
}

pub async fn words(corpus: &Corpus, sections: SectionSelector, limit: usize, tagged: bool) -> Result<()> {
    if tagged {
        let words = corpus.tagged_words(Selector::All, sections).await?;
        output::header(&format!("First {} topic-tagged words", limit));
        output::list(
            words
                .iter()
                .take(limit)
                .map(|(word, topic)| format!("({}, {})", word, topic.as_str().dimmed())),
        );
    } else {
        let words = corpus.words(Selector::All, sections).await?;
        output::header(&format!("First {} words", limit));
        output::list(words.iter().take(limit));
    }
    report_invalid(corpus);
    Ok(())
}

pub async fn analyze(
    corpus: &Corpus,
    sections: SectionSelector,
    n: usize,
    words: Vec<String>,
    as_json: bool,
) -> Result<()> {
    let stream = corpus.tagged_words(Selector::All, sections).await?;
    let analyzer = TopicAnalyzer::new(&stream, &AnalyzerConfig::default());

    let topics: Vec<&str> = analyzer.topics().map(|t| t.as_str()).collect();
    let frequent = analyzer.most_frequent_words(n, &Selector::All);
    let terms = analyzer.most_frequent_terms(n, &Selector::All);
    let common = analyzer.common_words_between_topics(&Selector::All);
    let containing = analyzer.topics_containing_words(words.as_slice());

    if as_json {
        let report = json!({
            "root_topic": corpus.root_topic(),
            "topics": topics,
            "most_frequent_words": frequent,
            "most_frequent_terms": terms,
            "common_words": common,
            "words": words,
            "topics_containing_words": containing,
            "invalid_topics": corpus.invalid_topics(),
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    output::header(&format!("Topics in the analyzer ({})", topics.len()));
    output::list(&topics);
    output::header(&format!("Top {} most frequent words", n));
    output::counts(&frequent);
    output::header(&format!("Top {} most frequent terms", n));
    output::counts(&terms);
    output::header("Words common to every topic");
    output::list(&common);
    if !words.is_empty() {
        output::header(&format!("Topics containing {:?}", words));
        output::list(containing);
    }
    report_invalid(corpus);
    Ok(())
}

/// Note documents that were skipped.
pub fn report_invalid(corpus: &Corpus) {
    let invalid = corpus.invalid_topics();
    if !invalid.is_empty() {
        output::warning(format!("{} linked documents were skipped as invalid", invalid.len()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_selector_from_flags() {
        assert_eq!(section_selector(vec![]), Selector::All);
        assert_eq!(
            section_selector(vec!["History".to_string()]),
            Selector::One("History".to_string())
        );
        assert_eq!(
            section_selector(vec!["A".to_string(), "B".to_string()]),
            Selector::Many(vec!["A".to_string(), "B".to_string()])
        );
    }
}
