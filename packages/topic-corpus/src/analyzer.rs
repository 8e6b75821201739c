//! Word/topic frequency analysis.
//!
//! A [`TopicAnalyzer`] is built once from a finite `(word, topic)` sequence
//! and is read-only afterwards. Words keep their original case; stopwords,
//! punctuation tokens and single alphanumeric characters are dropped while
//! building.

use indexmap::{IndexMap, IndexSet};
use std::collections::{BTreeMap, BTreeSet, HashSet};

use crate::config::AnalyzerConfig;
use crate::corpus::TopicSelector;
use crate::topic::Topic;

/// Sparse word x topic occurrence matrix.
///
/// Every stored count is at least 1; a missing topic means zero.
#[derive(Debug, Clone)]
pub struct TopicAnalyzer {
    topics: IndexSet<Topic>,
    // word -> topic index -> count
    matrix: IndexMap<String, BTreeMap<usize, usize>>,
    term_threshold: usize,
}

impl TopicAnalyzer {
    /// Count every `(word, topic)` pair that survives filtering.
    ///
    /// ```
    /// use topic_corpus::{AnalyzerConfig, Selector, TopicAnalyzer};
    ///
    /// let analyzer = TopicAnalyzer::new(
    ///     [("Data", "T1"), ("Data", "T1"), ("Data", "T2"), ("the", "T1")],
    ///     &AnalyzerConfig::default(),
    /// );
    /// assert_eq!(analyzer.most_frequent_words(1, &Selector::All), vec![("Data", 3)]);
    /// ```
    pub fn new<I, W, T>(pairs: I, config: &AnalyzerConfig) -> Self
    where
        I: IntoIterator<Item = (W, T)>,
        W: AsRef<str>,
        T: AsRef<str>,
    {
        let mut topics: IndexSet<Topic> = IndexSet::new();
        let mut matrix: IndexMap<String, BTreeMap<usize, usize>> = IndexMap::new();

        for (word, topic) in pairs {
            let (word, topic) = (word.as_ref(), topic.as_ref());
            // A topic exists only through the words it contributes.
            if is_filtered(word, config) {
                continue;
            }
            let topic_idx = match topics.get_index_of(topic) {
                Some(idx) => idx,
                None => topics.insert_full(Topic::new(topic)).0,
            };
            match matrix.get_mut(word) {
                Some(counts) => *counts.entry(topic_idx).or_insert(0) += 1,
                None => {
                    matrix.insert(word.to_string(), BTreeMap::from([(topic_idx, 1)]));
                }
            }
        }

        Self {
            topics,
            matrix,
            term_threshold: config.term_threshold,
        }
    }

    /// Topics in first-seen order.
    pub fn topics(&self) -> impl ExactSizeIterator<Item = &Topic> + '_ {
        self.topics.iter()
    }

    /// Number of distinct counted words.
    pub fn vocabulary_len(&self) -> usize {
        self.matrix.len()
    }

    /// Occurrences of `word` in `topic`.
    pub fn count(&self, word: &str, topic: &str) -> usize {
        let Some(idx) = self.topics.get_index_of(topic) else {
            return 0;
        };
        self.matrix
            .get(word)
            .and_then(|counts| counts.get(&idx))
            .copied()
            .unwrap_or(0)
    }

    /// Topics `word` occurs in, in first-seen order.
    pub fn topics_of_word(&self, word: &str) -> Vec<&Topic> {
        self.matrix
            .get(word)
            .map(|counts| counts.keys().filter_map(|&i| self.topics.get_index(i)).collect())
            .unwrap_or_default()
    }

    /// Top `n` words by occurrences summed over the selected topics.
    pub fn most_frequent_words(&self, n: usize, topics: &TopicSelector) -> Vec<(&str, usize)> {
        let selected = self.selected(topics);
        top_n(self.totals(selected.as_ref()), n)
    }

    /// Top `n` words of each selected topic, counted per topic.
    pub fn most_frequent_words_by_topic(
        &self,
        n: usize,
        topics: &TopicSelector,
    ) -> IndexMap<Topic, Vec<(&str, usize)>> {
        self.per_topic(topics, |idx| top_n(self.totals_for(idx), n))
    }

    /// Top `n` capitalized words occurring more than the term threshold,
    /// summed over the selected topics.
    pub fn most_frequent_terms(&self, n: usize, topics: &TopicSelector) -> Vec<(&str, usize)> {
        let selected = self.selected(topics);
        top_n(self.terms(self.totals(selected.as_ref())), n)
    }

    /// Per-topic version of [`most_frequent_terms`](Self::most_frequent_terms).
    pub fn most_frequent_terms_by_topic(
        &self,
        n: usize,
        topics: &TopicSelector,
    ) -> IndexMap<Topic, Vec<(&str, usize)>> {
        self.per_topic(topics, |idx| top_n(self.terms(self.totals_for(idx)), n))
    }

    /// Sorted topics containing every one of `words`.
    ///
    /// A word that never occurs matches no topic, so it empties the result.
    pub fn topics_containing_words<S: AsRef<str>>(&self, words: &[S]) -> Vec<Topic> {
        let mut words = words.iter();
        let Some(first) = words.next() else {
            return Vec::new();
        };

        let mut candidates = self.topic_set(first.as_ref());
        for word in words {
            if candidates.is_empty() {
                break;
            }
            let topics = self.topic_set(word.as_ref());
            candidates.retain(|idx| topics.contains(idx));
        }

        let sorted: BTreeSet<&Topic> = candidates
            .into_iter()
            .filter_map(|idx| self.topics.get_index(idx))
            .collect();
        sorted.into_iter().cloned().collect()
    }

    /// Sorted words occurring in every selected topic (every known topic
    /// for [`Selector::All`](crate::Selector::All)).
    pub fn common_words_between_topics(&self, topics: &TopicSelector) -> Vec<&str> {
        let required: Vec<usize> = match topics.items() {
            None => (0..self.topics.len()).collect(),
            Some(named) => {
                let mut required = Vec::with_capacity(named.len());
                for topic in named {
                    match self.topics.get_index_of(topic) {
                        Some(idx) => required.push(idx),
                        // No word occurs in a topic that was never seen.
                        None => return Vec::new(),
                    }
                }
                required
            }
        };

        let mut words: Vec<&str> = self
            .matrix
            .iter()
            .filter(|(_, counts)| required.iter().all(|idx| counts.contains_key(idx)))
            .map(|(word, _)| word.as_str())
            .collect();
        words.sort_unstable();
        words
    }

    /// Indices of the selected topics; `None` means all of them.
    fn selected(&self, topics: &TopicSelector) -> Option<HashSet<usize>> {
        topics.items().map(|named| {
            named
                .iter()
                .filter_map(|topic| self.topics.get_index_of(topic))
                .collect()
        })
    }

    /// Non-zero totals over the selected topics, in first-seen word order.
    fn totals(&self, selected: Option<&HashSet<usize>>) -> Vec<(&str, usize)> {
        self.matrix
            .iter()
            .map(|(word, counts)| {
                let total = counts
                    .iter()
                    .filter(|(idx, _)| selected.map_or(true, |s| s.contains(*idx)))
                    .map(|(_, count)| count)
                    .sum::<usize>();
                (word.as_str(), total)
            })
            .filter(|(_, total)| *total > 0)
            .collect()
    }

    fn totals_for(&self, idx: usize) -> Vec<(&str, usize)> {
        self.matrix
            .iter()
            .filter_map(|(word, counts)| counts.get(&idx).map(|&count| (word.as_str(), count)))
            .collect()
    }

    fn terms<'a>(&self, totals: Vec<(&'a str, usize)>) -> Vec<(&'a str, usize)> {
        totals
            .into_iter()
            .filter(|(word, total)| is_capitalized(word) && *total > self.term_threshold)
            .collect()
    }

    fn topic_set(&self, word: &str) -> HashSet<usize> {
        self.matrix
            .get(word)
            .map(|counts| counts.keys().copied().collect())
            .unwrap_or_default()
    }

    fn per_topic<'a, F>(&'a self, topics: &TopicSelector, rank: F) -> IndexMap<Topic, Vec<(&'a str, usize)>>
    where
        F: Fn(usize) -> Vec<(&'a str, usize)>,
    {
        let indices: Vec<usize> = match topics.items() {
            None => (0..self.topics.len()).collect(),
            Some(named) => named
                .iter()
                .filter_map(|topic| self.topics.get_index_of(topic))
                .collect(),
        };

        indices
            .into_iter()
            .filter_map(|idx| {
                self.topics
                    .get_index(idx)
                    .map(|topic| (topic.clone(), rank(idx)))
            })
            .collect()
    }
}

/// Stopwords, excluded tokens and single alphanumeric characters.
fn is_filtered(word: &str, config: &AnalyzerConfig) -> bool {
    let mut chars = word.chars();
    match (chars.next(), chars.next()) {
        (None, _) => return true,
        (Some(c), None) if c.is_alphanumeric() => return true,
        _ => {}
    }
    let lower = word.to_lowercase();
    config.stopwords.contains(&lower) || config.excluded_tokens.contains(&lower)
}

fn is_capitalized(word: &str) -> bool {
    word.chars().next().is_some_and(char::is_uppercase)
}

/// Stable sort by descending count, so ties keep first-seen order.
fn top_n(mut totals: Vec<(&str, usize)>, n: usize) -> Vec<(&str, usize)> {
    totals.sort_by(|a, b| b.1.cmp(&a.1));
    totals.truncate(n);
    totals
}
