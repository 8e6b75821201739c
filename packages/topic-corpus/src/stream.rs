//! Topic-tagged word stream.
//!
//! [`TaggedWords`] holds the cleaned text of an already materialized
//! selection and tokenizes it on demand, one document at a time. Iterating
//! consumes nothing, so the same value can be walked repeatedly or handed
//! to several consumers.

use std::fmt;
use std::sync::Arc;

use crate::tokenizer::Tokenizer;
use crate::topic::Topic;

/// A finite, re-iterable sequence of `(word, topic)` pairs.
#[derive(Clone)]
pub struct TaggedWords {
    documents: Vec<(Topic, Arc<str>)>,
    tokenizer: Arc<dyn Tokenizer>,
}

impl TaggedWords {
    pub fn new(documents: Vec<(Topic, Arc<str>)>, tokenizer: Arc<dyn Tokenizer>) -> Self {
        Self {
            documents,
            tokenizer,
        }
    }

    /// Pairs in document order, tokenized lazily.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Topic)> + '_ {
        self.documents.iter().flat_map(move |(topic, text)| {
            self.tokenizer
                .tokens(text)
                .map(move |word| (word, topic))
        })
    }

    /// Topics in stream order.
    pub fn topics(&self) -> impl Iterator<Item = &Topic> + '_ {
        self.documents.iter().map(|(topic, _)| topic)
    }

    /// Number of documents (not words).
    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Owned copy of every pair.
    pub fn to_pairs(&self) -> Vec<(String, Topic)> {
        self.iter()
            .map(|(word, topic)| (word.to_string(), topic.clone()))
            .collect()
    }
}

impl<'a> IntoIterator for &'a TaggedWords {
    type Item = (&'a str, &'a Topic);
    type IntoIter = Box<dyn Iterator<Item = (&'a str, &'a Topic)> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}

impl fmt::Debug for TaggedWords {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaggedWords")
            .field("topics", &self.topics().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::WordPunctTokenizer;

    fn stream() -> TaggedWords {
        TaggedWords::new(
            vec![
                (Topic::new("T1"), Arc::from("Data mining")),
                (Topic::new("T2"), Arc::from("Data")),
            ],
            Arc::new(WordPunctTokenizer),
        )
    }

    #[test]
    fn test_pairs_in_document_order() {
        let words = stream();
        let pairs: Vec<_> = words.iter().map(|(w, t)| (w, t.as_str())).collect();
        assert_eq!(pairs, vec![("Data", "T1"), ("mining", "T1"), ("Data", "T2")]);
    }

    #[test]
    fn test_reiterable() {
        let words = stream();
        assert_eq!(words.iter().count(), 3);
        assert_eq!(words.iter().count(), 3);
        assert_eq!((&words).into_iter().count(), 3);
        assert_eq!(words.document_count(), 2);
    }

    #[test]
    fn test_empty_stream() {
        let words = TaggedWords::new(Vec::new(), Arc::new(WordPunctTokenizer));
        assert!(words.is_empty());
        assert_eq!(words.iter().count(), 0);
    }
}
