//! Word tokenization of cleaned document text.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref WORD_OR_PUNCT: Regex = Regex::new(r"\w+|[^\w\s]+").unwrap();
}

/// Splits cleaned text into word tokens.
pub trait Tokenizer: Send + Sync {
    /// Tokens of `text`, in order. Implementations should be lazy.
    fn tokens<'a>(&'a self, text: &'a str) -> Box<dyn Iterator<Item = &'a str> + 'a>;
}

/// Splits text into runs of word characters and runs of punctuation,
/// so `"it's 3.5"` becomes `it`, `'`, `s`, `3`, `.`, `5`.
#[derive(Debug, Clone, Copy, Default)]
pub struct WordPunctTokenizer;

impl Tokenizer for WordPunctTokenizer {
    fn tokens<'a>(&'a self, text: &'a str) -> Box<dyn Iterator<Item = &'a str> + 'a> {
        Box::new(WORD_OR_PUNCT.find_iter(text).map(|m| m.as_str()))
    }
}

/// Splits on whitespace only.
#[derive(Debug, Clone, Copy, Default)]
pub struct WhitespaceTokenizer;

impl Tokenizer for WhitespaceTokenizer {
    fn tokens<'a>(&'a self, text: &'a str) -> Box<dyn Iterator<Item = &'a str> + 'a> {
        Box::new(text.split_whitespace())
    }
}
