//! Topic resolution.
//!
//! Maps free-form user text and encyclopedia link URLs onto canonical
//! [`Topic`] identifiers, and topics back onto the URLs that serve them.
//! Everything here is pure.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Suffix appended to a topic stem to form its cache key.
pub const CACHE_SUFFIX: &str = ".txt";

lazy_static! {
    static ref SEPARATOR: Regex = Regex::new(r"[_\s]+").unwrap();
    static ref PARENS_AND_ESCAPES: Regex = Regex::new(r"[()]|%(?:[A-Z]|\d){2}").unwrap();
    static ref PARENS: Regex = Regex::new(r"[()]").unwrap();
    static ref DOUBLED_UNDERSCORE: Regex = Regex::new(r"_{2,}").unwrap();
    static ref TAG: Regex = Regex::new(r"(?s)<[^>]*>").unwrap();
}

/// Canonical identifier for one document.
///
/// Two inputs that canonicalize to the same string denote the same topic.
/// Ordering is plain lexicographic order of the identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Topic(String);

impl Topic {
    /// Wrap an already-canonical identifier without rewriting it.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Derive the topic a link URL points at (see [`topic_stem_for_url`]).
    pub fn from_url(url: &str) -> Self {
        Self(topic_stem_for_url(url))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }

    /// Cache key under which this topic's cleaned text is stored.
    pub fn cache_key(&self) -> String {
        format!("{}{}", self.0, CACHE_SUFFIX)
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Topic {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Topic {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Topic {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for Topic {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Canonicalize free-form text into a topic.
///
/// The text is split on runs of whitespace and underscores, each component
/// is capitalized (first letter upper case, the rest lower case) and the
/// components are joined with underscores:
///
/// ```
/// use topic_corpus::topic::canonicalize;
///
/// assert_eq!(canonicalize("the house of representatives").as_str(), "The_House_Of_Representatives");
/// assert_eq!(canonicalize("clive_owen").as_str(), "Clive_Owen");
/// ```
///
/// Empty input yields an empty topic; rejecting it is the caller's job.
pub fn canonicalize(raw: &str) -> Topic {
    let id = SEPARATOR
        .split(raw.trim())
        .filter(|part| !part.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join("_");
    Topic(id)
}

/// Canonical URL for a topic: the base URL with the topic appended.
pub fn url_for(base_url: &str, topic: &Topic) -> String {
    format!("{}{}", base_url, topic.as_str())
}

/// Topic stem for a URL: the last path segment with query and anchor
/// stripped, parentheses and percent-escapes dropped and doubled
/// underscores collapsed.
pub fn topic_stem_for_url(url: &str) -> String {
    let without_anchor = url.split('#').next().unwrap_or_default();
    let without_query = without_anchor.split('?').next().unwrap_or_default();
    let suffix = without_query.rsplit('/').next().unwrap_or_default();
    let stripped = PARENS_AND_ESCAPES.replace_all(suffix, "");
    DOUBLED_UNDERSCORE.replace_all(&stripped, "_").into_owned()
}

/// Cache key for a URL (the topic stem plus [`CACHE_SUFFIX`]).
pub fn cache_key_for_url(url: &str) -> String {
    format!("{}{}", topic_stem_for_url(url), CACHE_SUFFIX)
}

/// Clean a section heading into a section name.
///
/// Markup is stripped, the text is canonicalized like a topic, then
/// parentheses are removed, doubled underscores collapsed and en-dashes
/// replaced with underscores.
pub fn section_title(raw_heading: &str) -> String {
    let text = TAG.replace_all(raw_heading, " ");
    let text = text.replace("&amp;", "&").replace("&#160;", " ").replace("&nbsp;", " ");
    let title = canonicalize(&text).into_inner();
    let title = PARENS.replace_all(&title, "").replace('\u{2013}', "_");
    DOUBLED_UNDERSCORE.replace_all(&title, "_").into_owned()
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
