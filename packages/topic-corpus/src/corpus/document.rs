//! Per-document state machine.
//!
//! `Discovered -> Materialized | Invalid`. Both outcomes are terminal.

use std::fmt;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Why a document was excluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidReason {
    /// The fetch failed.
    Unreachable,
    /// Disambiguation page or non-article page.
    NotAnArticle,
    /// The page did not match the document template.
    MalformedContent,
}

impl fmt::Display for InvalidReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            InvalidReason::Unreachable => "unreachable",
            InvalidReason::NotAnArticle => "not an article",
            InvalidReason::MalformedContent => "malformed content",
        };
        f.write_str(s)
    }
}

/// Where a document is in its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentState {
    /// URL known, not fetched yet.
    Discovered,
    /// Cleaned text available.
    Materialized(Arc<str>),
    /// Excluded for the lifetime of the corpus.
    Invalid(InvalidReason),
}

impl DocumentState {
    pub fn is_materialized(&self) -> bool {
        matches!(self, DocumentState::Materialized(_))
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self, DocumentState::Invalid(_))
    }
}

/// One document's URL, cache key and guarded state.
///
/// The mutex is held across the whole fetch, so concurrent requests for
/// the same topic wait for the first one and then see its outcome.
#[derive(Debug)]
pub(crate) struct DocumentSlot {
    pub url: String,
    pub key: String,
    pub state: Mutex<DocumentState>,
}

impl DocumentSlot {
    pub fn discovered(url: String, key: String) -> Self {
        Self {
            url,
            key,
            state: Mutex::new(DocumentState::Discovered),
        }
    }

    pub fn materialized(url: String, key: String, text: Arc<str>) -> Self {
        Self {
            url,
            key,
            state: Mutex::new(DocumentState::Materialized(text)),
        }
    }
}
