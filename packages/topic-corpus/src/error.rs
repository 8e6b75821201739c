//! Typed errors for the corpus library.
//!
//! Uses `thiserror` for library errors (not `anyhow`) to provide
//! strongly-typed, composable error handling.

use thiserror::Error;

use crate::topic::Topic;

/// Errors surfaced by corpus construction and queries.
#[derive(Debug, Error)]
pub enum CorpusError {
    /// The seed topic could not be turned into a valid seed document.
    #[error("could not resolve topic {topic}: {reason}")]
    UnresolvedTopic {
        topic: Topic,
        reason: UnresolvedReason,
    },

    /// A section name that discovery never produced
    #[error("section not found: {section}")]
    UnknownSection { section: String },

    /// A topic that discovery never produced
    #[error("topic not found: {topic}")]
    UnknownTopic { topic: Topic },

    /// The configured base URL is not an absolute URL with a host
    #[error("invalid base URL: {url}")]
    InvalidBaseUrl { url: String },

    /// Both a topic selector and a section selector were supplied
    #[error("specify topics or sections, not both")]
    ConflictingSelector,

    /// Page markup does not match the expected document template
    #[error(transparent)]
    ContentShape(#[from] ContentShapeError),

    /// Cache storage failed
    #[error("cache error: {0}")]
    Cache(#[from] CacheError),

    /// A configured pattern failed to compile
    #[error("invalid pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Why a seed topic could not be resolved.
#[derive(Debug, Error)]
pub enum UnresolvedReason {
    #[error("unreachable ({0})")]
    Unreachable(#[source] FetchError),

    #[error("disambiguation or non-article page")]
    NotAnArticle,

    #[error("unexpected page layout ({0})")]
    MalformedContent(#[source] ContentShapeError),
}

/// The page body could not be located.
#[derive(Debug, Error)]
#[error("page does not match the document template: missing {marker}")]
pub struct ContentShapeError {
    pub marker: String,
}

/// Errors that can occur while fetching a page.
#[derive(Debug, Error)]
pub enum FetchError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Non-success status code
    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    /// Invalid URL format
    #[error("invalid URL: {url}")]
    InvalidUrl { url: String },

    /// Connection timeout
    #[error("timeout fetching: {url}")]
    Timeout { url: String },
}

/// Errors from cache storage.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache I/O failed for {key}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("no cached entry for {key}")]
    Missing { key: String },
}

/// Result type alias for corpus operations.
pub type Result<T> = std::result::Result<T, CorpusError>;

/// Result type alias for fetch operations.
pub type FetchResult<T> = std::result::Result<T, FetchError>;

/// Result type alias for cache operations.
pub type CacheResult<T> = std::result::Result<T, CacheError>;
