//! Collaborator traits.
//!
//! - [`fetcher::PageFetcher`] - network access (fetch a page by URL)
//! - [`cache::DocumentCache`] - storage for cleaned document text

pub mod cache;
pub mod fetcher;
