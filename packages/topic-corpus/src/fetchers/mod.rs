//! Fetcher implementations.
//!
//! - `HttpFetcher` - direct HTTP fetch via reqwest
//! - `PoliteFetcher` - wrapper adding the randomized delay and rate limit
//!   required before every request to the source site

pub mod http;
pub mod polite;

pub use http::HttpFetcher;
pub use polite::{FetcherExt, PoliteFetcher};
