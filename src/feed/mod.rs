//! RSS/Atom retrieval and parsing

pub mod fetcher;

pub use fetcher::{FeedFetcher, parse_feed};
