//! Feed fetcher.
//!
//! Downloads the feed over HTTP with bounded timeouts and size, then turns
//! the entries into [`FeedItem`]s.

use async_trait::async_trait;
use feed_rs::parser;
use reqwest::{Client, ClientBuilder};
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

use crate::core::models::FeedItem;
use crate::errors::RadarError;
use crate::pipeline::FeedSource;
use crate::utils::text::{html_to_text, truncate_chars};

/// Connect timeout in seconds.
const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Total timeout in seconds.
const TOTAL_TIMEOUT_SECS: u64 = 30;

/// Maximum number of redirects to follow.
const MAX_REDIRECTS: usize = 5;

/// Largest feed body accepted, in bytes.
pub const MAX_FEED_SIZE: u64 = 5 * 1024 * 1024;

/// Descriptions are cut to this many characters to keep the prompt small.
pub const MAX_DESCRIPTION_CHARS: usize = 1200;

const USER_AGENT: &str = concat!("radar/", env!("CARGO_PKG_VERSION"), " (RSS digest)");

pub struct FeedFetcher {
    client: Client,
    url: Url,
    max_feed_size: u64,
}

impl FeedFetcher {
    /// # Errors
    ///
    /// Returns `FetchError` if the HTTP client cannot be built.
    pub fn new(url: Url) -> Result<Self, RadarError> {
        let client = Self::client_builder()
            .build()
            .map_err(|e| RadarError::FetchError(format!("failed to create HTTP client: {e}")))?;

        Ok(Self::with_client(url, client))
    }

    /// Client settings used by [`FeedFetcher::new`]: timeouts, redirect cap
    /// and user agent.
    #[must_use]
    pub fn client_builder() -> ClientBuilder {
        Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(Duration::from_secs(TOTAL_TIMEOUT_SECS))
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .user_agent(USER_AGENT)
    }

    #[must_use]
    pub fn with_client(url: Url, client: Client) -> Self {
        Self {
            client,
            url,
            max_feed_size: MAX_FEED_SIZE,
        }
    }

    /// Override the body size limit (defaults to [`MAX_FEED_SIZE`]).
    #[must_use]
    pub fn with_max_feed_size(mut self, bytes: u64) -> Self {
        self.max_feed_size = bytes;
        self
    }

    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// # Errors
    ///
    /// Returns `FetchError` on network failure, a non-2xx status, an
    /// oversized body, or a document that is not a parsable feed.
    pub async fn fetch(&self) -> Result<Vec<FeedItem>, RadarError> {
        info!("Fetching feed from {}", self.url);

        let mut response = self
            .client
            .get(self.url.clone())
            .send()
            .await
            .map_err(|e| RadarError::FetchError(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RadarError::FetchError(format!("HTTP error: {status}")));
        }

        let max = self.max_feed_size;
        if let Some(content_length) = response.content_length()
            && content_length > max
        {
            return Err(RadarError::FetchError(format!(
                "feed too large: {content_length} bytes (max {max} bytes)"
            )));
        }

        // Chunked responses carry no length up front; stop reading once past the cap.
        let mut body = Vec::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| RadarError::FetchError(format!("failed to read response: {e}")))?
        {
            body.extend_from_slice(&chunk);
            if body.len() as u64 > max {
                return Err(RadarError::FetchError(format!(
                    "feed too large: more than {max} bytes"
                )));
            }
        }
        debug!("Read {} bytes of feed", body.len());

        let items = parse_feed(&body)?;
        info!("Parsed {} usable entries from feed", items.len());
        Ok(items)
    }
}

#[async_trait]
impl FeedSource for FeedFetcher {
    async fn fetch_items(&self) -> Result<Vec<FeedItem>, RadarError> {
        self.fetch().await
    }
}

/// Parse feed bytes into items.
///
/// Entries without a title, a link, or a published/updated date are dropped.
///
/// # Errors
///
/// Returns `FetchError` when the bytes are not an RSS, Atom or JSON feed.
pub fn parse_feed(bytes: &[u8]) -> Result<Vec<FeedItem>, RadarError> {
    let feed = parser::parse(bytes)
        .map_err(|e| RadarError::FetchError(format!("failed to parse feed: {e}")))?;

    let total = feed.entries.len();
    let items: Vec<FeedItem> = feed
        .entries
        .into_iter()
        .filter_map(|entry| {
            let title = entry
                .title
                .map(|t| t.content.trim().to_string())
                .filter(|t| !t.is_empty())?;
            let link = entry
                .links
                .first()
                .map(|l| l.href.trim().to_string())
                .filter(|l| !l.is_empty())?;
            let published = entry.published.or(entry.updated)?;
            let description = entry
                .summary
                .map(|s| s.content)
                .or_else(|| entry.content.and_then(|c| c.body))
                .map(|d| truncate_chars(&html_to_text(&d), MAX_DESCRIPTION_CHARS))
                .unwrap_or_default();

            Some(FeedItem {
                title,
                link,
                published,
                description,
            })
        })
        .collect();

    if items.len() < total {
        debug!(
            "Skipped {} entries missing a title, link or date",
            total - items.len()
        );
    }

    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    const RSS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Example News</title>
    <link>https://example.com/</link>
    <description>News</description>
    <item>
      <title>  Model launch  </title>
      <link>https://example.com/launch</link>
      <pubDate>Thu, 15 Oct 2026 10:00:00 GMT</pubDate>
      <description><![CDATA[<p>A <b>new</b> model.</p>]]></description>
    </item>
    <item>
      <title>No date</title>
      <link>https://example.com/undated</link>
    </item>
    <item>
      <title></title>
      <link>https://example.com/untitled</link>
      <pubDate>Thu, 15 Oct 2026 10:00:00 GMT</pubDate>
    </item>
    <item>
      <title>Bare item</title>
      <link>https://example.com/bare</link>
      <pubDate>Wed, 14 Oct 2026 08:30:00 GMT</pubDate>
    </item>
  </channel>
</rss>"#;

    #[test]
    fn test_parse_feed_extracts_usable_items() {
        let items = parse_feed(RSS.as_bytes()).unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].title, "Model launch");
        assert_eq!(items[0].link, "https://example.com/launch");
        assert_eq!(
            items[0].published,
            Utc.with_ymd_and_hms(2026, 10, 15, 10, 0, 0).unwrap()
        );
        assert!(items[0].description.contains("new"));
        assert!(!items[0].description.contains("<p>"));

        assert_eq!(items[1].title, "Bare item");
        assert!(items[1].description.is_empty());
    }

    #[test]
    fn test_parse_feed_truncates_long_descriptions() {
        let long = "word ".repeat(1000);
        let rss = format!(
            r#"<rss version="2.0"><channel><title>t</title>
<item><title>Long</title><link>https://example.com/long</link>
<pubDate>Thu, 15 Oct 2026 10:00:00 GMT</pubDate>
<description>{long}</description></item></channel></rss>"#
        );

        let items = parse_feed(rss.as_bytes()).unwrap();
        assert_eq!(items[0].description.chars().count(), MAX_DESCRIPTION_CHARS);
    }

    #[test]
    fn test_parse_feed_atom_uses_updated_date() {
        let atom = r#"<?xml version="1.0" encoding="utf-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>Example</title>
  <id>urn:example</id>
  <updated>2026-10-16T09:00:00Z</updated>
  <entry>
    <title>Atom entry</title>
    <id>urn:example:1</id>
    <link href="https://example.com/atom-entry"/>
    <updated>2026-10-16T09:00:00Z</updated>
    <summary>Short summary</summary>
  </entry>
</feed>"#;

        let items = parse_feed(atom.as_bytes()).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(
            items[0].published,
            Utc.with_ymd_and_hms(2026, 10, 16, 9, 0, 0).unwrap()
        );
        assert_eq!(items[0].description, "Short summary");
    }

    #[test]
    fn test_parse_feed_rejects_garbage() {
        let err = parse_feed(b"this is not xml").unwrap_err();
        assert!(matches!(err, RadarError::FetchError(_)));
    }
}
