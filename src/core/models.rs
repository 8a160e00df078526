use chrono::{DateTime, Utc};
use std::fmt;

/// A single entry parsed from the feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedItem {
    pub title: String,
    pub link: String,
    pub published: DateTime<Utc>,
    /// Plain text, already stripped of HTML and truncated.
    pub description: String,
}

/// Recent feed items, newest first, at most `MAX_ITEMS` long.
///
/// Only built by [`crate::utils::filters::filter_recent`], so every batch
/// satisfies the window, ordering and size constraints.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilteredBatch {
    items: Vec<FeedItem>,
}

impl FilteredBatch {
    pub(crate) fn new(items: Vec<FeedItem>) -> Self {
        Self { items }
    }

    #[must_use]
    pub fn items(&self) -> &[FeedItem] {
        &self.items
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FeedItem> {
        self.items.iter()
    }
}

impl<'a> IntoIterator for &'a FilteredBatch {
    type Item = &'a FeedItem;
    type IntoIter = std::slice::Iter<'a, FeedItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Summary text returned by the model. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary(String);

impl Summary {
    /// Trims the text and rejects it if nothing is left.
    #[must_use]
    pub fn new(text: impl AsRef<str>) -> Option<Self> {
        let trimmed = text.as_ref().trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
