use chrono::{DateTime, Duration, Utc};

use crate::core::models::{FeedItem, FilteredBatch};

/// How far back an item may be published and still be reported.
pub const LOOKBACK_DAYS: i64 = 7;

/// Maximum number of items sent to the summarizer per run.
pub const MAX_ITEMS: usize = 5;

/// Keeps the items published within the last [`LOOKBACK_DAYS`] of `now`,
/// newest first, capped at [`MAX_ITEMS`].
#[must_use]
pub fn filter_recent(items: Vec<FeedItem>, now: DateTime<Utc>) -> FilteredBatch {
    filter_recent_with(items, now, Duration::days(LOOKBACK_DAYS), MAX_ITEMS)
}

/// Same as [`filter_recent`] with an explicit window and cap.
#[must_use]
pub fn filter_recent_with(
    items: Vec<FeedItem>,
    now: DateTime<Utc>,
    lookback: Duration,
    max_items: usize,
) -> FilteredBatch {
    let cutoff = now - lookback;

    let mut recent: Vec<FeedItem> = items
        .into_iter()
        .filter(|item| item.published >= cutoff)
        .collect();

    // Stable: items sharing a timestamp keep their feed order.
    recent.sort_by(|a, b| b.published.cmp(&a.published));
    recent.truncate(max_items);

    FilteredBatch::new(recent)
}
