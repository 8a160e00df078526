//! The run: fetch, filter, summarize, deliver.

pub mod deliver;
pub mod handler;

use async_trait::async_trait;

use crate::core::models::{FeedItem, FilteredBatch, Summary};
use crate::errors::RadarError;

pub use handler::{RunOptions, RunOutcome, exit_code, run, run_pipeline};

/// Produces the raw feed entries for a run.
#[async_trait]
pub trait FeedSource: Send + Sync {
    async fn fetch_items(&self) -> Result<Vec<FeedItem>, RadarError>;
}

/// Condenses a non-empty batch into one summary.
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, batch: &FilteredBatch) -> Result<Summary, RadarError>;
}

/// Delivers the outcome of a run to the end user.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn deliver_summary(&self, summary: &Summary) -> Result<(), RadarError>;

    /// Sent instead of a summary when nothing recent was found and the
    /// empty-batch notice is enabled.
    async fn deliver_no_news(&self) -> Result<(), RadarError>;
}
