use chrono::{DateTime, Utc};
use tracing::{Instrument, info, info_span};
use uuid::Uuid;

use super::deliver::TelegramDelivery;
use super::{FeedSource, Notifier, Summarizer};
use crate::ai::LlmClient;
use crate::core::config::AppConfig;
use crate::errors::RadarError;
use crate::feed::FeedFetcher;
use crate::utils::filters::{LOOKBACK_DAYS, filter_recent};

#[derive(Debug, Clone, Copy)]
pub struct RunOptions {
    /// Reference time for the recency window.
    pub now: DateTime<Utc>,
    pub notify_on_empty: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// A digest covering `items` entries was delivered.
    Delivered { items: usize },
    /// Nothing recent. `notified` tells whether the no-news notice went out.
    NothingNew { notified: bool },
}

/// Fetch, filter, summarize and deliver, stopping at the first failure.
///
/// An empty batch ends the run successfully without touching the
/// summarizer, and without touching the notifier unless
/// `options.notify_on_empty` is set.
///
/// # Errors
///
/// Propagates the first stage error unchanged.
pub async fn run_pipeline<F, S, N>(
    source: &F,
    summarizer: &S,
    notifier: &N,
    options: RunOptions,
) -> Result<RunOutcome, RadarError>
where
    F: FeedSource + ?Sized,
    S: Summarizer + ?Sized,
    N: Notifier + ?Sized,
{
    let items = source.fetch_items().await?;
    let fetched = items.len();

    let batch = filter_recent(items, options.now);
    info!(
        "{} of {} entries published in the last {} days",
        batch.len(),
        fetched,
        LOOKBACK_DAYS
    );

    if batch.is_empty() {
        if options.notify_on_empty {
            notifier.deliver_no_news().await?;
            return Ok(RunOutcome::NothingNew { notified: true });
        }
        info!("Nothing new; skipping summarization and delivery");
        return Ok(RunOutcome::NothingNew { notified: false });
    }

    let summary = summarizer.summarize(&batch).await?;
    notifier.deliver_summary(&summary).await?;

    Ok(RunOutcome::Delivered { items: batch.len() })
}

/// One scheduled run against the real services described by `config`.
///
/// # Errors
///
/// Returns the error of the first stage that failed.
pub async fn run(config: &AppConfig) -> Result<RunOutcome, RadarError> {
    let run_id = Uuid::new_v4();

    async {
        info!("Starting run for feed {}", config.feed_url);
        let now = Utc::now();

        let fetcher = FeedFetcher::new(config.feed_url.clone())?;
        let llm = LlmClient::from_config(config)?;
        let delivery = TelegramDelivery::from_config(config, now)?;

        run_pipeline(
            &fetcher,
            &llm,
            &delivery,
            RunOptions {
                now,
                notify_on_empty: config.notify_on_empty,
            },
        )
        .await
    }
    .instrument(info_span!("run", %run_id))
    .await
}

/// Process exit status for a finished run.
#[must_use]
pub fn exit_code(result: &Result<RunOutcome, RadarError>) -> u8 {
    match result {
        Ok(_) => 0,
        Err(e) => e.exit_code(),
    }
}
