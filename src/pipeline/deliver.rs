use async_trait::async_trait;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use tracing::info;

use super::Notifier;
use crate::core::config::AppConfig;
use crate::core::models::Summary;
use crate::errors::RadarError;
use crate::telegram::TelegramClient;
use crate::telegram::message_builder::{format_digest, format_no_news};
use crate::utils::filters::LOOKBACK_DAYS;

/// Formats the digest and hands it to Telegram.
#[derive(Debug)]
pub struct TelegramDelivery {
    client: TelegramClient,
    title: String,
    timezone: Tz,
    issued_at: DateTime<Utc>,
}

impl TelegramDelivery {
    #[must_use]
    pub fn new(client: TelegramClient, title: String, timezone: Tz, issued_at: DateTime<Utc>) -> Self {
        Self {
            client,
            title,
            timezone,
            issued_at,
        }
    }

    /// # Errors
    ///
    /// Returns `DeliveryError` if the Telegram client cannot be built.
    pub fn from_config(config: &AppConfig, issued_at: DateTime<Utc>) -> Result<Self, RadarError> {
        Ok(Self::new(
            TelegramClient::from_config(config)?,
            config.digest_title.clone(),
            config.digest_timezone,
            issued_at,
        ))
    }

    /// Run date as shown in the header, in the configured timezone.
    #[must_use]
    pub fn issue_date(&self) -> String {
        self.issued_at
            .with_timezone(&self.timezone)
            .format("%d/%m/%Y")
            .to_string()
    }
}

#[async_trait]
impl Notifier for TelegramDelivery {
    async fn deliver_summary(&self, summary: &Summary) -> Result<(), RadarError> {
        info!("Sending digest to chat {}", self.client.chat_id());
        let message = format_digest(&self.title, &self.issue_date(), summary.as_str());
        self.client.send_message(&message).await
    }

    async fn deliver_no_news(&self) -> Result<(), RadarError> {
        info!("Sending no-news notice to chat {}", self.client.chat_id());
        self.client
            .send_message(&format_no_news(&self.title, LOOKBACK_DAYS))
            .await
    }
}
