//! Telegram Bot API client module
//!
//! Only `sendMessage` is needed. The bot token is part of every request URL,
//! so errors are stripped of their URL before they are surfaced.

use reqwest::Client;
use serde::Deserialize;
use std::fmt;
use std::time::Duration;
use tracing::{error, info};
use url::Url;

use super::message_builder::build_send_message_payload;
use crate::core::config::{AppConfig, DEFAULT_TELEGRAM_API_BASE, with_trailing_slash};
use crate::errors::RadarError;

const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Envelope returned by every Bot API method.
#[derive(Debug, Deserialize)]
struct BotApiResponse {
    ok: bool,
    description: Option<String>,
    error_code: Option<i64>,
}

/// Telegram Bot API client bound to one bot and one chat.
pub struct TelegramClient {
    http: Client,
    token: String,
    chat_id: String,
    api_base: Url,
}

impl TelegramClient {
    /// # Errors
    ///
    /// Returns `DeliveryError` if the HTTP client cannot be built.
    pub fn new(token: String, chat_id: String) -> Result<Self, RadarError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| {
                RadarError::DeliveryError(format!("Failed to build Telegram HTTP client: {e}"))
            })?;
        let api_base = Url::parse(DEFAULT_TELEGRAM_API_BASE)
            .map_err(|e| RadarError::DeliveryError(format!("Invalid API base: {e}")))?;

        Ok(Self {
            http,
            token,
            chat_id,
            api_base,
        })
    }

    /// # Errors
    ///
    /// Same as [`TelegramClient::new`].
    pub fn from_config(config: &AppConfig) -> Result<Self, RadarError> {
        Ok(Self::new(
            config.telegram_bot_token.clone(),
            config.telegram_chat_id.clone(),
        )?
        .with_api_base(config.telegram_api_base.clone()))
    }

    #[must_use]
    pub fn with_api_base(mut self, api_base: Url) -> Self {
        self.api_base = with_trailing_slash(api_base);
        self
    }

    #[must_use]
    pub fn with_http_client(mut self, http: Client) -> Self {
        self.http = http;
        self
    }

    #[must_use]
    pub fn chat_id(&self) -> &str {
        &self.chat_id
    }

    fn method_url(&self, method: &str) -> Result<Url, RadarError> {
        // Tokens contain ':', which would otherwise parse as a URL scheme.
        self.api_base
            .join(&format!("./bot{}/{method}", self.token))
            .map_err(|e| RadarError::DeliveryError(format!("Invalid Telegram API URL: {e}")))
    }

    /// Send one text message to the configured chat.
    ///
    /// # Errors
    ///
    /// Returns `DeliveryError` on network failure, a non-2xx status, or a
    /// response whose `ok` flag is false.
    pub async fn send_message(&self, text: &str) -> Result<(), RadarError> {
        let payload = build_send_message_payload(&self.chat_id, text);

        let response = self
            .http
            .post(self.method_url("sendMessage")?)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                RadarError::DeliveryError(format!(
                    "Telegram API request failed: {}",
                    e.without_url()
                ))
            })?;

        let status = response.status();
        let body_text = response.text().await.map_err(|e| {
            RadarError::DeliveryError(format!(
                "Failed to read Telegram response (status {status}): {}",
                e.without_url()
            ))
        })?;

        let parsed = serde_json::from_str::<BotApiResponse>(&body_text).ok();

        match parsed {
            Some(resp) if status.is_success() && resp.ok => {
                info!(
                    "Delivered message of {} chars to chat {}",
                    text.chars().count(),
                    self.chat_id
                );
                Ok(())
            }
            Some(resp) => {
                let description = resp
                    .description
                    .unwrap_or_else(|| "no description".to_string());
                error!(
                    "sendMessage rejected: status={} error_code={:?} description={}",
                    status, resp.error_code, description
                );
                Err(RadarError::DeliveryError(format!(
                    "Telegram API error (status {status}): {description}"
                )))
            }
            None => Err(RadarError::DeliveryError(format!(
                "Unexpected Telegram response (status {status})"
            ))),
        }
    }
}

impl fmt::Debug for TelegramClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelegramClient")
            .field("token", &"<redacted>")
            .field("chat_id", &self.chat_id)
            .field("api_base", &self.api_base.as_str())
            .finish_non_exhaustive()
    }
}
