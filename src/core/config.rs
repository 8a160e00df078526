use chrono_tz::Tz;
use std::env;
use std::fmt;
use url::Url;

use crate::errors::RadarError;

pub const DEFAULT_FEED_URL: &str = "https://openai.com/blog/rss.xml";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4.1-mini";
/// Includes the API version, like `OPENAI_API_BASE` in openai-api-rs.
pub const DEFAULT_OPENAI_API_BASE: &str = "https://api.openai.com/v1/";
pub const DEFAULT_TELEGRAM_API_BASE: &str = "https://api.telegram.org";
pub const DEFAULT_DIGEST_TITLE: &str = "Radar IA — OpenAI";
pub const DEFAULT_DIGEST_LANGUAGE: &str = "Brazilian Portuguese";

#[derive(Clone)]
pub struct AppConfig {
    pub telegram_bot_token: String,
    pub telegram_chat_id: String,
    pub openai_api_key: String,
    pub openai_org_id: Option<String>,
    pub openai_model: String,
    pub feed_url: Url,
    pub digest_title: String,
    pub digest_language: String,
    pub digest_timezone: Tz,
    pub notify_on_empty: bool,
    pub openai_api_base: Url,
    pub telegram_api_base: Url,
}

impl AppConfig {
    /// # Errors
    ///
    /// Returns `ConfigError` when a required variable is missing or a value
    /// cannot be parsed.
    pub fn from_env() -> Result<Self, RadarError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build the config from an arbitrary variable source.
    ///
    /// Values are trimmed and empty strings count as unset.
    ///
    /// # Errors
    ///
    /// Same as [`AppConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, RadarError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let require = |name: &str| {
            get(name).ok_or_else(|| RadarError::ConfigError(format!("Missing env var: {name}")))
        };

        let timezone = match get("DIGEST_TIMEZONE") {
            Some(name) => name.parse::<Tz>().map_err(|e| {
                RadarError::ConfigError(format!("DIGEST_TIMEZONE: {e}"))
            })?,
            None => Tz::UTC,
        };

        Ok(Self {
            telegram_bot_token: require("TELEGRAM_BOT_TOKEN")?,
            telegram_chat_id: require("TELEGRAM_CHAT_ID")?,
            openai_api_key: require("OPENAI_API_KEY")?,
            openai_org_id: get("OPENAI_ORG_ID"),
            openai_model: get("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string()),
            feed_url: parse_http_url(
                "FEED_URL",
                get("FEED_URL").as_deref().unwrap_or(DEFAULT_FEED_URL),
            )?,
            digest_title: get("DIGEST_TITLE").unwrap_or_else(|| DEFAULT_DIGEST_TITLE.to_string()),
            digest_language: get("DIGEST_LANGUAGE")
                .unwrap_or_else(|| DEFAULT_DIGEST_LANGUAGE.to_string()),
            digest_timezone: timezone,
            notify_on_empty: match get("NOTIFY_ON_EMPTY") {
                Some(raw) => parse_flag("NOTIFY_ON_EMPTY", &raw)?,
                None => false,
            },
            openai_api_base: parse_base_url(
                "OPENAI_API_BASE",
                get("OPENAI_API_BASE")
                    .as_deref()
                    .unwrap_or(DEFAULT_OPENAI_API_BASE),
            )?,
            telegram_api_base: parse_base_url(
                "TELEGRAM_API_BASE",
                get("TELEGRAM_API_BASE")
                    .as_deref()
                    .unwrap_or(DEFAULT_TELEGRAM_API_BASE),
            )?,
        })
    }
}

// Secrets stay out of logs.
impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("telegram_bot_token", &"<redacted>")
            .field("telegram_chat_id", &self.telegram_chat_id)
            .field("openai_api_key", &"<redacted>")
            .field("openai_org_id", &self.openai_org_id)
            .field("openai_model", &self.openai_model)
            .field("feed_url", &self.feed_url.as_str())
            .field("digest_title", &self.digest_title)
            .field("digest_language", &self.digest_language)
            .field("digest_timezone", &self.digest_timezone)
            .field("notify_on_empty", &self.notify_on_empty)
            .field("openai_api_base", &self.openai_api_base.as_str())
            .field("telegram_api_base", &self.telegram_api_base.as_str())
            .finish()
    }
}

fn parse_http_url(name: &str, raw: &str) -> Result<Url, RadarError> {
    let url = Url::parse(raw).map_err(|e| RadarError::ConfigError(format!("{name}: {e}")))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(RadarError::ConfigError(format!(
            "{name}: unsupported URL scheme: {scheme}"
        ))),
    }
}

/// Make sure `url`'s path ends in `/`, so joining a relative path appends
/// to it instead of replacing the last segment.
#[must_use]
pub fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

fn parse_base_url(name: &str, raw: &str) -> Result<Url, RadarError> {
    parse_http_url(name, raw).map(with_trailing_slash)
}

fn parse_flag(name: &str, raw: &str) -> Result<bool, RadarError> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(RadarError::ConfigError(format!(
            "{name}: expected a boolean, got {other:?}"
        ))),
    }
}
