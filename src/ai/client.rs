//! LLM (`OpenAI`) API client module
//!
//! Encapsulates the Responses API call that turns a batch of feed items
//! into one digest.

use async_trait::async_trait;
use openai_api_rs::v1::chat_completion::{ChatCompletionMessage, Content, MessageRole};
use reqwest::Client;
use serde_json::{Value, json};
use std::fmt;
use std::time::Duration;
use tracing::info;
use url::Url;

use super::prompt_builder::{system_instruction, user_prompt};
use crate::core::config::{
    AppConfig, DEFAULT_DIGEST_LANGUAGE, DEFAULT_OPENAI_API_BASE, with_trailing_slash,
};
use crate::core::models::{FilteredBatch, Summary};
use crate::errors::RadarError;
use crate::pipeline::Summarizer;

/// Output budget for one digest.
pub const MAX_OUTPUT_TOKENS: usize = 800;

const REQUEST_TIMEOUT_SECS: u64 = 120;

#[must_use]
pub fn estimate_tokens(text: &str) -> usize {
    text.chars().count() / 4 + 1
}

/// LLM API client for generating summaries
pub struct LlmClient {
    http: Client,
    api_key: String,
    org_id: Option<String>,
    model_name: String,
    language: String,
    api_base: Url,
}

impl LlmClient {
    /// # Errors
    ///
    /// Returns `SummarizationError` if the HTTP client cannot be built.
    pub fn new(
        api_key: String,
        org_id: Option<String>,
        model_name: String,
    ) -> Result<Self, RadarError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| {
                RadarError::SummarizationError(format!("Failed to build OpenAI HTTP client: {e}"))
            })?;
        let api_base = Url::parse(DEFAULT_OPENAI_API_BASE)
            .map_err(|e| RadarError::SummarizationError(format!("Invalid API base: {e}")))?;

        Ok(Self {
            http,
            api_key,
            org_id,
            model_name,
            language: DEFAULT_DIGEST_LANGUAGE.to_string(),
            api_base,
        })
    }

    /// # Errors
    ///
    /// Same as [`LlmClient::new`].
    pub fn from_config(config: &AppConfig) -> Result<Self, RadarError> {
        Ok(Self::new(
            config.openai_api_key.clone(),
            config.openai_org_id.clone(),
            config.openai_model.clone(),
        )?
        .with_api_base(config.openai_api_base.clone())
        .with_language(config.digest_language.clone()))
    }

    /// Point the client at another host (staging proxy, local stub).
    ///
    /// The base includes the API version, e.g. `https://gw.example.com/openai/v1`.
    #[must_use]
    pub fn with_api_base(mut self, api_base: Url) -> Self {
        self.api_base = with_trailing_slash(api_base);
        self
    }

    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    #[must_use]
    pub fn with_http_client(mut self, http: Client) -> Self {
        self.http = http;
        self
    }

    #[must_use]
    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    fn responses_endpoint(&self) -> Result<Url, RadarError> {
        self.api_base
            .join("responses")
            .map_err(|e| RadarError::SummarizationError(format!("Invalid API base: {e}")))
    }

    #[must_use]
    pub fn build_prompt(&self, batch: &FilteredBatch) -> Vec<ChatCompletionMessage> {
        vec![
            ChatCompletionMessage {
                role: MessageRole::system,
                content: Content::Text(system_instruction(&self.language)),
                name: None,
                tool_calls: None,
                tool_call_id: None,
            },
            ChatCompletionMessage {
                role: MessageRole::user,
                content: Content::Text(user_prompt(batch, &self.language)),
                name: None,
                tool_calls: None,
                tool_call_id: None,
            },
        ]
    }

    /// # Errors
    ///
    /// Returns `SummarizationError` if the HTTP request to `OpenAI` fails,
    /// the status is not 2xx, or the response carries no usable text.
    pub async fn generate_summary(
        &self,
        prompt: Vec<ChatCompletionMessage>,
    ) -> Result<Summary, RadarError> {
        #[cfg(feature = "debug-logs")]
        info!("Using ChatGPT prompt:\n{:?}", prompt);

        let estimated_input_tokens = prompt
            .iter()
            .map(|msg| estimate_tokens(&format!("{:?}", msg.content)))
            .sum::<usize>();

        info!(
            "Requesting summary from {} ({} prompt messages, ~{} input tokens)",
            self.model_name,
            prompt.len(),
            estimated_input_tokens
        );

        let request_body = json!({
            "model": self.model_name,
            "input": build_responses_input_from_prompt(&prompt),
            "max_output_tokens": MAX_OUTPUT_TOKENS
        });

        let mut headers = reqwest::header::HeaderMap::new();
        let auth_value = format!("Bearer {}", self.api_key).parse().map_err(|e| {
            RadarError::SummarizationError(format!("Invalid Authorization header: {e}"))
        })?;
        headers.insert(reqwest::header::AUTHORIZATION, auth_value);

        if let Some(org) = &self.org_id {
            let org_value = org.parse().map_err(|e| {
                RadarError::SummarizationError(format!("Invalid OpenAI-Organization header: {e}"))
            })?;
            headers.insert("OpenAI-Organization", org_value);
        }

        let endpoint = self.responses_endpoint()?;

        let response = self
            .http
            .post(endpoint)
            .headers(headers)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                RadarError::SummarizationError(format!("OpenAI API request failed: {e}"))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_else(|e| {
                format!("Failed to read error response body (status {status}): {e}")
            });
            return Err(RadarError::SummarizationError(format!(
                "OpenAI API error (status {status}): {error_text}"
            )));
        }

        let response_json: Value = response.json().await.map_err(|e| {
            RadarError::SummarizationError(format!("Failed to parse OpenAI response: {e}"))
        })?;

        extract_output_text(&response_json)
            .and_then(|text| Summary::new(text))
            .ok_or_else(|| RadarError::SummarizationError("No text in response".to_string()))
    }
}

#[async_trait]
impl Summarizer for LlmClient {
    async fn summarize(&self, batch: &FilteredBatch) -> Result<Summary, RadarError> {
        let summary = self.generate_summary(self.build_prompt(batch)).await?;
        info!(
            "Received summary of {} chars for {} items",
            summary.as_str().chars().count(),
            batch.len()
        );
        Ok(summary)
    }
}

impl fmt::Debug for LlmClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmClient")
            .field("api_key", &"<redacted>")
            .field("org_id", &self.org_id)
            .field("model_name", &self.model_name)
            .field("language", &self.language)
            .field("api_base", &self.api_base.as_str())
            .finish_non_exhaustive()
    }
}

/// Build Responses API input payload from a chat-style prompt.
/// - Filters out assistant messages (Responses treats assistant content as output)
/// - Emits typed `input_text` parts
pub(crate) fn build_responses_input_from_prompt(prompt: &[ChatCompletionMessage]) -> Vec<Value> {
    prompt
        .iter()
        .filter(|m| !matches!(m.role, MessageRole::assistant))
        .map(|m| {
            let role_str = match m.role {
                MessageRole::system => "system",
                MessageRole::user | MessageRole::function | MessageRole::tool => "user",
                MessageRole::assistant => "assistant",
            };

            let parts: Vec<Value> = match &m.content {
                Content::Text(t) => vec![json!({
                    "type": "input_text",
                    "text": t
                })],
                Content::ImageUrl(_) => Vec::new(),
            };

            json!({
                "role": role_str,
                "content": parts
            })
        })
        .collect()
}

/// Pull the generated text out of a Responses API body.
///
/// Uses the top-level `output_text` convenience field when present,
/// otherwise joins every `output_text` content part.
#[must_use]
pub fn extract_output_text(response_json: &Value) -> Option<String> {
    if let Some(text) = response_json.get("output_text").and_then(|v| v.as_str()) {
        return Some(text.to_string());
    }

    let collected: Vec<String> = response_json
        .get("output")
        .and_then(|o| o.as_array())
        .into_iter()
        .flatten()
        .filter_map(|item| item.get("content").and_then(|c| c.as_array()))
        .flatten()
        .filter(|p| p.get("type").and_then(|t| t.as_str()) == Some("output_text"))
        .filter_map(|p| {
            p.get("text")
                .and_then(|t| t.as_str())
                .or_else(|| p.get("text").and_then(|t| t.get("value")).and_then(|v| v.as_str()))
                .map(std::string::ToString::to_string)
        })
        .collect();

    if collected.is_empty() {
        None
    } else {
        Some(collected.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::FeedItem;
    use crate::utils::filters::filter_recent;
    use chrono::Utc;

    fn client() -> LlmClient {
        LlmClient::new("test_key".to_string(), None, "gpt-4.1-mini".to_string())
            .unwrap()
            .with_language("English")
    }

    #[test]
    fn test_build_responses_input_filters_assistant_and_uses_typed_parts() {
        let prompt = vec![
            ChatCompletionMessage {
                role: MessageRole::system,
                content: Content::Text("policy".to_string()),
                name: None,
                tool_calls: None,
                tool_call_id: None,
            },
            ChatCompletionMessage {
                role: MessageRole::assistant,
                content: Content::Text("ack".to_string()),
                name: None,
                tool_calls: None,
                tool_call_id: None,
            },
            ChatCompletionMessage {
                role: MessageRole::user,
                content: Content::Text("hello".to_string()),
                name: None,
                tool_calls: None,
                tool_call_id: None,
            },
        ];

        let input = build_responses_input_from_prompt(&prompt);

        assert_eq!(input.len(), 2);
        assert_eq!(input[0]["role"], "system");
        assert_eq!(input[1]["role"], "user");
        assert_eq!(input[1]["content"][0]["type"], "input_text");
        assert_eq!(input[1]["content"][0]["text"], "hello");
    }

    #[test]
    fn test_build_prompt_has_system_then_user() {
        let now = Utc::now();
        let batch = filter_recent(
            vec![FeedItem {
                title: "Launch".to_string(),
                link: "https://example.com/launch".to_string(),
                published: now,
                description: "Details".to_string(),
            }],
            now,
        );

        let prompt = client().build_prompt(&batch);

        assert_eq!(prompt.len(), 2);
        assert!(matches!(prompt[0].role, MessageRole::system));
        assert!(matches!(prompt[1].role, MessageRole::user));
        match &prompt[1].content {
            Content::Text(text) => assert!(text.contains("https://example.com/launch")),
            Content::ImageUrl(_) => panic!("expected text content"),
        }
    }

    #[test]
    fn test_extract_output_text_prefers_top_level_field() {
        let body = json!({ "output_text": "Digest", "output": [] });
        assert_eq!(extract_output_text(&body).as_deref(), Some("Digest"));
    }

    #[test]
    fn test_extract_output_text_joins_output_parts() {
        let body = json!({
            "output": [
                { "type": "reasoning", "content": [] },
                {
                    "type": "message",
                    "content": [
                        { "type": "output_text", "text": "First" },
                        { "type": "refusal", "refusal": "no" },
                        { "type": "output_text", "text": { "value": "Second" } }
                    ]
                }
            ]
        });
        assert_eq!(extract_output_text(&body).as_deref(), Some("First\nSecond"));
    }

    #[test]
    fn test_extract_output_text_missing() {
        assert!(extract_output_text(&json!({ "output": [] })).is_none());
        assert!(extract_output_text(&json!({ "id": "resp_1" })).is_none());
    }

    #[test]
    fn test_responses_endpoint_appends_to_base_path() {
        assert_eq!(
            client().responses_endpoint().unwrap().as_str(),
            "https://api.openai.com/v1/responses"
        );

        let base = Url::parse("https://gw.example.com/openai/v1").unwrap();
        assert_eq!(
            client().with_api_base(base).responses_endpoint().unwrap().as_str(),
            "https://gw.example.com/openai/v1/responses"
        );
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let debug = format!("{:?}", client());
        assert!(!debug.contains("test_key"));
    }
}
