//! Message formatting for Telegram delivery.
//!
//! Messages are sent with `parse_mode=HTML`, so every piece of text that did
//! not originate here is escaped before it is embedded.

use serde_json::{Value, json};

use crate::utils::text::{escape_html, truncate_chars};

/// Character budget for one message, note excluded. Telegram's hard limit is 4096.
pub const MESSAGE_CHAR_LIMIT: usize = 3800;

pub const TRUNCATION_NOTE: &str = "\n\n(digest truncated to fit Telegram's message limit)";

/// Build the JSON body for `sendMessage`.
#[must_use]
pub fn build_send_message_payload(chat_id: &str, text: &str) -> Value {
    json!({
        "chat_id": chat_id,
        "text": text,
        "parse_mode": "HTML",
        "disable_web_page_preview": true
    })
}

/// Header, date line, then the escaped summary body.
///
/// # Examples
///
/// ```
/// use radar::telegram::message_builder::format_digest;
///
/// let text = format_digest("Radar", "17/10/2026", "A & B");
/// assert_eq!(text, "📡 <b>Radar</b>\n🗓️ 17/10/2026\n\nA &amp; B");
/// ```
#[must_use]
pub fn format_digest(title: &str, date: &str, summary: &str) -> String {
    let message = format!(
        "📡 <b>{}</b>\n🗓️ {}\n\n{}",
        escape_html(title),
        date,
        escape_html(summary)
    );
    truncate_message(&message)
}

#[must_use]
pub fn format_no_news(title: &str, lookback_days: i64) -> String {
    format!(
        "📡 <b>{}</b>\n\nNo relevant news in the last {lookback_days} days.",
        escape_html(title)
    )
}

/// Cut a message that exceeds [`MESSAGE_CHAR_LIMIT`] and append [`TRUNCATION_NOTE`].
#[must_use]
pub fn truncate_message(message: &str) -> String {
    if message.chars().count() <= MESSAGE_CHAR_LIMIT {
        return message.to_string();
    }

    let mut cut = truncate_chars(message, MESSAGE_CHAR_LIMIT);
    // A half-written entity like "&am" would be rejected by Telegram's parser.
    if let Some(amp) = cut.rfind('&')
        && !cut[amp..].contains(';')
    {
        cut.truncate(amp);
    }
    cut.push_str(TRUNCATION_NOTE);
    cut
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_shape() {
        let payload = build_send_message_payload("-100123", "hello");
        assert_eq!(payload["chat_id"], "-100123");
        assert_eq!(payload["text"], "hello");
        assert_eq!(payload["parse_mode"], "HTML");
        assert_eq!(payload["disable_web_page_preview"], true);
    }

    #[test]
    fn test_format_digest_escapes_summary_and_title() {
        let text = format_digest("R&D <news>", "01/02/2026", "1 < 2");
        assert!(text.starts_with("📡 <b>R&amp;D &lt;news&gt;</b>\n🗓️ 01/02/2026\n\n"));
        assert!(text.ends_with("1 &lt; 2"));
    }

    #[test]
    fn test_short_message_untouched() {
        assert_eq!(truncate_message("short"), "short");
    }

    #[test]
    fn test_long_message_truncated_with_note() {
        let long = "é".repeat(MESSAGE_CHAR_LIMIT + 500);
        let text = truncate_message(&long);
        assert!(text.ends_with(TRUNCATION_NOTE));
        assert_eq!(
            text.chars().count(),
            MESSAGE_CHAR_LIMIT + TRUNCATION_NOTE.chars().count()
        );
    }

    #[test]
    fn test_truncation_never_splits_entity() {
        let mut long = "a".repeat(MESSAGE_CHAR_LIMIT - 2);
        long.push_str("&amp;");
        long.push_str(&"b".repeat(100));

        let text = truncate_message(&long);
        let body = text.strip_suffix(TRUNCATION_NOTE).unwrap();
        assert_eq!(body, "a".repeat(MESSAGE_CHAR_LIMIT - 2));
    }

    #[test]
    fn test_no_news_message() {
        let text = format_no_news("Radar", 7);
        assert!(text.contains("<b>Radar</b>"));
        assert!(text.contains("last 7 days"));
    }
}
