//! Small text helpers shared by the feed parser and the message builder.

/// Render an HTML fragment as a single line of plain text.
///
/// Falls back to the raw input when the renderer rejects it.
#[must_use]
pub fn html_to_text(html: &str) -> String {
    let rendered = html2text::from_read(html.as_bytes(), 10_000)
        .unwrap_or_else(|_| html.to_string());

    rendered.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Truncate to at most `max_chars` characters, never splitting a code point.
#[must_use]
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}

/// Escape the characters Telegram's HTML parse mode treats as markup.
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}
