//! Prompt text for the digest request.

use crate::core::models::FilteredBatch;

/// Per-field cap applied to feed text before it reaches the prompt.
pub const MAX_FIELD_LEN: usize = 1200;

/// Remove control characters and hard-truncate feed-provided text.
#[must_use]
pub fn sanitize_feed_text(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_control())
        .take(MAX_FIELD_LEN)
        .collect::<String>()
        .trim()
        .to_string()
}

#[must_use]
pub fn system_instruction(language: &str) -> String {
    format!(
        "You are a technical and executive news editor. Summarize news objectively, \
         facts only. No opinions. Write in {language}. 4 to 6 lines per news item."
    )
}

/// Renders the batch as one bullet per item with its title, link and feed context.
#[must_use]
pub fn items_block(batch: &FilteredBatch) -> String {
    batch
        .iter()
        .map(|item| {
            format!(
                "- Title: {}\n  Link: {}\n  Context (RSS): {}",
                sanitize_feed_text(&item.title),
                sanitize_feed_text(&item.link),
                sanitize_feed_text(&item.description)
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[must_use]
pub fn user_prompt(batch: &FilteredBatch, language: &str) -> String {
    format!(
        "Write a single bulletin with {count} items.\n\
         \n\
         Rules:\n\
         - Each item: the TITLE on one line, then 4-6 lines of summary.\n\
         - Include the link at the end of each item.\n\
         - Do not invent details: use only the context provided.\n\
         - Language: {language}, factual.\n\
         \n\
         Items:\n\
         {items}",
        count = batch.len(),
        items = items_block(batch)
    )
}
