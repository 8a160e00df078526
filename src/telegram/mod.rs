//! All Telegram-specific functionality

pub mod client;
pub mod message_builder;

// Re-export main types for convenience
pub use client::TelegramClient;
pub use message_builder::{MESSAGE_CHAR_LIMIT, build_send_message_payload, format_digest};
