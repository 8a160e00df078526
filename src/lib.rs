//! Radar - a scheduled digest of recent feed items, summarized by `OpenAI`
//! and posted to a Telegram chat.
//!
//! Each invocation runs one linear pipeline and exits:
//! 1. Fetch and parse the RSS/Atom feed
//! 2. Keep the entries from the last 7 days, newest first, at most 5
//! 3. Ask the `OpenAI` Responses API for a single bulletin covering them
//! 4. Send the bulletin as one Telegram message
//!
//! # Architecture
//!
//! The system uses:
//! - feed-rs for feed parsing and html2text for entry descriptions
//! - reqwest for the three HTTP services
//! - openai-api-rs message types to model the prompt
//! - Tokio for the async runtime
//!
//! # Example
//!
//! ```no_run
//! use radar::core::config::AppConfig;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     radar::setup_logging();
//!
//!     let config = AppConfig::from_env()?;
//!     match radar::pipeline::run(&config).await? {
//!         radar::pipeline::RunOutcome::Delivered { items } => {
//!             println!("Delivered a digest of {items} items");
//!         }
//!         radar::pipeline::RunOutcome::NothingNew { .. } => println!("Nothing new"),
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod ai;
pub mod core;
pub mod errors;
pub mod feed;
pub mod pipeline;
pub mod telegram;
pub mod utils;

pub use errors::RadarError;

/// Configure structured JSON logging.
///
/// The level comes from `RUST_LOG` and defaults to `info`. Calling it more
/// than once is harmless; only the first call installs the subscriber.
///
/// # Example
///
/// ```
/// radar::setup_logging();
/// ```
pub fn setup_logging() {
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::prelude::*;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = tracing_subscriber::fmt::layer().json().with_target(true);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}
