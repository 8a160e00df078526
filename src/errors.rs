use thiserror::Error;

#[derive(Debug, Error)]
pub enum RadarError {
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("Failed to fetch feed: {0}")]
    FetchError(String),

    #[error("Failed to summarize feed items: {0}")]
    SummarizationError(String),

    #[error("Failed to deliver message: {0}")]
    DeliveryError(String),
}

impl RadarError {
    /// Process exit status for this failure. Always non-zero.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            RadarError::ConfigError(_) => 2,
            RadarError::FetchError(_) => 3,
            RadarError::SummarizationError(_) => 4,
            RadarError::DeliveryError(_) => 5,
        }
    }
}
