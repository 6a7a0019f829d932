use thiserror::Error;

/// Top-level error type for ytnotify.
#[derive(Debug, Error)]
pub enum NotifierError {
    /// Transport or decoding failure talking to the YouTube API.
    #[error("youtube error: {0}")]
    YouTube(String),

    /// The YouTube API answered with an unexpected status.
    #[error("youtube returned HTTP {status}")]
    Http { status: u16 },

    /// Every configured API key answered 403.
    #[error("youtube quota exhausted on all {keys} API key(s)")]
    QuotaExhausted { keys: usize },

    /// No API key configured.
    #[error("no YouTube API key configured")]
    MissingCredentials,

    /// The API response did not have the expected shape.
    #[error("malformed response: {0}")]
    Malformed(String),

    /// Error from a messaging channel.
    #[error("channel error: {0}")]
    Channel(String),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// Document store error.
    #[error("memory error: {0}")]
    Memory(String),

    /// I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
