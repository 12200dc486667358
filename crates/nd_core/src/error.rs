use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Source unavailable for '{keyword}': {reason}")]
    SourceUnavailable { keyword: String, reason: String },

    #[error("Malformed feed for '{keyword}': {reason}")]
    MalformedFeed { keyword: String, reason: String },

    #[error("Invalid recency window: {0}")]
    InvalidWindow(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("External error: {0}")]
    External(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
