//! Error Types for Travel Tools

use thiserror::Error;

pub type Result<T> = std::result::Result<T, TravelError>;

#[derive(Error, Debug)]
pub enum TravelError {
    #[error("{0} environment variable not set")]
    MissingApiKey(&'static str),

    #[error("{0}")]
    InvalidInput(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("failed to parse calendar: {0}")]
    Calendar(String),

    #[error("failed to execute request: {0}")]
    Network(#[from] reqwest::Error),

    #[error("failed to parse response: {0}")]
    Serialization(#[from] serde_json::Error),
}
