//! Error Types

use thiserror::Error;

/// Result type alias for agent operations
pub type Result<T> = std::result::Result<T, AgentError>;

/// Agent error types
#[derive(Error, Debug)]
pub enum AgentError {
    /// Caller supplied a blank or malformed argument
    #[error("Invalid argument: {0} is required")]
    InvalidArgument(String),

    /// Conversation does not exist
    #[error("Conversation not found: {0}")]
    NotFound(String),

    /// Stored conversation changed since it was read
    #[error("Conversation {id} was modified concurrently (expected revision {expected}, found {found})")]
    Conflict { id: String, expected: u64, found: u64 },

    /// LLM provider error
    #[error("Provider error: {0}")]
    Provider(String),

    /// Provider unavailable or not responding
    #[error("Provider unavailable: {0}")]
    ProviderUnavailable(String),

    /// Provider answered without any usable choice
    #[error("No output returned by the model")]
    NoModelOutput,

    /// Reply requested for a conversation without messages
    #[error("Conversation has no messages")]
    EmptyConversation,

    /// Title generation failed
    #[error("Title generation failed: {0}")]
    TitleGeneration(String),

    /// Tool not found in registry
    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    /// Caller cancelled the operation or its deadline expired
    #[error("Operation cancelled")]
    Cancelled,

    /// Conversation store failure
    #[error("Store error: {0}")]
    Store(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Rate limited
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// Authentication failed
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Generic IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Other/unknown error
    #[error("{0}")]
    Other(String),
}

impl AgentError {
    /// Convert to a user-friendly message
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidArgument(field) => format!("The field '{field}' is required."),
            Self::NotFound(_) => "Conversation not found.".into(),
            Self::Conflict { .. } => {
                "The conversation was updated by another request. Please retry.".into()
            }
            Self::Provider(msg) => format!("The AI service encountered an error: {msg}"),
            Self::ProviderUnavailable(_) => {
                "The AI service is currently unavailable. Please try again.".into()
            }
            Self::NoModelOutput => "The AI service returned an empty answer.".into(),
            Self::ToolNotFound(name) => format!("The tool '{name}' is not available."),
            Self::Cancelled => "The request was cancelled before it completed.".into(),
            Self::RateLimited(_) => "You've made too many requests. Please wait a moment.".into(),
            Self::Auth(_) => "Authentication failed. Please check your credentials.".into(),
            _ => "An unexpected error occurred.".into(),
        }
    }
}
