//! Application State

use std::sync::Arc;
use std::time::{Duration, Instant};

use agent_core::ConversationService;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Conversation orchestrator behind every RPC
    pub service: Arc<ConversationService>,

    /// Per-request deadline, if configured
    pub request_timeout: Option<Duration>,

    /// Whether an LLM API key is configured
    pub llm_configured: bool,

    /// Whether WEATHER_API_KEY is configured
    pub weather_configured: bool,

    pub started_at: Instant,
}
