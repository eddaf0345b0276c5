//! RPC and Health Handlers

use std::collections::BTreeMap;
use std::time::Duration;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tokio_util::sync::{CancellationToken, DropGuard};

use agent_core::{AgentError, Conversation, ConversationSummary};

use crate::state::AppState;

// ============================================================================
// Request / Response Types
// ============================================================================

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub checks: BTreeMap<&'static str, String>,
    pub uptime: String,
}

#[derive(Debug, Deserialize)]
pub struct StartConversationRequest {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StartConversationResponse {
    pub conversation_id: String,
    pub title: String,
    pub reply: String,
}

#[derive(Debug, Deserialize)]
pub struct ContinueConversationRequest {
    #[serde(default)]
    pub conversation_id: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ContinueConversationResponse {
    pub reply: String,
}

#[derive(Debug, Deserialize)]
pub struct DescribeConversationRequest {
    #[serde(default)]
    pub conversation_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DescribeConversationResponse {
    pub conversation: Conversation,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ListConversationsResponse {
    pub conversations: Vec<ConversationSummary>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

// ============================================================================
// Errors
// ============================================================================

/// `AgentError` rendered as an HTTP response
pub struct ApiError(AgentError);

impl From<AgentError> for ApiError {
    fn from(err: AgentError) -> Self {
        Self(err)
    }
}

impl ApiError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match &self.0 {
            AgentError::InvalidArgument(_) => (StatusCode::BAD_REQUEST, "invalid_argument"),
            AgentError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            AgentError::Conflict { .. } => (StatusCode::CONFLICT, "aborted"),
            AgentError::Cancelled => (StatusCode::REQUEST_TIMEOUT, "deadline_exceeded"),
            AgentError::RateLimited(_) => (StatusCode::TOO_MANY_REQUESTS, "resource_exhausted"),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "internal"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        if status.is_server_error() {
            tracing::error!(code, "Request failed: {}", self.0);
        } else {
            tracing::warn!(code, "Request rejected: {}", self.0);
        }

        let body = ErrorResponse {
            error: self.0.user_message(),
            code: code.into(),
        };
        (status, Json(body)).into_response()
    }
}

// ============================================================================
// Cancellation
// ============================================================================

/// Cancellation scope of one request
///
/// The token fires when the deadline passes or when the handler future is
/// dropped, e.g. because the client went away.
struct RequestScope {
    token: CancellationToken,
    _guard: DropGuard,
}

impl RequestScope {
    fn new(timeout: Option<Duration>) -> Self {
        let token = CancellationToken::new();

        if let Some(limit) = timeout {
            let deadline = token.clone();
            tokio::spawn(async move {
                tokio::select! {
                    () = tokio::time::sleep(limit) => {
                        tracing::warn!(timeout = ?limit, "Request deadline exceeded");
                        deadline.cancel();
                    }
                    () = deadline.cancelled() => {}
                }
            });
        }

        let guard = token.clone().drop_guard();
        Self {
            token,
            _guard: guard,
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// Greeting
pub async fn index() -> &'static str {
    "Hi, I'm your travel assistant. Ask me about weather, airports or public holidays."
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let mut checks = BTreeMap::new();
    let mut status = "healthy";
    let mut code = StatusCode::OK;

    match state.service.store().list().await {
        Ok(_) => {
            checks.insert("store", "ok".to_string());
        }
        Err(e) => {
            tracing::error!("Conversation store health check failed: {}", e);
            checks.insert("store", e.to_string());
            status = "unhealthy";
            code = StatusCode::SERVICE_UNAVAILABLE;
        }
    }

    for (name, configured) in [
        ("openai_api_key", state.llm_configured),
        ("weather_api_key", state.weather_configured),
    ] {
        if configured {
            checks.insert(name, "ok".to_string());
        } else {
            checks.insert(name, "missing".to_string());
            if code == StatusCode::OK {
                status = "degraded";
            }
        }
    }

    let response = HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        checks,
        uptime: format!("{}s", state.started_at.elapsed().as_secs()),
    };
    (code, Json(response))
}

pub async fn start_conversation(
    State(state): State<AppState>,
    Json(payload): Json<StartConversationRequest>,
) -> Result<Json<StartConversationResponse>, ApiError> {
    let scope = RequestScope::new(state.request_timeout);
    let started = state
        .service
        .start_conversation(&payload.message, &scope.token)
        .await?;

    Ok(Json(StartConversationResponse {
        conversation_id: started.conversation_id.to_string(),
        title: started.title,
        reply: started.reply,
    }))
}

pub async fn continue_conversation(
    State(state): State<AppState>,
    Json(payload): Json<ContinueConversationRequest>,
) -> Result<Json<ContinueConversationResponse>, ApiError> {
    let scope = RequestScope::new(state.request_timeout);
    let reply = state
        .service
        .continue_conversation(&payload.conversation_id, &payload.message, &scope.token)
        .await?;

    Ok(Json(ContinueConversationResponse { reply }))
}

pub async fn describe_conversation(
    State(state): State<AppState>,
    Json(payload): Json<DescribeConversationRequest>,
) -> Result<Json<DescribeConversationResponse>, ApiError> {
    let conversation = state
        .service
        .describe_conversation(&payload.conversation_id)
        .await?;

    Ok(Json(DescribeConversationResponse { conversation }))
}

pub async fn list_conversations(
    State(state): State<AppState>,
) -> Result<Json<ListConversationsResponse>, ApiError> {
    let conversations = state.service.list_conversations().await?;
    Ok(Json(ListConversationsResponse { conversations }))
}
