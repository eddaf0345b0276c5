//! Router

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::handlers::{
    continue_conversation, describe_conversation, health_check, index, list_conversations,
    start_conversation,
};
use crate::state::AppState;

/// Prefix shared by the chat service RPCs
pub const RPC_PREFIX: &str = "/twirp/chat.ChatService";

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let rpc = Router::new()
        .route("/StartConversation", post(start_conversation))
        .route("/ContinueConversation", post(continue_conversation))
        .route("/DescribeConversation", post(describe_conversation))
        .route("/ListConversations", post(list_conversations));

    Router::new()
        .route("/", get(index))
        .route("/health", get(health_check))
        .nest(RPC_PREFIX, rpc)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
